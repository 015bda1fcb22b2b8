use crate::foundation::color::Color;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a stroke or fill is colored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Paint {
    Solid(Color),
    /// Linear gradient along the frame diagonal (top-left to bottom-right), stops spaced evenly,
    /// optionally rotated about the frame center.
    Gradient { colors: Vec<Color>, rotate: f64 },
    /// Image tiled from the frame origin. Unloadable images paint nothing.
    Pattern(PathBuf),
}

impl Default for Paint {
    /// Unset styles paint opaque black.
    fn default() -> Self {
        Self::Solid(Color::BLACK)
    }
}

impl Paint {
    pub fn solid(css: &str) -> Result<Self, String> {
        Color::parse(css).map(Self::Solid)
    }

    pub fn gradient(colors: &[&str], rotate: f64) -> Result<Self, String> {
        let colors = colors
            .iter()
            .map(|c| Color::parse(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Gradient { colors, rotate })
    }

    /// `true` when this paint can never produce a visible pixel.
    pub fn is_invisible(&self) -> bool {
        match self {
            Self::Solid(c) => c.is_transparent(),
            Self::Gradient { colors, .. } => colors.iter().all(|c| c.is_transparent()),
            Self::Pattern(_) => false,
        }
    }
}

impl<'de> Deserialize<'de> for Paint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Css(String),
            Gradient {
                gradient: Vec<Color>,
                #[serde(default)]
                rotate: f64,
            },
            Image {
                image: PathBuf,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Css(s) => Color::parse(&s)
                .map(Paint::Solid)
                .map_err(serde::de::Error::custom),
            Repr::Gradient { gradient, rotate } => {
                if gradient.is_empty() {
                    return Err(serde::de::Error::custom(
                        "gradient needs at least one color",
                    ));
                }
                Ok(Paint::Gradient {
                    colors: gradient,
                    rotate,
                })
            }
            Repr::Image { image } => Ok(Paint::Pattern(image)),
        }
    }
}

/// Blurred halo drawn beneath a shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    /// Blur strength in pixels; 0 disables the glow.
    pub strength: f64,
    pub color: Color,
}

impl Default for Glow {
    fn default() -> Self {
        Self {
            strength: 0.0,
            color: Color::TRANSPARENT,
        }
    }
}

impl Glow {
    pub fn is_visible(&self) -> bool {
        self.strength > 0.0 && !self.color.is_transparent()
    }
}

/// Resolved stroke/fill styling shared by every primitive an animation issues.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeStyle {
    pub stroke: Paint,
    pub fill: Paint,
    pub line_width: f64,
    /// Round line caps, and quadratic smoothing for polygons.
    pub rounded: bool,
    pub glow: Glow,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke: Paint::default(),
            fill: Paint::default(),
            line_width: 1.0,
            rounded: false,
            glow: Glow::default(),
        }
    }
}
