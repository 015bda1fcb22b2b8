use crate::animation::AnimationKind;
use crate::shapes::{Glow, Paint, ShapeStyle};
use crate::spectrum::FrequencyBand;
use serde::Deserialize;

/// Edge selection shared by Cubes, Lines and Wave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Edges {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
    pub center: bool,
}

impl Edges {
    /// Bottom is drawn when requested, or when no edge is requested at all.
    pub fn draws_bottom(self) -> bool {
        self.bottom || !(self.top || self.right || self.left || self.center)
    }
}

/// Drawing parameters of one animation instance.
///
/// Built from per-kind defaults merged with caller overrides. `diameter` and `cube_height` may
/// still be zero here; they resolve to canvas-derived defaults on first draw.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    pub count: usize,
    pub diameter: f64,
    pub gap: f64,
    pub rotate: f64,
    pub cube_height: f64,
    /// Rectangle corner radius (Cubes).
    pub radius: f64,
    /// Shine: pull the inner end inward by half the sample value.
    pub offset: bool,
    pub edges: Edges,
    pub mirrored_x: bool,
    pub mirrored_y: bool,
    pub frequency_band: FrequencyBand,
    pub style: ShapeStyle,
}

impl AnimationConfig {
    pub fn defaults(kind: AnimationKind) -> Self {
        let white = Paint::Solid(crate::foundation::color::Color::WHITE);
        let clear = Paint::Solid(crate::foundation::color::Color::TRANSPARENT);

        let base = Self {
            count: 0,
            diameter: 0.0,
            gap: 0.0,
            rotate: 0.0,
            cube_height: 0.0,
            radius: 0.0,
            offset: false,
            edges: Edges::default(),
            mirrored_x: false,
            mirrored_y: false,
            frequency_band: FrequencyBand::Mids,
            style: ShapeStyle {
                stroke: white,
                fill: clear,
                line_width: 1.0,
                rounded: false,
                glow: Glow::default(),
            },
        };
        let bottom = Edges {
            bottom: true,
            ..Edges::default()
        };

        match kind {
            AnimationKind::Arcs => Self { count: 40, ..base },
            AnimationKind::Circles => Self { count: 40, ..base },
            AnimationKind::Cubes => Self {
                count: 20,
                gap: 5.0,
                edges: bottom,
                ..base
            },
            AnimationKind::Flower => Self { count: 20, ..base },
            AnimationKind::Glob => Self {
                count: 100,
                style: ShapeStyle {
                    rounded: true,
                    ..base.style.clone()
                },
                ..base
            },
            AnimationKind::Lines => Self {
                count: 64,
                edges: bottom,
                style: ShapeStyle {
                    fill: Paint::default(),
                    ..base.style.clone()
                },
                ..base
            },
            AnimationKind::Shine => Self {
                count: 30,
                style: ShapeStyle {
                    fill: Paint::default(),
                    ..base.style.clone()
                },
                ..base
            },
            AnimationKind::Square => Self {
                count: 40,
                style: ShapeStyle {
                    fill: Paint::default(),
                    ..base.style.clone()
                },
                ..base
            },
            AnimationKind::Turntable => Self {
                count: 20,
                cube_height: 20.0,
                gap: 5.0,
                ..base
            },
            AnimationKind::Wave => Self {
                count: 64,
                edges: bottom,
                ..base
            },
        }
    }

    /// Merge caller-supplied overrides over this configuration.
    pub fn with_overrides(mut self, o: &AnimationOverrides) -> Self {
        macro_rules! take {
            ($($field:ident => $target:expr),* $(,)?) => {
                $(if let Some(v) = o.$field.clone() { $target = v; })*
            };
        }
        take!(
            count => self.count,
            diameter => self.diameter,
            gap => self.gap,
            rotate => self.rotate,
            cube_height => self.cube_height,
            radius => self.radius,
            offset => self.offset,
            top => self.edges.top,
            right => self.edges.right,
            bottom => self.edges.bottom,
            left => self.edges.left,
            center => self.edges.center,
            mirrored_x => self.mirrored_x,
            mirrored_y => self.mirrored_y,
            frequency_band => self.frequency_band,
            line_color => self.style.stroke,
            fill_color => self.style.fill,
            line_width => self.style.line_width,
            rounded => self.style.rounded,
            glow => self.style.glow,
        );
        self
    }
}

/// Partial configuration as written in scene files and presets. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationOverrides {
    pub count: Option<usize>,
    pub diameter: Option<f64>,
    pub gap: Option<f64>,
    pub rotate: Option<f64>,
    pub cube_height: Option<f64>,
    pub radius: Option<f64>,
    pub offset: Option<bool>,
    pub top: Option<bool>,
    pub right: Option<bool>,
    pub bottom: Option<bool>,
    pub left: Option<bool>,
    pub center: Option<bool>,
    pub mirrored_x: Option<bool>,
    pub mirrored_y: Option<bool>,
    pub frequency_band: Option<FrequencyBand>,
    pub line_color: Option<Paint>,
    pub fill_color: Option<Paint>,
    pub line_width: Option<f64>,
    pub rounded: Option<bool>,
    pub glow: Option<Glow>,
}

impl AnimationOverrides {
    /// Overrides carrying only a stroke and fill.
    pub fn colors(stroke: Paint, fill: Paint) -> Self {
        Self {
            line_color: Some(stroke),
            fill_color: Some(fill),
            ..Self::default()
        }
    }
}
