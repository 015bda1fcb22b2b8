//! Audio-reactive animation variants.
//!
//! Every variant follows the same per-frame recipe: band-limit and scale the snapshot into a
//! [`WorkingSpectrum`], mirror it when the variant supports mirroring, then walk `count` slots and
//! issue primitives through [`Shapes`]. The slot mapping of each variant lives in its own module.

mod arcs;
mod circles;
mod config;
mod cubes;
mod flower;
mod glob;
mod lines;
mod shine;
mod square;
mod turntable;
mod wave;

pub use config::{AnimationConfig, AnimationOverrides, Edges};

use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{VizError, VizResult};
use crate::shapes::{ShapeStyle, Shapes};
use crate::spectrum::WorkingSpectrum;
use std::sync::Arc;

/// Closed set of animation families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AnimationKind {
    Arcs,
    Circles,
    Cubes,
    Flower,
    Glob,
    Lines,
    Shine,
    Square,
    Turntable,
    Wave,
}

impl AnimationKind {
    pub const ALL: [Self; 10] = [
        Self::Arcs,
        Self::Circles,
        Self::Cubes,
        Self::Flower,
        Self::Glob,
        Self::Lines,
        Self::Shine,
        Self::Square,
        Self::Turntable,
        Self::Wave,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Arcs => "Arcs",
            Self::Circles => "Circles",
            Self::Cubes => "Cubes",
            Self::Flower => "Flower",
            Self::Glob => "Glob",
            Self::Lines => "Lines",
            Self::Shine => "Shine",
            Self::Square => "Square",
            Self::Turntable => "Turntable",
            Self::Wave => "Wave",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Variants whose working spectrum is mirrored when `mirrored_x` is set.
    fn supports_mirror_x(self) -> bool {
        matches!(self, Self::Cubes | Self::Glob | Self::Lines | Self::Wave)
    }

    /// Variants whose zero diameter resolves to a third of the canvas height.
    fn derives_diameter(self) -> bool {
        matches!(
            self,
            Self::Circles | Self::Flower | Self::Glob | Self::Shine | Self::Square | Self::Turntable
        )
    }
}

impl std::fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only view handed to a variant's draw routine.
pub(crate) struct Frame<'a> {
    pub cfg: &'a AnimationConfig,
    pub data: &'a WorkingSpectrum,
    pub canvas: Canvas,
    pub style: &'a Arc<ShapeStyle>,
}

impl Frame<'_> {
    /// Scaled sample read by slot `i`.
    pub fn value(&self, i: usize) -> f64 {
        self.data.slot(self.cfg.count, i)
    }

    pub fn width(&self) -> f64 {
        self.canvas.width_f64()
    }

    pub fn height(&self) -> f64 {
        self.canvas.height_f64()
    }

    pub fn center(&self) -> Point {
        self.canvas.center()
    }
}

/// One configured animation instance.
#[derive(Clone, Debug)]
pub struct Animation {
    kind: AnimationKind,
    config: AnimationConfig,
    style: Arc<ShapeStyle>,
    work: WorkingSpectrum,
    resolved: bool,
}

impl Animation {
    /// Per-kind defaults merged with `overrides`.
    pub fn new(kind: AnimationKind, overrides: &AnimationOverrides) -> Self {
        Self::from_config(kind, AnimationConfig::defaults(kind).with_overrides(overrides))
    }

    pub fn from_config(kind: AnimationKind, config: AnimationConfig) -> Self {
        let style = Arc::new(config.style.clone());
        Self {
            kind,
            config,
            style,
            work: WorkingSpectrum::new(),
            resolved: false,
        }
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Reject configurations that cannot draw on `canvas`.
    pub fn validate(&self, canvas: Canvas) -> VizResult<()> {
        let cfg = &self.config;
        if cfg.count == 0 {
            return Err(VizError::validation(format!(
                "{}: count must be > 0",
                self.kind
            )));
        }
        if !cfg.style.line_width.is_finite() {
            return Err(VizError::validation(format!(
                "{}: lineWidth must be finite",
                self.kind
            )));
        }
        match self.kind {
            AnimationKind::Cubes => {
                let w = cubes::cube_width(cfg, canvas.width_f64());
                if w < 1.0 {
                    return Err(VizError::validation(format!(
                        "Cubes: count {} with gap {} leaves no room on a {}px wide canvas",
                        cfg.count, cfg.gap, canvas.width
                    )));
                }
            }
            AnimationKind::Turntable => {
                if cfg.cube_height.is_nan() || cfg.cube_height <= 0.0 {
                    return Err(VizError::validation(
                        "Turntable: cubeHeight must be > 0",
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Issue this frame's primitives for `snapshot`.
    ///
    /// Does not run [`Animation::validate`]. A zero `count` draws nothing.
    pub fn draw(&mut self, snapshot: &[u8], shapes: &mut Shapes<'_>, canvas: Canvas) -> VizResult<()> {
        if self.config.count == 0 {
            return Ok(());
        }
        if !self.resolved {
            self.resolve_defaults(canvas);
        }

        let mirror = self.config.mirrored_x && self.kind.supports_mirror_x();
        self.work.prepare(
            snapshot,
            self.config.frequency_band,
            canvas.scale_bound(),
            mirror,
        )?;

        let frame = Frame {
            cfg: &self.config,
            data: &self.work,
            canvas,
            style: &self.style,
        };
        match self.kind {
            AnimationKind::Arcs => arcs::draw(&frame, shapes),
            AnimationKind::Circles => circles::draw(&frame, shapes),
            AnimationKind::Cubes => cubes::draw(&frame, shapes),
            AnimationKind::Flower => flower::draw(&frame, shapes),
            AnimationKind::Glob => glob::draw(&frame, shapes),
            AnimationKind::Lines => lines::draw(&frame, shapes),
            AnimationKind::Shine => shine::draw(&frame, shapes),
            AnimationKind::Square => square::draw(&frame, shapes),
            AnimationKind::Turntable => turntable::draw(&frame, shapes),
            AnimationKind::Wave => wave::draw(&frame, shapes),
        }
        Ok(())
    }

    fn resolve_defaults(&mut self, canvas: Canvas) {
        if self.kind.derives_diameter() && self.config.diameter == 0.0 {
            self.config.diameter = canvas.height_f64() / 3.0;
            tracing::debug!(
                animation = %self.kind,
                diameter = self.config.diameter,
                "derived default diameter"
            );
        }
        self.resolved = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/variants.rs"]
mod tests;
