//! Ordered stack of active animations.
//!
//! Layers draw back-to-front in insertion order. The composition also carries the default stroke
//! and fill applied by [`Composition::set_animation`], and the preset table.

mod preset;

pub use preset::{NUMBERED_PRESETS, Preset, preset_names};

use crate::animation::{Animation, AnimationKind, AnimationOverrides};
use crate::foundation::color::Color;
use crate::foundation::core::Canvas;
use crate::foundation::error::{VizError, VizResult};
use crate::shapes::{DisplayList, Paint, Shapes};

/// One layer as written in scene files: an animation name plus optional overrides.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct LayerSpec {
    pub animation: String,
    #[serde(flatten)]
    pub options: AnimationOverrides,
}

impl LayerSpec {
    pub fn build(&self) -> VizResult<Animation> {
        let kind = AnimationKind::from_name(&self.animation).ok_or_else(|| {
            VizError::config(format!(
                "unknown animation '{}' (expected one of: {})",
                self.animation,
                kind_list()
            ))
        })?;
        Ok(Animation::new(kind, &self.options))
    }
}

fn kind_list() -> String {
    AnimationKind::ALL
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone, Debug)]
pub struct Composition {
    layers: Vec<Animation>,
    default_stroke: Paint,
    default_fill: Paint,
    playing: bool,
}

impl Default for Composition {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            default_stroke: Paint::Solid(Color::WHITE),
            default_fill: Paint::Solid(Color::WHITE),
            playing: false,
        }
    }
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composition with the given layers, in draw order.
    pub fn from_layers(layers: &[LayerSpec]) -> VizResult<Self> {
        let mut comp = Self::new();
        for layer in layers {
            comp.add(layer.build()?);
        }
        Ok(comp)
    }

    /// Append a layer on top of the existing ones.
    pub fn add(&mut self, animation: Animation) {
        self.layers.push(animation);
    }

    /// Remove every layer and stop playback.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.playing = false;
    }

    pub fn start(&mut self) {
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn animations(&self) -> &[Animation] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Record every layer's primitives for `snapshot`, bottom layer first.
    pub fn draw(
        &mut self,
        snapshot: &[u8],
        list: &mut DisplayList,
        canvas: Canvas,
    ) -> VizResult<()> {
        let mut shapes = Shapes::new(list);
        for layer in &mut self.layers {
            layer.draw(snapshot, &mut shapes, canvas)?;
        }
        Ok(())
    }

    /// Replace all layers with a single `kind` in the default colors. Circles keep a transparent
    /// fill so the rings stay hollow.
    pub fn set_animation(&mut self, kind: AnimationKind) {
        self.clear();
        let fill = if kind == AnimationKind::Circles {
            Paint::Solid(Color::TRANSPARENT)
        } else {
            self.default_fill.clone()
        };
        let overrides = AnimationOverrides::colors(self.default_stroke.clone(), fill);
        self.add(Animation::new(kind, &overrides));
    }

    /// Replace all layers with the named preset: `"0"` to `"3"`, or an animation name.
    pub fn apply_named_preset(&mut self, name: &str) -> VizResult<()> {
        let preset = Preset::parse(name)?;
        preset.apply(self)?;
        tracing::debug!(preset = name, layers = self.len(), "applied preset");
        Ok(())
    }

    /// Colors used by later [`Composition::set_animation`] calls.
    pub fn set_default_stroke_fill(&mut self, stroke: Paint, fill: Paint) {
        self.default_stroke = stroke;
        self.default_fill = fill;
    }

    pub fn validate(&self, canvas: Canvas) -> VizResult<()> {
        if self.layers.is_empty() {
            return Err(VizError::validation("composition has no animations"));
        }
        for layer in &self.layers {
            layer.validate(canvas)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/layers.rs"]
mod tests;
