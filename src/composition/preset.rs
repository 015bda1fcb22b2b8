use super::{Composition, LayerSpec};
use crate::animation::AnimationKind;
use crate::foundation::error::{VizError, VizResult};
use serde_json::{Value, json};

/// Labels of the built-in multi-layer presets.
pub const NUMBERED_PRESETS: [&str; 4] = ["0", "1", "2", "3"];

/// Canned composition selectable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Multi-layer preset `0..=3`.
    Numbered(u8),
    /// One animation in the composition's default colors.
    Named(AnimationKind),
}

impl Preset {
    pub fn parse(name: &str) -> VizResult<Self> {
        let name = name.trim();
        if let Some(i) = NUMBERED_PRESETS.iter().position(|&p| p == name) {
            return Ok(Self::Numbered(i as u8));
        }
        AnimationKind::from_name(name)
            .map(Self::Named)
            .ok_or_else(|| {
                VizError::config(format!(
                    "unknown preset '{name}' (expected one of: {})",
                    preset_names().join(", ")
                ))
            })
    }

    pub fn apply(self, comp: &mut Composition) -> VizResult<()> {
        match self {
            Self::Numbered(i) => {
                let table = numbered_layers(i)
                    .ok_or_else(|| VizError::config(format!("unknown preset '{i}'")))?;
                let layers: Vec<LayerSpec> = serde_json::from_value(table)
                    .map_err(|e| VizError::config(format!("preset {i}: {e}")))?;
                comp.clear();
                for layer in &layers {
                    comp.add(layer.build()?);
                }
            }
            Self::Named(kind) => comp.set_animation(kind),
        }
        Ok(())
    }
}

/// Every selectable preset label, numbered first.
pub fn preset_names() -> Vec<String> {
    NUMBERED_PRESETS
        .iter()
        .map(|s| (*s).to_owned())
        .chain(AnimationKind::ALL.iter().map(|k| k.name().to_owned()))
        .collect()
}

fn numbered_layers(i: u8) -> Option<Value> {
    let table = match i {
        0 => json!([
            {
                "animation": "Wave",
                "lineColor": "white",
                "lineWidth": 10,
                "fillColor": {"gradient": ["#FF9A8B", "#FF6A88", "#FF99AC"]},
                "mirroredX": true,
                "count": 5,
                "rounded": true,
                "frequencyBand": "base"
            },
            {
                "animation": "Wave",
                "lineColor": "white",
                "lineWidth": 10,
                "fillColor": {"gradient": ["#FA8BFF", "#2BD2FF", "#2BFF88"]},
                "mirroredX": true,
                "count": 60,
                "rounded": true
            },
            {
                "animation": "Wave",
                "lineColor": "white",
                "lineWidth": 10,
                "fillColor": {"gradient": ["#FBDA61", "#FF5ACD"]},
                "mirroredX": true,
                "count": 25,
                "rounded": true,
                "frequencyBand": "highs"
            }
        ]),
        1 => json!([
            {
                "animation": "Cubes",
                "bottom": true,
                "top": false,
                "count": 40,
                "cubeHeight": 29,
                "fillColor": {"gradient": ["#FA0000", "#006B1C"]},
                "lineColor": "rgba(0,0,0,0)",
                "radius": 0,
                "gap": 2
            },
            {
                "animation": "Cubes",
                "top": true,
                "bottom": false,
                "count": 80,
                "cubeHeight": 13,
                "fillColor": {"gradient": ["#00D961", "#F76B00"]},
                "lineColor": "rgba(0,0,0,0)",
                "radius": 0,
                "gap": 5
            },
            {
                "animation": "Circles",
                "lineColor": {"gradient": ["#FAD961", "#FAD961", "#F76B1C"], "rotate": 90},
                "lineWidth": 5,
                "diameter": 80,
                "count": 4,
                "frequencyBand": "base"
            }
        ]),
        2 => json!([
            {
                "animation": "Glob",
                "fillColor": {"gradient": ["#FAD961", "#FAD961", "#F76B1C"], "rotate": 45},
                "lineColor": "white",
                "glow": {"strength": 15, "color": "#FAD961"},
                "lineWidth": 10,
                "count": 45
            },
            {
                "animation": "Shine",
                "lineColor": "#FAD961",
                "glow": {"strength": 15, "color": "#FAD961"},
                "diameter": 300,
                "lineWidth": 10
            }
        ]),
        3 => json!([
            {
                "animation": "Square",
                "lineColor": {"gradient": ["#21D4FD", "#B721FF"]}
            },
            {
                "animation": "Arcs",
                "lineWidth": 4,
                "lineColor": {"gradient": ["#21D4FD", "#B721FF"]},
                "diameter": 500,
                "fillColor": {"gradient": ["#21D4FD", "#21D4FD", "#B721FF"], "rotate": 45}
            }
        ]),
        _ => return None,
    };
    Some(table)
}
