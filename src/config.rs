//! Run configuration: the video preset table, scene files and the output directory layout.

use crate::composition::{Composition, LayerSpec};
use crate::foundation::core::Canvas;
use crate::foundation::error::{VizError, VizResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A named output resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoPreset {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub label: &'static str,
}

impl VideoPreset {
    pub const ALL: [Self; 7] = [
        Self::new("360p", 640, 360, "SD (360p)"),
        Self::new("480p", 854, 480, "SD (480p)"),
        Self::new("720p", 1280, 720, "HD (720p)"),
        Self::new("1080p", 1920, 1080, "Full HD (1080p)"),
        Self::new("1440p", 2560, 1440, "QHD (1440p)"),
        Self::new("2160p", 3840, 2160, "4K UHD (2160p)"),
        Self::new("4320p", 7680, 4320, "8K UHD (4320p)"),
    ];

    const fn new(name: &'static str, width: u32, height: u32, label: &'static str) -> Self {
        Self {
            name,
            width,
            height,
            label,
        }
    }

    /// Look up a preset by name (`"1080p"`).
    pub fn find(name: &str) -> VizResult<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name == name.trim())
            .ok_or_else(|| {
                let names = Self::ALL.map(|p| p.name).join(", ");
                VizError::config(format!(
                    "invalid video preset '{name}'. Available presets: {names}"
                ))
            })
    }

    pub fn canvas(self) -> VizResult<Canvas> {
        Canvas::new(self.width, self.height)
    }
}

/// A JSON scene: layers drawn bottom first.
///
/// ```json
/// { "layers": [ { "animation": "Wave", "lineColor": "white", "mirroredX": true } ] }
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    pub layers: Vec<LayerSpec>,
}

impl SceneFile {
    pub fn from_json(text: &str) -> VizResult<Self> {
        serde_json::from_str(text).map_err(|e| VizError::config(format!("invalid scene: {e}")))
    }

    pub fn load(path: &Path) -> VizResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            VizError::config(format!("failed to read scene '{}': {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    pub fn into_composition(self) -> VizResult<Composition> {
        if self.layers.is_empty() {
            return Err(VizError::config("scene has no layers"));
        }
        Composition::from_layers(&self.layers)
    }
}

/// Output directory layout under one root:
///
/// - `mp4/<timestamp>-<preset>.mp4`
/// - `temp.raw`, or `raw/<timestamp>-output.raw` when debugging
/// - `images/` for debug frames
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    debug: bool,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, debug: bool) -> Self {
        Self {
            root: root.into(),
            debug,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mp4_dir(&self) -> PathBuf {
        self.root.join("mp4")
    }

    pub fn raw_dir(&self) -> Option<PathBuf> {
        self.debug.then(|| self.root.join("raw"))
    }

    pub fn image_dir(&self) -> Option<PathBuf> {
        self.debug.then(|| self.root.join("images"))
    }

    /// Create every directory the layout uses.
    pub fn create(&self) -> VizResult<()> {
        use anyhow::Context as _;

        let dirs = [Some(self.mp4_dir()), self.raw_dir(), self.image_dir()];
        for dir in dirs.into_iter().flatten() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
        }
        Ok(())
    }

    pub fn raw_path(&self, timestamp: &str) -> PathBuf {
        match self.raw_dir() {
            Some(dir) => dir.join(format!("{timestamp}-output.raw")),
            None => self.root.join("temp.raw"),
        }
    }

    pub fn mp4_path(&self, timestamp: &str, preset: &str) -> PathBuf {
        self.mp4_dir().join(format!("{timestamp}-{preset}.mp4"))
    }
}

/// UTC `YYYYMMDD-HHMMSS` for output file names.
pub fn file_timestamp(at: SystemTime) -> String {
    DateTime::<Utc>::from(at).format("%Y%m%d-%H%M%S").to_string()
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
