//! CPU raster backend.
//!
//! [`CpuRaster`] owns the frame surface and turns a [`crate::shapes::DisplayList`] into pixels.
//! Frames are read back as opaque, straight RGBA8 of exactly `width * height * 4` bytes.

mod background;
mod blur;
mod composite;
mod cpu;
mod label;

pub use background::Background;
pub use cpu::CpuRaster;
pub use label::{TimestampLabel, timestamp_text};

use crate::foundation::error::{VizError, VizResult};
use std::path::Path;

/// One rendered frame: tightly packed RGBA8, row-major, opaque.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Write the frame as a PNG.
    pub fn save_png(&self, path: &Path) -> VizResult<()> {
        use anyhow::Context as _;

        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| VizError::render("frame byte len does not match its size"))?;
        img.save(path)
            .with_context(|| format!("failed to write png '{}'", path.display()))?;
        Ok(())
    }
}
