use crate::foundation::color::Color;
use crate::foundation::core::Canvas;
use crate::foundation::error::VizResult;
use anyhow::Context as _;
use image::imageops::FilterType;
use std::path::Path;

/// Black overlay baked over a background image.
const IMAGE_OVERLAY_ALPHA: f64 = 0.5;
/// Per-frame black wash, applied at a further global alpha.
const WASH_ALPHA: f64 = 0.3;
const WASH_GLOBAL_ALPHA: f64 = 0.7;

/// Opaque full-frame backdrop, prepared once per run.
#[derive(Clone, Debug)]
pub struct Background {
    canvas: Canvas,
    premul: Vec<u8>,
}

impl Background {
    /// Uniform color backdrop, washed like every frame.
    pub fn solid(canvas: Canvas, color: Color) -> Self {
        let [r, g, b, _] = color.with_alpha(1.0).to_rgba8();
        let mut premul = Vec::with_capacity(canvas.frame_len());
        for _ in 0..(canvas.width as usize * canvas.height as usize) {
            premul.extend_from_slice(&[r, g, b, 255]);
        }
        darken(&mut premul, WASH_ALPHA * WASH_GLOBAL_ALPHA);
        Self { canvas, premul }
    }

    pub fn black(canvas: Canvas) -> Self {
        Self::solid(canvas, Color::BLACK)
    }

    /// Load `path`, scale it to cover the canvas (centered, excess cropped), dim it with a 50%
    /// black overlay and apply the frame wash.
    pub fn from_image(path: &Path, canvas: Canvas) -> VizResult<Self> {
        let img = image::open(path)
            .with_context(|| format!("failed to load background image '{}'", path.display()))?
            .to_rgba8();
        let (iw, ih) = img.dimensions();
        if iw == 0 || ih == 0 {
            return Err(anyhow::anyhow!("background image '{}' is empty", path.display()).into());
        }

        let scale = (canvas.width_f64() / f64::from(iw)).max(canvas.height_f64() / f64::from(ih));
        let sw = ((f64::from(iw) * scale).ceil() as u32).max(canvas.width);
        let sh = ((f64::from(ih) * scale).ceil() as u32).max(canvas.height);
        let scaled = image::imageops::resize(&img, sw, sh, FilterType::Triangle);
        let x = (sw - canvas.width) / 2;
        let y = (sh - canvas.height) / 2;
        let cropped =
            image::imageops::crop_imm(&scaled, x, y, canvas.width, canvas.height).to_image();

        let mut premul = cropped.into_raw();
        // Flatten over black: transparent areas of the source end up black.
        for px in premul.chunks_exact_mut(4) {
            let a = f64::from(px[3]) / 255.0;
            for c in &mut px[..3] {
                *c = (f64::from(*c) * a).round() as u8;
            }
            px[3] = 255;
        }
        darken(&mut premul, IMAGE_OVERLAY_ALPHA);
        darken(&mut premul, WASH_ALPHA * WASH_GLOBAL_ALPHA);

        tracing::debug!(path = %path.display(), src_w = iw, src_h = ih, "prepared background");
        Ok(Self { canvas, premul })
    }

    /// Like [`Background::from_image`], falling back to black when the image is unusable.
    pub fn load_or_black(path: &Path, canvas: Canvas) -> Self {
        match Self::from_image(path, canvas) {
            Ok(bg) => bg,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "background image unavailable; using solid black"
                );
                Self::black(canvas)
            }
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Opaque premultiplied RGBA8, `width * height * 4` bytes.
    pub fn premul_bytes(&self) -> &[u8] {
        &self.premul
    }
}

/// Composite black at `alpha` over opaque pixels.
fn darken(premul: &mut [u8], alpha: f64) {
    let keep = 1.0 - alpha.clamp(0.0, 1.0);
    for px in premul.chunks_exact_mut(4) {
        for c in &mut px[..3] {
            *c = (f64::from(*c) * keep).round() as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
