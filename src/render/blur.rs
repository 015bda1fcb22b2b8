//! Separable gaussian blur in Q16 fixed point, used for glow halos.

use crate::foundation::error::{VizError, VizResult};

/// Pixel-aligned sub-rectangle of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Cover `rect` grown by `margin` on every side, clipped to a `width`x`height` frame.
    ///
    /// Returns `None` when nothing of the grown rectangle lies inside the frame.
    pub fn covering(rect: kurbo::Rect, margin: f64, width: u32, height: u32) -> Option<Self> {
        let x0 = (rect.x0.min(rect.x1) - margin).floor().max(0.0);
        let y0 = (rect.y0.min(rect.y1) - margin).floor().max(0.0);
        let x1 = (rect.x0.max(rect.x1) + margin).ceil().min(f64::from(width));
        let y1 = (rect.y0.max(rect.y1) + margin).ceil().min(f64::from(height));
        if !(x1 > x0 && y1 > y0) {
            return None;
        }
        Some(Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }

    fn byte_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Blur radius in pixels covering three standard deviations.
pub(crate) fn radius_for_sigma(sigma: f32) -> u32 {
    (sigma * 3.0).ceil().max(0.0) as u32
}

pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> VizResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(VizError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(VizError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Rounding drift goes to the center tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

/// Blur the premultiplied pixels inside `region` of a `frame_width`-wide RGBA8 buffer in place.
///
/// Samples outside the region are clamped to its border, so callers pad the region by the kernel
/// radius to keep the halo from being cut off.
pub(crate) fn blur_region_in_place(
    frame: &mut [u8],
    frame_width: u32,
    region: PixelRect,
    kernel_q16: &[u32],
    scratch_a: &mut Vec<u8>,
    scratch_b: &mut Vec<u8>,
) {
    if kernel_q16.len() == 1 || region.width == 0 || region.height == 0 {
        return;
    }
    let len = region.byte_len();
    scratch_a.resize(len, 0);
    scratch_b.resize(len, 0);

    let stride = frame_width as usize * 4;
    let row_bytes = region.width as usize * 4;
    for row in 0..region.height as usize {
        let src = (region.y as usize + row) * stride + region.x as usize * 4;
        scratch_a[row * row_bytes..(row + 1) * row_bytes]
            .copy_from_slice(&frame[src..src + row_bytes]);
    }

    horizontal_blur_q16(scratch_a, scratch_b, region.width, region.height, kernel_q16);
    vertical_blur_q16(scratch_b, scratch_a, region.width, region.height, kernel_q16);

    for row in 0..region.height as usize {
        let dst = (region.y as usize + row) * stride + region.x as usize * 4;
        frame[dst..dst + row_bytes]
            .copy_from_slice(&scratch_a[row * row_bytes..(row + 1) * row_bytes]);
    }
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dx = ki as i32 - radius;
                let sx = (x + dx).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dy = ki as i32 - radius;
                let sy = (y + dy).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
