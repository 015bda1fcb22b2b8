use super::FrameRGBA;
use super::background::Background;
use super::blur::{PixelRect, blur_region_in_place, gaussian_kernel_q16, radius_for_sigma};
use super::composite::{
    flatten_premul_over_bg_to_opaque_rgba8, premul_over_in_place, premultiply_rgba8_in_place,
    rgba_premul_to_image,
};
use super::label::TimestampLabel;
use crate::foundation::color::Color;
use crate::foundation::core::{BezPath, Canvas, Point};
use crate::foundation::error::{VizError, VizResult};
use crate::foundation::math::rotate_about;
use crate::shapes::{DisplayList, DrawOp, Paint, ShapeStyle};
use kurbo::{Cap, Join, Stroke, StrokeOpts};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const STROKE_TOLERANCE: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    stops: Vec<[u8; 4]>,
    rotate_bits: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct BlurKernelKey {
    radius: u32,
    sigma_bits: u32,
}

enum CpuPaint {
    Solid(vello_cpu::peniko::Color),
    Image(vello_cpu::Image),
}

/// Single-surface CPU raster built on `vello_cpu`.
///
/// Owns the frame pixmap and every per-run cache; nothing is reallocated between frames. Draw ops
/// are batched into one render context and composited onto the frame in segments, breaking the
/// batch only where a glowing op needs its halo blurred beneath it.
pub struct CpuRaster {
    canvas: Canvas,
    width: u16,
    height: u16,

    ctx: Option<vello_cpu::RenderContext>,
    frame: vello_cpu::Pixmap,
    layer: vello_cpu::Pixmap,

    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
    pattern_cache: HashMap<PathBuf, Option<vello_cpu::Image>>,
    blur_kernel_cache: HashMap<BlurKernelKey, Arc<Vec<u32>>>,
    blur_scratch_a: Vec<u8>,
    blur_scratch_b: Vec<u8>,
}

impl CpuRaster {
    pub fn new(canvas: Canvas) -> VizResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| VizError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| VizError::render("canvas height exceeds u16"))?;
        Ok(Self {
            canvas,
            width,
            height,
            ctx: None,
            frame: vello_cpu::Pixmap::new(width, height),
            layer: vello_cpu::Pixmap::new(width, height),
            gradient_cache: HashMap::new(),
            pattern_cache: HashMap::new(),
            blur_kernel_cache: HashMap::new(),
            blur_scratch_a: Vec::new(),
            blur_scratch_b: Vec::new(),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Reset the frame to transparent.
    pub fn clear(&mut self) {
        self.frame.data_as_u8_slice_mut().fill(0);
    }

    /// Replace the frame contents with `bg`.
    pub fn draw_background(&mut self, bg: &Background) -> VizResult<()> {
        if bg.canvas() != self.canvas {
            return Err(VizError::render(format!(
                "background is {}x{}, raster is {}x{}",
                bg.canvas().width,
                bg.canvas().height,
                self.canvas.width,
                self.canvas.height
            )));
        }
        self.frame
            .data_as_u8_slice_mut()
            .copy_from_slice(bg.premul_bytes());
        Ok(())
    }

    /// Composite every op of `list` over the frame, in order.
    pub fn render_list(&mut self, list: &DisplayList) -> VizResult<()> {
        if list.is_empty() {
            return Ok(());
        }
        let mut ctx = self.take_ctx();
        let out = self.render_ops(&mut ctx, list.ops());
        self.ctx = Some(ctx);
        out
    }

    /// Composite the playback-time label for `secs` over the frame.
    pub fn draw_label(&mut self, label: &mut TimestampLabel, secs: f64) -> VizResult<()> {
        let mut ctx = self.take_ctx();
        let out = if label.draw(&mut ctx, self.canvas, secs) {
            self.composite_ctx(&mut ctx, None)
        } else {
            Ok(())
        };
        self.ctx = Some(ctx);
        out
    }

    fn take_ctx(&mut self) -> vello_cpu::RenderContext {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == self.width && ctx.height() == self.height => ctx,
            _ => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();
        ctx
    }

    /// Copy the frame out as opaque RGBA8 (flattened over black) into `out`.
    pub fn read_rgba8_into(&self, out: &mut [u8]) -> VizResult<()> {
        if out.len() != self.canvas.frame_len() {
            return Err(VizError::render(format!(
                "readback buffer is {} bytes, frame needs {}",
                out.len(),
                self.canvas.frame_len()
            )));
        }
        flatten_premul_over_bg_to_opaque_rgba8(out, self.frame.data_as_u8_slice(), [0, 0, 0])
    }

    pub fn read_frame(&self) -> VizResult<FrameRGBA> {
        let mut data = vec![0u8; self.canvas.frame_len()];
        self.read_rgba8_into(&mut data)?;
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
        })
    }

    fn render_ops(&mut self, ctx: &mut vello_cpu::RenderContext, ops: &[DrawOp]) -> VizResult<()> {
        let mut pending = false;
        for op in ops {
            if op.style.glow.is_visible() {
                if pending {
                    self.composite_ctx(ctx, None)?;
                    pending = false;
                }
                self.draw_glow(ctx, op)?;
            }
            pending |= self.draw_op(ctx, op)?;
        }
        if pending {
            self.composite_ctx(ctx, None)?;
        }
        Ok(())
    }

    /// Rasterize the batch in `ctx`, optionally blur a region of it, and composite it over the
    /// frame. Leaves `ctx` empty.
    fn composite_ctx(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        blur: Option<(PixelRect, Arc<Vec<u32>>)>,
    ) -> VizResult<()> {
        ctx.flush();
        ctx.render_to_pixmap(&mut self.layer);
        if let Some((region, kernel)) = blur {
            blur_region_in_place(
                self.layer.data_as_u8_slice_mut(),
                self.canvas.width,
                region,
                &kernel,
                &mut self.blur_scratch_a,
                &mut self.blur_scratch_b,
            );
        }
        premul_over_in_place(
            self.frame.data_as_u8_slice_mut(),
            self.layer.data_as_u8_slice(),
        )?;
        ctx.reset();
        Ok(())
    }

    /// Stroke, then fill. Returns whether anything was queued.
    fn draw_op(&mut self, ctx: &mut vello_cpu::RenderContext, op: &DrawOp) -> VizResult<bool> {
        let style = &op.style;
        let path = op.primitive.to_path();
        reset_transforms(ctx);

        let mut queued = false;
        if strokes(style)
            && let Some(paint) = self.paint_for(&style.stroke)
        {
            set_paint(ctx, paint);
            ctx.fill_path(&bezpath_to_cpu(&stroke_outline(&path, style)));
            queued = true;
        }
        if op.primitive.is_closed()
            && !style.fill.is_invisible()
            && let Some(paint) = self.paint_for(&style.fill)
        {
            set_paint(ctx, paint);
            ctx.fill_path(&bezpath_to_cpu(&path));
            queued = true;
        }
        Ok(queued)
    }

    /// Draw the op's silhouette in its glow color, blurred, as a separate segment.
    fn draw_glow(&mut self, ctx: &mut vello_cpu::RenderContext, op: &DrawOp) -> VizResult<()> {
        let style = &op.style;
        let sigma = (style.glow.strength / 2.0) as f32;
        let radius = radius_for_sigma(sigma);
        let kernel = self.blur_kernel(radius, sigma)?;

        let path = op.primitive.to_path();
        reset_transforms(ctx);
        ctx.set_paint(to_cpu_color(style.glow.color));
        let mut queued = false;
        if strokes(style) {
            ctx.fill_path(&bezpath_to_cpu(&stroke_outline(&path, style)));
            queued = true;
        }
        if op.primitive.is_closed() && !style.fill.is_invisible() {
            ctx.fill_path(&bezpath_to_cpu(&path));
            queued = true;
        }
        if !queued {
            return Ok(());
        }

        let margin = style.line_width.max(0.0) / 2.0 + f64::from(radius) + 1.0;
        match PixelRect::covering(path_bounds(&path), margin, self.canvas.width, self.canvas.height)
        {
            Some(region) => self.composite_ctx(ctx, Some((region, kernel))),
            None => {
                ctx.reset();
                Ok(())
            }
        }
    }

    fn blur_kernel(&mut self, radius: u32, sigma: f32) -> VizResult<Arc<Vec<u32>>> {
        let key = BlurKernelKey {
            radius,
            sigma_bits: sigma.to_bits(),
        };
        if let Some(k) = self.blur_kernel_cache.get(&key) {
            return Ok(Arc::clone(k));
        }
        let k = Arc::new(gaussian_kernel_q16(radius, sigma)?);
        self.blur_kernel_cache.insert(key, Arc::clone(&k));
        Ok(k)
    }

    /// Resolve a paint. `None` means the paint draws nothing (an unloadable pattern).
    fn paint_for(&mut self, paint: &Paint) -> Option<CpuPaint> {
        match paint {
            Paint::Solid(c) => Some(CpuPaint::Solid(to_cpu_color(*c))),
            Paint::Gradient { colors, rotate } => match self.gradient_paint(colors, *rotate) {
                Ok(img) => Some(CpuPaint::Image(img)),
                Err(e) => {
                    tracing::warn!(error = %e, "gradient paint failed; skipping");
                    None
                }
            },
            Paint::Pattern(path) => self.pattern_paint(path).map(CpuPaint::Image),
        }
    }

    /// Full-frame linear gradient from the top-left to the bottom-right corner, stops spaced
    /// evenly, rotated by `rotate` degrees about the frame center.
    fn gradient_paint(&mut self, colors: &[Color], rotate: f64) -> VizResult<vello_cpu::Image> {
        let key = GradientKey {
            stops: colors.iter().map(|c| c.to_rgba8()).collect(),
            rotate_bits: rotate.to_bits(),
        };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }
        if colors.is_empty() {
            return Err(VizError::render("gradient needs at least one color"));
        }

        let (w, h) = (self.canvas.width, self.canvas.height);
        let center = self.canvas.center();
        let (dx, dy) = (f64::from(w), f64::from(h));
        let len2 = dx * dx + dy * dy;

        let mut bytes = vec![0u8; self.canvas.frame_len()];
        for y in 0..h {
            for x in 0..w {
                let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let q = if rotate == 0.0 {
                    p
                } else {
                    rotate_about(center, p, -rotate)
                };
                let t = ((q.x * dx + q.y * dy) / len2).clamp(0.0, 1.0);
                let c = sample_stops(colors, t).to_rgba8_premul();
                let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
                bytes[idx..idx + 4].copy_from_slice(&c.to_array());
            }
        }
        let img = rgba_premul_to_image(&bytes, w, h, vello_cpu::peniko::Extend::Pad)?;
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }

    fn pattern_paint(&mut self, path: &Path) -> Option<vello_cpu::Image> {
        if let Some(cached) = self.pattern_cache.get(path) {
            return cached.clone();
        }
        let loaded = match load_pattern(path) {
            Ok(img) => Some(img),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "pattern image unavailable; paint disabled"
                );
                None
            }
        };
        self.pattern_cache.insert(path.to_path_buf(), loaded.clone());
        loaded
    }
}

fn load_pattern(path: &Path) -> VizResult<vello_cpu::Image> {
    use anyhow::Context as _;

    let img = image::open(path)
        .with_context(|| format!("failed to load pattern image '{}'", path.display()))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    let mut bytes = img.into_raw();
    premultiply_rgba8_in_place(&mut bytes);
    rgba_premul_to_image(&bytes, w, h, vello_cpu::peniko::Extend::Repeat)
}

fn sample_stops(colors: &[Color], t: f64) -> Color {
    match colors {
        [] => Color::TRANSPARENT,
        [only] => *only,
        _ => {
            let last = colors.len() - 1;
            let pos = t * last as f64;
            let i = (pos.floor() as usize).min(last - 1);
            colors[i].lerp(colors[i + 1], pos - i as f64)
        }
    }
}

fn strokes(style: &ShapeStyle) -> bool {
    style.line_width > 0.0 && !style.stroke.is_invisible()
}

/// Fill outline of the stroke of `path`: butt or round caps from `rounded`, miter joins.
fn stroke_outline(path: &BezPath, style: &ShapeStyle) -> BezPath {
    let cap = if style.rounded { Cap::Round } else { Cap::Butt };
    let stroke = Stroke::new(style.line_width)
        .with_caps(cap)
        .with_join(Join::Miter);
    kurbo::stroke(path.iter(), &stroke, &StrokeOpts::default(), STROKE_TOLERANCE)
}

fn path_bounds(path: &BezPath) -> kurbo::Rect {
    use kurbo::Shape as _;
    path.bounding_box()
}

fn set_paint(ctx: &mut vello_cpu::RenderContext, paint: CpuPaint) {
    match paint {
        CpuPaint::Solid(c) => ctx.set_paint(c),
        CpuPaint::Image(img) => ctx.set_paint(img),
    }
}

fn reset_transforms(ctx: &mut vello_cpu::RenderContext) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

fn to_cpu_color(c: Color) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
