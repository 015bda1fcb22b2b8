//! `MM:SS` playback-time label, shaped with Parley and drawn as `vello_cpu` glyph runs.

use crate::foundation::color::Color;
use crate::foundation::core::Canvas;
use std::collections::HashMap;
use std::path::Path;

/// Family used when no font file is given or it fails to load.
const FALLBACK_FAMILY: &str = "monospace";

/// `MM:SS` for a playback position; minutes keep counting past 99.
pub fn timestamp_text(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layout.
pub(crate) struct LabelBrush {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Color> for LabelBrush {
    fn from(c: Color) -> Self {
        let [r, g, b, a] = c.to_rgba8();
        Self { r, g, b, a }
    }
}

/// Label drawn in the bottom-right corner.
///
/// Shaping state (font collection, layout scratch) and the font data handed to the rasterizer
/// live here for the whole run.
pub struct TimestampLabel {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<LabelBrush>,
    family: String,
    brush: LabelBrush,
    fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl Default for TimestampLabel {
    fn default() -> Self {
        Self::new(Color::WHITE, None)
    }
}

impl std::fmt::Debug for TimestampLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimestampLabel")
            .field("family", &self.family)
            .field("brush", &self.brush)
            .finish_non_exhaustive()
    }
}

impl TimestampLabel {
    /// Label in `color`, set in the font at `font` when it loads, otherwise in a system
    /// monospace face.
    pub fn new(color: Color, font: Option<&Path>) -> Self {
        let mut font_ctx = parley::FontContext::default();
        let family = match font.map(|p| register_font_file(&mut font_ctx, p)) {
            Some(Ok(name)) => name,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "label font unavailable; using {FALLBACK_FAMILY}");
                FALLBACK_FAMILY.to_owned()
            }
            None => FALLBACK_FAMILY.to_owned(),
        };
        Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            brush: LabelBrush::from(color),
            fonts: HashMap::new(),
        }
    }

    /// Family name the label is laid out in.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Font size for `canvas`: one eighteenth of the height, at least 10px.
    pub fn font_size(canvas: Canvas) -> f32 {
        (canvas.height_f64() / 18.0).max(10.0) as f32
    }

    pub(crate) fn layout(&mut self, text: &str, size_px: f32) -> parley::Layout<LabelBrush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(self.brush));
        let mut layout: parley::Layout<LabelBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Whether any face available to the label shapes `text` into glyphs.
    pub(crate) fn has_glyphs(&mut self, text: &str) -> bool {
        let layout = self.layout(text, 12.0);
        layout.lines().any(|line| {
            line.items()
                .any(|item| matches!(item, parley::layout::PositionedLayoutItem::GlyphRun(_)))
        })
    }

    /// Queue the label for `secs` into `ctx`. Returns whether any glyph was queued.
    pub(crate) fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        canvas: Canvas,
        secs: f64,
    ) -> bool {
        let size = Self::font_size(canvas);
        let layout = self.layout(&timestamp_text(secs), size);
        let margin = f64::from(size) / 2.0;
        let x = canvas.width_f64() - margin - f64::from(layout.width());
        let y = canvas.height_f64() - margin - f64::from(layout.height());
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let mut queued = false;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let face = run.run().font();
                let font = self
                    .fonts
                    .entry((face.data.id(), face.index))
                    .or_insert_with(|| {
                        vello_cpu::peniko::FontData::new(
                            vello_cpu::peniko::Blob::from(face.data.data().to_vec()),
                            face.index,
                        )
                    })
                    .clone();
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
                queued = true;
            }
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        queued
    }
}

/// Register the faces in `path` and return the first family's name.
fn register_font_file(font_ctx: &mut parley::FontContext, path: &Path) -> anyhow::Result<String> {
    use anyhow::Context as _;

    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read font '{}'", path.display()))?;
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes), None);
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .with_context(|| format!("no font families in '{}'", path.display()))?;
    let name = font_ctx
        .collection
        .family_name(family_id)
        .with_context(|| format!("font family in '{}' has no name", path.display()))?;
    Ok(name.to_owned())
}

#[cfg(test)]
#[path = "../../tests/unit/render/label.rs"]
mod tests;
