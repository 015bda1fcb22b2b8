use super::Frame;
use crate::shapes::Shapes;
use crate::spectrum::slot_index;

/// Each side reads the spectrum with its own stride multiplier: top ×1, right ×2, bottom ×3,
/// left ×4. Later sides may read past the end, which samples as zero.
pub(super) fn draw(f: &Frame<'_>, shapes: &mut Shapes<'_>) {
    let cfg = f.cfg;
    let c = f.center();
    let d = cfg.diameter;
    // A side may be a fractional number of ticks long; ticks are placed while `i < side`.
    let side = cfg.count as f64 / 4.0;
    let per_side = side.ceil() as usize;
    let inc = d / side;
    let len = f.data.len();
    let sample = |i: usize, side: usize| f.data.at(slot_index(len, cfg.count, i * side));

    let left = c.x - d / 2.0;
    let right = c.x + d / 2.0;
    let top = c.y - d / 2.0;
    let bottom = c.y + d / 2.0;

    for i in 0..per_side {
        let v = sample(i, 1);
        let x = left + inc * i as f64;
        shapes.line(x, top, x, top - v, f.style);
    }
    for i in 0..per_side {
        let v = sample(i, 2);
        let y = top + inc * i as f64;
        shapes.line(right, y, right + v, y, f.style);
    }
    for i in 0..per_side {
        let v = sample(i, 3);
        let x = left + inc * i as f64;
        shapes.line(x, bottom, x, bottom + v, f.style);
    }
    for i in 0..per_side {
        let v = sample(i, 4);
        let y = top + inc * i as f64;
        shapes.line(left, y, left - v, y, f.style);
    }
}
