use super::Frame;
use crate::shapes::Shapes;

/// One tick per slot `1..=count`, each edge drawn as its own pass.
fn ticks(f: &Frame<'_>, shapes: &mut Shapes<'_>, tick: impl Fn(f64, f64) -> (f64, f64, f64, f64)) {
    for i in 1..=f.cfg.count {
        let (x0, y0, x1, y1) = tick(i as f64, f.value(i));
        shapes.line(x0, y0, x1, y1, f.style);
    }
}

pub(super) fn draw(f: &Frame<'_>, shapes: &mut Shapes<'_>) {
    let cfg = f.cfg;
    let (w, h) = (f.width(), f.height());
    let count = cfg.count as f64;
    let step_x = w / count;
    let step_y = h / count;
    let cy = h / 2.0;
    let edges = cfg.edges;

    if edges.top {
        ticks(f, shapes, |i, v| (step_x * i, 0.0, step_x * i, v));
    }
    if edges.right {
        ticks(f, shapes, |i, v| (w, step_y * i, w - v, step_y * i));
    }
    if edges.draws_bottom() {
        ticks(f, shapes, |i, v| (step_x * i, h, step_x * i, h - v));
    }
    if edges.left {
        ticks(f, shapes, |i, v| (0.0, step_y * i, v, step_y * i));
    }
    if edges.center {
        // The mirrored tick follows its upward twin within the same pass.
        for i in 1..=cfg.count {
            let v = f.value(i);
            let x = step_x * i as f64;
            shapes.line(x, cy, x, cy - v, f.style);
            if cfg.mirrored_y {
                shapes.line(x, cy, x, cy + v, f.style);
            }
        }
    }
}
