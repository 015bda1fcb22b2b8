use super::{AnimationConfig, Frame};
use crate::shapes::Shapes;

/// Width of one cube column: the canvas width left after gaps, split across `count` columns.
pub(super) fn cube_width(cfg: &AnimationConfig, canvas_width: f64) -> f64 {
    let count = cfg.count.max(1) as f64;
    ((canvas_width - cfg.gap * count) / count).floor()
}

/// Stack `ceil(value / cube_width)` cubes for every slot, positioned by `place(slot, level)`.
fn stack(
    f: &Frame<'_>,
    shapes: &mut Shapes<'_>,
    size: (f64, f64),
    place: impl Fn(f64, f64) -> (f64, f64),
) {
    let (cw, ch) = size;
    for i in 0..f.cfg.count {
        let levels = (f.value(i) / cw).ceil() as usize;
        for j in 0..levels {
            let (x, y) = place(i as f64, j as f64);
            shapes.rectangle(x, y, cw, ch, f.cfg.radius, f.style);
        }
    }
}

pub(super) fn draw(f: &Frame<'_>, shapes: &mut Shapes<'_>) {
    let cfg = f.cfg;
    let (w, h) = (f.width(), f.height());
    let cw = cube_width(cfg, w);
    if cw <= 0.0 {
        return;
    }
    // An unset cube height follows the column width.
    let ch = if cfg.cube_height > 0.0 {
        cfg.cube_height
    } else {
        cw
    };
    let size = (cw, ch);
    let col = cfg.gap + cw;
    let row = ch + cfg.gap;

    let edges = cfg.edges;
    if edges.top {
        stack(f, shapes, size, |i, j| (col * i, j * row));
    }
    if edges.right {
        stack(f, shapes, size, |i, j| (w - col * j, i * row));
    }
    if edges.draws_bottom() {
        stack(f, shapes, size, |i, j| (col * i, h - j * row));
    }
    if edges.left {
        stack(f, shapes, size, |i, j| (col * j, i * row));
    }
    if edges.center {
        stack(f, shapes, size, |i, j| (col * i, h / 2.0 - j * row));
        if cfg.mirrored_y {
            stack(f, shapes, size, |i, j| (col * i, h / 2.0 + j * row));
        }
    }
}
