use super::Frame;
use crate::foundation::core::Point;
use crate::shapes::Shapes;

/// Closed outline: `start`, then `count + 1` amplitude points, then `end`.
fn trace(
    f: &Frame<'_>,
    start: Point,
    end: Point,
    point: impl Fn(f64, f64) -> Point,
) -> Vec<Point> {
    let count = f.cfg.count;
    let mut pts = Vec::with_capacity(count + 3);
    pts.push(start);
    for i in 0..=count {
        pts.push(point(i as f64, f.value(i)));
    }
    pts.push(end);
    pts
}

pub(super) fn draw(f: &Frame<'_>, shapes: &mut Shapes<'_>) {
    let cfg = f.cfg;
    let (w, h) = (f.width(), f.height());
    let count = cfg.count as f64;
    let step_x = (w / count).floor();
    let step_y = (h / count).floor();
    let cy = h / 2.0;
    let edges = cfg.edges;

    if edges.top {
        let pts = trace(f, Point::new(0.0, 0.0), Point::new(w, 0.0), |i, v| {
            Point::new(step_x * i, v)
        });
        shapes.polygon(pts, f.style);
    }
    if edges.right {
        let pts = trace(f, Point::new(w, 0.0), Point::new(w, h), |i, v| {
            Point::new(w - v, step_y * i)
        });
        shapes.polygon(pts, f.style);
    }
    if edges.draws_bottom() {
        let pts = trace(f, Point::new(0.0, h), Point::new(w, h), |i, v| {
            Point::new(step_x * i, h - v)
        });
        shapes.polygon(pts, f.style);
    }
    if edges.left {
        let pts = trace(f, Point::new(0.0, 0.0), Point::new(0.0, h), |i, v| {
            Point::new(v, step_y * i)
        });
        shapes.polygon(pts, f.style);
    }
    if edges.center {
        let pts = trace(f, Point::new(0.0, cy), Point::new(w, cy), |i, v| {
            Point::new(step_x * i, cy - v)
        });
        shapes.polygon(pts, f.style);
        if cfg.mirrored_y {
            let pts = trace(f, Point::new(0.0, cy), Point::new(w, cy), |i, v| {
                Point::new(step_x * i, cy + v)
            });
            shapes.polygon(pts, f.style);
        }
    }
}
