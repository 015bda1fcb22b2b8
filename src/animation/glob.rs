use super::Frame;
use crate::foundation::math::polar;
use crate::shapes::Shapes;

pub(super) fn draw(f: &Frame<'_>, shapes: &mut Shapes<'_>) {
    let cfg = f.cfg;
    let c = f.center();
    let slice = 360.0 / cfg.count as f64;

    let mut points = Vec::with_capacity(cfg.count + 1);
    for i in 0..cfg.count {
        points.push(polar(c, cfg.diameter + f.value(i), slice * i as f64));
    }
    if let Some(&first) = points.first() {
        points.push(first);
    }
    shapes.polygon(points, f.style);
}
