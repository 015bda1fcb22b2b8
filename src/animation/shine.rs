use super::Frame;
use crate::foundation::math::polar;
use crate::shapes::Shapes;

pub(super) fn draw(f: &Frame<'_>, shapes: &mut Shapes<'_>) {
    let cfg = f.cfg;
    let c = f.center();
    let slice = 360.0 / cfg.count as f64;

    for i in 0..cfg.count {
        let v = f.value(i);
        let angle = slice * i as f64 + cfg.rotate;
        let inner = if cfg.offset {
            cfg.diameter - v / 2.0
        } else {
            cfg.diameter
        };
        let from = polar(c, inner, angle);
        let to = polar(c, cfg.diameter + v, angle);
        shapes.line(from.x, from.y, to.x, to.y, f.style);
    }
}
