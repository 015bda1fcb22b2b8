use super::Frame;
use crate::foundation::math::polar;
use crate::shapes::Shapes;

pub(super) fn draw(f: &Frame<'_>, shapes: &mut Shapes<'_>) {
    let cfg = f.cfg;
    let c = f.center();
    let slice = 360.0 / cfg.count as f64;
    let d = cfg.diameter;

    for i in 0..cfg.count {
        let v = f.value(i);
        let a1 = slice * i as f64 + cfg.rotate;
        let a2 = slice * (i + 1) as f64 + cfg.rotate;
        let petal = vec![
            polar(c, d, a1),
            polar(c, d + v, a1),
            polar(c, d + v, a2),
            polar(c, d, a2),
        ];
        shapes.polygon(petal, f.style);
    }
}
