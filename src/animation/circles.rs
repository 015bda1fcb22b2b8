use super::Frame;
use crate::shapes::Shapes;

pub(super) fn draw(f: &Frame<'_>, shapes: &mut Shapes<'_>) {
    let c = f.center();
    for i in 0..f.cfg.count {
        shapes.circle(c.x, c.y, f.cfg.diameter + f.value(i), f.style);
    }
}
