use super::Frame;
use crate::shapes::Shapes;

/// Half-opening of an arc in degrees. A zero sample divides by infinity and yields a closed arc.
fn half_angle(value: f64) -> f64 {
    45.0 / ((255.0 / value) / 2.0)
}

pub(super) fn draw(f: &Frame<'_>, shapes: &mut Shapes<'_>) {
    let count = f.cfg.count;
    let diameter = f.cfg.diameter;
    let center = f.center();
    let step = (f.width() - diameter) / count as f64;

    // Left fan, opening toward 180°.
    for i in 0..=count / 2 {
        let v = f.value(i);
        let a = half_angle(v);
        let x = step * i as f64;
        shapes.arc(x + v, center.y, 2.0 * v, 180.0 - a, 180.0 + a, f.style);
    }

    let mid = f.data.at(f.data.len() / 2);
    shapes.circle(center.x, center.y, diameter * mid, f.style);

    // Right fan, opening toward 0°.
    for i in count / 2..=count {
        let v = f.value(i);
        let a = half_angle(v);
        let x = step * i as f64 + diameter;
        shapes.arc(x - v, center.y, 2.0 * v, 360.0 - a, 360.0 + a, f.style);
    }
}
