use crate::foundation::core::Point;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Point on a circle of the given *diameter* around `center`, at `degrees` clockwise from +x
/// (screen space, y down).
pub fn polar(center: Point, diameter: f64, degrees: f64) -> Point {
    let r = diameter / 2.0;
    let rad = degrees.to_radians();
    Point::new(center.x + r * rad.cos(), center.y + r * rad.sin())
}

/// Rotate `p` around `origin` by `degrees` (screen space, y down).
pub fn rotate_about(origin: Point, p: Point, degrees: f64) -> Point {
    let (s, c) = degrees.to_radians().sin_cos();
    let dx = p.x - origin.x;
    let dy = p.y - origin.y;
    Point::new(c * dx - s * dy + origin.x, s * dx + c * dy + origin.y)
}

pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
