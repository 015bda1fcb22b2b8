use super::*;

fn approx(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(255, 0), 0);
    assert_eq!(mul_div255_u8(200, 128), 100);
}

#[test]
fn add_sat_clamps_at_255() {
    assert_eq!(add_sat_u8(200, 100), 255);
    assert_eq!(add_sat_u8(1, 2), 3);
}

#[test]
fn polar_uses_half_the_diameter() {
    let c = Point::new(10.0, 10.0);
    assert!(approx(polar(c, 20.0, 0.0), Point::new(20.0, 10.0)));
    assert!(approx(polar(c, 20.0, 90.0), Point::new(10.0, 20.0)));
    assert!(approx(polar(c, 20.0, 180.0), Point::new(0.0, 10.0)));
}

#[test]
fn rotate_about_quarter_turn_is_clockwise_on_screen() {
    let o = Point::new(0.0, 0.0);
    assert!(approx(
        rotate_about(o, Point::new(1.0, 0.0), 90.0),
        Point::new(0.0, 1.0)
    ));
    assert!(approx(rotate_about(o, Point::new(3.0, 4.0), 0.0), Point::new(3.0, 4.0)));
}

#[test]
fn midpoint_is_average() {
    assert_eq!(
        midpoint(Point::new(0.0, 2.0), Point::new(4.0, 6.0)),
        Point::new(2.0, 4.0)
    );
}
