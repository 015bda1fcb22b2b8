use super::*;
use kurbo::PathEl;

fn style(rounded: bool) -> Arc<ShapeStyle> {
    Arc::new(ShapeStyle {
        rounded,
        ..ShapeStyle::default()
    })
}

#[test]
fn shapes_record_ops_in_call_order() {
    let mut list = DisplayList::new();
    let s = style(false);
    {
        let mut shapes = Shapes::new(&mut list);
        shapes.circle(10.0, 10.0, 4.0, &s);
        shapes.line(0.0, 0.0, 5.0, 5.0, &s);
        shapes.arc(0.0, 0.0, 10.0, 0.0, 90.0, &s);
    }
    assert_eq!(list.len(), 3);
    assert!(matches!(list.ops()[0].primitive, Primitive::Circle { .. }));
    assert!(matches!(list.ops()[1].primitive, Primitive::Line { .. }));
    assert!(!list.ops()[2].primitive.is_closed());

    list.clear();
    assert!(list.is_empty());
}

#[test]
fn polygon_without_smoothing_uses_straight_segments() {
    let pts = vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
    ];
    let path = polygon_path(&pts, false);
    let els: Vec<PathEl> = path.elements().to_vec();
    assert_eq!(els.len(), 5);
    assert_eq!(els[0], PathEl::MoveTo(pts[0]));
    assert_eq!(els[2], PathEl::LineTo(pts[1]));
    assert_eq!(els[4], PathEl::ClosePath);
}

#[test]
fn smoothed_polygon_curves_through_edge_midpoints() {
    let pts = vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
    ];
    let path = polygon_path(&pts, true);
    let els = path.elements();
    assert_eq!(
        els[1],
        PathEl::QuadTo(Point::new(0.0, 0.0), Point::new(5.0, 0.0))
    );
    assert_eq!(
        els[2],
        PathEl::QuadTo(Point::new(10.0, 0.0), Point::new(10.0, 5.0))
    );
    // The last vertex has no successor and curves onto itself.
    assert_eq!(
        els[3],
        PathEl::QuadTo(Point::new(10.0, 10.0), Point::new(10.0, 10.0))
    );
}

#[test]
fn polygon_smoothing_follows_style_rounding() {
    let mut list = DisplayList::new();
    Shapes::new(&mut list).polygon(vec![Point::ZERO, Point::new(1.0, 1.0)], &style(true));
    let Primitive::Polygon { smooth, .. } = &list.ops()[0].primitive else {
        panic!("expected polygon");
    };
    assert!(*smooth);
}

#[test]
fn empty_polygon_has_empty_path() {
    assert!(polygon_path(&[], true).elements().is_empty());
}

#[test]
fn arc_sweep_wraps_like_canvas() {
    let tau = std::f64::consts::TAU;
    assert!((arc_sweep(135.0, 225.0) - 90f64.to_radians()).abs() < 1e-12);
    assert_eq!(arc_sweep(180.0, 180.0), 0.0);
    assert!((arc_sweep(0.0, 720.0) - tau).abs() < 1e-12);
    assert!((arc_sweep(90.0, 0.0) - 270f64.to_radians()).abs() < 1e-9);
    assert_eq!(arc_sweep(0.0, f64::NAN), 0.0);
}

#[test]
fn circle_bounds_use_half_the_diameter() {
    let c = Primitive::Circle {
        center: Point::new(50.0, 50.0),
        diameter: 20.0,
    };
    let b = c.bounds();
    assert!((b.x0 - 40.0).abs() < 1e-6);
    assert!((b.x1 - 60.0).abs() < 1e-6);
}

#[test]
fn rectangle_radius_is_clamped_to_half_the_side() {
    let r = Primitive::Rectangle {
        rect: Rect::new(0.0, 0.0, 10.0, 40.0),
        radius: 100.0,
    };
    let b = r.bounds();
    assert!((b.width() - 10.0).abs() < 1e-6);
    assert!((b.height() - 40.0).abs() < 1e-6);
    assert!(r.is_closed());
}

#[test]
fn paint_parses_solid_gradient_and_image() {
    let p: Paint = serde_json::from_value(serde_json::json!("#FAD961")).unwrap();
    assert!(matches!(p, Paint::Solid(_)));

    let p: Paint =
        serde_json::from_value(serde_json::json!({"gradient": ["#21D4FD", "#B721FF"], "rotate": 45}))
            .unwrap();
    let Paint::Gradient { colors, rotate } = p else {
        panic!("expected gradient");
    };
    assert_eq!(colors.len(), 2);
    assert_eq!(rotate, 45.0);

    let p: Paint = serde_json::from_value(serde_json::json!({"image": "tile.png"})).unwrap();
    assert_eq!(p, Paint::Pattern("tile.png".into()));

    assert!(serde_json::from_value::<Paint>(serde_json::json!({"gradient": []})).is_err());
}

#[test]
fn transparent_paints_and_glows_are_invisible() {
    assert!(Paint::solid("rgba(0,0,0,0)").unwrap().is_invisible());
    assert!(!Paint::solid("white").unwrap().is_invisible());
    assert!(!Glow::default().is_visible());
    assert_eq!(Paint::default(), Paint::solid("#000").unwrap());
}
