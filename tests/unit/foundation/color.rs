use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    assert_eq!(Color::parse("#ff0000").unwrap(), Color::rgba(1.0, 0.0, 0.0, 1.0));
    assert_eq!(Color::parse("#000").unwrap(), Color::BLACK);
    assert_eq!(Color::parse("#FAD961").unwrap().to_rgba8(), [0xFA, 0xD9, 0x61, 255]);

    let c = Color::parse("#0000ff80").unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);
}

#[test]
fn parses_functional_forms() {
    let c = Color::parse("rgba(0,0,0,0)").unwrap();
    assert!(c.is_transparent());

    let c = Color::parse("rgba(0, 0, 0, 0.3)").unwrap();
    assert!((c.a - 0.3).abs() < 1e-9);

    let c = Color::parse("rgb(255, 128, 0)").unwrap();
    assert_eq!(c.to_rgba8(), [255, 128, 0, 255]);

    let c = Color::parse("hsl(0, 100%, 50%)").unwrap();
    assert_eq!(c.to_rgba8(), [255, 0, 0, 255]);
}

#[test]
fn parses_named_colors() {
    assert_eq!(Color::parse("white").unwrap(), Color::WHITE);
    assert_eq!(Color::parse("Transparent").unwrap(), Color::TRANSPARENT);
    assert!(Color::parse("not-a-color").is_err());
    assert!(Color::parse("#12345").is_err());
}

#[test]
fn deserializes_string_object_and_array() {
    let c: Color = serde_json::from_value(json!("white")).unwrap();
    assert_eq!(c, Color::WHITE);

    let c: Color = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 1.0));

    let c: Color = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, Color::rgba(0.25, 0.5, 0.75, 0.9));

    assert!(serde_json::from_value::<Color>(json!([1.0])).is_err());
}

#[test]
fn premul_conversion_and_lerp() {
    let half_red = Color::rgba(1.0, 0.0, 0.0, 0.5);
    assert_eq!(half_red.to_rgba8_premul().to_array(), [128, 0, 0, 128]);

    let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
    assert_eq!(mid.to_rgba8(), [128, 128, 128, 255]);
}
