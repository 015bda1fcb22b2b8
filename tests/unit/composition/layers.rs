use super::*;
use crate::shapes::Primitive;

fn canvas() -> Canvas {
    Canvas::new(640, 360).unwrap()
}

#[test]
fn numbered_presets_build_their_layer_stacks() {
    let expected: [&[AnimationKind]; 4] = [
        &[AnimationKind::Wave, AnimationKind::Wave, AnimationKind::Wave],
        &[
            AnimationKind::Cubes,
            AnimationKind::Cubes,
            AnimationKind::Circles,
        ],
        &[AnimationKind::Glob, AnimationKind::Shine],
        &[AnimationKind::Square, AnimationKind::Arcs],
    ];
    for (label, kinds) in NUMBERED_PRESETS.iter().zip(expected) {
        let mut comp = Composition::new();
        comp.apply_named_preset(label).unwrap();
        let got: Vec<_> = comp.animations().iter().map(|a| a.kind()).collect();
        assert_eq!(got, kinds, "preset {label}");
        comp.validate(canvas()).unwrap();
    }
}

#[test]
fn preset_zero_layers_carry_their_overrides() {
    let mut comp = Composition::new();
    comp.apply_named_preset("0").unwrap();
    let counts: Vec<_> = comp.animations().iter().map(|a| a.config().count).collect();
    assert_eq!(counts, [5, 60, 25]);
    let first = comp.animations()[0].config();
    assert_eq!(first.style.line_width, 10.0);
    assert!(first.mirrored_x);
    assert!(first.style.rounded);
}

#[test]
fn named_presets_use_default_colors() {
    let mut comp = Composition::new();
    comp.apply_named_preset("flower").unwrap();
    assert_eq!(comp.len(), 1);
    let style = &comp.animations()[0].config().style;
    assert_eq!(style.fill, Paint::Solid(Color::WHITE));
    assert_eq!(style.stroke, Paint::Solid(Color::WHITE));

    comp.apply_named_preset("Circles").unwrap();
    let style = &comp.animations()[0].config().style;
    assert!(style.fill.is_invisible());
}

#[test]
fn set_default_stroke_fill_affects_later_animations() {
    let mut comp = Composition::new();
    let red = Paint::solid("red").unwrap();
    let blue = Paint::solid("blue").unwrap();
    comp.set_default_stroke_fill(red.clone(), blue.clone());
    comp.set_animation(AnimationKind::Lines);
    let style = &comp.animations()[0].config().style;
    assert_eq!(style.stroke, red);
    assert_eq!(style.fill, blue);
}

#[test]
fn unknown_preset_is_a_config_error() {
    let mut comp = Composition::new();
    let err = comp.apply_named_preset("7").unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("Turntable"));
    assert!(Preset::Numbered(9).apply(&mut comp).unwrap_err().is_config());
}

#[test]
fn clear_stops_playback() {
    let mut comp = Composition::new();
    comp.set_animation(AnimationKind::Wave);
    comp.start();
    assert!(comp.is_playing());
    comp.clear();
    assert!(!comp.is_playing());
    assert!(comp.is_empty());
    assert!(comp.validate(canvas()).is_err());
}

#[test]
fn layers_draw_in_insertion_order() {
    let mut comp = Composition::new();
    comp.add(Animation::new(AnimationKind::Circles, &AnimationOverrides::default()));
    comp.add(Animation::new(AnimationKind::Glob, &AnimationOverrides::default()));
    let mut list = DisplayList::new();
    comp.draw(&[10u8; 512], &mut list, canvas()).unwrap();
    assert_eq!(list.len(), 41);
    assert!(matches!(list.ops()[0].primitive, Primitive::Circle { .. }));
    assert!(matches!(list.ops()[40].primitive, Primitive::Polygon { .. }));
}

#[test]
fn layer_specs_parse_from_scene_json() {
    let layers: Vec<LayerSpec> = serde_json::from_str(
        r#"[{"animation": "Turntable", "cubeHeight": 12, "rotate": 30},
            {"animation": "lines", "top": true}]"#,
    )
    .unwrap();
    let comp = Composition::from_layers(&layers).unwrap();
    assert_eq!(comp.animations()[0].config().cube_height, 12.0);
    assert_eq!(comp.animations()[1].kind(), AnimationKind::Lines);

    let bad = LayerSpec {
        animation: "Spiral".into(),
        options: AnimationOverrides::default(),
    };
    assert!(bad.build().unwrap_err().is_config());
}
