use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::whole(15).unwrap(), Fps { num: 15, den: 1 });
}

#[test]
fn fps_ceil_covers_partial_frames() {
    let fps = Fps::whole(15).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(5.0), 75);
    assert_eq!(fps.secs_to_frames_ceil(0.01), 1);
    assert_eq!(fps.secs_to_frames_ceil(0.0), 0);

    let ntsc = Fps::new(30_000, 1001).unwrap();
    assert_eq!(ntsc.secs_to_frames_ceil(1.0), 30);
}

#[test]
fn frames_to_secs_matches_frame_duration() {
    let fps = Fps::whole(20).unwrap();
    assert!((fps.frames_to_secs(10) - 0.5).abs() < 1e-12);
}

#[test]
fn canvas_validates_and_derives_bound() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(70_000, 10).is_err());

    let c = Canvas::new(640, 360).unwrap();
    assert_eq!(c.scale_bound(), 360.0);
    assert_eq!(c.center(), Point::new(320.0, 180.0));
    assert_eq!(c.frame_len(), 640 * 360 * 4);
}

#[test]
fn premul_from_straight_scales_color_channels() {
    let p = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(p.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
