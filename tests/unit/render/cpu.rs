use super::*;
use crate::shapes::{Glow, Shapes};

fn canvas() -> Canvas {
    Canvas::new(64, 48).unwrap()
}

fn style(stroke: Paint, fill: Paint, line_width: f64) -> Arc<ShapeStyle> {
    Arc::new(ShapeStyle {
        stroke,
        fill,
        line_width,
        rounded: false,
        glow: Glow::default(),
    })
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn cleared_frame_reads_back_opaque_black() {
    let mut r = CpuRaster::new(canvas()).unwrap();
    r.clear();
    let f = r.read_frame().unwrap();
    assert_eq!(f.data.len(), canvas().frame_len());
    assert!(f.data.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
}

#[test]
fn readback_rejects_wrong_buffer_size() {
    let r = CpuRaster::new(canvas()).unwrap();
    let mut buf = vec![0u8; 10];
    assert!(r.read_rgba8_into(&mut buf).is_err());
}

#[test]
fn fill_is_composited_over_stroke() {
    let mut r = CpuRaster::new(canvas()).unwrap();
    let s = style(
        Paint::solid("#ff0000").unwrap(),
        Paint::solid("#0000ff").unwrap(),
        8.0,
    );
    let mut list = DisplayList::new();
    Shapes::new(&mut list).rectangle(16.0, 12.0, 32.0, 24.0, 0.0, &s);
    r.clear();
    r.render_list(&list).unwrap();
    let f = r.read_frame().unwrap();

    // Inside the fill, including the inner half of the stroke.
    let inner = px(&f, 18, 24);
    assert!(inner[2] > 240 && inner[0] < 15, "{inner:?}");
    // Outer half of the stroke stays visible.
    let outer = px(&f, 13, 24);
    assert!(outer[0] > 240 && outer[2] < 15, "{outer:?}");
    // Untouched background.
    assert_eq!(px(&f, 2, 2), [0, 0, 0, 255]);
}

#[test]
fn arcs_are_never_filled() {
    let mut r = CpuRaster::new(canvas()).unwrap();
    let s = style(
        Paint::solid("white").unwrap(),
        Paint::solid("white").unwrap(),
        2.0,
    );
    let mut list = DisplayList::new();
    Shapes::new(&mut list).arc(32.0, 24.0, 40.0, 0.0, 360.0, &s);
    r.clear();
    r.render_list(&list).unwrap();
    let f = r.read_frame().unwrap();
    assert_eq!(px(&f, 32, 24), [0, 0, 0, 255]);
    assert!(px(&f, 52, 24)[0] > 100);
}

#[test]
fn zero_width_stroke_is_skipped() {
    let mut r = CpuRaster::new(canvas()).unwrap();
    let s = style(Paint::solid("white").unwrap(), Paint::solid("transparent").unwrap(), 0.0);
    let mut list = DisplayList::new();
    Shapes::new(&mut list).line(0.0, 24.0, 64.0, 24.0, &s);
    r.clear();
    r.render_list(&list).unwrap();
    let f = r.read_frame().unwrap();
    assert!(f.data.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
}

#[test]
fn gradient_runs_along_the_frame_diagonal() {
    let mut r = CpuRaster::new(canvas()).unwrap();
    let s = style(
        Paint::solid("transparent").unwrap(),
        Paint::gradient(&["#000000", "#ffffff"], 0.0).unwrap(),
        0.0,
    );
    let mut list = DisplayList::new();
    Shapes::new(&mut list).rectangle(0.0, 0.0, 64.0, 48.0, 0.0, &s);
    r.clear();
    r.render_list(&list).unwrap();
    let f = r.read_frame().unwrap();
    let tl = px(&f, 1, 1)[0];
    let mid = px(&f, 32, 24)[0];
    let br = px(&f, 62, 46)[0];
    assert!(tl < 20, "{tl}");
    assert!((110..=145).contains(&mid), "{mid}");
    assert!(br > 235, "{br}");
}

#[test]
fn rotated_gradient_reverses_at_half_turn() {
    let mut r = CpuRaster::new(canvas()).unwrap();
    let s = style(
        Paint::solid("transparent").unwrap(),
        Paint::gradient(&["#000000", "#ffffff"], 180.0).unwrap(),
        0.0,
    );
    let mut list = DisplayList::new();
    Shapes::new(&mut list).rectangle(0.0, 0.0, 64.0, 48.0, 0.0, &s);
    r.clear();
    r.render_list(&list).unwrap();
    let f = r.read_frame().unwrap();
    assert!(px(&f, 1, 1)[0] > 235);
    assert!(px(&f, 62, 46)[0] < 20);
}

#[test]
fn missing_pattern_paints_nothing() {
    let mut r = CpuRaster::new(canvas()).unwrap();
    let s = style(
        Paint::solid("transparent").unwrap(),
        Paint::Pattern("/definitely/not/here.png".into()),
        0.0,
    );
    let mut list = DisplayList::new();
    Shapes::new(&mut list).rectangle(0.0, 0.0, 64.0, 48.0, 0.0, &s);
    r.clear();
    r.render_list(&list).unwrap();
    r.render_list(&list).unwrap();
    let f = r.read_frame().unwrap();
    assert!(f.data.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
    assert_eq!(r.pattern_cache.len(), 1);
}

#[test]
fn glow_spills_outside_the_shape() {
    let mut r = CpuRaster::new(canvas()).unwrap();
    let s = Arc::new(ShapeStyle {
        stroke: Paint::solid("transparent").unwrap(),
        fill: Paint::solid("white").unwrap(),
        line_width: 0.0,
        rounded: false,
        glow: Glow {
            strength: 8.0,
            color: crate::foundation::color::Color::WHITE,
        },
    });
    let mut list = DisplayList::new();
    Shapes::new(&mut list).rectangle(24.0, 16.0, 16.0, 16.0, 0.0, &s);
    r.clear();
    r.render_list(&list).unwrap();
    let f = r.read_frame().unwrap();
    assert!(px(&f, 21, 24)[0] > 0, "halo expected left of the shape");
    assert!(px(&f, 32, 24)[0] > 240);
    assert_eq!(px(&f, 1, 1), [0, 0, 0, 255]);
    assert_eq!(r.blur_kernel_cache.len(), 1);
}

#[test]
fn background_must_match_the_canvas() {
    let mut r = CpuRaster::new(canvas()).unwrap();
    let bg = Background::black(Canvas::new(32, 32).unwrap());
    assert!(r.draw_background(&bg).is_err());

    let bg = Background::solid(canvas(), crate::foundation::color::Color::WHITE);
    r.draw_background(&bg).unwrap();
    let f = r.read_frame().unwrap();
    assert_eq!(px(&f, 10, 10), [201, 201, 201, 255]);
}

#[test]
fn sample_stops_hits_endpoints() {
    let a = crate::foundation::color::Color::BLACK;
    let b = crate::foundation::color::Color::WHITE;
    assert_eq!(sample_stops(&[a, b], 0.0), a);
    assert_eq!(sample_stops(&[a, b], 1.0), b);
    assert_eq!(sample_stops(&[b], 0.3), b);
}
