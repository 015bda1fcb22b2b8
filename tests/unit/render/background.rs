use super::*;

#[test]
fn black_background_stays_black_and_opaque() {
    let canvas = Canvas::new(4, 2).unwrap();
    let bg = Background::black(canvas);
    assert_eq!(bg.premul_bytes().len(), canvas.frame_len());
    assert!(bg.premul_bytes().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn solid_background_receives_the_wash() {
    let canvas = Canvas::new(2, 2).unwrap();
    let bg = Background::solid(canvas, Color::WHITE);
    // 255 * (1 - 0.3 * 0.7) = 201.45
    assert_eq!(&bg.premul_bytes()[..4], &[201, 201, 201, 255]);
}

#[test]
fn missing_image_falls_back_to_black() {
    let canvas = Canvas::new(2, 2).unwrap();
    let path = Path::new("definitely/not/here.png");
    assert!(Background::from_image(path, canvas).is_err());
    let bg = Background::load_or_black(path, canvas);
    assert!(bg.premul_bytes().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn image_is_cover_scaled_and_dimmed() {
    let dir = std::env::temp_dir().join(format!("audio_viz_bg_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("red.png");
    image::RgbaImage::from_pixel(3, 1, image::Rgba([255, 0, 0, 255]))
        .save(&path)
        .unwrap();

    let canvas = Canvas::new(8, 6).unwrap();
    let bg = Background::from_image(&path, canvas).unwrap();
    assert_eq!(bg.premul_bytes().len(), canvas.frame_len());
    // 255 * 0.5 = 127.5 -> 128, then * 0.79 = 101.12 -> 101
    assert_eq!(&bg.premul_bytes()[..4], &[101, 0, 0, 255]);

    let _ = std::fs::remove_dir_all(&dir);
}
