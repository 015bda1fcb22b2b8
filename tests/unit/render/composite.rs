use super::*;

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn over_with_opaque_source_replaces_destination() {
    let mut dst = vec![10u8, 20, 30, 255, 10, 20, 30, 255];
    let src = vec![200u8, 100, 50, 255, 0, 0, 0, 0];
    premul_over_in_place(&mut dst, &src).unwrap();
    assert_eq!(dst, vec![200, 100, 50, 255, 10, 20, 30, 255]);
}

#[test]
fn over_with_half_alpha_blends() {
    let mut dst = vec![0u8, 0, 200, 255];
    let src = vec![128u8, 0, 0, 128];
    premul_over_in_place(&mut dst, &src).unwrap();
    assert_eq!(dst[0], 128);
    assert_eq!(dst[3], 255);
    assert!(dst[2] > 90 && dst[2] < 110);
}

#[test]
fn premultiply_zeroes_transparent_pixels() {
    let mut px = vec![255u8, 255, 255, 0, 255, 0, 0, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0, 128, 0, 0, 128]);
}
