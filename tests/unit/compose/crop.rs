use super::*;

fn size(width: u32, height: u32) -> Size {
    Size { width, height }
}

#[test]
fn original_keeps_full_frame() {
    let r = crop_rect(size(640, 480), AspectRatio::Original);
    assert_eq!(r, PixelRect::full(size(640, 480)));
}

#[test]
fn landscape_source_to_square_crops_width_centered() {
    let r = crop_rect(size(1920, 1080), AspectRatio::Square);
    assert_eq!(
        r,
        PixelRect {
            x: 420,
            y: 0,
            width: 1080,
            height: 1080
        }
    );
}

#[test]
fn square_source_to_wide_crops_height_centered() {
    let r = crop_rect(size(1000, 1000), AspectRatio::Landscape16x9);
    assert_eq!(r.width, 1000);
    assert_eq!(r.height, 562);
    assert_eq!(r.x, 0);
    assert_eq!(r.y, 219);
}

#[test]
fn portrait_target_on_landscape_source() {
    let r = crop_rect(size(1000, 500), AspectRatio::Portrait4x5);
    assert_eq!(r.height, 500);
    assert_eq!(r.width, 400);
    assert_eq!(r.x, 300);
}

#[test]
fn exact_ratio_is_not_cropped() {
    let r = crop_rect(size(1600, 900), AspectRatio::Landscape16x9);
    assert_eq!(r, PixelRect::full(size(1600, 900)));
    let r = crop_rect(size(800, 1000), AspectRatio::Portrait4x5);
    assert_eq!(r, PixelRect::full(size(800, 1000)));
}

#[test]
fn degenerate_sources_keep_at_least_one_pixel() {
    let r = crop_rect(size(1, 1000), AspectRatio::Landscape16x9);
    assert_eq!(r.height, 1);
    assert!(r.fits_within(size(1, 1000)));
}

#[test]
fn crop_copies_the_centered_window() {
    // 4x1 row with distinct pixels, square crop of height 1 keeps the middle-left pixel.
    let mut rgba = Vec::new();
    for i in 0..4u8 {
        rgba.extend_from_slice(&[i * 10, 0, 0, 255]);
    }
    let src = RawImage::from_rgba8_straight(4, 1, rgba).unwrap();
    let rect = crop_rect(src.size(), AspectRatio::Square);
    assert_eq!(rect.x, 1);
    let out = crop_to_surface(&src, rect, u64::MAX).unwrap();
    assert_eq!(out.data(), &[10, 0, 0, 255]);
}

#[test]
fn crop_rejects_out_of_bounds_rect() {
    let src = RawImage::from_rgba8_straight(2, 2, vec![0; 16]).unwrap();
    let rect = PixelRect {
        x: 1,
        y: 0,
        width: 2,
        height: 2,
    };
    assert!(matches!(
        crop_to_surface(&src, rect, u64::MAX),
        Err(MediaError::Composition(_))
    ));
}
