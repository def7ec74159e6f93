use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_image(&buf).unwrap();
    assert_eq!(decoded.size(), Size { width: 1, height: 1 });
    assert_eq!(
        decoded.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage_and_empty() {
    assert!(decode_image(&[]).is_err());
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn from_rgba8_straight_checks_length() {
    assert!(RawImage::from_rgba8_straight(2, 2, vec![0; 15]).is_err());
    let img = RawImage::from_rgba8_straight(2, 1, vec![10, 20, 30, 255, 1, 2, 3, 0]).unwrap();
    assert_eq!(img.rgba8_premul, vec![10, 20, 30, 255, 0, 0, 0, 0]);
}
