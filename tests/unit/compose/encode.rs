use super::*;

use crate::assets::decode::decode_image;

fn checker(w: u32, h: u32) -> RawImage {
    let mut rgba = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let v = if (x / 4 + y / 4) % 2 == 0 { 230 } else { 20 };
            rgba.extend_from_slice(&[v, v / 2, 255 - v, 255]);
        }
    }
    RawImage::from_rgba8_straight(w, h, rgba).unwrap()
}

#[test]
fn jpeg_output_has_soi_marker_and_same_dimensions() {
    let img = checker(32, 16);
    let bytes = encode_raw(&img, EncodeOptions::default()).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

    let back = decode_image(&bytes).unwrap();
    assert_eq!((back.width, back.height), (32, 16));
}

#[test]
fn png_output_is_lossless_for_opaque_pixels() {
    let img = checker(8, 8);
    let bytes = encode_raw(
        &img,
        EncodeOptions {
            format: OutputFormat::Png,
            jpeg_quality: None,
        },
    )
    .unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
    assert_eq!(decode_image(&bytes).unwrap(), img);
}

#[test]
fn lower_quality_produces_smaller_jpeg() {
    let img = checker(64, 64);
    let hi = encode_raw(
        &img,
        EncodeOptions {
            format: OutputFormat::Jpeg,
            jpeg_quality: Some(95),
        },
    )
    .unwrap();
    let lo = encode_raw(
        &img,
        EncodeOptions {
            format: OutputFormat::Jpeg,
            jpeg_quality: Some(10),
        },
    )
    .unwrap();
    assert!(lo.len() < hi.len());
}

#[test]
fn out_of_range_quality_is_rejected() {
    let err = encode_raw(
        &checker(4, 4),
        EncodeOptions {
            format: OutputFormat::Jpeg,
            jpeg_quality: Some(0),
        },
    )
    .unwrap_err();
    assert!(matches!(err, MediaError::Composition(_)));
}

#[test]
fn format_parsing_and_mime() {
    assert_eq!(OutputFormat::parse(" JPG "), Some(OutputFormat::Jpeg));
    assert_eq!(OutputFormat::parse("png"), Some(OutputFormat::Png));
    assert_eq!(OutputFormat::parse("webp"), None);
    assert_eq!(OutputFormat::Png.mime(), "image/png");
    assert_eq!(OutputFormat::default().mime(), "image/jpeg");
}
