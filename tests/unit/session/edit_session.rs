use super::*;

use crate::assets::fonts::FontBook;
use crate::compose::compositor::CompositorOpts;
use crate::compose::encode::{EncodeOptions, OutputFormat};
use crate::compose::options::{AspectRatio, TextOverlay};

fn png_artifact(w: u32, h: u32) -> EncodedArtifact {
    let img = image::RgbaImage::from_fn(w, h, |x, y| image::Rgba([x as u8, y as u8, 90, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    EncodedArtifact::from_bytes(&bytes)
}

fn compositor() -> ImageCompositor {
    ImageCompositor::new(
        FontBook::without_system_fonts(),
        CompositorOpts {
            encode: EncodeOptions {
                format: OutputFormat::Png,
                jpeg_quality: None,
            },
            ..CompositorOpts::default()
        },
    )
}

#[test]
fn preview_needs_a_source() {
    let s = EditSession::new();
    assert!(matches!(
        s.request_preview().unwrap_err(),
        MediaError::Validation(_)
    ));
}

#[test]
fn replacing_the_source_resets_options_and_outputs() {
    let mut c = compositor();
    let mut s = EditSession::with_source(png_artifact(8, 8));
    s.update_options(|o| o.sepia = 40.0);
    s.bake(&mut c).unwrap();
    assert!(s.baked().is_some());

    s.replace_source(png_artifact(4, 4));
    assert_eq!(s.options(), &EditOptions::identity());
    assert!(s.baked().is_none());
    assert!(s.preview().is_none());
}

#[test]
fn stale_previews_are_discarded() {
    let mut s = EditSession::with_source(png_artifact(8, 8));
    let old = s.request_preview().unwrap();

    s.update_options(|o| o.brightness = 120.0);
    let new = s.request_preview().unwrap();
    assert_ne!(old.ticket, new.ticket);

    assert!(!s.accept_preview(old.ticket, EncodedArtifact::from_bytes(b"old")));
    assert!(s.preview().is_none());
    assert!(s.accept_preview(new.ticket, EncodedArtifact::from_bytes(b"new")));
    assert_eq!(s.preview(), Some(&EncodedArtifact::from_bytes(b"new")));

    s.replace_source(png_artifact(8, 8));
    assert!(!s.is_current(new.ticket));
    assert!(s.preview().is_none());
}

#[test]
fn setting_equal_options_keeps_tickets_valid() {
    let mut s = EditSession::with_source(png_artifact(8, 8));
    let req = s.request_preview().unwrap();
    s.set_options(EditOptions::identity());
    assert!(s.is_current(req.ticket));
}

#[test]
fn failed_bake_keeps_the_previous_artifact() {
    let mut c = compositor();
    let mut s = EditSession::with_source(png_artifact(8, 8));
    s.update_options(|o| o.aspect_ratio = AspectRatio::Square);
    let first = s.bake(&mut c).unwrap().clone();

    // a visible overlay with no fonts at all cannot be drawn
    s.update_options(|o| {
        o.text_overlay = TextOverlay {
            text: "caption".to_owned(),
            ..TextOverlay::default()
        }
    });
    let err = s.bake(&mut c).unwrap_err();
    assert!(matches!(err, MediaError::Composition(_)));
    assert_eq!(s.baked(), Some(&first));
}

#[test]
fn render_preview_is_deterministic() {
    let mut c = compositor();
    let mut s = EditSession::with_source(png_artifact(12, 6));
    s.update_options(|o| {
        o.contrast = 130.0;
        o.aspect_ratio = AspectRatio::Portrait4x5;
    });
    let a = s.render_preview(&mut c).unwrap().clone();
    let b = s.render_preview(&mut c).unwrap().clone();
    assert_eq!(a, b);
}
