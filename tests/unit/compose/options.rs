use super::*;
use serde_json::json;

#[test]
fn defaults_are_identity() {
    let o = EditOptions::default();
    assert!(o.has_identity_filters());
    assert_eq!(o.aspect_ratio, AspectRatio::Original);
    assert!(!o.text_overlay.is_visible());
    o.validate().unwrap();
}

#[test]
fn parses_ui_payload_with_camel_case_keys() {
    let o: EditOptions = serde_json::from_value(json!({
        "brightness": 120,
        "contrast": 90,
        "grayscale": 0,
        "sepia": 30,
        "aspectRatio": "16:9",
        "textOverlay": {
            "text": "Hello",
            "position": "top",
            "color": "#ff0000",
            "fontFamily": "Inter, sans-serif",
            "fontSize": 32,
            "fontWeight": "normal",
            "opacity": 0.8,
            "shadow": false
        }
    }))
    .unwrap();

    assert_eq!(o.brightness, 120.0);
    assert_eq!(o.aspect_ratio, AspectRatio::Landscape16x9);
    assert_eq!(o.text_overlay.position, OverlayPosition::Top);
    assert_eq!(o.text_overlay.font_weight, FontWeightKind::Normal);
    assert_eq!(o.text_overlay.color, OverlayColor::rgb(255, 0, 0));
    assert!(o.text_overlay.is_visible());
    assert!(!o.has_identity_filters());
}

#[test]
fn missing_fields_take_defaults() {
    let o = EditOptions::from_json(r#"{"aspectRatio":"4:5"}"#).unwrap();
    assert_eq!(o.aspect_ratio, AspectRatio::Portrait4x5);
    assert_eq!(o.brightness, 100.0);
    assert_eq!(o.text_overlay, TextOverlay::default());
}

#[test]
fn rejects_unknown_fields() {
    assert!(EditOptions::from_json(r#"{"saturation": 120}"#).is_err());
    assert!(EditOptions::from_json(r#"{"textOverlay": {"outline": true}}"#).is_err());
    assert!(EditOptions::from_json(r#"{"aspectRatio": "3:2"}"#).is_err());
}

#[test]
fn hidden_overlay_is_not_visible() {
    let overlay = TextOverlay {
        text: "kept".to_owned(),
        position: OverlayPosition::None,
        ..TextOverlay::default()
    };
    assert!(!overlay.is_visible());
}

#[test]
fn serializes_round_trip_through_json() {
    let mut o = EditOptions::default();
    o.sepia = 40.0;
    o.aspect_ratio = AspectRatio::Square;
    o.text_overlay.text = "Sale".to_owned();
    let v = serde_json::to_value(&o).unwrap();
    assert_eq!(v["aspectRatio"], json!("1:1"));
    assert_eq!(v["textOverlay"]["fontWeight"], json!("bold"));
    let back: EditOptions = serde_json::from_value(v).unwrap();
    assert_eq!(back, o);
}

#[test]
fn validate_flags_out_of_range_values() {
    let mut o = EditOptions::default();
    o.brightness = 151.0;
    assert!(o.validate().is_err());

    let mut o = EditOptions::default();
    o.grayscale = -1.0;
    assert!(o.validate().is_err());

    let mut o = EditOptions::default();
    o.text_overlay.opacity = 1.5;
    assert!(o.validate().is_err());

    let mut o = EditOptions::default();
    o.text_overlay.font_size = 0.0;
    assert!(o.validate().is_err());
}

#[test]
fn aspect_terms() {
    assert_eq!(AspectRatio::Original.terms(), None);
    assert_eq!(AspectRatio::Landscape16x9.terms(), Some((16, 9)));
    assert_eq!(AspectRatio::Portrait4x5.terms(), Some((4, 5)));
}
