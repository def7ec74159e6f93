use super::*;
use serde_json::json;

#[test]
fn empty_object_yields_defaults() {
    let c = EngineConfig::from_json("{}").unwrap();
    assert_eq!(c, EngineConfig::default());
    assert_eq!(c.audio.sample_rate, 24_000);
    assert_eq!(c.audio.channels, 1);
    assert_eq!(c.image.format, OutputFormat::Jpeg);
    assert_eq!(c.image.jpeg_quality, None);
    c.validate().unwrap();
}

#[test]
fn nested_sections_parse() {
    let c = EngineConfig::from_json(
        &json!({
            "audio": { "sample_rate": 48000, "channels": 2 },
            "image": { "format": "png", "max_surface_pixels": 1000 },
            "fonts": { "files": ["a.ttf"], "dirs": ["/fonts"] }
        })
        .to_string(),
    )
    .unwrap();
    assert_eq!(c.pcm_format(), PcmFormat { sample_rate: 48_000, channels: 2 });
    assert_eq!(c.compositor_opts().encode.format, OutputFormat::Png);
    assert_eq!(c.compositor_opts().max_surface_pixels, 1000);
    assert_eq!(c.fonts.files, vec![PathBuf::from("a.ttf")]);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = EngineConfig::from_json(r#"{"audio":{"rate":1}}"#).unwrap_err();
    assert!(matches!(err, MediaError::Serde(_)));
}

#[test]
fn env_overrides_apply_and_bad_values_are_ignored() {
    let mut c = EngineConfig::default();
    c.apply_env_from(|k| match k {
        ENV_SAMPLE_RATE => Some("44100".into()),
        ENV_FONT_DIR => Some("/opt/fonts".into()),
        ENV_IMAGE_FORMAT => Some("PNG".into()),
        _ => None,
    });
    assert_eq!(c.audio.sample_rate, 44_100);
    assert_eq!(c.fonts.dirs, vec![PathBuf::from("/opt/fonts")]);
    assert_eq!(c.image.format, OutputFormat::Png);

    c.apply_env_from(|k| match k {
        ENV_SAMPLE_RATE => Some("fast".into()),
        ENV_IMAGE_FORMAT => Some("tiff".into()),
        ENV_FONT_DIR => Some("/opt/fonts".into()),
        _ => None,
    });
    assert_eq!(c.audio.sample_rate, 44_100);
    assert_eq!(c.image.format, OutputFormat::Png);
    assert_eq!(c.fonts.dirs.len(), 1);
}

#[test]
fn validate_checks_ranges() {
    let mut c = EngineConfig::default();
    c.audio.channels = 0;
    assert!(c.validate().is_err());

    let mut c = EngineConfig::default();
    c.image.jpeg_quality = Some(101);
    assert!(c.validate().is_err());

    let mut c = EngineConfig::default();
    c.image.max_surface_pixels = 0;
    assert!(c.validate().is_err());
}

#[test]
fn missing_font_dir_fails_to_load() {
    let mut c = EngineConfig::default();
    c.fonts.dirs.push(PathBuf::from("/definitely/not/here"));
    assert!(c.load_fonts().is_err());
}

#[test]
fn system_font_fallback_can_be_switched_off() {
    assert!(EngineConfig::default().fonts.system_fallback);
    let c = EngineConfig::from_json(r#"{"fonts":{"system_fallback":false}}"#).unwrap();
    assert!(!c.fonts.system_fallback);
    assert!(c.load_fonts().unwrap().is_empty());
}
