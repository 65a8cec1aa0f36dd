//! Tests for configuration loading and validation.

use vascii::{AppConfig, ConversionOptions};

#[test]
fn defaults_match_the_builtin_ramp() {
    let cfg = AppConfig::default();
    assert_eq!(cfg.ascii_chars, ".-:=+*%#@$");
    assert_eq!(cfg.columns, 480);
    assert!((cfg.font_ratio - 0.4).abs() < f32::EPSILON);
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_config_files_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vascii.json");
    std::fs::write(&path, r#"{"columns": 120}"#).unwrap();

    let cfg = AppConfig::load_from(&path).unwrap();
    assert_eq!(cfg.columns, 120);
    assert_eq!(cfg.ascii_chars, ".-:=+*%#@$");
    assert!((cfg.font_ratio - 0.4).abs() < f32::EPSILON);
}

#[test]
fn non_ascii_ramp_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vascii.json");
    std::fs::write(&path, r#"{"ascii_chars": "░▒▓█"}"#).unwrap();
    assert!(AppConfig::load_from(&path).is_err());
}

#[test]
fn empty_ramp_is_rejected() {
    let cfg = AppConfig {
        ascii_chars: String::new(),
        ..AppConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn zero_columns_and_bad_ratio_are_rejected() {
    let cfg = AppConfig {
        columns: 0,
        ..AppConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = AppConfig {
        font_ratio: 0.0,
        ..AppConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn malformed_json_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vascii.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(AppConfig::load_from(&path).is_err());
}

#[test]
fn options_inherit_config_and_accept_overrides() {
    let cfg = AppConfig {
        columns: 200,
        ..AppConfig::default()
    };
    let options = ConversionOptions::from_config(&cfg).with_columns(96);
    assert_eq!(options.columns, 96);
    assert_eq!(options.ascii_chars, cfg.ascii_chars);

    let options = ConversionOptions::default()
        .with_font_ratio(0.5)
        .with_ascii_chars(" @".to_string());
    assert!((options.font_ratio - 0.5).abs() < f32::EPSILON);
    assert_eq!(options.ascii_chars, " @");
}
