//! Configuration tests
//!
//! The round-trip test is a compile-time guard: when a field is added to
//! `Config`, it fails until the field is also handled in `to_toml()` and
//! `FileConfig`.

use super::*;
use crate::session::PaymentMode;

/// Verify the generated template parses back as a FileConfig.
/// Catches TOML syntax errors in the hand-built serializer.
#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
}

/// Round-trip with a feed path set (the optional line is commented out in
/// the default template, so this exercises the other branch)
#[test]
fn test_config_roundtrip_with_feed_path() {
    let mut config = Config::default();
    config.feed_path = Some(PathBuf::from("/tmp/feed.txt"));
    config.payment.mode = PaymentMode::Handoff;

    let toml_str = config.to_toml();
    let parsed: FileConfig = toml::from_str(&toml_str).expect("template should parse");

    assert_eq!(parsed.feed_path.as_deref(), Some("/tmp/feed.txt"));
    assert_eq!(
        parsed.payment.and_then(|p| p.mode).as_deref(),
        Some("handoff")
    );
}

#[test]
fn test_sections_fall_back_to_defaults() {
    let parsed: FileConfig = toml::from_str("theme = \"Nord\"").unwrap();

    let scanner = ScannerConfig::from_file(parsed.scanner);
    assert_eq!(scanner.permission, PermissionSetting::Grant);

    let payment = PaymentConfig::from_file(parsed.payment);
    assert_eq!(payment.mode, PaymentMode::Simulate);
    assert_eq!(payment.pending_delay_ms, 2000);
    assert_eq!(payment.success_display_ms, 2000);
}

#[test]
fn test_payment_section_parses() {
    let toml_str = r#"
        [payment]
        mode = "handoff"
        pending_delay_ms = 150

        [scanner]
        permission = "deny"
    "#;
    let parsed: FileConfig = toml::from_str(toml_str).unwrap();

    let payment = PaymentConfig::from_file(parsed.payment);
    assert_eq!(payment.mode, PaymentMode::Handoff);
    assert_eq!(payment.pending_delay_ms, 150);
    // Unspecified field keeps its default
    assert_eq!(payment.success_display_ms, 2000);

    let scanner = ScannerConfig::from_file(parsed.scanner);
    assert_eq!(scanner.permission, PermissionSetting::Deny);
}

#[test]
fn test_unknown_payment_mode_falls_back() {
    assert_eq!(parse_payment_mode("simulate"), Some(PaymentMode::Simulate));
    assert_eq!(parse_payment_mode("handoff"), Some(PaymentMode::Handoff));
    assert_eq!(parse_payment_mode("bitcoin"), None);

    let parsed: FileConfig = toml::from_str("[payment]\nmode = \"bitcoin\"\n").unwrap();
    let payment = PaymentConfig::from_file(parsed.payment);
    assert_eq!(payment.mode, PaymentMode::Simulate);
}

#[test]
fn test_logging_rotation_parses() {
    let parsed: FileConfig = toml::from_str("[logging]\nfile_rotation = \"hourly\"\n").unwrap();
    let logging = LoggingConfig::from_file(parsed.logging);
    assert_eq!(logging.file_rotation, LogRotation::Hourly);
}
