//! Configuration loading tests.

use filebot::{FilebotConfig, FilebotErrorKind};
use std::path::PathBuf;
use tempfile::TempDir;

const SAMPLE: &str = r#"
[bot]
token = "123:abc"
admins = [42, 7]

[source]
dir = "/srv/library"

[dest]
public_url = "https://files.example.org/library"

[cache]
path = "/var/lib/filebot/handles.json"
"#;

#[test]
fn test_explicit_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, SAMPLE).unwrap();

    let config = FilebotConfig::load(Some(&path)).unwrap();

    assert_eq!(config.source.dir, PathBuf::from("/srv/library"));
    assert_eq!(config.dest.public_url, "https://files.example.org/library");
    assert_eq!(
        config.cache.path,
        PathBuf::from("/var/lib/filebot/handles.json")
    );
    // Keys the file leaves out keep their bundled values
    assert!(config.cache.auto_flush);
    assert_eq!(config.logging.file, PathBuf::from("log.log"));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = FilebotConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err.kind(), FilebotErrorKind::Config(_)));
}

#[test]
fn test_sample_validates() {
    let config = FilebotConfig::from_toml_str(SAMPLE).unwrap();
    config.validate().unwrap();
    assert_eq!(config.bot.token, "123:abc");
    assert_eq!(config.bot.admins, vec![42, 7]);
}

#[test]
fn test_missing_public_url_fails_validation() {
    let config = FilebotConfig::from_toml_str(
        r#"
[source]
dir = "/srv/library"
"#,
    )
    .unwrap();

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("dest.public_url"));
}

#[test]
fn test_auto_flush_can_be_disabled() {
    let config = FilebotConfig::from_toml_str(
        r#"
[cache]
path = "handles.json"
auto_flush = false
"#,
    )
    .unwrap();

    assert!(!config.cache.auto_flush);
    assert_eq!(config.cache.path, PathBuf::from("handles.json"));
}

#[test]
fn test_malformed_toml_is_a_config_error() {
    let err = FilebotConfig::from_toml_str("[bot\ntoken = ").unwrap_err();
    assert!(matches!(err.kind(), FilebotErrorKind::Config(_)));
}
