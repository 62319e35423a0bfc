use std::fs;

use fieldconfig::{ConfigError, GlowConfig, SurfaceSize};
use tempfile::tempdir;

#[test]
fn loads_config_from_disk() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
version = 1

[window]
size = "1280x720"
fps = 24

[field]
octaves = 3
"#,
    )
    .expect("write config");

    let config = GlowConfig::load(&path).expect("load config");
    assert_eq!(
        config.window.size,
        Some(SurfaceSize {
            width: 1280,
            height: 720
        })
    );
    assert_eq!(config.window.fps, Some(24.0));
    assert_eq!(config.field_params().octaves, 3);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");

    let err = GlowConfig::load(&path).unwrap_err();
    match &err {
        ConfigError::Read { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("expected read error, got {other:?}"),
    }
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn syntax_errors_surface_as_parse_errors() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "version = 1\n[window\nsize = 3").expect("write config");

    let err = GlowConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
