//! Integration tests for configuration loading.

use moovprobe::config::{load_config, load_config_or_default};
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_full_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("moovprobe.toml");
    fs::write(
        &path,
        r#"
[http]
timeout_secs = 12
user_agent = "tests/1.0"

[http.headers]
Authorization = "Bearer token"

[walk]
max_boxes = 64
max_offset = 10485760
verify_movie_header = true

[probe]
concurrency = 8
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.http.timeout_secs, 12);
    assert_eq!(config.http.user_agent, "tests/1.0");
    assert_eq!(config.http.headers.len(), 1);
    assert_eq!(config.walk.max_boxes, 64);
    assert_eq!(config.walk.max_offset, Some(10 * 1024 * 1024));
    assert!(config.walk.verify_movie_header);
    assert_eq!(config.probe.concurrency, 8);
}

#[test]
fn explicit_path_must_exist() {
    let dir = tempdir().unwrap();
    let err = load_config_or_default(Some(&dir.path().join("missing.toml"))).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn invalid_values_name_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[walk]\nmax_boxes = 0\n").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("bad.toml"));
    assert!(format!("{:#}", err).contains("walk.max_boxes"));
}

#[test]
fn malformed_toml_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[http\ntimeout_secs = ").unwrap();

    assert!(load_config(&path).is_err());
}
