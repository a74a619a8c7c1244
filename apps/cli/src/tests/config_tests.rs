use super::*;

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = settings_from_sources(None, env_from(&[])).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.initial_viewport(), Viewport::default());
}

#[test]
fn file_values_override_defaults() {
    let settings = settings_from_sources(
        Some(
            r#"
            server_url = "https://pins.example.com"
            viewport_width = 640.0
            "#,
        ),
        env_from(&[]),
    )
    .expect("settings");

    assert_eq!(settings.server_url, "https://pins.example.com");
    assert_eq!(settings.viewport_width, 640.0);
    assert_eq!(settings.database_url, Settings::default().database_url);
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let settings = settings_from_sources(
        Some(r#"server_url = "http://from-file""#),
        env_from(&[
            ("PINMAP_SERVER_URL", "http://from-env"),
            ("APP__SERVER_URL", "http://from-app-env"),
            ("APP__VIEWPORT_HEIGHT", "480"),
            ("APP__VIEWPORT_WIDTH", "not-a-number"),
        ]),
    )
    .expect("settings");

    assert_eq!(settings.server_url, "http://from-app-env");
    assert_eq!(settings.viewport_height, 480.0);
    assert_eq!(settings.viewport_width, Settings::default().viewport_width);
}

#[test]
fn malformed_config_file_is_an_error() {
    assert!(settings_from_sources(Some("server_url = ["), env_from(&[])).is_err());
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings(&dir.path().join("absent.toml")).expect("settings");
    assert_eq!(settings.server_url, Settings::default().server_url);
}

#[test]
fn server_url_must_be_http() {
    assert_eq!(
        validate_server_url("http://localhost:8800/").expect("valid"),
        "http://localhost:8800"
    );
    assert!(validate_server_url("ftp://localhost").is_err());
    assert!(validate_server_url("not a url").is_err());
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(normalize_database_url("  "), Settings::default().database_url);
    assert_eq!(
        normalize_database_url(r"data\pinmap.db"),
        "sqlite://data/pinmap.db"
    );
}

#[tokio::test]
async fn plain_database_path_opens_in_missing_directory() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("data").join("pinmap.db");

    let database_url = normalize_database_url(db_path.to_string_lossy().as_ref());
    let storage = storage::Storage::new(&database_url).await.expect("open db");
    storage.put("user", b"alice").await.expect("put");

    assert!(db_path.exists(), "database file should exist: {}", db_path.display());
}
