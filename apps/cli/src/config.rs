use std::{fs, path::Path};

use anyhow::{bail, Context};
use client_core::Viewport;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "pinmap.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub database_url: String,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for Settings {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            server_url: "http://127.0.0.1:8800".into(),
            database_url: "sqlite://./data/pinmap.db".into(),
            viewport_width: viewport.width,
            viewport_height: viewport.height,
        }
    }
}

impl Settings {
    pub fn initial_viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
            ..Viewport::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    database_url: Option<String>,
    viewport_width: Option<f64>,
    viewport_height: Option<f64>,
}

/// Defaults, then the config file, then environment variables.
pub fn load_settings(config_path: &Path) -> anyhow::Result<Settings> {
    let raw = match fs::read_to_string(config_path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config '{}'", config_path.display()))
        }
    };
    settings_from_sources(raw.as_deref(), |name| std::env::var(name).ok())
}

fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        let file_cfg: FileSettings = toml::from_str(raw).context("invalid config file")?;
        if let Some(v) = file_cfg.server_url {
            settings.server_url = v;
        }
        if let Some(v) = file_cfg.database_url {
            settings.database_url = v;
        }
        if let Some(v) = file_cfg.viewport_width {
            settings.viewport_width = v;
        }
        if let Some(v) = file_cfg.viewport_height {
            settings.viewport_height = v;
        }
    }

    if let Some(v) = env("PINMAP_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("PINMAP_DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(parsed) = env("APP__VIEWPORT_WIDTH").and_then(|v| v.parse::<f64>().ok()) {
        settings.viewport_width = parsed;
    }
    if let Some(parsed) = env("APP__VIEWPORT_HEIGHT").and_then(|v| v.parse::<f64>().ok()) {
        settings.viewport_height = parsed;
    }

    Ok(settings)
}

pub fn validate_server_url(raw: &str) -> anyhow::Result<String> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid server url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("server url must use http or https, got '{}'", url.scheme());
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Accepts a bare file path as well as a full sqlite url. `Storage::new`
/// creates the parent directory.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
