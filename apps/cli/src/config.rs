use std::{collections::HashMap, fs};

use anyhow::Context;

const DEFAULT_BASE_URL: &str = "http://localhost:8088/api/v1";

#[derive(Debug)]
pub struct Settings {
    pub base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

/// Defaults, then `attendance.toml` in the working directory, then the
/// environment. `ATTENDANCE_BASE_URL` and `APP__BASE_URL` both work; the
/// prefixed form wins when both are set.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("attendance.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("base_url") {
                settings.base_url = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("ATTENDANCE_BASE_URL") {
        settings.base_url = v;
    }
    if let Ok(v) = std::env::var("APP__BASE_URL") {
        settings.base_url = v;
    }

    settings
}

pub fn validate_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed =
        url::Url::parse(trimmed).with_context(|| format!("invalid base url '{raw}'"))?;
    anyhow::ensure!(
        parsed.scheme() == "http" || parsed.scheme() == "https",
        "base url must be http(s), got '{}'",
        parsed.scheme()
    );
    Ok(trimmed.to_string())
}
