use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use client_core::{consent::DEFAULT_BANNER_HIDE_DELAY, FormSettings};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "landing.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub database_url: String,
    pub user_agent: String,
    pub notice_ttl_ms: u64,
    pub banner_hide_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let form = FormSettings::default();
        Self {
            supabase_url: "https://YOUR_PROJECT_ID.supabase.co".into(),
            supabase_anon_key: "YOUR_ANON_KEY".into(),
            database_url: "sqlite://./data/landing.db".into(),
            user_agent: form.user_agent,
            notice_ttl_ms: form.notice_ttl.as_millis() as u64,
            banner_hide_delay_ms: DEFAULT_BANNER_HIDE_DELAY.as_millis() as u64,
        }
    }
}

impl Settings {
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    pub fn banner_hide_delay(&self) -> Duration {
        Duration::from_millis(self.banner_hide_delay_ms)
    }
}

pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            apply_file_values(&mut settings, &file_cfg);
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

fn apply_file_values(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    let text = |key: &str| file_cfg.get(key).and_then(|v| v.as_str()).map(str::to_string);
    let millis = |key: &str| {
        file_cfg
            .get(key)
            .and_then(|v| v.as_integer())
            .and_then(|v| u64::try_from(v).ok())
    };

    if let Some(v) = text("supabase_url") {
        settings.supabase_url = v;
    }
    if let Some(v) = text("supabase_anon_key") {
        settings.supabase_anon_key = v;
    }
    if let Some(v) = text("database_url") {
        settings.database_url = v;
    }
    if let Some(v) = text("user_agent") {
        settings.user_agent = v;
    }
    if let Some(v) = millis("notice_ttl_ms") {
        settings.notice_ttl_ms = v;
    }
    if let Some(v) = millis("banner_hide_delay_ms") {
        settings.banner_hide_delay_ms = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SUPABASE_URL") {
        settings.supabase_url = v;
    }
    if let Some(v) = var("APP__SUPABASE_URL") {
        settings.supabase_url = v;
    }

    if let Some(v) = var("SUPABASE_ANON_KEY") {
        settings.supabase_anon_key = v;
    }
    if let Some(v) = var("APP__SUPABASE_ANON_KEY") {
        settings.supabase_anon_key = v;
    }

    if let Some(v) = var("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = var("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = var("APP__USER_AGENT") {
        settings.user_agent = v;
    }

    if let Some(v) = var("APP__NOTICE_TTL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.notice_ttl_ms = parsed;
        }
    }
    if let Some(v) = var("APP__BANNER_HIDE_DELAY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.banner_hide_delay_ms = parsed;
        }
    }
}

/// Checks the data store URL and strips any trailing slash.
pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    let parsed =
        Url::parse(raw).with_context(|| format!("invalid data store url '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("data store url must be http(s), got '{}'", parsed.scheme());
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
