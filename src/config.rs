use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::Language;

/// Engine and server configuration with defaults tuned for the public
/// Wikipedia APIs.
///
/// # Examples
///
/// ```
/// use cellar_engine::EngineConfig;
///
/// let config = EngineConfig::from_lookup(|key| match key {
///     "PORT" => Some("9000".to_string()),
///     _ => None,
/// });
/// assert_eq!(config.port, 9000);
/// assert_eq!(config.db_path, "cellar.db");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// SQLite cellar database path
    pub db_path: String,

    /// HTTP server port
    pub port: u16,

    /// Encyclopedia editions searched in parallel
    pub languages: Vec<Language>,

    /// User-Agent sent to upstream APIs
    pub user_agent: String,

    /// Per-request timeout for upstream calls
    pub request_timeout_ms: u64,

    /// Search results requested per language
    pub search_limit: usize,

    /// Thumbnail width requested from the page-images API
    pub thumbnail_size: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: "cellar.db".to_string(),
            port: 8090,
            languages: Language::ALL.to_vec(),
            user_agent: "wijnkelder-app/1.0".to_string(),
            request_timeout_ms: 10_000,
            search_limit: 12,
            thumbnail_size: 320,
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; missing or invalid values keep their default
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.db_path = path;
        }

        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            config.port = port;
        }

        if let Some(raw) = lookup("CELLAR_LANGUAGES") {
            let languages: Vec<Language> = raw
                .split(',')
                .filter_map(|code| match code.parse::<Language>() {
                    Ok(lang) => Some(lang),
                    Err(e) => {
                        tracing::warn!("Ignoring CELLAR_LANGUAGES entry: {}", e);
                        None
                    }
                })
                .fold(Vec::new(), |mut acc, lang| {
                    if !acc.contains(&lang) {
                        acc.push(lang);
                    }
                    acc
                });
            if !languages.is_empty() {
                config.languages = languages;
            }
        }

        if let Some(agent) = lookup("CELLAR_USER_AGENT").filter(|a| !a.trim().is_empty()) {
            config.user_agent = agent;
        }

        if let Some(ms) = lookup("CELLAR_TIMEOUT_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            if ms > 0 {
                config.request_timeout_ms = ms;
            }
        }

        config
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
