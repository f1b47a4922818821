//! Configuration management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BACKEND_URL;
use crate::i18n::Language;
use crate::models::PaymentProvider;

pub const DEFAULT_PLAYER: &str = "ffplay";
pub const DEFAULT_COMMUNITY_URL: &str = "https://t.me/discussionsexe";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Overrides locale detection when set
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub payment_provider: PaymentProvider,
    #[serde(default)]
    pub external_player: String,
    /// Target of the "join now" link on the marketing screen
    #[serde(default = "default_community_url")]
    pub community_url: String,
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    // Saved state
    #[serde(default)]
    pub last_query: String,
    #[serde(default)]
    pub last_email: String,
}

fn default_backend_url() -> String { DEFAULT_BACKEND_URL.to_string() }
fn default_community_url() -> String { DEFAULT_COMMUNITY_URL.to_string() }
fn default_true() -> bool { true }
fn default_font_size() -> u32 { 14 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }
fn default_timeout() -> u64 { 30 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            language: None,
            payment_provider: PaymentProvider::PayPal,
            external_player: String::new(),
            community_url: default_community_url(),
            download_dir: None,
            dark_mode: true,
            font_size: 14,
            log_level: default_log_level(),
            log_format: default_log_format(),
            request_timeout_secs: 30,
            last_query: String::new(),
            last_email: String::new(),
        }
    }
}

/// `<config_dir>/streamx_video`, created on first use
pub fn app_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("streamx_video");
    fs::create_dir_all(&path).ok();
    path
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        app_dir().join("config.json")
    }

    /// Missing or unreadable files fall back to defaults
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                if let Ok(config) = serde_json::from_str(&content) {
                    return config;
                }
            }
        }

        Self::default()
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok();
        }
        if let Ok(content) = serde_json::to_string_pretty(self) {
            let _ = fs::write(path, content);
        }
    }

    pub fn resolved_language(&self) -> Language {
        self.language.unwrap_or_else(Language::from_env)
    }

    pub fn player_command(&self) -> &str {
        let player = self.external_player.trim();
        if player.is_empty() {
            DEFAULT_PLAYER
        } else {
            player
        }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.request_timeout_secs.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.json"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.player_command(), "ffplay");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"language":"de","payment_provider":"Stripe","font_size":18}"#).unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.resolved_language(), Language::De);
        assert_eq!(config.payment_provider, PaymentProvider::Stripe);
        assert_eq!(config.font_size, 18);
        assert!(config.dark_mode);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            last_query: "page=2".into(),
            last_email: "viewer@example.com".into(),
            ..AppConfig::default()
        };
        config.save_to(&path);
        assert_eq!(AppConfig::load_from(&path), config);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }
}
