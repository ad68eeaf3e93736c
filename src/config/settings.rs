//! Configuration settings for Coincast.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// News aggregator configuration.
    pub news: NewsApiConfig,
    /// Prediction service configuration.
    pub predictor: PredictorConfig,
    /// UI configuration.
    pub ui: UiConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
}

impl Config {
    /// Load configuration, returning defaults for anything not set.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load configuration from file and `COINCAST_*` environment variables.
    ///
    /// Environment values win over the file. Nested keys use a double
    /// underscore: `COINCAST_NEWS__AUTH_TOKEN` sets `news.auth_token`.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(default_path);
        Self::load_with_env(&config_path, config::Environment::with_prefix(super::ENV_PREFIX))
    }

    fn load_with_env(path: &Path, env: config::Environment) -> crate::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()
            .map_err(|e| crate::Error::config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| crate::Error::config(e.to_string()))
    }

}

fn default_path() -> PathBuf {
    super::config_dir()
        .map(|p| p.join("config.toml"))
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// News aggregator configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsApiConfig {
    /// Posts endpoint.
    pub base_url: String,
    /// Static API credential, sent as the `auth_token` query parameter.
    pub auth_token: Option<String>,
    /// Request timeout in seconds. Unset means no client-side timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cryptopanic.com/api/developer/v2/posts/".to_string(),
            auth_token: None,
            timeout_secs: None,
        }
    }
}

impl NewsApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Prediction service configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Service base URL.
    pub base_url: String,
    /// Request timeout in seconds. Unset means no client-side timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: None,
        }
    }
}

impl PredictorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// UI configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Tick rate in milliseconds for UI updates.
    pub tick_rate_ms: u64,
    /// Enable mouse support.
    pub mouse_support: bool,
    /// Show status bar.
    pub show_status_bar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            mouse_support: true,
            show_status_bar: true,
        }
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quit the application.
    pub quit: String,
    /// Show help.
    pub help: String,
    /// Navigate up.
    pub up: String,
    /// Navigate down.
    pub down: String,
    /// Select/confirm.
    pub select: String,
    /// Cancel/back (resets the prediction wizard).
    pub back: String,
    /// Refresh news, or retry the predictor connection.
    pub refresh: String,
    /// Load the next page of news.
    pub load_more: String,
    /// Switch to home view.
    pub home: String,
    /// Switch to news view.
    pub news: String,
    /// Switch to predictions view.
    pub predictions: String,
    /// Switch to markets view.
    pub markets: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            select: "Enter".to_string(),
            back: "Esc".to_string(),
            refresh: "r".to_string(),
            load_more: "m".to_string(),
            home: "1".to_string(),
            news: "2".to_string(),
            predictions: "3".to_string(),
            markets: "4".to_string(),
        }
    }
}
