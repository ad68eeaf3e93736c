//! Configuration management for Coincast.

mod settings;

pub use settings::{Config, KeyBindings, NewsApiConfig, PredictorConfig, UiConfig};

use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Prefix for environment overrides, e.g. `COINCAST_NEWS__AUTH_TOKEN`.
pub const ENV_PREFIX: &str = "COINCAST";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "coincast", "coincast")
}

/// Get the configuration directory path.
pub fn config_dir() -> Result<PathBuf> {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| Error::config("Could not determine config directory"))
}

/// Get the log directory path.
pub fn log_dir() -> Result<PathBuf> {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("logs"))
        .ok_or_else(|| Error::config("Could not determine log directory"))
}
