//! # Coincast - a terminal crypto compass
//!
//! A terminal user interface that reads a paginated crypto news feed and
//! walks the user through requesting a model price forecast. Built with
//! ratatui and reqwest.
//!
//! ## Architecture
//!
//! - **App**: terminal lifecycle and the dispatcher that runs remote work
//! - **UI**: layout, widgets and display formatting
//! - **API**: news aggregator and prediction service clients
//! - **State**: centralized store with news, wizard and market state
//! - **Events**: input handling
//! - **Config**: layered file and environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod state;
pub mod ui;

pub use app::{App, Dispatcher};
pub use config::Config;
pub use error::{Error, Result};
