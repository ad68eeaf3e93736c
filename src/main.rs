//! Coincast - a terminal crypto compass.
//!
//! Crypto news plus model price forecasts, in the terminal.

use coincast::api::{NewsClient, PredictorClient};
use coincast::{App, Config, Result};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Log to a file: stdout belongs to the TUI
    let log_dir = coincast::config::log_dir()?;
    std::fs::create_dir_all(&log_dir)?;
    let (writer, _guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, "coincast.log"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coincast=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    // Load configuration
    let config = Config::load_or_default()?;
    if config.news.auth_token.is_none() {
        tracing::warn!("no news auth token configured; the feed will show an error");
    }

    let news = Arc::new(NewsClient::new(&config.news)?);
    let predictor = Arc::new(PredictorClient::new(&config.predictor)?);
    tracing::info!(
        news = %news.base_url(),
        predictor = %config.predictor.base_url,
        "starting coincast"
    );

    // Run the application
    let mut app = App::new(config, news, predictor)?;
    app.run().await?;

    Ok(())
}
