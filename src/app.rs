//! Main application module.
//!
//! This module contains the [`Dispatcher`], which applies actions to the
//! store and runs the remote work they request, and the [`App`] that wires
//! it to the terminal.

use crate::api::{NewsSource, PredictionService};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{EventConfig, EventHandler};
use crate::state::{Action, Effect, Notification, Store};
use crate::ui::Ui;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Applies actions to the store and performs the effects they yield.
///
/// Remote calls run on spawned tasks and report back through the action
/// channel, so the UI keeps drawing while a request is in flight.
pub struct Dispatcher {
    store: Store,
    news: Arc<dyn NewsSource>,
    predictor: Arc<dyn PredictionService>,
}

impl Dispatcher {
    /// Create a dispatcher whose tasks report on `action_tx`.
    pub fn new(
        news: Arc<dyn NewsSource>,
        predictor: Arc<dyn PredictionService>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            store: Store::new(action_tx),
            news,
            predictor,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Kick off the startup health check and the first news page.
    pub fn bootstrap(&mut self) -> Vec<JoinHandle<()>> {
        [Action::CheckHealth, Action::RefreshNews]
            .into_iter()
            .filter_map(|action| self.handle(action))
            .collect()
    }

    /// Reduce `action`; if it asks for remote work, start it.
    pub fn handle(&mut self, action: Action) -> Option<JoinHandle<()>> {
        let effect = self.store.reduce(action)?;
        Some(self.spawn(effect))
    }

    fn spawn(&self, effect: Effect) -> JoinHandle<()> {
        let tx = self.store.sender();
        match effect {
            Effect::FetchNews { token, mode } => {
                let news = Arc::clone(&self.news);
                tokio::spawn(async move {
                    tracing::debug!(?token, ?mode, "fetching news page");
                    match news.fetch_page(token).await {
                        Ok(page) => send(&tx, Action::NewsPageLoaded { page, mode }),
                        Err(e) => {
                            // Retrying cannot help; say why instead of only showing the banner.
                            if !e.is_recoverable() {
                                let notice = Notification::error(e.user_message());
                                send(&tx, Action::ShowNotification(notice));
                            }
                            send(&tx, Action::NewsLoadFailed(e.to_string()));
                        }
                    }
                })
            }
            Effect::CheckHealth => {
                let predictor = Arc::clone(&self.predictor);
                tokio::spawn(async move {
                    let report = predictor.health().await.map_err(|e| e.to_string());
                    send(&tx, Action::HealthChecked(report));
                })
            }
            Effect::Predict(timeframe) => {
                let predictor = Arc::clone(&self.predictor);
                tokio::spawn(async move {
                    let outcome = predictor.predict(timeframe).await.map_err(|e| {
                        tracing::error!(error = %e, "prediction request failed");
                        e.user_message()
                    });
                    send(&tx, Action::PredictionCompleted(outcome));
                })
            }
        }
    }
}

fn send(tx: &mpsc::UnboundedSender<Action>, action: Action) {
    if tx.send(action).is_err() {
        tracing::debug!("action channel closed; dropping result");
    }
}

/// The main application.
pub struct App {
    /// Terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// State plus remote work.
    dispatcher: Dispatcher,
    /// Renderer.
    ui: Ui,
    /// Event handler.
    event_handler: EventHandler,
    /// Action receiver.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Whether mouse capture was enabled and must be undone.
    mouse_capture: bool,
}

impl App {
    /// Create a new application.
    pub fn new(
        config: Config,
        news: Arc<dyn NewsSource>,
        predictor: Arc<dyn PredictionService>,
    ) -> Result<Self> {
        let event_config = EventConfig::from(&config.ui);
        let mouse_capture = event_config.mouse_capture;

        // Set up terminal
        let terminal = setup_terminal(mouse_capture)
            .map_err(|e| Error::terminal(format!("failed to set up terminal: {e}")))?;

        // Create action channel
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            dispatcher: Dispatcher::new(news, predictor, action_tx),
            ui: Ui::new(&config.ui),
            event_handler: EventHandler::new(config.keybindings, event_config),
            action_rx,
            mouse_capture,
        })
    }

    /// Run the application event loop.
    pub async fn run(&mut self) -> Result<()> {
        self.dispatcher.bootstrap();

        // Main event loop
        loop {
            self.dispatcher.store_mut().app.expire_notification();

            // Update event handler with current state
            self.event_handler
                .update_store_snapshot(self.dispatcher.store());

            // Render UI
            let (ui, store) = (&self.ui, self.dispatcher.store());
            self.terminal.draw(|frame| ui.render(frame, store))?;

            // Handle events and actions
            tokio::select! {
                // Handle terminal events
                result = self.event_handler.next() => {
                    if let Some(action) = result? {
                        self.dispatcher.handle(action);
                    }
                }

                // Handle actions from the channel
                Some(action) = self.action_rx.recv() => {
                    self.dispatcher.handle(action);
                }
            }

            // Check if we should quit
            if self.dispatcher.store().app.should_quit {
                tracing::info!("quitting");
                break;
            }
        }

        Ok(())
    }
}

fn setup_terminal(mouse_capture: bool) -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse_capture {
        execute!(stdout, EnableMouseCapture)?;
    }
    Terminal::new(CrosstermBackend::new(stdout))
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        if self.mouse_capture {
            let _ = execute!(self.terminal.backend_mut(), DisableMouseCapture);
        }
        let _ = self.terminal.show_cursor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockNewsSource, MockPredictionService, NewsPage, PageToken};
    use crate::state::{
        HealthReport, HealthStatus, NEWS_ERROR_MESSAGE, NewsItem, PredictionResult,
        Timeframe, View, WizardStep,
    };
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn item(id: &str) -> NewsItem {
        NewsItem {
            id: id.to_string(),
            title: format!("Headline {id}"),
            link: format!("https://news.example/{id}"),
            description: String::new(),
            published_at: "2024-05-01T12:00:00Z".to_string(),
            image_url: None,
            categories: vec![],
        }
    }

    fn healthy() -> HealthReport {
        HealthReport {
            status: "healthy".into(),
            models_loaded: true,
            available_timeframes: vec!["1d".into(), "1w".into(), "1m".into(), "3m".into()],
        }
    }

    /// Drive one action and feed its result back into the store.
    async fn round_trip(
        dispatcher: &mut Dispatcher,
        rx: &mut mpsc::UnboundedReceiver<Action>,
        action: Action,
    ) {
        let handle = dispatcher.handle(action).expect("action should start work");
        handle.await.expect("task panicked");
        let result = rx.recv().await.expect("task reported");
        assert!(dispatcher.handle(result).is_none());
    }

    #[tokio::test]
    async fn test_prediction_calls_service_once_with_timeframe() {
        let news = MockNewsSource::new();
        let mut predictor = MockPredictionService::new();
        predictor.expect_health().times(1).returning(|| Ok(healthy()));
        predictor
            .expect_predict()
            .with(eq(Timeframe::OneMonth))
            .times(1)
            .returning(|_| {
                Ok(PredictionResult {
                    predicted_price: dec!(45000.5),
                    current_price: dec!(44000),
                    confidence: dec!(0.82),
                    timeframe: "1m".into(),
                    status: "success".into(),
                    message: String::new(),
                })
            });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher = Dispatcher::new(Arc::new(news), Arc::new(predictor), tx);

        round_trip(&mut dispatcher, &mut rx, Action::CheckHealth).await;
        assert_eq!(dispatcher.store().wizard.health, HealthStatus::Ready);

        dispatcher.handle(Action::StartPrediction);
        dispatcher.handle(Action::SelectCoin(crate::state::Coin::Bitcoin));
        round_trip(
            &mut dispatcher,
            &mut rx,
            Action::SelectTimeframe(Timeframe::OneMonth),
        )
        .await;

        let result = dispatcher.store().wizard.result().expect("result shown");
        assert_eq!(result.predicted_price, dec!(45000.5));
        assert!(matches!(
            dispatcher.store().wizard.step(),
            WizardStep::Results { .. }
        ));
    }

    #[tokio::test]
    async fn test_prediction_failure_shows_server_detail() {
        let news = MockNewsSource::new();
        let mut predictor = MockPredictionService::new();
        predictor.expect_health().returning(|| Ok(healthy()));
        predictor
            .expect_predict()
            .times(1)
            .returning(|_| Err(Error::remote(503, "Models not loaded")));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher = Dispatcher::new(Arc::new(news), Arc::new(predictor), tx);
        round_trip(&mut dispatcher, &mut rx, Action::CheckHealth).await;

        dispatcher.handle(Action::StartPrediction);
        dispatcher.handle(Action::SelectCoin(crate::state::Coin::Solana));
        round_trip(
            &mut dispatcher,
            &mut rx,
            Action::SelectTimeframe(Timeframe::OneDay),
        )
        .await;

        assert_eq!(dispatcher.store().wizard.error(), Some("Models not loaded"));
    }

    #[tokio::test]
    async fn test_retry_after_error_fetches_first_page_once() {
        let mut news = MockNewsSource::new();
        let mut calls = 0;
        news.expect_fetch_page()
            .with(eq(None::<PageToken>))
            .times(2)
            .returning(move |_| {
                calls += 1;
                if calls == 1 {
                    Err(Error::network("connection reset"))
                } else {
                    Ok(NewsPage {
                        items: vec![item("1"), item("2")],
                        next: Some(PageToken::new("2")),
                    })
                }
            });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher =
            Dispatcher::new(Arc::new(news), Arc::new(MockPredictionService::new()), tx);

        round_trip(&mut dispatcher, &mut rx, Action::RefreshNews).await;
        assert_eq!(
            dispatcher.store().news.error.as_deref(),
            Some(NEWS_ERROR_MESSAGE)
        );

        round_trip(&mut dispatcher, &mut rx, Action::RefreshNews).await;
        let news = &dispatcher.store().news;
        assert_eq!(news.items.len(), 2);
        assert!(news.error.is_none());
        assert!(news.can_load_more());
    }

    #[tokio::test]
    async fn test_load_more_appends_next_page() {
        let mut news = MockNewsSource::new();
        news.expect_fetch_page()
            .with(eq(None::<PageToken>))
            .times(1)
            .returning(|_| {
                Ok(NewsPage {
                    items: vec![item("1")],
                    next: Some(PageToken::new("2")),
                })
            });
        news.expect_fetch_page()
            .with(eq(Some(PageToken::new("2"))))
            .times(1)
            .returning(|_| {
                Ok(NewsPage {
                    items: vec![item("2")],
                    next: None,
                })
            });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher =
            Dispatcher::new(Arc::new(news), Arc::new(MockPredictionService::new()), tx);
        dispatcher.store_mut().app.current_view = View::News;

        round_trip(&mut dispatcher, &mut rx, Action::RefreshNews).await;
        round_trip(&mut dispatcher, &mut rx, Action::LoadMoreNews).await;

        let ids: Vec<&str> = dispatcher
            .store()
            .news
            .items
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(!dispatcher.store().news.can_load_more());
        // End of feed: nothing to start
        assert!(dispatcher.handle(Action::LoadMoreNews).is_none());
    }

    #[tokio::test]
    async fn test_missing_token_raises_error_notification() {
        let mut news = MockNewsSource::new();
        news.expect_fetch_page()
            .times(1)
            .returning(|_| Err(Error::config("news auth token is not configured")));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher =
            Dispatcher::new(Arc::new(news), Arc::new(MockPredictionService::new()), tx);
        dispatcher
            .handle(Action::RefreshNews)
            .expect("fetch started")
            .await
            .expect("task panicked");
        while let Ok(action) = rx.try_recv() {
            dispatcher.handle(action);
        }

        let store = dispatcher.store();
        assert_eq!(store.news.error.as_deref(), Some(NEWS_ERROR_MESSAGE));
        let notification = store.app.notification.as_ref().expect("notification shown");
        assert_eq!(notification.level, crate::state::NotificationLevel::Error);
        assert!(notification.message.contains("auth token"));
    }

    #[tokio::test]
    async fn test_network_failure_shows_banner_only() {
        let mut news = MockNewsSource::new();
        news.expect_fetch_page()
            .times(1)
            .returning(|_| Err(Error::network("connection reset")));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher =
            Dispatcher::new(Arc::new(news), Arc::new(MockPredictionService::new()), tx);
        round_trip(&mut dispatcher, &mut rx, Action::RefreshNews).await;

        assert!(dispatcher.store().news.error.is_some());
        assert!(dispatcher.store().app.notification.is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_starts_health_and_news() {
        let mut news = MockNewsSource::new();
        news.expect_fetch_page()
            .times(1)
            .returning(|_| Ok(NewsPage::default()));
        let mut predictor = MockPredictionService::new();
        predictor
            .expect_health()
            .times(1)
            .returning(|| Err(Error::network("connection refused")));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher = Dispatcher::new(Arc::new(news), Arc::new(predictor), tx);
        let handles = dispatcher.bootstrap();
        assert_eq!(handles.len(), 2);
        for handle in handles {
            handle.await.expect("task panicked");
        }
        while let Ok(action) = rx.try_recv() {
            dispatcher.handle(action);
        }

        assert!(matches!(
            dispatcher.store().wizard.health,
            HealthStatus::Unreachable(_)
        ));
        assert!(!dispatcher.store().news.loading);
    }
}
