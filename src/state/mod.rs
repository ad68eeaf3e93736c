//! State management for Coincast.
//!
//! This module provides centralized state management with a unidirectional
//! data flow pattern inspired by Redux/Elm architecture. Reducing an action
//! may yield an [`Effect`]: remote work the dispatcher performs before
//! feeding the result back in as another action.

mod app_state;
mod market_state;
mod news_state;
mod wizard_state;

pub use app_state::{AppState, View};
pub use market_state::{ChartSymbol, MarketState, TrackedAsset};
pub use news_state::{LoadMode, NEWS_ERROR_MESSAGE, NewsItem, NewsState};
pub use wizard_state::{
    Coin, HealthReport, HealthStatus, PREDICTION_FAILED_MESSAGE, PredictionOutcome,
    PredictionResult, SERVICE_UNAVAILABLE_MESSAGE, Timeframe, WizardError, WizardState,
    WizardStep,
};

use crate::api::{NewsPage, PageToken};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    SetView(View),

    // News feed
    RefreshNews,
    LoadMoreNews,
    NewsPageLoaded { page: NewsPage, mode: LoadMode },
    NewsLoadFailed(String),

    // Prediction wizard
    CheckHealth,
    HealthChecked(std::result::Result<HealthReport, String>),
    StartPrediction,
    SelectCoin(Coin),
    SelectTimeframe(Timeframe),
    /// Enter on the predictions view: act on the highlighted option.
    WizardConfirm,
    PredictionCompleted(std::result::Result<PredictionResult, String>),
    ResetWizard,

    // UI actions
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    ToggleHelp,
    ShowNotification(Notification),
    DismissNotification,

    // Quit
    Quit,
}

/// Remote work requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the first page (`token: None`) or the page behind a cursor.
    FetchNews {
        token: Option<PageToken>,
        mode: LoadMode,
    },
    CheckHealth,
    Predict(Timeframe),
}

/// A notification to display to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration_secs: u64,
    pub created_at: Instant,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Warning,
    Error,
}

impl Notification {
    fn new(message: impl Into<String>, level: NotificationLevel, duration_secs: u64) -> Self {
        Self {
            message: message.into(),
            level,
            duration_secs,
            created_at: Instant::now(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Warning, 5)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error, 10)
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= Duration::from_secs(self.duration_secs)
    }
}

/// The global state store.
#[derive(Debug)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// News feed state.
    pub news: NewsState,
    /// Prediction wizard state.
    pub wizard: WizardState,
    /// Tracked markets.
    pub markets: MarketState,
    /// Action sender for dispatching actions.
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Store {
    /// Create a new store with the given action sender.
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            app: AppState::default(),
            news: NewsState::default(),
            wizard: WizardState::default(),
            markets: MarketState::default(),
            action_tx,
        }
    }

    /// Sender for actions produced outside the reducer.
    pub fn sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Apply an action to update state, returning any remote work it needs.
    pub fn reduce(&mut self, action: Action) -> Option<Effect> {
        match action {
            // Navigation
            Action::SetView(view) => self.app.current_view = view,

            // News feed
            Action::RefreshNews => {
                if self.news.begin_refresh() {
                    return Some(Effect::FetchNews {
                        token: None,
                        mode: LoadMode::Replace,
                    });
                }
            }
            Action::LoadMoreNews => {
                if let Some(token) = self.news.begin_load_more() {
                    return Some(Effect::FetchNews {
                        token: Some(token),
                        mode: LoadMode::Append,
                    });
                }
            }
            Action::NewsPageLoaded { page, mode } => self.news.page_loaded(page, mode),
            Action::NewsLoadFailed(error) => {
                tracing::error!(%error, "news fetch failed");
                self.news.load_failed();
            }

            // Prediction wizard
            Action::CheckHealth => {
                if self.wizard.begin_health_check() {
                    return Some(Effect::CheckHealth);
                }
            }
            Action::HealthChecked(report) => self.wizard.health_checked(report),
            Action::StartPrediction => {
                if let Err(e) = self.wizard.start() {
                    self.refuse(e);
                }
            }
            Action::SelectCoin(coin) => {
                if let Err(e) = self.wizard.select_coin(coin) {
                    self.refuse(e);
                }
            }
            Action::SelectTimeframe(timeframe) => match self.wizard.begin_request(timeframe) {
                Ok(timeframe) => return Some(Effect::Predict(timeframe)),
                Err(e) => self.refuse(e),
            },
            Action::WizardConfirm => return self.confirm_wizard_option(),
            Action::PredictionCompleted(outcome) => {
                if let Err(e) = self.wizard.complete(outcome) {
                    tracing::warn!(error = %e, "discarding prediction response");
                }
            }
            Action::ResetWizard => {
                if let Err(e) = self.wizard.reset() {
                    self.refuse(e);
                }
            }

            // UI actions
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
            Action::PageUp => self.scroll(-10),
            Action::PageDown => self.scroll(10),
            Action::GoToTop => self.go_to_top(),
            Action::GoToBottom => self.go_to_bottom(),
            Action::ToggleHelp => self.app.show_help = !self.app.show_help,
            Action::ShowNotification(notification) => {
                self.app.notification = Some(notification);
            }
            Action::DismissNotification => {
                self.app.notification = None;
            }

            // Quit
            Action::Quit => {
                self.app.should_quit = true;
            }
        }
        None
    }

    fn confirm_wizard_option(&mut self) -> Option<Effect> {
        let cursor = self.wizard.cursor;
        let action = match self.wizard.step() {
            WizardStep::Intro => Action::StartPrediction,
            WizardStep::CoinSelection => Action::SelectCoin(*Coin::ALL.get(cursor)?),
            WizardStep::TimeframeSelection { .. } => {
                Action::SelectTimeframe(*Timeframe::ALL.get(cursor)?)
            }
            WizardStep::Requesting { .. } => return None,
            WizardStep::Results { .. } => Action::ResetWizard,
        };
        self.reduce(action)
    }

    fn refuse(&mut self, error: WizardError) {
        tracing::debug!(%error, "wizard transition refused");
        let message = match error {
            WizardError::ServiceNotReady => match &self.wizard.health {
                HealthStatus::Unreachable(msg) => msg.clone(),
                HealthStatus::ModelsNotLoaded => {
                    "Prediction models are not loaded yet. Press r to check again.".to_string()
                }
                _ => "Still checking the prediction service...".to_string(),
            },
            other => other.to_string(),
        };
        self.app.notification = Some(Notification::warning(message));
    }

    fn scroll(&mut self, delta: i32) {
        match self.app.current_view {
            View::News => {
                self.news.selected_index =
                    step_index(self.news.selected_index, delta, self.news.items.len());
            }
            View::Markets => {
                self.markets.selected_index =
                    step_index(self.markets.selected_index, delta, self.markets.assets.len());
            }
            View::Predictions => self.wizard.move_cursor(delta),
            View::Home => {}
        }
    }

    fn go_to_top(&mut self) {
        match self.app.current_view {
            View::News if !self.news.items.is_empty() => self.news.selected_index = Some(0),
            View::Markets => self.markets.selected_index = Some(0),
            View::Predictions => self.wizard.cursor = 0,
            _ => {}
        }
    }

    fn go_to_bottom(&mut self) {
        match self.app.current_view {
            View::News if !self.news.items.is_empty() => {
                self.news.selected_index = Some(self.news.items.len() - 1);
            }
            View::Markets => {
                let max = self.markets.assets.len().saturating_sub(1);
                self.markets.selected_index = Some(max);
            }
            View::Predictions => {
                let max = self.wizard.option_count().saturating_sub(1);
                self.wizard.cursor = max;
            }
            _ => {}
        }
    }
}

fn step_index(current: Option<usize>, delta: i32, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current.unwrap_or(0) as i32;
    let new_index = (current + delta).max(0) as usize;
    Some(new_index.min(len - 1))
}
