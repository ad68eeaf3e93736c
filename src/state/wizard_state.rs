//! Prediction wizard state machine.
//!
//! The flow is strictly linear:
//! `Intro -> CoinSelection -> TimeframeSelection -> Requesting -> Results`,
//! with `reset` returning to `Intro`. Each step carries exactly the
//! selections made so far.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when the health check cannot reach the service.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "Prediction service is not available. Please ensure the backend server is running.";

/// Fallback when a failed request carries no message.
pub const PREDICTION_FAILED_MESSAGE: &str = "Prediction failed";

/// Assets offered by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coin {
    Bitcoin,
    Ethereum,
    Solana,
    Xrp,
}

impl Coin {
    pub const ALL: [Coin; 4] = [Coin::Bitcoin, Coin::Ethereum, Coin::Solana, Coin::Xrp];

    /// Ticker symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Bitcoin => "BTC",
            Self::Ethereum => "ETH",
            Self::Solana => "SOL",
            Self::Xrp => "XRP",
        }
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bitcoin => write!(f, "Bitcoin"),
            Self::Ethereum => write!(f, "Ethereum"),
            Self::Solana => write!(f, "Solana"),
            Self::Xrp => write!(f, "XRP"),
        }
    }
}

/// Forecast horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    OneDay,
    OneWeek,
    OneMonth,
    ThreeMonths,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::OneDay,
        Timeframe::OneWeek,
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
    ];

    /// Code understood by the prediction service.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::OneWeek => "1w",
            Self::OneMonth => "1m",
            Self::ThreeMonths => "3m",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tf| tf.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OneDay => "1 day",
            Self::OneWeek => "1 week",
            Self::OneMonth => "1 month",
            Self::ThreeMonths => "3 months",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Response of the service's health endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub status: String,
    pub models_loaded: bool,
    pub available_timeframes: Vec<String>,
}

/// What the last health check found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HealthStatus {
    /// No answer yet.
    #[default]
    Checking,
    /// Reachable with models loaded.
    Ready,
    /// Reachable but unable to serve forecasts.
    ModelsNotLoaded,
    /// The check failed.
    Unreachable(String),
}

impl HealthStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// A successful forecast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionResult {
    pub predicted_price: Decimal,
    pub current_price: Decimal,
    /// In `[0, 1]`.
    pub confidence: Decimal,
    pub timeframe: String,
    pub status: String,
    pub message: String,
}

/// Outcome of a completed request attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionOutcome {
    Success(PredictionResult),
    Failure(String),
}

/// The wizard's current step and the selections it carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WizardStep {
    #[default]
    Intro,
    CoinSelection,
    TimeframeSelection {
        coin: Coin,
    },
    Requesting {
        coin: Coin,
        timeframe: Timeframe,
    },
    Results {
        coin: Coin,
        timeframe: Timeframe,
        outcome: PredictionOutcome,
    },
}

impl WizardStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::CoinSelection => "coin-selection",
            Self::TimeframeSelection { .. } => "timeframe-selection",
            Self::Requesting { .. } => "requesting",
            Self::Results { .. } => "results",
        }
    }
}

/// A refused transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("prediction service is not ready")]
    ServiceNotReady,
    #[error("a prediction request is already in flight")]
    RequestInFlight,
    #[error("cannot {action} during {step}")]
    WrongStep {
        action: &'static str,
        step: &'static str,
    },
}

/// Wizard session state.
#[derive(Debug, Default)]
pub struct WizardState {
    step: WizardStep,
    /// Result of the last health check.
    pub health: HealthStatus,
    /// Highlighted entry in the current selection list.
    pub cursor: usize,
    health_check_in_flight: bool,
}

impl WizardState {
    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    /// `Intro -> CoinSelection`. Refused unless the service reported ready.
    pub fn start(&mut self) -> Result<(), WizardError> {
        self.expect_step(matches!(self.step, WizardStep::Intro), "start")?;
        if !self.health.is_ready() {
            return Err(WizardError::ServiceNotReady);
        }
        self.step = WizardStep::CoinSelection;
        self.cursor = 0;
        Ok(())
    }

    /// `CoinSelection -> TimeframeSelection`.
    pub fn select_coin(&mut self, coin: Coin) -> Result<(), WizardError> {
        self.expect_step(
            matches!(self.step, WizardStep::CoinSelection),
            "select an asset",
        )?;
        self.step = WizardStep::TimeframeSelection { coin };
        self.cursor = 0;
        Ok(())
    }

    /// `TimeframeSelection -> Requesting`.
    ///
    /// On success the caller must issue exactly one request for the returned
    /// timeframe and report back through [`WizardState::complete`].
    pub fn begin_request(&mut self, timeframe: Timeframe) -> Result<Timeframe, WizardError> {
        match self.step {
            WizardStep::TimeframeSelection { coin } => {
                self.step = WizardStep::Requesting { coin, timeframe };
                Ok(timeframe)
            }
            WizardStep::Requesting { .. } => Err(WizardError::RequestInFlight),
            _ => Err(self.wrong_step("select a timeframe")),
        }
    }

    /// `Requesting -> Results`, for success and failure alike.
    pub fn complete(&mut self, outcome: Result<PredictionResult, String>) -> Result<(), WizardError> {
        let WizardStep::Requesting { coin, timeframe } = self.step else {
            return Err(self.wrong_step("complete a request"));
        };

        let outcome = match outcome {
            Ok(result) => PredictionOutcome::Success(result),
            Err(msg) if msg.is_empty() => {
                PredictionOutcome::Failure(PREDICTION_FAILED_MESSAGE.to_string())
            }
            Err(msg) => PredictionOutcome::Failure(msg),
        };

        self.step = WizardStep::Results {
            coin,
            timeframe,
            outcome,
        };
        self.cursor = 0;
        Ok(())
    }

    /// Back to `Intro`, clearing every selection, result and error.
    ///
    /// Refused only while a request is in flight; it always resolves first.
    pub fn reset(&mut self) -> Result<(), WizardError> {
        if self.is_requesting() {
            return Err(WizardError::RequestInFlight);
        }
        self.step = WizardStep::Intro;
        self.cursor = 0;
        Ok(())
    }

    /// Mark a health check as started.
    ///
    /// Returns `false` while an earlier check is still running, so a stale
    /// reply can never land after a newer one.
    pub fn begin_health_check(&mut self) -> bool {
        if self.health_check_in_flight {
            return false;
        }
        self.health_check_in_flight = true;
        self.health = HealthStatus::Checking;
        true
    }

    /// Record a health check outcome. Only gates `start`.
    pub fn health_checked(&mut self, report: Result<HealthReport, String>) {
        self.health_check_in_flight = false;
        self.health = match report {
            Ok(report) if report.models_loaded => HealthStatus::Ready,
            Ok(_) => HealthStatus::ModelsNotLoaded,
            Err(msg) => {
                tracing::warn!(error = %msg, "prediction service health check failed");
                HealthStatus::Unreachable(SERVICE_UNAVAILABLE_MESSAGE.to_string())
            }
        };
    }

    pub fn selected_coin(&self) -> Option<Coin> {
        match &self.step {
            WizardStep::TimeframeSelection { coin }
            | WizardStep::Requesting { coin, .. }
            | WizardStep::Results { coin, .. } => Some(*coin),
            _ => None,
        }
    }

    pub fn selected_timeframe(&self) -> Option<Timeframe> {
        match &self.step {
            WizardStep::Requesting { timeframe, .. } | WizardStep::Results { timeframe, .. } => {
                Some(*timeframe)
            }
            _ => None,
        }
    }

    pub fn is_requesting(&self) -> bool {
        matches!(self.step, WizardStep::Requesting { .. })
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match &self.step {
            WizardStep::Results {
                outcome: PredictionOutcome::Success(result),
                ..
            } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.step {
            WizardStep::Results {
                outcome: PredictionOutcome::Failure(msg),
                ..
            } => Some(msg),
            _ => None,
        }
    }

    /// Number of entries in the current selection list.
    pub fn option_count(&self) -> usize {
        match self.step {
            WizardStep::CoinSelection => Coin::ALL.len(),
            WizardStep::TimeframeSelection { .. } => Timeframe::ALL.len(),
            _ => 0,
        }
    }

    /// Move the highlight within the current selection list.
    pub fn move_cursor(&mut self, delta: i32) {
        let max = self.option_count().saturating_sub(1) as i32;
        self.cursor = (self.cursor as i32 + delta).clamp(0, max.max(0)) as usize;
    }

    fn expect_step(&self, ok: bool, action: &'static str) -> Result<(), WizardError> {
        if ok { Ok(()) } else { Err(self.wrong_step(action)) }
    }

    fn wrong_step(&self, action: &'static str) -> WizardError {
        WizardError::WrongStep {
            action,
            step: self.step.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn ready() -> WizardState {
        let mut state = WizardState::default();
        state.health_checked(Ok(HealthReport {
            status: "healthy".into(),
            models_loaded: true,
            available_timeframes: vec!["1d".into(), "1w".into(), "1m".into(), "3m".into()],
        }));
        state
    }

    fn sample_result() -> PredictionResult {
        PredictionResult {
            predicted_price: dec!(45000.5),
            current_price: dec!(44000),
            confidence: dec!(0.82),
            timeframe: "1m".into(),
            status: "success".into(),
            message: String::new(),
        }
    }

    #[test]
    fn test_start_refused_until_ready() {
        let mut state = WizardState::default();
        assert_eq!(state.start(), Err(WizardError::ServiceNotReady));

        state.health_checked(Err("connection refused".into()));
        assert_eq!(state.start(), Err(WizardError::ServiceNotReady));
        assert_eq!(
            state.health,
            HealthStatus::Unreachable(SERVICE_UNAVAILABLE_MESSAGE.into())
        );
        assert_eq!(state.step(), &WizardStep::Intro);
    }

    #[test]
    fn test_models_not_loaded_refuses_start() {
        let mut state = WizardState::default();
        state.health_checked(Ok(HealthReport {
            status: "healthy".into(),
            models_loaded: false,
            available_timeframes: vec![],
        }));
        assert_eq!(state.health, HealthStatus::ModelsNotLoaded);
        assert_eq!(state.start(), Err(WizardError::ServiceNotReady));
    }

    #[test]
    fn test_happy_path() {
        let mut state = ready();
        state.start().unwrap();
        assert_eq!(state.step(), &WizardStep::CoinSelection);

        state.select_coin(Coin::Bitcoin).unwrap();
        assert_eq!(state.selected_coin(), Some(Coin::Bitcoin));
        assert_eq!(state.selected_timeframe(), None);

        let tf = state.begin_request(Timeframe::OneMonth).unwrap();
        assert_eq!(tf.code(), "1m");
        assert!(state.is_requesting());

        state.complete(Ok(sample_result())).unwrap();
        assert_eq!(state.result(), Some(&sample_result()));
        assert_eq!(state.error(), None);
        assert_eq!(state.selected_timeframe(), Some(Timeframe::OneMonth));
    }

    #[test]
    fn test_second_request_refused_while_in_flight() {
        let mut state = ready();
        state.start().unwrap();
        state.select_coin(Coin::Solana).unwrap();
        state.begin_request(Timeframe::OneDay).unwrap();

        assert_eq!(
            state.begin_request(Timeframe::OneWeek),
            Err(WizardError::RequestInFlight)
        );
        assert_eq!(state.reset(), Err(WizardError::RequestInFlight));
        assert_eq!(state.selected_timeframe(), Some(Timeframe::OneDay));
    }

    #[test]
    fn test_failure_lands_in_results_then_reset_clears() {
        let mut state = ready();
        state.start().unwrap();
        state.select_coin(Coin::Ethereum).unwrap();
        state.begin_request(Timeframe::ThreeMonths).unwrap();

        state.complete(Err("ML models not loaded.".into())).unwrap();
        assert_eq!(state.step().name(), "results");
        assert_eq!(state.error(), Some("ML models not loaded."));
        assert_eq!(state.result(), None);

        state.reset().unwrap();
        assert_eq!(state.step(), &WizardStep::Intro);
        assert_eq!(state.selected_coin(), None);
        assert_eq!(state.selected_timeframe(), None);
        assert_eq!(state.result(), None);
        assert_eq!(state.error(), None);
        assert!(!state.is_requesting());
    }

    #[test]
    fn test_empty_failure_message_uses_fallback() {
        let mut state = ready();
        state.start().unwrap();
        state.select_coin(Coin::Xrp).unwrap();
        state.begin_request(Timeframe::OneWeek).unwrap();
        state.complete(Err(String::new())).unwrap();
        assert_eq!(state.error(), Some(PREDICTION_FAILED_MESSAGE));
    }

    #[test]
    fn test_out_of_order_transitions_refused() {
        let mut state = ready();
        assert!(matches!(
            state.select_coin(Coin::Bitcoin),
            Err(WizardError::WrongStep { .. })
        ));
        assert!(matches!(
            state.begin_request(Timeframe::OneDay),
            Err(WizardError::WrongStep { .. })
        ));
        assert!(state.complete(Ok(sample_result())).is_err());
        assert_eq!(state.step(), &WizardStep::Intro);
    }

    #[test]
    fn test_timeframe_codes() {
        let codes: Vec<&str> = Timeframe::ALL.iter().map(Timeframe::code).collect();
        assert_eq!(codes, vec!["1d", "1w", "1m", "3m"]);
        assert_eq!(Timeframe::from_code("3m"), Some(Timeframe::ThreeMonths));
        assert_eq!(Timeframe::from_code("1y"), None);
    }

    #[test]
    fn test_cursor_clamped_to_options() {
        let mut state = ready();
        state.move_cursor(3);
        assert_eq!(state.cursor, 0);

        state.start().unwrap();
        state.move_cursor(10);
        assert_eq!(state.cursor, Coin::ALL.len() - 1);
        state.move_cursor(-10);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_health_check_not_restarted_while_running() {
        let mut state = WizardState::default();
        assert!(state.begin_health_check());
        assert!(!state.begin_health_check());
        assert_eq!(state.health, HealthStatus::Checking);

        state.health_checked(Err("connection refused".into()));
        assert!(matches!(state.health, HealthStatus::Unreachable(_)));
        assert!(state.begin_health_check());
    }
}
