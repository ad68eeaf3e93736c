//! Application-level state.

use super::Notification;

/// The current view/screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    News,
    Predictions,
    Markets,
}

impl View {
    pub const ALL: [View; 4] = [View::Home, View::News, View::Predictions, View::Markets];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::News => "News",
            Self::Predictions => "Predictions",
            Self::Markets => "Markets",
        }
    }
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current view.
    pub current_view: View,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Current notification.
    pub notification: Option<Notification>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl AppState {
    /// Drop the notification once its display time has passed.
    pub fn expire_notification(&mut self) {
        if self
            .notification
            .as_ref()
            .is_some_and(Notification::is_expired)
        {
            self.notification = None;
        }
    }
}
