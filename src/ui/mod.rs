//! UI rendering using ratatui.
//!
//! This module contains all TUI components and rendering logic.

pub mod format;
mod layout;
mod widgets;

pub use layout::Layout;
pub use widgets::{
    HelpPanel, HomePanel, MarketList, NewsList, PredictionPanel, StatusBar, TabBar,
};

use crate::config::UiConfig;
use crate::state::{Store, View};
use ratatui::Frame;

/// Main UI renderer.
#[derive(Debug, Clone, Copy)]
pub struct Ui {
    show_status_bar: bool,
}

impl Ui {
    pub fn new(config: &UiConfig) -> Self {
        Self {
            show_status_bar: config.show_status_bar,
        }
    }

    /// Render the entire UI.
    pub fn render(&self, frame: &mut Frame, store: &Store) {
        let layout = Layout::new(frame.area(), self.show_status_bar);

        if self.show_status_bar {
            StatusBar::render(frame, layout.status_area, store);
        }
        TabBar::render(frame, layout.tab_area, store);

        match store.app.current_view {
            View::Home => HomePanel::render(frame, layout.main_area, store),
            View::News => NewsList::render(frame, layout.main_area, store),
            View::Predictions => PredictionPanel::render(frame, layout.main_area, store),
            View::Markets => MarketList::render(frame, layout.main_area, store),
        }

        if store.app.show_help {
            HelpPanel::render(frame, frame.area());
        }

        if let Some(notification) = &store.app.notification {
            widgets::render_notification(frame, layout.notification_area, notification);
        }
    }
}
