//! Event handler for processing input events.

use super::{EventConfig, InputEvent};
use crate::config::KeyBindings;
use crate::error::Result;
use crate::state::{Action, Store, View};
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
};

/// Handles input events and produces actions.
pub struct EventHandler {
    /// Key bindings.
    keybindings: KeyBindings,
    /// Polling and capture settings.
    config: EventConfig,
    /// Store reference for state-aware handling.
    store_snapshot: Option<StoreSnapshot>,
}

/// Snapshot of relevant store state for event handling.
#[derive(Clone, Copy)]
struct StoreSnapshot {
    current_view: View,
    show_help: bool,
    has_notification: bool,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new(keybindings: KeyBindings, config: EventConfig) -> Self {
        Self {
            keybindings,
            config,
            store_snapshot: None,
        }
    }

    /// Update the store snapshot for state-aware event handling.
    pub fn update_store_snapshot(&mut self, store: &Store) {
        self.store_snapshot = Some(StoreSnapshot {
            current_view: store.app.current_view,
            show_help: store.app.show_help,
            has_notification: store.app.notification.is_some(),
        });
    }

    /// Get the next action from user input.
    ///
    /// Waits at most one tick; `Ok(None)` means nothing actionable arrived.
    pub async fn next(&mut self) -> Result<Option<Action>> {
        if event::poll(self.config.tick_rate)? {
            match event::read()? {
                CrosstermEvent::Key(key) => return Ok(self.handle_key(key)),
                CrosstermEvent::Mouse(mouse) if self.config.mouse_capture => {
                    return Ok(self.handle_mouse(mouse));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    /// Handle a key event and return an optional action.
    fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        // Only process key press events
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let snapshot = self.store_snapshot?;
        let input = InputEvent::from(key);

        // Ctrl+C always quits
        if input.matches("Ctrl+c") || input.matches(&self.keybindings.quit) {
            return Some(Action::Quit);
        }

        if input.matches(&self.keybindings.help) {
            return Some(Action::ToggleHelp);
        }

        // The help overlay swallows everything but its own close keys
        if snapshot.show_help {
            return input
                .matches(&self.keybindings.back)
                .then_some(Action::ToggleHelp);
        }

        // View switching
        for (binding, view) in [
            (&self.keybindings.home, View::Home),
            (&self.keybindings.news, View::News),
            (&self.keybindings.predictions, View::Predictions),
            (&self.keybindings.markets, View::Markets),
        ] {
            if input.matches(binding) {
                return Some(Action::SetView(view));
            }
        }
        if key.code == KeyCode::Tab {
            return Some(Action::SetView(next_view(snapshot.current_view)));
        }

        // Navigation
        if input.matches(&self.keybindings.up) || key.code == KeyCode::Up {
            return Some(Action::ScrollUp);
        }
        if input.matches(&self.keybindings.down) || key.code == KeyCode::Down {
            return Some(Action::ScrollDown);
        }
        match key.code {
            KeyCode::PageUp => return Some(Action::PageUp),
            KeyCode::PageDown => return Some(Action::PageDown),
            KeyCode::Home => return Some(Action::GoToTop),
            KeyCode::End => return Some(Action::GoToBottom),
            _ => {}
        }

        // View-specific actions
        let action = match snapshot.current_view {
            View::Home => self.handle_home_view(&input),
            View::News => self.handle_news_view(&input),
            View::Predictions => self.handle_predictions_view(&input),
            View::Markets => None,
        };

        action.or_else(|| {
            (snapshot.has_notification && input.matches(&self.keybindings.back))
                .then_some(Action::DismissNotification)
        })
    }

    /// Handle a mouse event and return an optional action.
    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }

    fn handle_home_view(&self, input: &InputEvent) -> Option<Action> {
        input
            .matches(&self.keybindings.select)
            .then_some(Action::SetView(View::Predictions))
    }

    fn handle_news_view(&self, input: &InputEvent) -> Option<Action> {
        if input.matches(&self.keybindings.refresh) {
            return Some(Action::RefreshNews);
        }
        if input.matches(&self.keybindings.load_more) {
            return Some(Action::LoadMoreNews);
        }
        None
    }

    fn handle_predictions_view(&self, input: &InputEvent) -> Option<Action> {
        if input.matches(&self.keybindings.select) {
            return Some(Action::WizardConfirm);
        }
        if input.matches(&self.keybindings.refresh) {
            return Some(Action::CheckHealth);
        }
        if input.matches(&self.keybindings.back) {
            return Some(Action::ResetWizard);
        }
        None
    }
}

fn next_view(current: View) -> View {
    let index = View::ALL.iter().position(|v| *v == current).unwrap_or(0);
    View::ALL[(index + 1) % View::ALL.len()]
}
