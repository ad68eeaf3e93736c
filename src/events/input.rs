//! Input event types and key mappings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Simplified key representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    Other,
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Tab => Key::Tab,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        }
    }
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        Self {
            ctrl: mods.contains(KeyModifiers::CONTROL),
            alt: mods.contains(KeyModifiers::ALT),
            shift: mods.contains(KeyModifiers::SHIFT),
        }
    }
}

/// A processed input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        Self {
            key: Key::from(event.code),
            modifiers: Modifiers::from(event.modifiers),
        }
    }
}

impl InputEvent {
    /// Create a new input event.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Check if this matches a key binding string (e.g., "Ctrl+q", "Enter").
    ///
    /// Shift is not compared for character keys: the terminal already folds
    /// it into the character (`?`, `Q`).
    pub fn matches(&self, binding: &str) -> bool {
        let mut expected_ctrl = false;
        let mut expected_alt = false;
        let mut expected_shift = false;
        let mut expected_key = "";

        for part in binding.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" => expected_ctrl = true,
                "alt" => expected_alt = true,
                "shift" => expected_shift = true,
                _ => expected_key = part,
            }
        }

        let is_char = matches!(self.key, Key::Char(_));
        if self.modifiers.ctrl != expected_ctrl
            || self.modifiers.alt != expected_alt
            || (!is_char && self.modifiers.shift != expected_shift)
        {
            return false;
        }

        match expected_key.to_lowercase().as_str() {
            "enter" => self.key == Key::Enter,
            "esc" | "escape" => self.key == Key::Escape,
            "backspace" => self.key == Key::Backspace,
            "tab" => self.key == Key::Tab,
            "up" => self.key == Key::Up,
            "down" => self.key == Key::Down,
            "home" => self.key == Key::Home,
            "end" => self.key == Key::End,
            "pageup" => self.key == Key::PageUp,
            "pagedown" => self.key == Key::PageDown,
            s if s.starts_with('f') && s.len() > 1 && s.len() <= 3 => s[1..]
                .parse::<u8>()
                .is_ok_and(|n| self.key == Key::F(n)),
            _ => {
                let mut chars = expected_key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => {
                        self.key == Key::Char(c.to_ascii_lowercase())
                            || self.key == Key::Char(c.to_ascii_uppercase())
                    }
                    _ => false,
                }
            }
        }
    }
}
