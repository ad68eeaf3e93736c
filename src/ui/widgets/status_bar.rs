//! Status bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::{HealthStatus, Store};

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let predictor_status = match &store.wizard.health {
            HealthStatus::Ready => {
                Span::styled("● ML API Connected", Style::default().fg(Color::Green))
            }
            HealthStatus::Checking => {
                Span::styled("◌ Checking ML API", Style::default().fg(Color::Yellow))
            }
            HealthStatus::ModelsNotLoaded => {
                Span::styled("◐ Models loading", Style::default().fg(Color::Yellow))
            }
            HealthStatus::Unreachable(_) => {
                Span::styled("○ ML API Disconnected", Style::default().fg(Color::Red))
            }
        };

        let loading = if store.news.loading || store.wizard.is_requesting() {
            Span::styled(
                " Loading... ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::raw("")
        };

        let updated = match store.news.last_updated {
            Some(at) => Span::styled(
                format!(" · updated {}", at.format("%H:%M UTC")),
                Style::default().fg(Color::Gray),
            ),
            None => Span::raw(""),
        };

        let help_hint = Span::styled(" Press ? for help ", Style::default().fg(Color::Gray));

        let left_content = vec![
            Span::styled(
                " ◎ Coincast ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            predictor_status,
            Span::raw(" | "),
            Span::styled(
                format!("{} articles", store.news.items.len()),
                Style::default().fg(Color::White),
            ),
            updated,
            loading,
        ];

        let status_line = Line::from(left_content);

        // Right-align the help hint
        let left_len: usize = status_line.spans.iter().map(|s| s.width()).sum();
        let right_len = help_hint.width();
        let padding = area
            .width
            .saturating_sub(left_len as u16 + right_len as u16);

        let mut full_line = status_line.spans;
        full_line.push(Span::raw(" ".repeat(padding as usize)));
        full_line.push(help_hint);

        let paragraph =
            Paragraph::new(Line::from(full_line)).style(Style::default().bg(Color::DarkGray));

        frame.render_widget(paragraph, area);
    }
}
