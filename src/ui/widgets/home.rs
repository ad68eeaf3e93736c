//! Landing panel.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::state::Store;
use crate::ui::format::truncate;

/// Landing panel with the tagline and a glance at the latest headlines.
pub struct HomePanel;

impl HomePanel {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Your Crypto Compass",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(
                "Navigate the complex world of cryptocurrency with precision and confidence.",
            ),
            Line::from("Our analytics provide clarity in the chaos of digital markets."),
            Line::from(""),
        ];

        let headlines: Vec<&str> = store
            .news
            .items
            .iter()
            .take(5)
            .map(|i| i.title.as_str())
            .collect();
        if !headlines.is_empty() {
            lines.push(Line::from(Span::styled(
                "Latest headlines",
                Style::default().fg(Color::Yellow),
            )));
            let width = area.width.saturating_sub(8) as usize;
            for title in headlines {
                lines.push(Line::from(format!("• {}", truncate(title, width.max(10)))));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            "[2] News   [3] Predictions   [4] Markets",
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" Coincast ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(paragraph, area);
    }
}
