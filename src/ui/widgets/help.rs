//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::layout::centered_rect;

/// Help panel showing keybindings.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 80, area);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let sections: [(&str, &[(&str, &str)]); 4] = [
            (
                "Navigation",
                &[
                    ("  j/↓  ", "Move down"),
                    ("  k/↑  ", "Move up"),
                    ("  Home ", "Go to top"),
                    ("  End  ", "Go to bottom"),
                    ("  Enter", " Select/confirm"),
                    ("  ?    ", "Toggle help"),
                    ("  q    ", "Quit"),
                ],
            ),
            (
                "Views",
                &[
                    ("  1    ", "Home"),
                    ("  2    ", "News"),
                    ("  3    ", "Predictions"),
                    ("  4    ", "Markets"),
                ],
            ),
            (
                "News",
                &[
                    ("  m    ", "Load more news"),
                    ("  r    ", "Reload from the first page"),
                ],
            ),
            (
                "Predictions",
                &[
                    ("  Enter", " Predict / choose option"),
                    ("  r    ", "Retry connection"),
                    ("  Esc  ", "Make another prediction"),
                ],
            ),
        ];

        let mut help_text = Vec::new();
        for (title, bindings) in sections {
            if !help_text.is_empty() {
                help_text.push(Line::from(""));
            }
            help_text.push(Line::from(vec![Span::styled(
                title,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]));
            help_text.push(Line::from(""));
            for (key, description) in bindings {
                help_text.push(Line::from(vec![
                    Span::styled(*key, Style::default().fg(Color::Cyan)),
                    Span::raw(*description),
                ]));
            }
        }

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(help, popup_area);
    }
}
