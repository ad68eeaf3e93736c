//! Prediction wizard panel.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::state::{
    Coin, HealthStatus, PredictionOutcome, PredictionResult, Store, Timeframe, WizardStep,
};
use crate::ui::format::{format_confidence, format_price, format_timeframe};

/// Renders whichever wizard step is current.
pub struct PredictionPanel;

impl PredictionPanel {
    /// Render the predictions view.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let block = Block::default()
            .title(" The Refraction Chamber ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let wizard = &store.wizard;
        match wizard.step() {
            WizardStep::Intro => render_intro(frame, inner, &wizard.health),
            WizardStep::CoinSelection => {
                let options: Vec<String> = Coin::ALL.iter().map(|c| c.to_string()).collect();
                render_options(
                    frame,
                    inner,
                    "Select a Cryptocurrency",
                    &options,
                    wizard.cursor,
                );
            }
            WizardStep::TimeframeSelection { coin } => {
                let options: Vec<String> = Timeframe::ALL.iter().map(|t| t.to_string()).collect();
                render_options(
                    frame,
                    inner,
                    &format!("Select Timeframe for {coin}"),
                    &options,
                    wizard.cursor,
                );
            }
            WizardStep::Requesting { .. } => render_requesting(frame, inner),
            WizardStep::Results {
                coin,
                timeframe,
                outcome,
            } => render_results(frame, inner, *coin, *timeframe, outcome),
        }
    }
}

fn render_intro(frame: &mut Frame, area: Rect, health: &HealthStatus) {
    let (button, button_style) = if health.is_ready() {
        (
            "[ Enter ] Predict",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("ML API Unavailable", Style::default().fg(Color::DarkGray))
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Explore algorithm-based forecasts for leading cryptocurrencies.",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Our ML models analyze trends and patterns to suggest potential price movements."),
        Line::from(Span::styled(
            "Use insights wisely: predictions are speculative, not financial advice.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(button, button_style)),
    ];

    match health {
        HealthStatus::Unreachable(msg) => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                msg.clone(),
                Style::default().fg(Color::Red),
            )));
            lines.push(Line::from(Span::styled(
                "[r] Retry Connection",
                Style::default().fg(Color::Yellow),
            )));
        }
        HealthStatus::ModelsNotLoaded => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Models are not loaded yet. [r] Check again",
                Style::default().fg(Color::Yellow),
            )));
        }
        _ => {}
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_options(frame: &mut Frame, area: Rect, title: &str, options: &[String], cursor: usize) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        rows[0],
    );

    let items: Vec<ListItem> = options
        .iter()
        .map(|o| ListItem::new(format!("  {o}")))
        .collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(cursor));
    frame.render_stateful_widget(list, rows[1], &mut state);
}

fn render_requesting(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "✦ Analyzing Market Patterns...",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        )),
        Line::from("Processing historical data and market indicators"),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        area,
    );
}

fn render_results(
    frame: &mut Frame,
    area: Rect,
    coin: Coin,
    timeframe: Timeframe,
    outcome: &PredictionOutcome,
) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Prediction Results",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    match outcome {
        PredictionOutcome::Success(result) => {
            lines.extend(result_lines(result, coin, timeframe));
        }
        PredictionOutcome::Failure(error) => {
            lines.push(Line::from(Span::styled(
                "Prediction Failed",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(error.clone()));
            lines.push(Line::from(Span::styled(
                "[r] Retry Connection",
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Enter/Esc] Make Another Prediction",
        Style::default().fg(Color::Cyan),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn result_lines(result: &PredictionResult, coin: Coin, timeframe: Timeframe) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);
    vec![
        Line::from(Span::styled("Predicted Price", label)),
        Line::from(Span::styled(
            format_price(result.predicted_price),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{coin} in {timeframe}")),
        Line::from(""),
        Line::from(Span::styled("Current Price", label)),
        Line::from(Span::styled(
            format_price(result.current_price),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Current {coin} price")),
        Line::from(""),
        Line::from(Span::styled("Confidence Score", label)),
        Line::from(Span::styled(
            format_confidence(result.confidence),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("Model confidence level"),
        Line::from(""),
        Line::from(Span::styled(
            format!("Horizon reported by model: {}", format_timeframe(&result.timeframe)),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Action, HealthReport};
    use ratatui::{Terminal, backend::TestBackend};
    use rust_decimal_macros::dec;
    use tokio::sync::mpsc;

    fn rendered(store: &Store) -> String {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| PredictionPanel::render(frame, frame.area(), store))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_results_show_formatted_values() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut store = Store::new(tx);
        store.reduce(Action::HealthChecked(Ok(HealthReport {
            status: "healthy".into(),
            models_loaded: true,
            available_timeframes: vec![],
        })));
        store.reduce(Action::StartPrediction);
        store.reduce(Action::SelectCoin(Coin::Bitcoin));
        store.reduce(Action::SelectTimeframe(Timeframe::OneMonth));
        store.reduce(Action::PredictionCompleted(Ok(PredictionResult {
            predicted_price: dec!(45000.5),
            current_price: dec!(44000),
            confidence: dec!(0.82),
            timeframe: "1m".into(),
            status: "success".into(),
            message: String::new(),
        })));

        let screen = rendered(&store);
        assert!(screen.contains("$45,000.50"));
        assert!(screen.contains("$44,000.00"));
        assert!(screen.contains("82.0%"));
        assert!(screen.contains("Bitcoin in 1 month"));
        assert!(screen.contains("Horizon reported by model: 1 month"));
    }

    #[test]
    fn test_intro_disabled_when_unreachable() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut store = Store::new(tx);
        store.reduce(Action::HealthChecked(Err("refused".into())));

        let screen = rendered(&store);
        assert!(screen.contains("ML API Unavailable"));
        assert!(screen.contains("Retry Connection"));
    }
}
