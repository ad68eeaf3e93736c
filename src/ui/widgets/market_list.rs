//! Tracked markets widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};

use crate::state::Store;

/// Tracked markets table.
pub struct MarketList;

impl MarketList {
    /// Render the markets view.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let rows_area = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(4)])
            .split(area);

        let header_cells = ["Asset", "Ticker", "Chart", "Interval"].iter().map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });
        let header = Row::new(header_cells).height(1).bottom_margin(1);

        let rows = store.markets.assets.iter().map(|asset| {
            Row::new(vec![
                Cell::from(asset.coin.to_string()),
                Cell::from(asset.coin.symbol()),
                Cell::from(asset.chart.to_string()),
                Cell::from(asset.chart.interval.clone()),
            ])
            .height(1)
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Min(24),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title(" Live Markets ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(store.markets.selected_index);
        frame.render_stateful_widget(table, rows_area[0], &mut state);

        let link = store
            .markets
            .selected_asset()
            .map(|asset| asset.chart.chart_url())
            .unwrap_or_default();
        let detail = Paragraph::new(vec![
            Line::from("Real-time charts for the selected asset:"),
            Line::from(link),
        ])
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(detail, rows_area[1]);
    }
}
