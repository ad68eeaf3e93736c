//! News feed widget.

use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::state::{NewsItem, Store};
use crate::ui::format::{Badge, category_badge, format_time_ago, truncate};

/// News feed widget: item list, detail pane, error banner and pagination hint.
pub struct NewsList;

impl NewsList {
    /// Render the news view.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let news = &store.news;

        let mut constraints = Vec::new();
        if news.error.is_some() {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(0));
        constraints.push(Constraint::Length(1));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut next_row = 0;
        if let Some(error) = &news.error {
            render_error_banner(frame, rows[0], error);
            next_row = 1;
        }
        let body = rows[next_row];
        let footer = rows[next_row + 1];

        if news.items.is_empty() {
            render_empty(frame, body, news.loading, news.error.is_some());
        } else {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(body);
            render_list(frame, columns[0], store);
            if let Some(item) = news.selected_item() {
                render_detail(frame, columns[1], item);
            }
        }

        render_footer(frame, footer, store);
    }
}

fn render_list(frame: &mut Frame, area: Rect, store: &Store) {
    let now = Utc::now();
    let width = area.width.saturating_sub(26) as usize;

    let items: Vec<ListItem> = store
        .news
        .items
        .iter()
        .map(|item| {
            let badge = category_badge(&item.categories);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<12}", format_time_ago(&item.published_at, now)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("{:<11}", badge.label()), badge_style(badge)),
                Span::raw(truncate(&item.title, width.max(10))),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" The LumiPanel Stream ({}) ", store.news.items.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(store.news.selected_index);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_detail(frame: &mut Frame, area: Rect, item: &NewsItem) {
    let mut lines = vec![
        Line::from(Span::styled(
            item.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if !item.categories.is_empty() {
        lines.push(Line::from(Span::styled(
            item.categories.join(" · "),
            Style::default().fg(Color::Yellow),
        )));
    }
    let published = item
        .published()
        .map(|dt| dt.format("%b %-d, %Y %H:%M UTC").to_string())
        .unwrap_or_else(|| item.published_at.clone());
    lines.push(Line::from(Span::styled(
        published,
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    if !item.description.is_empty() {
        lines.push(Line::from(item.description.clone()));
        lines.push(Line::from(""));
    }
    if !item.link.is_empty() {
        lines.push(Line::from(Span::styled(
            item.link.clone(),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        )));
    }
    if let Some(image) = &item.image_url {
        lines.push(Line::from(Span::styled(
            format!("image: {image}"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let detail = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Article ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(detail, area);
}

fn render_error_banner(frame: &mut Frame, area: Rect, error: &str) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(
            "✗ ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(error.to_string()),
        Span::styled("   [r] Retry", Style::default().fg(Color::Yellow)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(banner, area);
}

fn render_empty(frame: &mut Frame, area: Rect, loading: bool, has_error: bool) {
    let text = if loading {
        Line::from(Span::styled(
            "Loading latest crypto news...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ))
    } else if has_error {
        Line::from("")
    } else {
        Line::from(vec![
            Span::styled(
                "No News Available. ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("Check back later for the latest cryptocurrency news."),
        ])
    };

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .title(" The LumiPanel Stream ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, area: Rect, store: &Store) {
    let hint = if store.news.loading && !store.news.items.is_empty() {
        Span::styled(
            " Loading...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )
    } else if store.news.can_load_more() && !store.news.items.is_empty() {
        Span::styled(" [m] Load More News", Style::default().fg(Color::Cyan))
    } else {
        Span::raw("")
    };
    frame.render_widget(Paragraph::new(Line::from(hint)), area);
}

fn badge_style(badge: Badge) -> Style {
    match badge {
        Badge::Crypto => Style::default().fg(Color::Magenta),
        Badge::Technology => Style::default().fg(Color::Cyan),
        Badge::Business => Style::default().fg(Color::Green),
        Badge::Regulation => Style::default().fg(Color::Red),
    }
}
