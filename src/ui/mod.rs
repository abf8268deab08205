pub mod widgets;

use crate::state::{AppState, Tab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use widgets::{composer, dashboard, history, posts, settings};

pub fn draw(frame: &mut Frame, state: &AppState) {
    let banner_height = if state.banner.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], state);
    render_tabs(frame, chunks[1], state.tab);
    if let Some(banner) = &state.banner {
        let color = if banner.is_error {
            Color::Red
        } else {
            Color::Green
        };
        let paragraph = Paragraph::new(banner.text.as_str())
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        frame.render_widget(paragraph, chunks[2]);
    }

    let body = chunks[3];
    match state.tab {
        Tab::Dashboard => dashboard::render(frame, body, state),
        Tab::Posts => render_posts_tab(frame, body, state),
        Tab::Settings => settings::render(frame, body, &state.form),
        Tab::History => {
            history::render(frame, body, &state.posts, &state.replies, state.history_offset)
        }
    }

    frame.render_widget(
        Paragraph::new(widgets::hint(
            "1-4/Tab switch · a auto-reply · n simulate post · r reload · q quit",
        )),
        chunks[4],
    );
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::styled(
        "ReplyDesk · Twitter Engagement Bot",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    let (health, color) = match &state.health {
        Some(h) if h.is_healthy() => (format!("backend {}", h.api_version), Color::Green),
        Some(h) => (format!("backend {}", h.status), Color::Yellow),
        None => ("backend unreachable".to_string(), Color::DarkGray),
    };
    spans.push(Span::styled(format!("   {}", health), Style::default().fg(color)));

    if state.settings.is_some() {
        let (label, color) = if state.auto_mode {
            ("Enabled", Color::Green)
        } else {
            ("Disabled", Color::DarkGray)
        };
        spans.push(Span::raw("   Auto-Reply: "));
        spans.push(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        if state.auto_mode && !state.auto_reply_active() {
            spans.push(Span::styled(
                " (off in brand settings)",
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, active: Tab) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(active.index())
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_posts_tab(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let sorted = state.posts_newest_first();
    let editing = state.capturing_text();
    posts::render_list(
        frame,
        columns[0],
        &sorted,
        Some(state.post_cursor),
        state.composer.post_id(),
        state.loading,
        !editing,
    );
    composer::render(
        frame,
        columns[1],
        &state.composer,
        state.selected_post(),
        editing,
    );
}
