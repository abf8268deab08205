use super::panel;
use crate::api::{Post, ReplyRecord};
use crate::parser::format_datetime;
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

/// The post a reply belongs to, as (text, username) for the history table.
pub fn reply_origin<'a>(posts: &'a [Post], reply: &ReplyRecord) -> (&'a str, &'a str) {
    match posts.iter().find(|p| p.id == reply.tweet_id) {
        Some(post) => (post.text.as_str(), post.username.as_str()),
        None => ("Unknown tweet", "Unknown user"),
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    posts: &[Post],
    replies: &[ReplyRecord],
    offset: usize,
) {
    let block = panel("Reply History", true);

    if replies.is_empty() {
        frame.render_widget(
            Paragraph::new("No reply history available")
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let header = Row::new(["Tweet", "Reply", "Timestamp", "Type"]).style(
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = replies
        .iter()
        .map(|reply| {
            let (text, username) = reply_origin(posts, reply);
            let origin = Text::from(vec![
                Line::from(text.to_string()),
                Line::styled(username.to_string(), Style::default().fg(Color::DarkGray)),
            ]);
            let (kind, color) = if reply.auto_generated {
                ("Auto", Color::Green)
            } else {
                ("Manual", Color::Blue)
            };
            Row::new(vec![
                Cell::from(origin),
                Cell::from(reply.text.clone()),
                Cell::from(format_datetime(&reply.timestamp)),
                Cell::from(kind).style(Style::default().fg(color)),
            ])
            .height(2)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(40),
            Constraint::Length(17),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default();
    state.select(Some(offset.min(replies.len() - 1)));
    frame.render_stateful_widget(table, area, &mut state);
}
