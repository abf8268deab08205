use super::{hint, label_style, panel, sentiment_color};
use crate::analytics::{recent_activity, Analytics, SentimentBar};
use crate::api::{Feedback, Post, ReplyRecord};
use crate::parser::format_datetime;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, area: Rect, posts: &[Post], replies: &[ReplyRecord]) {
    let analytics = Analytics::compute(posts, replies);

    let block = panel("Engagement Analytics", false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(2),
        ])
        .split(inner);

    render_stats(frame, chunks[0], &analytics);
    render_sentiment(frame, chunks[1], &analytics.sentiment);
    render_activity(frame, chunks[2], posts, replies);
}

fn render_stats(frame: &mut Frame, area: Rect, analytics: &Analytics) {
    let cards = [
        ("Total Tweets", analytics.total_posts.to_string()),
        ("Total Replies", analytics.total_replies.to_string()),
        ("Avg Response Time", analytics.avg_response_display()),
        ("Satisfaction Rate", analytics.satisfaction_display()),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((title, value), column) in cards.iter().zip(columns.iter()) {
        let text = vec![
            Line::styled(*title, Style::default().fg(Color::DarkGray)),
            Line::styled(
                value.as_str(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), *column);
    }
}

/// Cell widths for each bar segment, never wider than `width` in total.
pub fn segment_widths(bars: &[SentimentBar], width: u16) -> Vec<u16> {
    let mut remaining = width;
    bars.iter()
        .map(|bar| {
            if bar.count == 0 {
                return 0;
            }
            let cells = ((bar.percent / 100.0) * f64::from(width)).round() as u16;
            let cells = cells.max(1).min(remaining);
            remaining -= cells;
            cells
        })
        .collect()
}

fn render_sentiment(frame: &mut Frame, area: Rect, bars: &[SentimentBar]) {
    let widths = segment_widths(bars, area.width);
    let spans: Vec<Span> = bars
        .iter()
        .zip(widths)
        .filter(|(_, cells)| *cells > 0)
        .map(|(bar, cells)| {
            let cells = usize::from(cells);
            Span::styled(
                format!("{:^cells$.cells$}", bar.count.to_string()),
                Style::default()
                    .fg(Color::Black)
                    .bg(sentiment_color(bar.sentiment)),
            )
        })
        .collect();

    let legend: Vec<Span> = bars
        .iter()
        .flat_map(|bar| {
            [
                Span::styled("■ ", Style::default().fg(sentiment_color(bar.sentiment))),
                Span::raw(format!("{}  ", bar.sentiment.label())),
            ]
        })
        .collect();

    let text = vec![
        Line::styled("Sentiment Distribution", label_style()),
        Line::from(spans),
        Line::from(legend),
    ];
    frame.render_widget(Paragraph::new(text), area);
}

fn render_activity(frame: &mut Frame, area: Rect, posts: &[Post], replies: &[ReplyRecord]) {
    let mut items = vec![ListItem::new(Line::styled("Recent Activity", label_style()))];

    let activity = recent_activity(posts, replies);
    if activity.is_empty() {
        items.push(ListItem::new(hint("No recent activity")));
    }

    for (reply, post) in activity {
        let who = post.map(|p| p.username.as_str()).unwrap_or("Unknown user");
        let mut spans = vec![
            Span::styled(
                format!("{} ", format_datetime(&reply.timestamp)),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("→ {} ", who), Style::default().fg(Color::Cyan)),
            Span::raw(reply.text.as_str()),
        ];
        if let Some(feedback) = reply.feedback {
            let color = match feedback {
                Feedback::Positive => Color::Green,
                Feedback::Negative => Color::Red,
            };
            spans.push(Span::styled(
                format!("  [{}]", feedback.label()),
                Style::default().fg(color),
            ));
        }
        items.push(ListItem::new(Line::from(spans)));
    }

    frame.render_widget(List::new(items), area);
}
