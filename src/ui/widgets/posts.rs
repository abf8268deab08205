use super::{panel, sentiment_color, wrap_lines};
use crate::api::Post;
use crate::parser::format_clock;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn thread_label(post: &Post) -> Option<String> {
    match post.thread.len() {
        0 => None,
        1 => Some("1 reply".to_string()),
        n => Some(format!("{} replies", n)),
    }
}

fn post_item<'a>(post: &'a Post, width: u16, selected: bool) -> ListItem<'a> {
    let name_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut header = vec![
        Span::styled(post.username.as_str(), name_style),
        Span::styled(
            format!("  {}", format_clock(&post.timestamp)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", post.sentiment.label()),
            Style::default()
                .fg(Color::Black)
                .bg(sentiment_color(post.sentiment)),
        ),
    ];
    if let Some(label) = thread_label(post) {
        header.push(Span::styled(
            format!("  {}", label),
            Style::default().fg(Color::Blue),
        ));
    }

    let mut lines = vec![Line::from(header)];
    lines.extend(
        wrap_lines(&post.text, width.saturating_sub(2))
            .into_iter()
            .map(Line::from),
    );
    lines.push(Line::from(""));
    ListItem::new(lines)
}

/// Post list, newest first, with the cursor highlighted.
pub fn render_list(
    frame: &mut Frame,
    area: Rect,
    posts: &[&Post],
    cursor: Option<usize>,
    selected_id: Option<&str>,
    loading: bool,
    focused: bool,
) {
    let block = panel("Posts", focused);

    if loading {
        let text = Paragraph::new("Loading posts...")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    if posts.is_empty() {
        let text = Paragraph::new("No tweets available")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let width = block.inner(area).width;
    let items: Vec<ListItem> = posts
        .iter()
        .map(|post| post_item(post, width, selected_id == Some(post.id.as_str())))
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    state.select(cursor.map(|c| c.min(posts.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Sentiment, ThreadEntry};

    #[test]
    fn test_thread_label() {
        let mut post = Post {
            id: "1".to_string(),
            username: "@a".to_string(),
            text: String::new(),
            timestamp: String::new(),
            sentiment: Sentiment::Neutral,
            thread: Vec::new(),
        };
        assert_eq!(thread_label(&post), None);
        post.thread.push(ThreadEntry::Text("one".to_string()));
        assert_eq!(thread_label(&post).as_deref(), Some("1 reply"));
        post.thread.push(ThreadEntry::Text("two".to_string()));
        assert_eq!(thread_label(&post).as_deref(), Some("2 replies"));
    }
}
