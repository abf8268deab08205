use super::{hint, label_style, panel};
use crate::api::Post;
use crate::composer::{ComposerPhase, ReplyComposer};
use crate::parser::format_datetime;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    composer: &ReplyComposer,
    post: Option<&Post>,
    focused: bool,
) {
    let block = panel("Reply Generator", focused);

    let Some(post) = post else {
        let text = vec![
            Line::from(""),
            Line::from("Select a tweet to generate a reply"),
            Line::from(""),
            hint("↑/↓ move · Enter select"),
        ];
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    };

    let mut lines: Vec<Line> = Vec::new();

    if let Some(notice) = composer.notice() {
        let color = if notice.is_error {
            Color::Red
        } else {
            Color::Green
        };
        lines.push(Line::styled(
            notice.text.as_str(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled(
            post.username.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", format_datetime(&post.timestamp)),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(post.text.as_str()));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Tone: ", label_style()),
        Span::styled(composer.tone(), Style::default().fg(Color::Cyan)),
    ]));
    lines.push(Line::from(""));

    match composer.phase() {
        ComposerPhase::Idle => {
            lines.push(hint("g generate AI reply · t change tone"));
        }
        ComposerPhase::Generating => {
            lines.push(Line::styled(
                "Generating...",
                Style::default().fg(Color::Yellow),
            ));
        }
        ComposerPhase::Generated
        | ComposerPhase::Editing
        | ComposerPhase::Sending
        | ComposerPhase::Sent => {
            let editing = composer.phase() == ComposerPhase::Editing;
            let title = if editing {
                "Edit Reply"
            } else {
                "Generated Reply"
            };
            lines.push(Line::styled(title, label_style()));

            let body_style = if editing {
                Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 46))
            } else {
                Style::default().fg(Color::White)
            };
            let body = if editing {
                format!("{}▏", composer.draft())
            } else {
                composer.display_text().to_string()
            };
            lines.push(Line::styled(body, body_style));
            lines.push(Line::from(""));

            let help = match composer.phase() {
                ComposerPhase::Editing => "Enter send draft · Esc use generated",
                ComposerPhase::Sending => "Sending...",
                ComposerPhase::Sent => "",
                _ => "s send · e edit · c cancel · + good · - needs improvement",
            };
            lines.push(hint(help));
        }
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}
