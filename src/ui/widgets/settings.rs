use super::{hint, label_style, panel};
use crate::settings_form::{FormField, SettingsForm};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

fn field_value(form: &SettingsForm, field: FormField) -> Vec<Span<'_>> {
    let draft = form.draft();
    let focused = form.focus() == field;
    let cursor = if focused && field.takes_text() {
        "▏"
    } else {
        ""
    };

    match field {
        FormField::BrandName => vec![Span::raw(format!("{}{}", draft.brand_name, cursor))],
        FormField::Industry => vec![Span::raw(format!("◂ {} ▸", draft.industry))],
        FormField::DefaultTone => vec![Span::raw(format!("◂ {} ▸", draft.default_tone))],
        FormField::ReplySpeed => vec![Span::raw(format!("{}{}", draft.reply_speed, cursor))],
        FormField::MaxDailyReplies => {
            vec![Span::raw(format!("{}{}", draft.max_daily_replies, cursor))]
        }
        FormField::AutoReply => {
            let (mark, color) = if draft.auto_reply_enabled {
                ("[x] Enabled", Color::Green)
            } else {
                ("[ ] Disabled", Color::DarkGray)
            };
            vec![Span::styled(mark, Style::default().fg(color))]
        }
        FormField::NewKeyword => vec![Span::raw(format!("{}{}", form.new_keyword(), cursor))],
        FormField::Keywords => {
            if draft.keywords.is_empty() {
                return vec![Span::styled(
                    "No keywords",
                    Style::default().fg(Color::DarkGray),
                )];
            }
            draft
                .keywords
                .iter()
                .enumerate()
                .flat_map(|(i, keyword)| {
                    let style = if focused && i == form.keyword_cursor() {
                        Style::default().fg(Color::Black).bg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::Blue)
                    };
                    [Span::styled(format!(" {} ", keyword), style), Span::raw(" ")]
                })
                .collect()
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, form: &SettingsForm) {
    let block = panel("Brand Settings", true);
    let mut lines = Vec::new();

    for field in FormField::ORDER {
        let focused = form.focus() == field;
        let marker = if focused { "▶ " } else { "  " };
        let label = if focused {
            label_style().fg(Color::Cyan)
        } else {
            label_style()
        };

        let mut spans = vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(format!("{:<18}", field.label()), label),
        ];
        spans.extend(field_value(form, field));
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    if form.is_saving() {
        lines.push(Line::styled(
            "Saving...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(hint(
        "↑/↓ field · ←/→ change · Space toggle · Enter add keyword · Backspace remove · Ctrl+S save · Esc cancel",
    ));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}
