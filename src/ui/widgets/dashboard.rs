use super::{analytics, hint, panel, posts::render_list};
use crate::api::BrandSettings;
use crate::state::AppState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

const RECENT_POSTS: usize = 5;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(settings) = state.settings.as_ref() else {
        render_welcome(frame, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(15),
            Constraint::Min(6),
        ])
        .split(area);

    render_profile(frame, chunks[0], settings);
    analytics::render(frame, chunks[1], &state.posts, &state.replies);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);

    let recent: Vec<_> = state
        .posts_newest_first()
        .into_iter()
        .take(RECENT_POSTS)
        .collect();
    render_list(
        frame,
        bottom[0],
        &recent,
        None,
        None,
        state.loading,
        false,
    );
    render_keywords(frame, bottom[1], settings);
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::styled(
            "Welcome to ReplyDesk!",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from("To get started, please configure your brand settings."),
        Line::from(""),
        hint("Press 3 to open Brand Settings"),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(panel("Dashboard", false)),
        area,
    );
}

fn render_profile(frame: &mut Frame, area: Rect, settings: &BrandSettings) {
    let block = panel("Brand Profile", false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(inner);

    let fields = [
        ("Brand Name", settings.brand_name.as_str()),
        ("Industry", settings.industry.as_str()),
        ("Default Tone", settings.default_tone.as_str()),
    ];
    for ((label, value), column) in fields.iter().zip(columns.iter()) {
        let text = vec![
            Line::styled(*label, Style::default().fg(Color::DarkGray)),
            Line::styled(*value, Style::default().add_modifier(Modifier::BOLD)),
        ];
        frame.render_widget(Paragraph::new(text), *column);
    }
}

fn render_keywords(frame: &mut Frame, area: Rect, settings: &BrandSettings) {
    let block = panel("Monitored Keywords", false);
    let line = if settings.keywords.is_empty() {
        hint("No keywords configured")
    } else {
        Line::from(
            settings
                .keywords
                .iter()
                .flat_map(|k| {
                    [
                        Span::styled(
                            format!(" {} ", k),
                            Style::default().fg(Color::Black).bg(Color::LightBlue),
                        ),
                        Span::raw(" "),
                    ]
                })
                .collect::<Vec<_>>(),
        )
    };
    frame.render_widget(
        Paragraph::new(vec![line, Line::from(""), hint("Press 3 to edit settings")])
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}
