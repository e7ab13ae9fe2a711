use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use crate::app::{App, SettingsItem};
use vyn_core::{FeedMode, FeedView, FlagBand, PipelineState, Post, PostPresentation, RiskBand, Rgb, Theme};

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Wrap text to fit within a given width, returning multiple lines
/// Uses word boundaries for wrapping (doesn't break mid-word)
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len == 0 {
            current_line = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(current_line);
            current_line = word.to_string();
            current_len = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Lines for one post card. `width` is the usable text width.
fn post_card_lines(post: &Post, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let view = PostPresentation::new(post, theme);
    let text = Style::default().fg(color(theme.text));
    let subtext = Style::default().fg(color(theme.subtext));

    let badge = if view.flag_label.is_empty() {
        "unflagged".to_string()
    } else {
        view.flag_label.clone()
    };
    let badge_style = match view.flag_band {
        FlagBand::Neutral => subtext,
        _ => Style::default()
            .fg(color(theme.card_bg))
            .bg(color(view.flag_color))
            .add_modifier(Modifier::BOLD),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("@{}", post.username), text.add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(format!(" {} ", badge), badge_style),
    ])];

    if let Some(url) = post.image() {
        lines.push(Line::from(vec![
            Span::styled("▣ ", subtext),
            Span::styled(url.to_string(), subtext.add_modifier(Modifier::ITALIC)),
        ]));
    }

    for line in wrap_text_to_width(&post.caption, width) {
        lines.push(Line::styled(line, text));
    }

    let mut stats = vec![
        Span::styled("Risk: ", subtext),
        Span::styled(view.risk_label.clone(), Style::default().fg(color(view.risk_color)).bold()),
    ];
    if view.risk_band != RiskBand::Unknown {
        stats.push(Span::styled(format!(" ({})", view.risk_band.as_str()), subtext));
    }
    if let Some(likes) = &view.likes {
        stats.push(Span::styled(format!("   ♥ {} likes", likes), subtext));
    }
    lines.push(Line::from(stats));

    if let Some(probability) = &view.ai_probability {
        lines.push(Line::from(vec![
            Span::styled("AI image probability: ", subtext),
            Span::styled(probability.clone(), text),
        ]));
    }

    lines.push(Line::raw(""));
    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let theme = app.theme();

    frame.render_widget(
        Block::default().style(Style::default().bg(color(theme.bg)).fg(color(theme.text))),
        area,
    );

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_feed(app, frame, body_area);
    render_footer(app, frame, footer_area);

    if app.show_settings {
        render_settings(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let theme = app.theme();
    let subtext = Style::default().fg(color(theme.subtext));

    let mode_style = match app.mode() {
        FeedMode::Demo => Style::default().bg(Color::Blue).fg(Color::White),
        FeedMode::Live => Style::default().bg(Color::Green).fg(Color::Black),
    };

    let location = match app.feed.location() {
        Some(coord) => format!("📍 {:.2}, {:.2}", coord.latitude, coord.longitude),
        None => "location off".to_string(),
    };

    let title = Line::from(vec![
        Span::styled(" vyn ", Style::default().fg(color(theme.text)).bold()),
        Span::styled(format!(" {} ", app.mode().display_name().to_uppercase()), mode_style),
        Span::raw(" "),
        Span::styled(location, subtext),
        Span::raw(" "),
        Span::styled(format!("v{}", env!("CARGO_PKG_VERSION")), subtext),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(color(theme.header_bg)));
    frame.render_widget(header, area);
}

fn render_feed(app: &mut App, frame: &mut Frame, area: Rect) {
    let theme = app.theme();
    app.feed_area = Some(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(theme.border)))
        .title(format!(" {} ", app.mode().display_name()))
        .style(Style::default().bg(color(theme.card_bg)));

    match app.feed.view() {
        FeedView::Loading(state) => {
            let dots = ".".repeat(app.animation_frame as usize + 1);
            let message = Paragraph::new(Text::from(vec![
                Line::raw(""),
                Line::styled(
                    format!("{}{}", loading_label(state), dots),
                    Style::default().fg(color(theme.subtext)),
                ),
            ]))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(message, area);
        }
        FeedView::Empty => {
            let message = Paragraph::new(Text::from(vec![
                Line::raw(""),
                Line::styled("No posts available", Style::default().fg(color(theme.text)).bold()),
                Line::styled(
                    "Press m to switch feeds",
                    Style::default().fg(color(theme.subtext)),
                ),
            ]))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(message, area);
        }
        FeedView::Posts(posts) => {
            // Borders plus the highlight symbol
            let width = area.width.saturating_sub(4) as usize;
            let items: Vec<ListItem> = posts
                .iter()
                .map(|post| ListItem::new(post_card_lines(post, theme, width)))
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().bg(color(theme.border)))
                .highlight_symbol("▌");
            frame.render_stateful_widget(list, area, &mut app.feed_state);
        }
    }
}

fn loading_label(state: PipelineState) -> &'static str {
    match state {
        PipelineState::Idle => "Starting",
        state => state.label(),
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = if app.show_settings {
        vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" nav ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" toggle ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" close ", label_style),
        ]
    } else {
        let switch_to = match app.mode() {
            FeedMode::Demo => " live ",
            FeedMode::Live => " demo ",
        };
        vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" m ", key_style),
            Span::styled(switch_to, label_style),
            Span::styled(" t ", key_style),
            Span::styled(if app.dark_mode { " light " } else { " dark " }, label_style),
            Span::styled(" s ", key_style),
            Span::styled(" settings ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ]
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_settings(app: &mut App, frame: &mut Frame, area: Rect) {
    let theme = app.theme();
    let popup = popup_area(area, 44, 8);

    let items: Vec<ListItem> = SettingsItem::all()
        .iter()
        .map(|item| {
            let (mark, mark_style) = if app.setting_enabled(*item) {
                ("[x]", Style::default().fg(Color::Green))
            } else {
                ("[ ]", Style::default().fg(color(theme.subtext)))
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, mark_style),
                Span::raw(" "),
                Span::styled(item.label(), Style::default().fg(color(theme.text))),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Settings ")
                .title_bottom(Line::from(format!(" {} ", app.api_url)).right_aligned())
                .border_style(Style::default().fg(Color::Cyan))
                .style(Style::default().bg(color(theme.card_bg))),
        )
        .highlight_style(Style::default().bg(color(theme.border)).bold())
        .highlight_symbol("> ");

    frame.render_widget(Clear, popup);
    frame.render_stateful_widget(list, popup, &mut app.settings_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{load, post, test_app};
    use ratatui::{backend::TestBackend, Terminal};
    use vyn_core::theme::{DARK, LIGHT};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let mut out = String::new();
        for row in buffer.content().chunks(width) {
            for cell in row {
                out.push_str(cell.symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_wrap_text_to_width() {
        assert_eq!(wrap_text_to_width("a bb ccc dddd", 6), vec!["a bb", "ccc", "dddd"]);
        assert!(wrap_text_to_width("", 10).is_empty());
        assert_eq!(wrap_text_to_width("unbroken", 3), vec!["unbroken"]);
    }

    #[test]
    fn test_scam_card_lines() {
        let lines = post_card_lines(&post(1, "SCAM DETECTED", Some(90.0)), &DARK, 60);
        let text: Vec<String> = lines.iter().map(line_text).collect();

        assert_eq!(text[0], "@user1   SCAM DETECTED ");
        assert!(text[1].contains("https://placehold.co/600x600"));
        assert!(text.iter().any(|l| l == "Risk: 90 (high)   ♥ 1,200 likes"));
        assert!(text.iter().any(|l| l == "AI image probability: 87.3%"));
    }

    #[test]
    fn test_unknown_risk_and_unrecognized_flag() {
        let mut p = post(2, "AI Error", Some(-1.0));
        p.image_url = None;
        p.likes = None;
        p.ai_image_probability = Some(0.0);
        p.caption = String::new();

        let lines = post_card_lines(&p, &LIGHT, 60);
        let text: Vec<String> = lines.iter().map(line_text).collect();

        assert_eq!(text, vec!["@user2   AI Error ", "Risk: N/A", ""]);
        // Neutral badge is unstyled: plain subtext, no background fill
        assert_eq!(lines[0].spans[2].style.bg, None);
        assert_eq!(lines[0].spans[2].style.fg, Some(color(LIGHT.subtext)));
    }

    #[test]
    fn test_empty_flag_shows_placeholder() {
        let lines = post_card_lines(&post(3, "", None), &DARK, 60);
        assert_eq!(line_text(&lines[0]), "@user3   unflagged ");
    }

    #[tokio::test]
    async fn test_render_states() {
        let mut app = test_app(vyn_core::FeedMode::Demo);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        app.feed.start();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        assert!(screen_text(&terminal).contains("Requesting location permission"));

        load(&mut app, Vec::new());
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        assert!(screen_text(&terminal).contains("No posts available"));
        assert!(app.feed_area.is_some());
    }

    #[tokio::test]
    async fn test_render_posts_and_settings() {
        let mut app = test_app(vyn_core::FeedMode::Demo);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        load(&mut app, vec![post(1, "Suspicious", Some(55.0))]);
        app.open_settings();

        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        let screen = screen_text(&terminal);
        assert!(screen.contains("@user1"));
        assert!(screen.contains("Suspicious"));
        assert!(screen.contains("Settings"));
        assert!(screen.contains("[x] Dark mode"));
    }
}
