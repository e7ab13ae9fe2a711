use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::App;
use crate::tui::TerminalEvent;

pub fn handle_event(app: &mut App, event: TerminalEvent) -> Result<()> {
    match event {
        TerminalEvent::Key(key) => handle_key(app, key),
        TerminalEvent::Mouse(mouse) => handle_mouse(app, mouse),
        TerminalEvent::Resize => {}
        TerminalEvent::Tick => {
            app.tick_animation();
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work everywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.show_settings {
        handle_settings(app, key);
    } else {
        handle_feed(app, key);
    }
}

fn handle_feed(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        KeyCode::Char('j') | KeyCode::Down => app.feed_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.feed_nav_up(),
        KeyCode::Char('g') | KeyCode::Home => app.feed_nav_first(),
        KeyCode::Char('G') | KeyCode::End => app.feed_nav_last(),

        KeyCode::Char('m') => app.toggle_mode(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('s') | KeyCode::Char(',') => app.open_settings(),

        _ => {}
    }
}

fn handle_settings(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => app.close_settings(),
        KeyCode::Char('j') | KeyCode::Down => app.settings_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.settings_nav_up(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_setting(),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.show_settings {
        return;
    }

    let in_feed = app
        .feed_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_feed {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.feed_nav_down(),
        MouseEventKind::ScrollUp => app.feed_nav_up(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{load, post, test_app};
    use crossterm::event::KeyEventKind;
    use vyn_core::FeedMode;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn scroll(app: &mut App, kind: MouseEventKind, column: u16, row: u16) {
        handle_mouse(
            app,
            MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
        );
    }

    #[tokio::test]
    async fn test_mode_key_restarts_feed() {
        let mut app = test_app(FeedMode::Demo);
        load(&mut app, vec![post(1, "Safe", Some(3.0))]);

        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.mode(), FeedMode::Live);
        assert!(app.feed.posts().is_empty());
        assert_eq!(app.feed.generation(), 2);
    }

    #[tokio::test]
    async fn test_settings_modal_captures_keys() {
        let mut app = test_app(FeedMode::Demo);
        load(&mut app, vec![post(1, "Safe", Some(3.0)), post(2, "Safe", Some(3.0))]);

        press(&mut app, KeyCode::Char('s'));
        assert!(app.show_settings);

        // j moves inside the modal, not the feed
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.settings_state.selected(), Some(1));
        assert_eq!(app.feed_state.selected(), Some(0));

        // q closes the modal instead of quitting
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_settings);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_modal() {
        let mut app = test_app(FeedMode::Demo);
        app.open_settings();

        let mut key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        key.kind = KeyEventKind::Press;
        handle_key(&mut app, key);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_mouse_scroll_only_inside_feed() {
        let mut app = test_app(FeedMode::Demo);
        load(&mut app, vec![post(1, "Safe", Some(3.0)), post(2, "Safe", Some(3.0))]);
        app.feed_area = Some(Rect::new(0, 1, 80, 20));

        scroll(&mut app, MouseEventKind::ScrollDown, 10, 30);
        assert_eq!(app.feed_state.selected(), Some(0));

        scroll(&mut app, MouseEventKind::ScrollDown, 10, 5);
        assert_eq!(app.feed_state.selected(), Some(1));

        scroll(&mut app, MouseEventKind::ScrollUp, 10, 5);
        assert_eq!(app.feed_state.selected(), Some(0));
    }
}
