//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, MAX_QUERY_LENGTH};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle query editing
    if matches!(app.state, AppState::EditingQuery) {
        handle_query_input(app, key);
        return false;
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    // Normal mode
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('/') => {
            app.query_input.clear();
            app.state = AppState::EditingQuery;
        }
        KeyCode::Left => app.select_prev_day(),
        KeyCode::Right => app.select_next_day(),
        KeyCode::Char('u') => app.refresh(),
        _ => {}
    }

    false
}

fn handle_query_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.query_input);
            app.state = AppState::Normal;
            app.submit_query(&input);
        }
        KeyCode::Esc => {
            app.query_input.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.query_input.pop();
        }
        KeyCode::Char(c) => {
            if !c.is_control() && app.query_input.chars().count() < MAX_QUERY_LENGTH {
                app.query_input.push(c);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use weatherdeck_core::{CacheManager, Config, Provider};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn editing_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        let app = App::new(Config::default(), Provider::mock(cache));
        (app, dir)
    }

    #[tokio::test]
    async fn test_typed_query_is_submitted_on_enter() {
        let (mut app, _dir) = editing_app();
        assert_eq!(app.state, AppState::EditingQuery);

        for c in "Pretoria".chars() {
            handle_input(&mut app, key(KeyCode::Char(c)));
        }
        handle_input(&mut app, key(KeyCode::Enter));

        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.query.as_deref(), Some("Pretoria"));
        assert!(app.query_input.is_empty());
        assert!(app.is_loading);
    }

    #[tokio::test]
    async fn test_escape_cancels_editing() {
        let (mut app, _dir) = editing_app();

        handle_input(&mut app, key(KeyCode::Char('x')));
        handle_input(&mut app, key(KeyCode::Esc));

        assert_eq!(app.state, AppState::Normal);
        assert!(app.query_input.is_empty());
        assert_eq!(app.query, None);
    }

    #[tokio::test]
    async fn test_query_input_is_length_capped() {
        let (mut app, _dir) = editing_app();

        for _ in 0..(MAX_QUERY_LENGTH + 10) {
            handle_input(&mut app, key(KeyCode::Char('a')));
        }

        assert_eq!(app.query_input.chars().count(), MAX_QUERY_LENGTH);
    }

    #[tokio::test]
    async fn test_quit_needs_confirmation() {
        let (mut app, _dir) = editing_app();
        app.state = AppState::Normal;

        assert!(!handle_input(&mut app, key(KeyCode::Char('q'))));
        assert_eq!(app.state, AppState::ConfirmingQuit);

        assert!(!handle_input(&mut app, key(KeyCode::Char('n'))));
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q')));
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))));
        assert_eq!(app.state, AppState::Quitting);
    }
}
