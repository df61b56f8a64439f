use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        // Tooltip cursor
        KeyCode::Left | KeyCode::Char('h') => app.cursor_prev(),
        KeyCode::Right | KeyCode::Char('l') => app.cursor_next(),
        KeyCode::Home => app.cursor_first(),
        KeyCode::End => app.cursor_last(),
        KeyCode::Esc => app.hide_tooltip(),

        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('R') => app.remount(),

        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Down(MouseButton::Left) => {
            app.hover_at(mouse.column, mouse.row);
        }

        // Scroll wheel steps through samples
        MouseEventKind::ScrollUp => app.cursor_prev(),
        MouseEventKind::ScrollDown => app.cursor_next(),

        MouseEventKind::Down(MouseButton::Right) => app.hide_tooltip(),

        _ => {}
    }
}
