use crossterm::event::KeyCode;

use crate::game::Action;

/// Engine action bound to a key, if any. Session keys (quit, restart) are the caller's.
pub fn action_for_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Up => Some(Action::Rotate),
        KeyCode::Char(' ') => Some(Action::HardDrop),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::TogglePause),
        _ => None,
    }
}
