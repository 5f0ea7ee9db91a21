use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Cancel,
    NextTarget,
    PrevTarget,
    Refresh,
    ToggleHelp,
}

pub fn map_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Char('n') | KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
            Some(Action::NextTarget)
        }
        KeyCode::Char('p') | KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
            Some(Action::PrevTarget)
        }
        KeyCode::Char('r') | KeyCode::F(5) => Some(Action::Refresh),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        _ => None,
    }
}
