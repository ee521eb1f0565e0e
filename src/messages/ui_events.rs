//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application screens
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Screen {
    #[default]
    Login,
    MatchList,
    MatchEdit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Field of the login form
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

impl LoginField {
    pub fn other(&self) -> LoginField {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        }
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Form navigation
    NextField,
    PrevField,

    // Login screen
    SubmitLogin,
    TogglePasswordVisibility,

    // Match list screen
    NextMatch,
    PrevMatch,
    OpenEditor,
    NewMatch,
    CycleFilter,
    Refresh,
    RequestLogout,

    // Match edit screen
    CycleStatus,
    SaveMatch,
    RequestDelete,
    BackToList,

    // Popups
    ConfirmPopup,
    CancelPopup,
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    screen: Screen,
    input_mode: InputMode,
    show_help: bool,
    show_confirm: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return Some(UiEvent::Quit);
        }
    }

    // Popups take priority on every screen
    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if show_confirm {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Enter => Some(UiEvent::ConfirmPopup),
            KeyCode::Char('n') | KeyCode::Esc => Some(UiEvent::CancelPopup),
            _ => None,
        };
    }

    if input_mode == InputMode::Editing {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => match screen {
                Screen::Login => Some(UiEvent::SubmitLogin),
                _ => Some(UiEvent::StopEditing),
            },
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::BackTab => Some(UiEvent::PrevField),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        };
    }

    // Normal mode, per screen
    match screen {
        Screen::Login => match key.code {
            KeyCode::Char('e') => Some(UiEvent::StartEditing),
            KeyCode::Char('p') => Some(UiEvent::TogglePasswordVisibility),
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => Some(UiEvent::NextField),
            KeyCode::Enter => Some(UiEvent::SubmitLogin),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('q') => Some(UiEvent::Quit),
            _ => None,
        },
        Screen::MatchList => match key.code {
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::NextMatch),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::PrevMatch),
            KeyCode::Enter | KeyCode::Char('e') => Some(UiEvent::OpenEditor),
            KeyCode::Char('n') => Some(UiEvent::NewMatch),
            KeyCode::Char('f') => Some(UiEvent::CycleFilter),
            KeyCode::Char('r') => Some(UiEvent::Refresh),
            KeyCode::Char('o') => Some(UiEvent::RequestLogout),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('q') => Some(UiEvent::Quit),
            _ => None,
        },
        Screen::MatchEdit => match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::NextField),
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::PrevField),
            KeyCode::Enter | KeyCode::Char('e') => Some(UiEvent::StartEditing),
            KeyCode::Char('t') => Some(UiEvent::CycleStatus),
            KeyCode::Char('s') => Some(UiEvent::SaveMatch),
            KeyCode::Char('d') => Some(UiEvent::RequestDelete),
            KeyCode::Esc | KeyCode::Char('b') => Some(UiEvent::BackToList),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('q') => Some(UiEvent::Quit),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    #[test]
    fn test_chars_go_to_buffer_while_editing() {
        let event = key_to_ui_event(
            press(KeyCode::Char('q')),
            Screen::MatchEdit,
            InputMode::Editing,
            false,
            false,
        );
        assert!(matches!(event, Some(UiEvent::CharInput('q'))));
    }

    #[test]
    fn test_enter_submits_login_while_editing() {
        let event = key_to_ui_event(
            press(KeyCode::Enter),
            Screen::Login,
            InputMode::Editing,
            false,
            false,
        );
        assert!(matches!(event, Some(UiEvent::SubmitLogin)));
    }

    #[test]
    fn test_confirm_popup_swallows_screen_keys() {
        let event = key_to_ui_event(
            press(KeyCode::Char('r')),
            Screen::MatchList,
            InputMode::Normal,
            false,
            true,
        );
        assert!(event.is_none());

        let yes = key_to_ui_event(
            press(KeyCode::Char('y')),
            Screen::MatchList,
            InputMode::Normal,
            false,
            true,
        );
        assert!(matches!(yes, Some(UiEvent::ConfirmPopup)));
    }

    #[test]
    fn test_list_shortcuts() {
        let refresh = key_to_ui_event(
            press(KeyCode::Char('r')),
            Screen::MatchList,
            InputMode::Normal,
            false,
            false,
        );
        assert!(matches!(refresh, Some(UiEvent::Refresh)));

        let filter = key_to_ui_event(
            press(KeyCode::Char('f')),
            Screen::MatchList,
            InputMode::Normal,
            false,
            false,
        );
        assert!(matches!(filter, Some(UiEvent::CycleFilter)));
    }
}
