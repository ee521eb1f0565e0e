//! App state - pure data structure with no I/O logic

use crate::messages::ui_events::{InputMode, LoginField, Screen};
use crate::messages::RenderState;
use crate::models::{AuthSession, DraftField, Match, MatchDraft, MatchStatus};
use crate::storage::SessionStorage;

/// Main application state - pure data, no I/O
pub struct AppState {
    // Navigation
    pub screen: Screen,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Session
    pub storage: SessionStorage,
    pub session: Option<AuthSession>,
    pub session_loading: bool,

    // Login form
    pub login_email: String,
    pub login_password: String,
    pub login_field: LoginField,
    pub login_error: Option<String>,
    pub login_in_flight: bool,
    pub show_password: bool,

    // Match list
    pub matches: Vec<Match>,
    pub selected_match: usize,
    pub status_filter: Option<MatchStatus>,
    pub list_loading: bool,
    pub status_line: Option<String>,

    // Match editor
    pub draft: MatchDraft,
    pub active_field: DraftField,
    pub editing_id: Option<String>,
    pub draft_errors: Vec<(DraftField, String)>,
    pub save_in_flight: bool,

    // Popups
    pub show_help: bool,
    pub show_logout_confirm: bool,
    pub show_delete_confirm: bool,

    // Request tracking
    pub next_request_id: u64,
    pub pending_auth: Option<u64>,
    pub pending_fetch: Option<u64>,
    pub pending_save: Option<u64>,
    pub pending_delete: Option<u64>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SessionStorage::new())
    }
}

impl AppState {
    pub fn new(storage: SessionStorage) -> Self {
        AppState {
            screen: Screen::Login,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            storage,
            session: None,
            session_loading: false,
            login_email: String::new(),
            login_password: String::new(),
            login_field: LoginField::Email,
            login_error: None,
            login_in_flight: false,
            show_password: false,
            matches: Vec::new(),
            selected_match: 0,
            status_filter: None,
            list_loading: false,
            status_line: None,
            draft: MatchDraft::default(),
            active_field: DraftField::League,
            editing_id: None,
            draft_errors: Vec::new(),
            save_in_flight: false,
            show_help: false,
            show_logout_confirm: false,
            show_delete_confirm: false,
            next_request_id: 1,
            pending_auth: None,
            pending_fetch: None,
            pending_save: None,
            pending_delete: None,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        match self.screen {
            Screen::Login => match self.login_field {
                LoginField::Email => &self.login_email,
                LoginField::Password => &self.login_password,
            },
            Screen::MatchEdit => self.draft.buffer(self.active_field),
            Screen::MatchList => "",
        }
    }

    /// Get mutable reference to current input field, if the screen has one
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.screen {
            Screen::Login => Some(match self.login_field {
                LoginField::Email => &mut self.login_email,
                LoginField::Password => &mut self.login_password,
            }),
            Screen::MatchEdit => Some(self.draft.buffer_mut(self.active_field)),
            Screen::MatchList => None,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            screen: self.screen,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            session_loading: self.session_loading,
            user_email: self.session.as_ref().map(|s| s.user.email.clone()),
            login_email: self.login_email.clone(),
            login_password: self.login_password.clone(),
            login_field: self.login_field,
            login_error: self.login_error.clone(),
            login_in_flight: self.login_in_flight,
            show_password: self.show_password,
            matches: self.matches.clone(),
            selected_match: self.selected_match,
            status_filter: self.status_filter,
            list_loading: self.list_loading,
            status_line: self.status_line.clone(),
            draft: self.draft.clone(),
            active_field: self.active_field,
            editing_id: self.editing_id.clone(),
            draft_errors: self.draft_errors.clone(),
            save_in_flight: self.save_in_flight,
            show_help: self.show_help,
            show_logout_confirm: self.show_logout_confirm,
            show_delete_confirm: self.show_delete_confirm,
        }
    }
}
