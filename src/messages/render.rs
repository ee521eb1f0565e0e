//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{InputMode, LoginField, Screen};
use crate::models::{DraftField, Match, MatchDraft, MatchStatus};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Session
    pub session_loading: bool,
    pub user_email: Option<String>,

    // Login screen
    pub login_email: String,
    pub login_password: String,
    pub login_field: LoginField,
    pub login_error: Option<String>,
    pub login_in_flight: bool,
    pub show_password: bool,

    // Match list screen
    pub matches: Vec<Match>,
    pub selected_match: usize,
    pub status_filter: Option<MatchStatus>,
    pub list_loading: bool,
    pub status_line: Option<String>,

    // Match edit screen
    pub draft: MatchDraft,
    pub active_field: DraftField,
    pub editing_id: Option<String>,
    pub draft_errors: Vec<(DraftField, String)>,
    pub save_in_flight: bool,

    // Popups
    pub show_help: bool,
    pub show_logout_confirm: bool,
    pub show_delete_confirm: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            screen: Screen::Login,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            session_loading: true,
            user_email: None,
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
        }
    }
}

impl RenderState {
    /// True when any modal popup is on screen
    pub fn show_confirm(&self) -> bool {
        self.show_logout_confirm || self.show_delete_confirm
    }
}
