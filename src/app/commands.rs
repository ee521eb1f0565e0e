//! Command handlers - business logic for processing UI events

use crate::app::AppState;
use crate::error::ApiError;
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{Match, MatchDraft, MatchStatus};

impl AppState {
    // ========================
    // Session bootstrap
    // ========================

    /// Kick off session restore from disk; called once at startup.
    pub fn begin_session_restore(&mut self) -> Option<NetworkCommand> {
        let stored = self.storage.load()?;
        let id = self.next_id();
        self.pending_auth = Some(id);
        self.session_loading = true;
        Some(NetworkCommand::RestoreSession {
            id,
            token: stored.token,
        })
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.current_input_mut().is_none() {
            return;
        }
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.current_input().len();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            if cursor_pos <= input.len() {
                input.insert(cursor_pos, c);
                self.cursor_position = cursor_pos + c.len_utf8();
            }
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    // ========================
    // Form navigation
    // ========================

    pub fn next_field(&mut self) {
        match self.screen {
            Screen::Login => self.login_field = self.login_field.other(),
            Screen::MatchEdit => self.active_field = self.active_field.next(),
            Screen::MatchList => {}
        }
        self.cursor_position = self.current_input().len();
    }

    pub fn prev_field(&mut self) {
        match self.screen {
            Screen::Login => self.login_field = self.login_field.other(),
            Screen::MatchEdit => self.active_field = self.active_field.prev(),
            Screen::MatchList => {}
        }
        self.cursor_position = self.current_input().len();
    }

    // ========================
    // Login
    // ========================

    pub fn toggle_password_visibility(&mut self) {
        self.show_password = !self.show_password;
    }

    /// Validate the form locally, then hand credentials to the network layer
    pub fn submit_login(&mut self) -> Option<NetworkCommand> {
        if self.login_in_flight {
            return None;
        }
        if self.login_email.trim().is_empty() || self.login_password.is_empty() {
            self.login_error = Some(String::from("Enter email and password"));
            return None;
        }

        self.input_mode = InputMode::Normal;
        self.login_error = None;
        self.login_in_flight = true;

        let id = self.next_id();
        self.pending_auth = Some(id);
        Some(NetworkCommand::Login {
            id,
            email: self.login_email.trim().to_string(),
            password: self.login_password.clone(),
        })
    }

    pub fn request_logout(&mut self) {
        self.show_logout_confirm = true;
    }

    fn perform_logout(&mut self) {
        // Best effort; a stale session file just means one extra restore round-trip
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "Failed to remove session file");
        }
        let storage = std::mem::take(&mut self.storage);
        *self = AppState::new(storage);
    }

    // ========================
    // Match list
    // ========================

    pub fn next_match(&mut self) {
        if !self.matches.is_empty() {
            self.selected_match = (self.selected_match + 1) % self.matches.len();
        }
    }

    pub fn prev_match(&mut self) {
        if !self.matches.is_empty() {
            self.selected_match = self
                .selected_match
                .checked_sub(1)
                .unwrap_or(self.matches.len() - 1);
        }
    }

    /// Queue a list fetch unless one is already in flight
    pub fn prepare_fetch(&mut self) -> Option<NetworkCommand> {
        if self.list_loading {
            return None;
        }
        let token = self.token()?.to_string();
        self.list_loading = true;
        self.status_line = None;

        let id = self.next_id();
        self.pending_fetch = Some(id);
        Some(NetworkCommand::FetchMatches {
            id,
            token,
            filter: self.status_filter,
        })
    }

    pub fn refresh(&mut self) -> Option<NetworkCommand> {
        self.prepare_fetch()
    }

    /// Advance the status filter and refetch server-side
    pub fn cycle_filter(&mut self) -> Option<NetworkCommand> {
        self.status_filter = match self.status_filter {
            None => Some(MatchStatus::Upcoming),
            Some(MatchStatus::Upcoming) => Some(MatchStatus::Live),
            Some(MatchStatus::Live) => Some(MatchStatus::Finished),
            Some(MatchStatus::Finished) => Some(MatchStatus::Cancelled),
            Some(MatchStatus::Cancelled) => None,
        };
        self.selected_match = 0;
        // A filter change supersedes any fetch already in flight
        self.list_loading = false;
        self.prepare_fetch()
    }

    // ========================
    // Match editor
    // ========================

    pub fn open_editor(&mut self) {
        let Some(m) = self.matches.get(self.selected_match) else {
            return;
        };
        self.draft = MatchDraft::from_match(m);
        self.editing_id = Some(m.id.clone());
        self.enter_edit_screen();
    }

    pub fn new_match(&mut self) {
        self.draft = MatchDraft::default();
        self.editing_id = None;
        self.enter_edit_screen();
    }

    fn enter_edit_screen(&mut self) {
        self.draft_errors.clear();
        self.active_field = crate::models::DraftField::League;
        self.cursor_position = self.current_input_len_for_edit();
        self.screen = Screen::MatchEdit;
        self.input_mode = InputMode::Normal;
    }

    fn current_input_len_for_edit(&self) -> usize {
        self.draft.buffer(crate::models::DraftField::League).len()
    }

    pub fn cycle_status(&mut self) {
        self.draft.status = self.draft.status.next();
    }

    pub fn back_to_list(&mut self) {
        if self.input_mode == InputMode::Editing {
            self.stop_editing();
            return;
        }
        self.screen = Screen::MatchList;
        self.draft_errors.clear();
    }

    /// Validate the draft and queue a create or update call
    pub fn save_match(&mut self) -> Option<NetworkCommand> {
        if self.save_in_flight {
            return None;
        }
        if self.input_mode == InputMode::Editing {
            self.stop_editing();
        }

        let payload = match self.draft.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                self.draft_errors = errors;
                return None;
            }
        };
        self.draft_errors.clear();

        let token = self.token()?.to_string();
        self.save_in_flight = true;
        let id = self.next_id();
        self.pending_save = Some(id);

        Some(match &self.editing_id {
            Some(record_id) => NetworkCommand::UpdateMatch {
                id,
                token,
                record_id: record_id.clone(),
                payload,
            },
            None => NetworkCommand::CreateMatch { id, token, payload },
        })
    }

    pub fn request_delete(&mut self) {
        if self.editing_id.is_some() {
            self.show_delete_confirm = true;
        }
    }

    // ========================
    // Popups
    // ========================

    pub fn confirm_popup(&mut self) -> Option<NetworkCommand> {
        if self.show_logout_confirm {
            self.show_logout_confirm = false;
            self.perform_logout();
            return None;
        }
        if self.show_delete_confirm {
            self.show_delete_confirm = false;
            let record_id = self.editing_id.clone()?;
            let token = self.token()?.to_string();
            let id = self.next_id();
            self.pending_delete = Some(id);
            self.save_in_flight = true;
            return Some(NetworkCommand::DeleteMatch {
                id,
                token,
                record_id,
            });
        }
        None
    }

    pub fn cancel_popup(&mut self) {
        self.show_logout_confirm = false;
        self.show_delete_confirm = false;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Response handling
    // ========================

    /// Apply a network response; may produce a follow-up command
    /// (a successful auth immediately fetches the list).
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        match response {
            NetworkResponse::SessionEstablished { id, session } => {
                if self.pending_auth != Some(id) {
                    return None;
                }
                self.pending_auth = None;
                self.session_loading = false;
                self.login_in_flight = false;
                self.login_password.clear();
                self.login_error = None;

                if let Err(e) = self.storage.save(&session) {
                    tracing::warn!(error = %e, "Failed to persist session");
                }
                self.session = Some(session);
                self.screen = Screen::MatchList;
                self.input_mode = InputMode::Normal;
                self.prepare_fetch()
            }

            NetworkResponse::Matches { id, matches } => {
                if self.pending_fetch != Some(id) {
                    return None;
                }
                self.pending_fetch = None;
                self.list_loading = false;
                self.status_line = None;
                self.matches = matches;
                if self.selected_match >= self.matches.len() {
                    self.selected_match = self.matches.len().saturating_sub(1);
                }
                None
            }

            NetworkResponse::FetchRetrying {
                id,
                attempt,
                max_attempts,
                ..
            } => {
                if self.pending_fetch == Some(id) {
                    self.status_line = Some(format!(
                        "Connection problem, retrying ({}/{})...",
                        attempt + 1,
                        max_attempts
                    ));
                }
                None
            }

            NetworkResponse::MatchSaved { id, record } => {
                if self.pending_save != Some(id) {
                    return None;
                }
                self.pending_save = None;
                self.save_in_flight = false;
                let created = self.editing_id.is_none();
                self.apply_saved_record(record);
                self.screen = Screen::MatchList;
                self.status_line = Some(String::from(if created {
                    "Match created"
                } else {
                    "Match updated"
                }));
                None
            }

            NetworkResponse::MatchDeleted { id, record_id } => {
                if self.pending_delete != Some(id) {
                    return None;
                }
                self.pending_delete = None;
                self.save_in_flight = false;
                self.matches.retain(|m| m.id != record_id);
                if self.selected_match >= self.matches.len() {
                    self.selected_match = self.matches.len().saturating_sub(1);
                }
                self.editing_id = None;
                self.screen = Screen::MatchList;
                self.status_line = Some(String::from("Match deleted"));
                None
            }

            NetworkResponse::Failed { id, error } => {
                self.handle_failure(id, error);
                None
            }
        }
    }

    fn handle_failure(&mut self, id: u64, error: ApiError) {
        if self.pending_auth == Some(id) {
            self.pending_auth = None;
            self.login_in_flight = false;
            if self.session_loading {
                // Persisted token no longer valid; fall back to a clean login
                self.session_loading = false;
                let _ = self.storage.clear();
                tracing::info!(%error, "Persisted session rejected");
            } else {
                self.login_error = Some(error.user_message());
            }
        } else if self.pending_fetch == Some(id) {
            self.pending_fetch = None;
            self.list_loading = false;
            self.status_line = Some(error.user_message());
        } else if self.pending_save == Some(id) {
            self.pending_save = None;
            self.save_in_flight = false;
            self.status_line = Some(error.user_message());
        } else if self.pending_delete == Some(id) {
            self.pending_delete = None;
            self.save_in_flight = false;
            self.status_line = Some(error.user_message());
        }
        // Anything else is a stale response; drop it
    }

    /// Patch the local list with the server's accepted record: replace the
    /// matching row or insert a new one keeping newest-kickoff-first order.
    fn apply_saved_record(&mut self, record: Match) {
        if let Some(existing) = self.matches.iter_mut().find(|m| m.id == record.id) {
            *existing = record;
            return;
        }
        let pos = self
            .matches
            .partition_point(|m| m.starts_at > record.starts_at);
        self.matches.insert(pos, record);
        self.selected_match = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthSession, User};
    use crate::storage::SessionStorage;
    use tempfile::tempdir;

    fn test_state(dir: &std::path::Path) -> AppState {
        AppState::new(SessionStorage::at(dir))
    }

    fn session() -> AuthSession {
        AuthSession {
            token: "tok_abc".into(),
            user: User {
                id: "u1".into(),
                email: "admin@example.com".into(),
                display_name: None,
                is_admin: Some(true),
            },
        }
    }

    fn match_record(id: &str, starts_at: &str) -> Match {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "league": "Premier League",
            "tour": 1,
            "home_team": "Arsenal",
            "away_team": "Chelsea",
            "starts_at": starts_at,
            "status": "upcoming"
        }))
        .unwrap()
    }

    fn logged_in_state(dir: &std::path::Path) -> AppState {
        let mut state = test_state(dir);
        state.session = Some(session());
        state.screen = Screen::MatchList;
        state
    }

    #[test]
    fn test_submit_login_rejects_empty_credentials() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path());
        assert!(state.submit_login().is_none());
        assert_eq!(state.login_error.as_deref(), Some("Enter email and password"));
    }

    #[test]
    fn test_submit_login_emits_command_once() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path());
        state.login_email = "admin@example.com".into();
        state.login_password = "secret".into();

        let cmd = state.submit_login();
        assert!(matches!(cmd, Some(NetworkCommand::Login { .. })));
        assert!(state.login_in_flight);
        // a second submit while in flight is swallowed
        assert!(state.submit_login().is_none());
    }

    #[test]
    fn test_login_success_enters_list_and_fetches() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path());
        state.login_email = "admin@example.com".into();
        state.login_password = "secret".into();
        let id = match state.submit_login() {
            Some(NetworkCommand::Login { id, .. }) => id,
            other => panic!("unexpected command: {:?}", other),
        };

        let follow_up = state.handle_response(NetworkResponse::SessionEstablished {
            id,
            session: session(),
        });
        assert!(matches!(follow_up, Some(NetworkCommand::FetchMatches { .. })));
        assert_eq!(state.screen, Screen::MatchList);
        assert!(state.login_password.is_empty());
        // session hit the disk
        assert_eq!(state.storage.load(), Some(session()));
    }

    #[test]
    fn test_login_failure_surfaces_without_retry() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path());
        state.login_email = "admin@example.com".into();
        state.login_password = "wrong".into();
        let id = match state.submit_login() {
            Some(NetworkCommand::Login { id, .. }) => id,
            other => panic!("unexpected command: {:?}", other),
        };

        let follow_up = state.handle_response(NetworkResponse::Failed {
            id,
            error: ApiError::from_status(400, "Failed to authenticate.".into()),
        });
        assert!(follow_up.is_none());
        assert_eq!(state.screen, Screen::Login);
        assert_eq!(state.login_error.as_deref(), Some("Failed to authenticate."));
        assert!(!state.login_in_flight);
    }

    #[test]
    fn test_restore_failure_clears_persisted_session() {
        let dir = tempdir().unwrap();
        let mut state = test_state(dir.path());
        state.storage.save(&session()).unwrap();

        let id = match state.begin_session_restore() {
            Some(NetworkCommand::RestoreSession { id, .. }) => id,
            other => panic!("unexpected command: {:?}", other),
        };
        assert!(state.session_loading);

        state.handle_response(NetworkResponse::Failed {
            id,
            error: ApiError::from_status(401, "The request requires valid authorization token.".into()),
        });
        assert!(!state.session_loading);
        assert_eq!(state.screen, Screen::Login);
        assert_eq!(state.storage.load(), None);
    }

    #[test]
    fn test_fetch_guarded_while_in_flight() {
        let dir = tempdir().unwrap();
        let mut state = logged_in_state(dir.path());
        assert!(state.prepare_fetch().is_some());
        assert!(state.refresh().is_none());
    }

    #[test]
    fn test_stale_fetch_response_is_ignored() {
        let dir = tempdir().unwrap();
        let mut state = logged_in_state(dir.path());
        let _ = state.prepare_fetch();

        state.handle_response(NetworkResponse::Matches {
            id: 999,
            matches: vec![match_record("stale", "2024-01-01T00:00:00Z")],
        });
        assert!(state.matches.is_empty());
        assert!(state.list_loading);
    }

    #[test]
    fn test_cycle_filter_refetches_with_status() {
        let dir = tempdir().unwrap();
        let mut state = logged_in_state(dir.path());

        let cmd = state.cycle_filter();
        match cmd {
            Some(NetworkCommand::FetchMatches { filter, .. }) => {
                assert_eq!(filter, Some(MatchStatus::Upcoming));
            }
            other => panic!("unexpected command: {:?}", other),
        }

        // full cycle comes back to unfiltered
        for _ in 0..4 {
            state.list_loading = false;
            let _ = state.cycle_filter();
        }
        assert_eq!(state.status_filter, None);
    }

    #[test]
    fn test_retry_notice_updates_status_line() {
        let dir = tempdir().unwrap();
        let mut state = logged_in_state(dir.path());
        let id = match state.prepare_fetch() {
            Some(NetworkCommand::FetchMatches { id, .. }) => id,
            other => panic!("unexpected command: {:?}", other),
        };

        state.handle_response(NetworkResponse::FetchRetrying {
            id,
            attempt: 1,
            max_attempts: 3,
            delay_ms: 2000,
        });
        assert_eq!(
            state.status_line.as_deref(),
            Some("Connection problem, retrying (2/3)...")
        );
        assert!(state.list_loading);
    }

    #[test]
    fn test_fetch_failure_after_retries_shows_message() {
        let dir = tempdir().unwrap();
        let mut state = logged_in_state(dir.path());
        let id = match state.prepare_fetch() {
            Some(NetworkCommand::FetchMatches { id, .. }) => id,
            other => panic!("unexpected command: {:?}", other),
        };

        state.handle_response(NetworkResponse::Failed {
            id,
            error: ApiError::Network("connection refused".into()),
        });
        assert!(!state.list_loading);
        assert_eq!(
            state.status_line.as_deref(),
            Some("Network problem. Check your connection and try again.")
        );
    }

    #[test]
    fn test_saved_record_replaces_row() {
        let dir = tempdir().unwrap();
        let mut state = logged_in_state(dir.path());
        state.matches = vec![
            match_record("m2", "2025-02-01T18:00:00Z"),
            match_record("m1", "2025-01-01T18:00:00Z"),
        ];
        state.selected_match = 1;
        state.open_editor();

        let cmd_id = {
            let mut updated = MatchDraft::from_match(&state.matches[1]);
            updated.home_team = "Liverpool".into();
            state.draft = updated;
            match state.save_match() {
                Some(NetworkCommand::UpdateMatch { id, .. }) => id,
                other => panic!("unexpected command: {:?}", other),
            }
        };

        let mut server_record = match_record("m1", "2025-01-01T18:00:00Z");
        server_record.home_team = "Liverpool".into();
        state.handle_response(NetworkResponse::MatchSaved {
            id: cmd_id,
            record: server_record,
        });

        assert_eq!(state.screen, Screen::MatchList);
        assert_eq!(state.matches[1].home_team, "Liverpool");
        assert_eq!(state.status_line.as_deref(), Some("Match updated"));
    }

    #[test]
    fn test_created_record_inserted_in_sort_order() {
        let dir = tempdir().unwrap();
        let mut state = logged_in_state(dir.path());
        state.matches = vec![
            match_record("m3", "2025-03-01T18:00:00Z"),
            match_record("m1", "2025-01-01T18:00:00Z"),
        ];
        state.new_match();
        state.draft = MatchDraft::from_match(&match_record("", "2025-02-01T18:00:00Z"));

        let cmd_id = match state.save_match() {
            Some(NetworkCommand::CreateMatch { id, .. }) => id,
            other => panic!("unexpected command: {:?}", other),
        };

        state.handle_response(NetworkResponse::MatchSaved {
            id: cmd_id,
            record: match_record("m2", "2025-02-01T18:00:00Z"),
        });
        let ids: Vec<&str> = state.matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m3", "m2", "m1"]);
        assert_eq!(state.status_line.as_deref(), Some("Match created"));
    }

    #[test]
    fn test_invalid_draft_blocks_save() {
        let dir = tempdir().unwrap();
        let mut state = logged_in_state(dir.path());
        state.new_match();
        // league/teams left empty
        assert!(state.save_match().is_none());
        assert!(!state.draft_errors.is_empty());
        assert_eq!(state.screen, Screen::MatchEdit);
    }

    #[test]
    fn test_delete_flow_removes_row() {
        let dir = tempdir().unwrap();
        let mut state = logged_in_state(dir.path());
        state.matches = vec![match_record("m1", "2025-01-01T18:00:00Z")];
        state.open_editor();

        state.request_delete();
        assert!(state.show_delete_confirm);

        let cmd_id = match state.confirm_popup() {
            Some(NetworkCommand::DeleteMatch { id, record_id, .. }) => {
                assert_eq!(record_id, "m1");
                id
            }
            other => panic!("unexpected command: {:?}", other),
        };

        state.handle_response(NetworkResponse::MatchDeleted {
            id: cmd_id,
            record_id: "m1".into(),
        });
        assert!(state.matches.is_empty());
        assert_eq!(state.screen, Screen::MatchList);
    }

    #[test]
    fn test_delete_needs_existing_record() {
        let dir = tempdir().unwrap();
        let mut state = logged_in_state(dir.path());
        state.new_match();
        state.request_delete();
        assert!(!state.show_delete_confirm);
    }

    #[test]
    fn test_logout_confirm_resets_state() {
        let dir = tempdir().unwrap();
        let mut state = logged_in_state(dir.path());
        state.storage.save(&session()).unwrap();
        state.matches = vec![match_record("m1", "2025-01-01T18:00:00Z")];

        state.request_logout();
        assert!(state.show_logout_confirm);
        assert!(state.confirm_popup().is_none());

        assert_eq!(state.screen, Screen::Login);
        assert!(state.session.is_none());
        assert!(state.matches.is_empty());
        assert_eq!(state.storage.load(), None);
    }

    #[test]
    fn test_editing_guard_on_list_screen() {
        let dir = tempdir().unwrap();
        let mut state = logged_in_state(dir.path());
        state.start_editing();
        assert_eq!(state.input_mode, InputMode::Normal);
    }
}
