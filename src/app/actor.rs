//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Restore the persisted session before the first render
        if let Some(cmd) = self.state.begin_session_restore() {
            let _ = self.network_tx.send(cmd);
        }
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    if let Some(cmd) = self.state.handle_response(response) {
                        let _ = self.network_tx.send(cmd);
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),

            // Form navigation
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),

            // Login
            UiEvent::SubmitLogin => {
                if let Some(cmd) = self.state.submit_login() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            UiEvent::TogglePasswordVisibility => self.state.toggle_password_visibility(),

            // Match list
            UiEvent::NextMatch => self.state.next_match(),
            UiEvent::PrevMatch => self.state.prev_match(),
            UiEvent::OpenEditor => self.state.open_editor(),
            UiEvent::NewMatch => self.state.new_match(),
            UiEvent::CycleFilter => {
                if let Some(cmd) = self.state.cycle_filter() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            UiEvent::Refresh => {
                if let Some(cmd) = self.state.refresh() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            UiEvent::RequestLogout => self.state.request_logout(),

            // Match editor
            UiEvent::CycleStatus => self.state.cycle_status(),
            UiEvent::SaveMatch => {
                if let Some(cmd) = self.state.save_match() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            UiEvent::RequestDelete => self.state.request_delete(),
            UiEvent::BackToList => self.state.back_to_list(),

            // Popups
            UiEvent::ConfirmPopup => {
                if let Some(cmd) = self.state.confirm_popup() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            UiEvent::CancelPopup => self.state.cancel_popup(),
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
