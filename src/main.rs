//! Pitchside - terminal admin console for a sports-match listing service
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async PocketBase calls

mod app;
mod constants;
mod error;
mod messages;
mod models;
mod network;
mod storage;
mod theme;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use app::{AppActor, AppState};
use messages::ui_events::{key_to_ui_event, InputMode, LoginField, Screen};
use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use models::{DraftField, MatchDraft};
use network::{NetworkActor, PbClient};
use storage::SessionStorage;

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "pitchside.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let server_url = constants::server_url();
    tracing::info!(%server_url, "Starting up");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(PbClient::new(server_url), net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(AppState::new(SessionStorage::new()), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.screen,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.show_confirm(),
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    match state.screen {
        Screen::Login => draw_login(f, state, main_chunks[0]),
        Screen::MatchList => draw_match_list(f, state, main_chunks[0]),
        Screen::MatchEdit => draw_match_edit(f, state, main_chunks[0]),
    }

    draw_status_bar(f, state, main_chunks[1]);

    // Popups
    if state.show_help {
        draw_help_popup(f, state, area);
    }
    if state.show_logout_confirm {
        draw_confirm_popup(f, area, " Log out ", "Are you sure you want to log out?");
    }
    if state.show_delete_confirm {
        draw_confirm_popup(
            f,
            area,
            " Delete match ",
            "Delete this match? This cannot be undone.",
        );
    }
}

fn draw_login(f: &mut Frame, state: &RenderState, area: Rect) {
    let card = centered_rect(60, 60, area);

    if state.session_loading {
        let block = Block::default().borders(Borders::ALL).title(" Pitchside ");
        let text = Paragraph::new("\nRestoring session...")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(text, card);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(2), // Error / progress
            Constraint::Min(0),
        ])
        .split(card);

    let title = Paragraph::new(Line::from(Span::styled(
        "P I T C H S I D E",
        Style::default().fg(theme::ACCENT).bold(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let editing = state.input_mode == InputMode::Editing;
    let email_focused = state.login_field == LoginField::Email;

    f.render_widget(
        ui::render_input(&state.login_email, "E-Mail", email_focused, editing),
        chunks[1],
    );

    let masked;
    let password_display = if state.show_password {
        state.login_password.as_str()
    } else {
        masked = "*".repeat(state.login_password.chars().count());
        masked.as_str()
    };
    f.render_widget(
        ui::render_input(password_display, "Password", !email_focused, editing),
        chunks[2],
    );

    let feedback = if state.login_in_flight {
        Line::from(Span::styled("Signing in...", Style::default().fg(theme::MUTED)))
    } else if let Some(error) = &state.login_error {
        Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme::DANGER),
        ))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(feedback).alignment(Alignment::Center), chunks[3]);

    // Cursor in the focused input
    if editing {
        let input_area = if email_focused { chunks[1] } else { chunks[2] };
        let max_x = input_area.x + input_area.width.saturating_sub(2);
        let cursor_x = (input_area.x + state.cursor_position as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, input_area.y + 1));
    }
}

fn draw_match_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // List
        ])
        .split(area);

    // Header: account, filter, count
    let loading = if state.list_loading { " [...]" } else { "" };
    let header = Line::from(vec![
        Span::styled(
            format!(" {} ", state.user_email.as_deref().unwrap_or("-")),
            Style::default().fg(theme::MUTED),
        ),
        Span::raw(" "),
        Span::styled(
            format!(" Filter: {} ", ui::filter_label(state.status_filter)),
            Style::default().fg(Color::Black).bg(theme::ACCENT),
        ),
        Span::styled(
            format!("  {} matches{}", state.matches.len(), loading),
            Style::default().fg(theme::MUTED),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    if state.matches.is_empty() {
        let placeholder = if state.list_loading {
            "Loading matches..."
        } else {
            "No matches found.\n\nPress 'r' to refresh or 'n' to create one."
        };
        let block = Block::default().borders(Borders::ALL).title(" Matches ");
        f.render_widget(
            Paragraph::new(placeholder)
                .block(block)
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme::MUTED)),
            chunks[1],
        );
        return;
    }

    let items: Vec<ListItem> = state.matches.iter().map(ui::match_list_item).collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Matches "))
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 40)))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_match));
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn draw_match_edit(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Field list
            Constraint::Length(3), // Input bar
        ])
        .split(area);

    // Header: mode, status badge, progress
    let mode = if state.editing_id.is_some() {
        "Edit match"
    } else {
        "New match"
    };
    let saving = if state.save_in_flight { " [saving...]" } else { "" };
    let header = Line::from(vec![
        Span::styled(format!(" {} ", mode), Style::default().bold()),
        Span::raw(" "),
        Span::styled(
            format!(" {} ", state.draft.status.label()),
            theme::status_style(state.draft.status),
        ),
        Span::styled(saving, Style::default().fg(theme::MUTED)),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    // Field list with inline validation errors
    let mut lines: Vec<Line> = Vec::new();
    for field in FIELD_ORDER {
        let is_active = state.active_field == field;
        let marker = if is_active { "> " } else { "  " };
        let value = field_display(&state.draft, field);
        let style = if is_active {
            Style::default().fg(theme::ACCENT).bold()
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<18}", marker, field.label()), style),
            Span::raw(value),
        ]));
        if let Some((_, message)) = state.draft_errors.iter().find(|(f, _)| *f == field) {
            lines.push(Line::from(Span::styled(
                format!("    {}", message),
                Style::default().fg(theme::DANGER),
            )));
        }
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Fields (Tab:next t:status) ");
    f.render_widget(Paragraph::new(lines).block(block), chunks[1]);

    // Input bar for the active field
    let editing = state.input_mode == InputMode::Editing;
    f.render_widget(
        ui::render_input(
            state.draft.buffer(state.active_field),
            state.active_field.label(),
            true,
            editing,
        ),
        chunks[2],
    );

    if editing {
        let input_area = chunks[2];
        let max_x = input_area.x + input_area.width.saturating_sub(2);
        let cursor_x = (input_area.x + state.cursor_position as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, input_area.y + 1));
    }
}

/// Editor field order, top to bottom
const FIELD_ORDER: [DraftField; 12] = [
    DraftField::League,
    DraftField::Tour,
    DraftField::HomeTeam,
    DraftField::AwayTeam,
    DraftField::Date,
    DraftField::Time,
    DraftField::HomeScore,
    DraftField::AwayScore,
    DraftField::OddHome,
    DraftField::OddDraw,
    DraftField::OddAway,
    DraftField::Info,
];

fn field_display(draft: &MatchDraft, field: DraftField) -> String {
    let buffer = draft.buffer(field);
    if buffer.is_empty() {
        String::from("-")
    } else {
        buffer.to_string()
    }
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if let Some(line) = &state.status_line {
        format!(" {}", line)
    } else if state.input_mode == InputMode::Editing {
        String::from(" ESC:stop editing | arrows:move | Tab:next field ")
    } else {
        match state.screen {
            Screen::Login => String::from(" e:edit | Tab:switch field | Enter:sign in | q:quit "),
            Screen::MatchList => String::from(
                " \u{2191}/\u{2193}:select | Enter:edit | n:new | f:filter | r:refresh | o:logout | ?:help | q:quit ",
            ),
            Screen::MatchEdit => {
                String::from(" Tab:field | e:edit | t:status | s:save | d:delete | Esc:back | ?:help ")
            }
        }
    };

    let bar = Paragraph::new(status).style(Style::default().fg(theme::MUTED));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = match state.screen {
        Screen::Login => {
            r#"
 PITCHSIDE - Login

   e                  Edit focused field
   Tab                Switch email/password
   p                  Show/hide password
   Enter              Sign in
   q / Ctrl+C         Quit

 Press any key to close...
"#
        }
        Screen::MatchList => {
            r#"
 PITCHSIDE - Match list

 NAVIGATION
   Up/Down or j/k     Select match
   Enter / e          Edit selected match

 ACTIONS
   n                  New match
   f                  Cycle status filter
   r                  Refresh from server
   o                  Log out

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#
        }
        Screen::MatchEdit => {
            r#"
 PITCHSIDE - Match editor

 FIELDS
   Tab / Shift+Tab    Next / previous field
   e / Enter          Edit focused field
   t                  Cycle match status

 ACTIONS
   s                  Save (validates first)
   d                  Delete match
   Esc / b            Back to list

 Scores apply to finished matches; odds are optional.

 Press any key to close...
"#
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_confirm_popup(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let popup_area = centered_rect(50, 20, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .style(Style::default().bg(Color::Black));

    let text = format!("\n{}\n\n y:confirm   n:cancel", message);
    let popup = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
