//! Static style tables - constant lookups, no logic beyond matching.

use ratatui::style::{Color, Modifier, Style};

use crate::models::MatchStatus;

pub const ACCENT: Color = Color::Cyan;
pub const EDITING: Color = Color::Yellow;
pub const MUTED: Color = Color::DarkGray;
pub const DANGER: Color = Color::Red;

/// Badge style per match status
pub fn status_style(status: MatchStatus) -> Style {
    match status {
        MatchStatus::Live => Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
        MatchStatus::Upcoming => Style::default().fg(Color::Cyan),
        MatchStatus::Finished => Style::default().fg(Color::Gray),
        MatchStatus::Cancelled => Style::default().fg(Color::Red),
    }
}

/// Border style for a panel given focus and edit state
pub fn border_style(is_focused: bool, is_editing: bool) -> Style {
    if is_focused && is_editing {
        Style::default().fg(EDITING)
    } else if is_focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    }
}
