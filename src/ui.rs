use ratatui::{prelude::*, widgets::*};

use crate::models::{Match, MatchStatus};
use crate::theme;

/// Renders a single-line text input field
pub fn render_input<'a>(
    content: &'a str,
    title: &'a str,
    is_focused: bool,
    is_editing: bool,
) -> Paragraph<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(is_focused, is_editing))
        .title(format!(" {} ", title));

    Paragraph::new(content).block(block)
}

/// Label for the status filter shown in the list header
pub fn filter_label(filter: Option<MatchStatus>) -> &'static str {
    match filter {
        None => "ALL",
        Some(status) => status.label(),
    }
}

/// Two-line list row for a match: league/kickoff on top, teams and score
/// below, with a status badge on the right.
pub fn match_list_item(m: &Match) -> ListItem<'static> {
    let header = Line::from(vec![
        Span::styled(
            m.league.to_uppercase(),
            Style::default().fg(theme::MUTED).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  R{}", m.tour), Style::default().fg(theme::MUTED)),
        Span::raw("  "),
        Span::styled(m.kickoff_display(), Style::default().fg(theme::MUTED)),
    ]);

    let teams = Line::from(vec![
        Span::raw(format!("{} - {}", m.home_team, m.away_team)),
        Span::raw("  "),
        Span::styled(
            m.score_line(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!(" {} ", m.status.label()), theme::status_style(m.status)),
    ]);

    let mut lines = vec![header, teams];
    if let Some(info) = &m.info {
        lines.push(Line::from(Span::styled(
            info.clone(),
            Style::default()
                .fg(theme::MUTED)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    ListItem::new(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_label() {
        assert_eq!(filter_label(None), "ALL");
        assert_eq!(filter_label(Some(MatchStatus::Live)), "LIVE");
    }
}
