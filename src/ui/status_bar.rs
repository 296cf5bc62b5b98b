// Status Bar rendering module
//
// Renders the bottom status bar with keyboard shortcuts, toggle indicators
// and the most recent status message.

use crate::app::config::DEFAULT_REFRESH_MS;
use crate::app::DisplaySession;
use crate::theme::{get_refresh_color, BONE_WHITE, NEON_PURPLE, PUMPKIN_ORANGE, TOXIC_GREEN};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use std::time::Duration;

/// How long a status message stays visible
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(5);

pub fn render_status_bar(f: &mut Frame, area: Rect, session: &DisplaySession) {
    // Calculate available width for hints (subtract borders)
    let available_width = area.width.saturating_sub(4);

    let list_hint = if session.map_settings.history_visible {
        "Hide list | "
    } else {
        "List | "
    };

    // Define all hints with priority levels
    struct Hint {
        priority: u8,
        key: &'static str,
        desc: &'static str,
        color: Color,
    }

    let hints = [
        Hint {
            priority: 1,
            key: "Q:",
            desc: "Quit | ",
            color: Color::Red,
        },
        Hint {
            priority: 1,
            key: "P:",
            desc: "Snapshot | ",
            color: NEON_PURPLE,
        },
        Hint {
            priority: 1,
            key: "L:",
            desc: list_hint,
            color: NEON_PURPLE,
        },
        Hint {
            priority: 2,
            key: "t:",
            desc: "Labels | ",
            color: NEON_PURPLE,
        },
        Hint {
            priority: 2,
            key: "+/-:",
            desc: "Speed | ",
            color: NEON_PURPLE,
        },
        Hint {
            priority: 3,
            key: "↑↓:",
            desc: "Scroll | ",
            color: NEON_PURPLE,
        },
    ];

    let mut spans = vec![Span::raw(" ")];
    let mut current_length = 1;

    // Process hints by priority
    for priority in 1..=3 {
        for hint in hints.iter().filter(|h| h.priority == priority) {
            let hint_length = hint.key.chars().count() + hint.desc.len();
            if current_length + hint_length <= available_width as usize {
                spans.push(Span::styled(
                    hint.key,
                    Style::default().fg(hint.color).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(hint.desc));
                current_length += hint_length;
            }
        }
    }

    spans.extend(build_toggle_indicators(session));

    if let Some(message) = visible_status_message(session) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            message.to_string(),
            Style::default().fg(PUMPKIN_ORANGE),
        ));
    }

    let status_bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(NEON_PURPLE)),
        )
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}

fn visible_status_message(session: &DisplaySession) -> Option<&str> {
    session
        .status_message
        .as_ref()
        .filter(|(_, at)| session.capture_finished || at.elapsed() < STATUS_MESSAGE_TTL)
        .map(|(message, _)| message.as_str())
}

/// Build toggle status indicator spans for the status bar
/// Shows [t:ON/OFF] and the current redraw interval
pub fn build_toggle_indicators(session: &DisplaySession) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    let labels = session.map_settings.labels_enabled;
    spans.push(Span::styled("[t:", Style::default().fg(BONE_WHITE)));
    spans.push(Span::styled(
        if labels { "ON" } else { "OFF" },
        Style::default()
            .fg(if labels { TOXIC_GREEN } else { BONE_WHITE })
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled("] ", Style::default().fg(BONE_WHITE)));

    let refresh = &session.refresh_config;
    spans.push(Span::styled("[", Style::default().fg(BONE_WHITE)));
    spans.push(Span::styled(
        format!("{}ms", refresh.refresh_ms),
        Style::default()
            .fg(get_refresh_color(
                refresh.refresh_ms,
                DEFAULT_REFRESH_MS,
                refresh.recently_changed(),
            ))
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled("]", Style::default().fg(BONE_WHITE)));

    spans
}
