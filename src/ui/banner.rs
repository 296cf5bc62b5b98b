// Banner rendering module
//
// Renders the top banner with the host identity, the capture source, the
// pipeline counters and the location accuracy caution.

use crate::app::DisplaySession;
use crate::theme::{BLOOD_RED, BONE_WHITE, NEON_PURPLE, PUMPKIN_ORANGE, TOXIC_GREEN};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Shown at startup and in the banner
pub const ACCURACY_CAUTION: &str =
    "Locations are approximate: IP geolocation is often imprecise, especially for mobile and cloud networks.";

pub fn render_banner(f: &mut Frame, area: Rect, session: &DisplaySession) {
    let stats = &session.stats;
    let host = session.host();

    let banner_text = vec![
        Line::from(vec![
            Span::styled(
                " geotraf ",
                Style::default()
                    .fg(NEON_PURPLE)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("host {}", host),
                Style::default().fg(BONE_WHITE),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!(" {} ", session.source_label),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                format!("[out: {}] ", stats.outbound),
                Style::default().fg(BLOOD_RED),
            ),
            Span::styled(
                format!("[in: {}] ", stats.inbound),
                Style::default().fg(TOXIC_GREEN),
            ),
            Span::styled(
                format!(
                    "[frames: {} | skipped: {}]",
                    stats.frames,
                    stats.skipped()
                ),
                Style::default().fg(BONE_WHITE),
            ),
        ]),
        Line::from(Span::styled(
            format!(" {}", ACCURACY_CAUTION),
            Style::default()
                .fg(PUMPKIN_ORANGE)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let banner = Paragraph::new(banner_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(NEON_PURPLE)),
        )
        .alignment(Alignment::Left);

    f.render_widget(banner, area);
}
