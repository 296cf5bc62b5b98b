// Connection report rendering module
//
// Renders the recent connections report as a fixed-width table. The header
// stays pinned while the rows scroll with the arrow keys.

use crate::app::DisplaySession;
use crate::theme::{BONE_WHITE, PUMPKIN_ORANGE};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render_report(f: &mut Frame, area: Rect, session: &DisplaySession) {
    let mut report = session.history_report().into_iter();
    let header = report.next().unwrap_or_default();
    let rows: Vec<String> = report.collect();
    let row_count = rows.len();

    let mut lines = vec![Line::from(Span::styled(
        header,
        Style::default()
            .fg(PUMPKIN_ORANGE)
            .add_modifier(Modifier::BOLD),
    ))];
    lines.extend(
        rows.into_iter()
            .skip(session.history_scroll)
            .map(|row| Line::from(Span::styled(row, Style::default().fg(BONE_WHITE)))),
    );

    let title = format!(
        " Recent Connections ({}/{}) ",
        row_count,
        session.history().capacity()
    );

    let report = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(
                title,
                Style::default()
                    .fg(PUMPKIN_ORANGE)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(PUMPKIN_ORANGE)),
    );

    f.render_widget(report, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_session;
    use crate::capture::CapturedFrame;
    use crate::net::frame::test_frames::ethernet_udp;
    use crate::net::LinkKind;
    use crate::ui::snapshot::buffer_to_text;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(session: &DisplaySession) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 10)).unwrap();
        terminal
            .draw(|f| render_report(f, f.area(), session))
            .unwrap();
        buffer_to_text(terminal.backend().buffer())
    }

    #[test]
    fn test_report_lists_rows_in_insertion_order() {
        let mut session = test_session();
        for (ts, remote) in [(30, [8, 8, 8, 8]), (10, [1, 1, 1, 1])] {
            session.process_frame(&CapturedFrame {
                timestamp: ts,
                link: LinkKind::Ethernet,
                data: ethernet_udp([192, 168, 1, 5], remote),
            });
        }

        let text = draw(&session);
        assert!(text.contains("Recent Connections (2/100)"));
        assert!(text.contains("Source Country"));
        let wichita = text.find("Wichita").unwrap();
        let sydney = text.find("Sydney").unwrap();
        assert!(wichita < sydney);

        session.scroll_history_down();
        let text = draw(&session);
        assert!(!text.contains("Wichita"));
        assert!(text.contains("Sydney"));
    }
}
