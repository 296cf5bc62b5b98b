// UI rendering module
//
// This module contains all UI rendering components.
// The main draw() function orchestrates rendering of all UI panels.

mod banner;
mod map;
mod report;
pub mod snapshot;
mod status_bar;

pub use banner::ACCURACY_CAUTION;

use crate::app::DisplaySession;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use banner::render_banner;
use map::render_world_map;
use report::render_report;
use status_bar::render_status_bar;

/// Main UI drawing function
pub fn draw(f: &mut Frame, session: &DisplaySession) {
    let size = f.area();

    // Main layout: banner, body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Banner
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    render_banner(f, chunks[0], session);

    // Report rows are wide, so the list goes below the map
    if session.map_settings.history_visible {
        let body_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(60), // World map
                Constraint::Percentage(40), // Recent connections
            ])
            .split(chunks[1]);

        render_world_map(f, body_chunks[0], session);
        render_report(f, body_chunks[1], session);
    } else {
        render_world_map(f, chunks[1], session);
    }

    render_status_bar(f, chunks[2], session);
}
