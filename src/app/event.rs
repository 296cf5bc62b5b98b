// Keyboard event handling
//
// This module contains the keyboard event handler that maps key presses
// onto session commands.

use super::DisplaySession;
use crossterm::event::KeyCode;
use tracing::debug;

/// Handle keyboard events and update the session
///
/// Returns `true` if the session should continue running,
/// `false` if it should exit.
///
/// # Key Bindings
/// - `q`, `Q`, `Esc` - Quit
/// - `p`, `P` - Save a snapshot of the current display
/// - `l`, `L` - Show or hide the recent connections report
/// - `t`, `T` - Toggle city labels on the map
/// - `Up`, `Down` - Scroll the connections report
/// - `+`, `=` - Redraw more often
/// - `-`, `_` - Redraw less often
pub fn handle_key_event(session: &mut DisplaySession, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            session.quit();
            false
        }
        KeyCode::Char('p') | KeyCode::Char('P') => {
            debug!("Snapshot requested");
            session.request_snapshot();
            true
        }
        KeyCode::Char('l') | KeyCode::Char('L') => {
            session.toggle_history_list();
            true
        }
        KeyCode::Char('t') | KeyCode::Char('T') => {
            session.toggle_labels();
            true
        }
        KeyCode::Up => {
            session.scroll_history_up();
            true
        }
        KeyCode::Down => {
            session.scroll_history_down();
            true
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            session.increase_refresh_rate();
            true
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            session.decrease_refresh_rate();
            true
        }
        _ => true,
    }
}
