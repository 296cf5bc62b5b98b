// Display snapshots
//
// Writes the most recently drawn frame to a timestamped text file. The
// capture is taken from the terminal buffer after a draw so it matches what
// is on screen, arcs and panels included.

use chrono::{Local, NaiveDateTime};
use ratatui::buffer::Buffer;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Render every cell of `buffer` as plain text, one line per row
///
/// Trailing blanks are trimmed so the file stays readable.
pub fn buffer_to_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut text = String::with_capacity(usize::from(area.width + 1) * usize::from(area.height));

    for y in area.top()..area.bottom() {
        let mut line = String::with_capacity(usize::from(area.width));
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        text.push_str(line.trim_end());
        text.push('\n');
    }
    text
}

/// `traffic_display_<ddmmYYYY-HHMMSS>.txt`
pub fn snapshot_file_name(at: NaiveDateTime) -> String {
    format!("traffic_display_{}.txt", at.format("%d%m%Y-%H%M%S"))
}

/// Write `buffer` into `dir` under a name derived from the local time
pub fn save_snapshot(buffer: &Buffer, dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(snapshot_file_name(Local::now().naive_local()));
    fs::write(&path, buffer_to_text(buffer))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::layout::Rect;
    use ratatui::style::Style;

    #[test]
    fn test_snapshot_file_name() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 2)
            .unwrap();
        assert_eq!(snapshot_file_name(at), "traffic_display_07032024-090502.txt");
    }

    #[test]
    fn test_buffer_to_text_trims_rows() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 10, 2));
        buffer.set_string(0, 0, "hello", Style::default());
        buffer.set_string(3, 1, "map", Style::default());
        assert_eq!(buffer_to_text(&buffer), "hello\n   map\n");
    }

    #[test]
    fn test_save_snapshot_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut buffer = Buffer::empty(Rect::new(0, 0, 20, 1));
        buffer.set_string(0, 0, "World Traffic", Style::default());

        let path = save_snapshot(&buffer, dir.path()).unwrap();
        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("traffic_display_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "World Traffic\n");
    }

    #[test]
    fn test_save_snapshot_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = Buffer::empty(Rect::new(0, 0, 4, 1));
        assert!(save_snapshot(&buffer, &dir.path().join("missing")).is_err());
    }
}
