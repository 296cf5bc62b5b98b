// Connection history
//
// Bounded record of the most recently classified connections, keyed by
// capture timestamp in whole seconds. Two connections classified within the
// same second share a key: the later one overwrites the earlier one and
// keeps its place in the report order. When the store grows past capacity
// the entry with the numerically smallest timestamp is evicted, which is not
// necessarily the entry that was inserted first.

use crate::app::config::HISTORY_CAPACITY;
use crate::net::Direction;
use chrono::DateTime;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

/// Column widths of the fixed-width report
const TIME_WIDTH: usize = 21;
const FIELD_WIDTH: usize = 17;

/// Report column labels, in display order
pub const REPORT_HEADERS: [&str; 7] = [
    "Time",
    "Source IP",
    "Dest IP",
    "Source City",
    "Source Country",
    "Dest City",
    "Dest Country",
];

/// A packet that survived classification and geolocation
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedConnection {
    pub timestamp: i64,
    pub direction: Direction,
    pub source_address: Ipv4Addr,
    pub dest_address: Ipv4Addr,
    pub source_city: Option<String>,
    pub source_country: Option<String>,
    pub dest_city: Option<String>,
    pub dest_country: Option<String>,
}

impl ClassifiedConnection {
    /// The six fields shown in the history report
    pub fn display_row(&self) -> DisplayRow {
        DisplayRow {
            source_address: self.source_address,
            dest_address: self.dest_address,
            source_city: self.source_city.clone(),
            source_country: self.source_country.clone(),
            dest_city: self.dest_city.clone(),
            dest_country: self.dest_country.clone(),
        }
    }
}

/// Stored value of one history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub source_address: Ipv4Addr,
    pub dest_address: Ipv4Addr,
    pub source_city: Option<String>,
    pub source_country: Option<String>,
    pub dest_city: Option<String>,
    pub dest_country: Option<String>,
}

impl DisplayRow {
    /// All six fields as strings, or None if any place name is missing
    fn fields(&self) -> Option<[String; 6]> {
        Some([
            self.source_address.to_string(),
            self.dest_address.to_string(),
            self.source_city.clone()?,
            self.source_country.clone()?,
            self.dest_city.clone()?,
            self.dest_country.clone()?,
        ])
    }
}

#[derive(Debug, Clone)]
struct Entry {
    /// Insertion sequence number, kept across overwrites
    seq: u64,
    row: DisplayRow,
}

/// Timestamp-keyed, capacity-bounded connection record
#[derive(Debug, Clone)]
pub struct ConnectionHistory {
    entries: BTreeMap<i64, Entry>,
    capacity: usize,
    next_seq: u64,
}

impl ConnectionHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity,
            next_seq: 0,
        }
    }

    /// Insert or overwrite the entry at `timestamp`, then enforce capacity
    ///
    /// Returns the evicted entry, if any. The evicted entry can be the one
    /// just inserted when its timestamp is older than everything stored.
    pub fn record(&mut self, timestamp: i64, row: DisplayRow) -> Option<(i64, DisplayRow)> {
        match self.entries.get_mut(&timestamp) {
            Some(existing) => existing.row = row,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.entries.insert(timestamp, Entry { seq, row });
            }
        }
        self.enforce_capacity()
    }

    /// Drop the smallest timestamp while the store is over capacity
    pub fn enforce_capacity(&mut self) -> Option<(i64, DisplayRow)> {
        let mut evicted = None;
        while self.entries.len() > self.capacity {
            evicted = self
                .entries
                .pop_first()
                .map(|(timestamp, entry)| (timestamp, entry.row));
        }
        evicted
    }

    /// Entries in the order their keys were first inserted
    pub fn snapshot_ordered_by_insertion(&self) -> Vec<(i64, &DisplayRow)> {
        let mut rows: Vec<_> = self.entries.iter().collect();
        rows.sort_by_key(|(_, entry)| entry.seq);
        rows.into_iter()
            .map(|(timestamp, entry)| (*timestamp, &entry.row))
            .collect()
    }

    pub fn get(&self, timestamp: i64) -> Option<&DisplayRow> {
        self.entries.get(&timestamp).map(|entry| &entry.row)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ConnectionHistory {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Report formatting
// ============================================================================

/// Header line of the history report
pub fn format_report_header() -> String {
    format_columns(&REPORT_HEADERS.map(|label| label.to_string()))
}

/// One report line, or None if the row cannot be shown
///
/// Rows with a missing place name or an unrepresentable timestamp are
/// skipped by the report instead of failing it.
pub fn format_report_row(timestamp: i64, row: &DisplayRow) -> Option<String> {
    let time = DateTime::from_timestamp(timestamp, 0)?
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let [a, b, c, d, e, f] = row.fields()?;
    Some(format_columns(&[time, a, b, c, d, e, f]))
}

/// Header plus every printable row, in insertion order
pub fn report_lines(history: &ConnectionHistory) -> Vec<String> {
    std::iter::once(format_report_header())
        .chain(
            history
                .snapshot_ordered_by_insertion()
                .into_iter()
                .filter_map(|(timestamp, row)| format_report_row(timestamp, row)),
        )
        .collect()
}

fn format_columns(cols: &[String; 7]) -> String {
    let mut line = format!("{:<width$}", cols[0], width = TIME_WIDTH);
    for col in &cols[1..] {
        line.push_str(&format!("{:<width$}", col, width = FIELD_WIDTH));
    }
    line
}
