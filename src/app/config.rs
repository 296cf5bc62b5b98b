// Application configuration types
//
// This module contains configuration constants and structs for:
// - History and fade lifecycle bounds
// - Capture and startup lookups
// - Refresh intervals
// - Map view settings

use std::time::{Duration, Instant};

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of connections kept in the history store
pub const HISTORY_CAPACITY: usize = 100;

/// Opacity of a freshly spawned arc, in tenths (10 = fully opaque)
pub const INITIAL_OPACITY_TENTHS: u8 = 10;

/// Opacity lost per animator tick, in tenths
pub const FADE_STEP_TENTHS: u8 = 1;

/// Arcs at or below this opacity (in tenths) are removed on the next tick
pub const FADE_THRESHOLD_TENTHS: u8 = 1;

/// libpcap read timeout; bounds how long the loop can go without redrawing
pub const CAPTURE_TIMEOUT_MS: i32 = 100;

/// Bytes captured per frame
pub const CAPTURE_SNAPLEN: i32 = 65535;

/// Timeout for the startup public IP request
pub const PUBLIC_IP_TIMEOUT: Duration = Duration::from_secs(3);

/// Plain-text echo service returning the caller's public address
pub const DEFAULT_PUBLIC_IP_URL: &str = "https://api.ipify.org";

/// GeoLite2-City database looked up in the working directory
pub const DEFAULT_GEO_DB: &str = "GeoLite2-City.mmdb";

/// Minimum refresh interval in milliseconds
pub const MIN_REFRESH_MS: u64 = 50;

/// Maximum refresh interval in milliseconds
pub const MAX_REFRESH_MS: u64 = 10000;

/// Default refresh interval in milliseconds
pub const DEFAULT_REFRESH_MS: u64 = 200;

/// Refresh interval adjustment step in milliseconds
pub const REFRESH_STEP: u64 = 50;

/// Duration to highlight recently changed refresh intervals
pub const CHANGE_HIGHLIGHT_DURATION: Duration = Duration::from_millis(500);

/// Line segments per great circle arc
pub const GREAT_CIRCLE_SEGMENTS: usize = 48;

// ============================================================================
// Configuration Structs
// ============================================================================

/// Visual settings for the map and side panels
#[derive(Debug, Clone)]
pub struct MapSettings {
    /// Print remote city names next to arc endpoints (toggle with 't' key)
    pub labels_enabled: bool,

    /// Show the recent connections report (toggle with 'l' key)
    pub history_visible: bool,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            labels_enabled: true,
            history_visible: false,
        }
    }
}

/// Configuration for the UI redraw interval
///
/// Only redraws are paced by this; arc fading follows captured packets.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Refresh interval in milliseconds (50-10000ms)
    pub refresh_ms: u64,

    /// Timestamp of last interval change (for visual feedback)
    pub last_change: Option<Instant>,
}

impl RefreshConfig {
    /// Create a new RefreshConfig with default values
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_REFRESH_MS)
    }

    /// Create a RefreshConfig with `refresh_ms` clamped to the allowed range
    pub fn with_interval(refresh_ms: u64) -> Self {
        Self {
            refresh_ms: refresh_ms.clamp(MIN_REFRESH_MS, MAX_REFRESH_MS),
            last_change: None,
        }
    }

    /// Get UI refresh interval as Duration
    pub fn ui_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    /// Whether the interval changed within CHANGE_HIGHLIGHT_DURATION
    pub fn recently_changed(&self) -> bool {
        self.last_change
            .map(|t| t.elapsed() < CHANGE_HIGHLIGHT_DURATION)
            .unwrap_or(false)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::new()
    }
}
