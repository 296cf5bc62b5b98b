// Display session
//
// This module contains the DisplaySession struct, which owns the connection
// history and the live arcs, and drives the per-frame pipeline. Keyboard
// commands dispatch to its methods through the event submodule.

pub mod config;
pub mod event;

// Re-export config types for convenience
pub use config::{MapSettings, RefreshConfig};

use crate::capture::CapturedFrame;
use crate::fade::{FadeAnimator, RenderableArc};
use crate::geo::{GeoResolver, HostIdentity, Location};
use crate::history::{report_lines, ClassifiedConnection, ConnectionHistory};
use crate::net::{self, Direction, FlowVerdict, IgnoreReason, Packet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Lifecycle of a display session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Created, no frames processed yet
    #[default]
    Init,
    /// Processing frames and accepting commands
    Running,
    /// Quit requested; the main loop exits
    Closed,
}

/// What happened to one captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    NotIp,
    Ignored(IgnoreReason),
    Unresolved,
    Recorded(Direction),
}

/// Counters over every frame the session has seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames: u64,
    pub not_ip: u64,
    pub broadcast: u64,
    pub local_only: u64,
    pub unresolved: u64,
    pub inbound: u64,
    pub outbound: u64,
}

impl PipelineStats {
    pub fn recorded(&self) -> u64 {
        self.inbound + self.outbound
    }

    pub fn skipped(&self) -> u64 {
        self.not_ip + self.broadcast + self.local_only + self.unresolved
    }
}

/// Main session state
pub struct DisplaySession {
    /// Lifecycle state
    pub state: SessionState,

    /// The host's own public address and location
    host: HostIdentity,

    /// Remote address lookups
    resolver: Box<dyn GeoResolver>,

    /// Recent connections for the report
    history: ConnectionHistory,

    /// Arcs currently on the map
    animator: FadeAnimator,

    /// Pipeline counters
    pub stats: PipelineStats,

    /// Description of the capture source for the banner
    pub source_label: String,

    /// Set once an offline capture file has been fully replayed
    pub capture_finished: bool,

    /// Redraw interval configuration
    pub refresh_config: RefreshConfig,

    /// Map and panel toggles
    pub map_settings: MapSettings,

    /// First visible row of the history report
    pub history_scroll: usize,

    /// Last user-facing status message and when it was set
    pub status_message: Option<(String, Instant)>,

    /// Directory snapshot artifacts are written to
    snapshot_dir: PathBuf,

    /// Set by the snapshot command, consumed after the next draw
    snapshot_requested: bool,
}

impl DisplaySession {
    /// Create a session in the Init state
    pub fn new(host: HostIdentity, resolver: Box<dyn GeoResolver>, snapshot_dir: PathBuf) -> Self {
        Self {
            state: SessionState::Init,
            host,
            resolver,
            history: ConnectionHistory::new(),
            animator: FadeAnimator::new(),
            stats: PipelineStats::default(),
            source_label: String::new(),
            capture_finished: false,
            refresh_config: RefreshConfig::new(),
            map_settings: MapSettings::default(),
            history_scroll: 0,
            status_message: None,
            snapshot_dir,
            snapshot_requested: false,
        }
    }

    /// Move from Init to Running
    pub fn start(&mut self) {
        if self.state == SessionState::Init {
            self.state = SessionState::Running;
            info!(host = %self.host, "Session started");
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Quit command: close the session
    pub fn quit(&mut self) {
        if self.state != SessionState::Closed {
            self.state = SessionState::Closed;
            info!(
                frames = self.stats.frames,
                recorded = self.stats.recorded(),
                skipped = self.stats.skipped(),
                "Session closed"
            );
        }
    }

    // ------------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------------

    /// Decode, classify, locate and record one captured frame
    pub fn process_frame(&mut self, frame: &CapturedFrame) -> FrameOutcome {
        self.stats.frames += 1;

        match net::decode_frame(&frame.data, frame.link, frame.timestamp) {
            Some(packet) => self.process_packet(&packet),
            None => {
                self.stats.not_ip += 1;
                trace!(len = frame.data.len(), "Skipping non-IP frame");
                FrameOutcome::NotIp
            }
        }
    }

    /// Classify and record one decoded packet
    ///
    /// Local-only and unresolved packets are dropped before the fade tick.
    /// Broadcast packets still advance the animation.
    pub fn process_packet(&mut self, packet: &Packet) -> FrameOutcome {
        let (direction, remote) = match net::classify(packet) {
            FlowVerdict::Ignore(IgnoreReason::LocalOnly) => {
                self.stats.local_only += 1;
                trace!(src = %packet.source_address, dst = %packet.dest_address, "Skipping local traffic");
                return FrameOutcome::Ignored(IgnoreReason::LocalOnly);
            }
            FlowVerdict::Ignore(IgnoreReason::Broadcast) => {
                self.stats.broadcast += 1;
                trace!(src = %packet.source_address, "Skipping broadcast");
                self.advance_one_tick();
                return FrameOutcome::Ignored(IgnoreReason::Broadcast);
            }
            FlowVerdict::Outbound { remote } => (Direction::Outbound, remote),
            FlowVerdict::Inbound { remote } => (Direction::Inbound, remote),
        };

        let Some(location) = self.resolver.resolve(remote) else {
            self.stats.unresolved += 1;
            trace!(%remote, "Skipping unresolved address");
            return FrameOutcome::Unresolved;
        };

        let connection = self.classified_connection(packet, direction, &location);
        debug!(
            timestamp = connection.timestamp,
            %direction,
            protocol = packet.protocol,
            src = %connection.source_address,
            dst = %connection.dest_address,
            place = %location.place(),
            "Recorded connection"
        );

        if let Some((evicted, _)) = self
            .history
            .record(connection.timestamp, connection.display_row())
        {
            trace!(timestamp = evicted, "Evicted oldest history entry");
        }

        self.animator.spawn(RenderableArc::new(
            location.coords(),
            self.host.location.coords(),
            direction,
            location.city.clone(),
        ));

        match direction {
            Direction::Inbound => self.stats.inbound += 1,
            Direction::Outbound => self.stats.outbound += 1,
        }

        self.advance_one_tick();
        FrameOutcome::Recorded(direction)
    }

    /// Fade every live arc by one step
    pub fn advance_one_tick(&mut self) -> usize {
        self.animator.advance_one_tick()
    }

    fn classified_connection(
        &self,
        packet: &Packet,
        direction: Direction,
        remote: &Location,
    ) -> ClassifiedConnection {
        let local = &self.host.location;
        let (source, dest) = match direction {
            Direction::Outbound => (local, remote),
            Direction::Inbound => (remote, local),
        };

        ClassifiedConnection {
            timestamp: packet.timestamp,
            direction,
            source_address: packet.source_address,
            dest_address: packet.dest_address,
            source_city: source.city.clone(),
            source_country: source.country.clone(),
            dest_city: dest.city.clone(),
            dest_country: dest.country.clone(),
        }
    }

    /// Called when an offline capture has no more frames
    pub fn mark_capture_finished(&mut self) {
        if !self.capture_finished {
            self.capture_finished = true;
            self.set_status("Capture finished. Press q to quit.");
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Snapshot command: persist the next drawn frame
    pub fn request_snapshot(&mut self) {
        self.snapshot_requested = true;
    }

    /// Consume a pending snapshot request
    pub fn take_snapshot_request(&mut self) -> bool {
        std::mem::take(&mut self.snapshot_requested)
    }

    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    /// Report the result of writing a snapshot
    pub fn snapshot_saved(&mut self, result: std::io::Result<PathBuf>) {
        match result {
            Ok(path) => {
                info!(path = %path.display(), "Saved snapshot");
                self.set_status(format!("Saved snapshot to {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, "Failed to save snapshot");
                self.set_status(format!("Snapshot failed: {}", e));
            }
        }
    }

    /// List command: show or hide the history report
    pub fn toggle_history_list(&mut self) {
        self.map_settings.history_visible = !self.map_settings.history_visible;
        self.history_scroll = 0;
    }

    pub fn toggle_labels(&mut self) {
        self.map_settings.labels_enabled = !self.map_settings.labels_enabled;
    }

    /// Header plus one line per printable history row
    pub fn history_report(&self) -> Vec<String> {
        report_lines(&self.history)
    }

    pub fn scroll_history_up(&mut self) {
        self.history_scroll = self.history_scroll.saturating_sub(1);
    }

    /// Scroll within the rows the report can print
    pub fn scroll_history_down(&mut self) {
        let printable_rows = self.history_report().len().saturating_sub(1);
        if self.history_scroll + 1 < printable_rows {
            self.history_scroll += 1;
        }
    }

    /// Increase refresh rate (decrease interval by 50ms, clamp to 50ms minimum)
    pub fn increase_refresh_rate(&mut self) {
        let new_interval = self
            .refresh_config
            .refresh_ms
            .saturating_sub(config::REFRESH_STEP);
        self.refresh_config.refresh_ms = new_interval.max(config::MIN_REFRESH_MS);
        self.refresh_config.last_change = Some(Instant::now());
    }

    /// Decrease refresh rate (increase interval by 50ms, clamp to maximum)
    pub fn decrease_refresh_rate(&mut self) {
        let new_interval = self
            .refresh_config
            .refresh_ms
            .saturating_add(config::REFRESH_STEP);
        self.refresh_config.refresh_ms = new_interval.min(config::MAX_REFRESH_MS);
        self.refresh_config.last_change = Some(Instant::now());
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn host(&self) -> &HostIdentity {
        &self.host
    }

    pub fn history(&self) -> &ConnectionHistory {
        &self.history
    }

    pub fn live_arcs(&self) -> &[RenderableArc] {
        self.animator.live_arcs()
    }
}
