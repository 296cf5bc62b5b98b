// geotraf - live IPv4 traffic on a world map
// Every connection to or from a public address is drawn as an arc between
// the remote location and this host, red for outbound and green for inbound.

mod app;
mod capture;
mod cli;
mod fade;
mod geo;
mod history;
mod net;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::{config::PUBLIC_IP_TIMEOUT, event::handle_key_event, DisplaySession, RefreshConfig};
use capture::{CaptureError, FrameSource, PcapSource};
use clap::Parser;
use cli::Args;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use geo::{public_ip::discover_public_ip, HostIdentity, MaxMindResolver};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = init_logging(args.log_file.as_deref()) {
        eprintln!("{:#}", err);
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}\nExiting.", err);
            ExitCode::FAILURE
        }
    }
}

/// Install a file-backed subscriber when a log file is requested
///
/// The terminal belongs to the TUI, so without a log file nothing is logged.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let resolver = MaxMindResolver::open(&args.geo_db)?;

    let public_ip = match args.public_ip {
        Some(address) => address,
        None => discover_public_ip(&args.public_ip_url, PUBLIC_IP_TIMEOUT)
            .context("could not determine this host's public IP address")?,
    };
    let host = HostIdentity::locate(public_ip, &resolver)?;

    println!("{}", ui::ACCURACY_CAUTION);
    println!("Host: {}", host);

    let mut source: Box<dyn FrameSource> = match &args.read_file {
        Some(path) => Box::new(PcapSource::open_file(path)?),
        None => Box::new(PcapSource::open_live(args.interface.as_deref())?),
    };

    let mut session = DisplaySession::new(host, Box::new(resolver), args.snapshot_dir);
    session.refresh_config = RefreshConfig::with_interval(args.refresh_ms);
    session.source_label = source.describe().to_string();
    session.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, &mut session, source.as_mut());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    session.quit();
    let stats = &session.stats;
    info!(
        frames = stats.frames,
        outbound = stats.outbound,
        inbound = stats.inbound,
        not_ip = stats.not_ip,
        broadcast = stats.broadcast,
        local_only = stats.local_only,
        unresolved = stats.unresolved,
        "Final pipeline stats"
    );
    println!(
        "Processed {} frames: {} outbound, {} inbound, {} skipped.",
        stats.frames,
        stats.outbound,
        stats.inbound,
        stats.skipped()
    );

    res
}

/// Capture, classify and draw until the user quits
///
/// Frames are pulled one at a time. A live source blocks for at most its read
/// timeout, so keys and redraws are serviced between frames.
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    session: &mut DisplaySession,
    source: &mut dyn FrameSource,
) -> Result<()> {
    let mut last_draw: Option<Instant> = None;

    while session.is_running() {
        if !session.capture_finished {
            match source.next_frame() {
                Ok(Some(frame)) => {
                    session.process_frame(&frame);
                }
                Ok(None) => {}
                Err(CaptureError::Exhausted) => session.mark_capture_finished(),
                Err(e) => return Err(e).context("packet capture failed"),
            }
        }

        let snapshot = session.take_snapshot_request();
        let due = last_draw.map_or(true, |at| at.elapsed() >= session.refresh_config.ui_interval());
        if due || snapshot {
            let frame = terminal.draw(|f| ui::draw(f, session))?;
            if snapshot {
                let result = ui::snapshot::save_snapshot(frame.buffer, session.snapshot_dir());
                session.snapshot_saved(result);
            }
            last_draw = Some(Instant::now());
        }

        // Nothing else blocks once the capture is done
        let wait = if session.capture_finished {
            session.refresh_config.ui_interval()
        } else {
            Duration::ZERO
        };
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key_event(session, key.code);
                }
            }
        }
    }

    Ok(())
}
