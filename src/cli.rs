// Command line arguments

use crate::app::config::{DEFAULT_GEO_DB, DEFAULT_PUBLIC_IP_URL, DEFAULT_REFRESH_MS};
use clap::Parser;
use std::net::Ipv4Addr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plot live IPv4 traffic on a world map, colored by direction and faded by age."
)]
pub struct Args {
    /// Capture device (defaults to the system's default device)
    #[arg(short, long, conflicts_with = "read_file")]
    pub interface: Option<String>,

    /// Replay a saved .pcap file instead of capturing live
    #[arg(short, long)]
    pub read_file: Option<PathBuf>,

    /// MaxMind GeoLite2-City database
    #[arg(long, default_value = DEFAULT_GEO_DB)]
    pub geo_db: PathBuf,

    /// Use this public address instead of asking the echo service
    #[arg(long)]
    pub public_ip: Option<Ipv4Addr>,

    /// Plain-text service that returns the caller's public address
    #[arg(long, default_value = DEFAULT_PUBLIC_IP_URL)]
    pub public_ip_url: String,

    /// Directory snapshots are written to
    #[arg(long, default_value = ".")]
    pub snapshot_dir: PathBuf,

    /// Redraw interval in milliseconds (clamped to 50..=10000)
    #[arg(long, default_value_t = DEFAULT_REFRESH_MS)]
    pub refresh_ms: u64,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["geotraf"]).unwrap();
        assert_eq!(args.interface, None);
        assert_eq!(args.geo_db, PathBuf::from(DEFAULT_GEO_DB));
        assert_eq!(args.public_ip_url, DEFAULT_PUBLIC_IP_URL);
        assert_eq!(args.snapshot_dir, PathBuf::from("."));
        assert_eq!(args.refresh_ms, DEFAULT_REFRESH_MS);
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "geotraf",
            "-i",
            "eth0",
            "--public-ip",
            "203.0.113.7",
            "--geo-db",
            "/srv/geo/City.mmdb",
            "--refresh-ms",
            "500",
        ])
        .unwrap();
        assert_eq!(args.interface.as_deref(), Some("eth0"));
        assert_eq!(args.public_ip, Some(Ipv4Addr::new(203, 0, 113, 7)));
        assert_eq!(args.geo_db, PathBuf::from("/srv/geo/City.mmdb"));
        assert_eq!(args.refresh_ms, 500);
    }

    #[test]
    fn test_interface_conflicts_with_file() {
        let result = Args::try_parse_from(["geotraf", "-i", "eth0", "-r", "trace.pcap"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_public_ip() {
        assert!(Args::try_parse_from(["geotraf", "--public-ip", "not-an-ip"]).is_err());
    }
}
