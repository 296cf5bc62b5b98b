// Packet capture sources
//
// A FrameSource yields timestamped link-layer frames one at a time. The live
// source reads from a network device through libpcap with a short read
// timeout so the caller can interleave keyboard handling and redraws.

use crate::app::config::{CAPTURE_SNAPLEN, CAPTURE_TIMEOUT_MS};
use crate::net::LinkKind;
use pcap::{Activated, Active, Capture, Device, Offline};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// One frame as delivered by a capture source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    /// Capture timestamp in whole seconds since the epoch
    pub timestamp: i64,
    pub link: LinkKind,
    pub data: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no capture device found")]
    NoDevice,

    #[error("cannot open capture on {target}: {source}{hint}")]
    Open {
        target: String,
        hint: &'static str,
        #[source]
        source: pcap::Error,
    },

    #[error("unsupported link type {linktype} on {target} (Ethernet or raw IP required)")]
    UnsupportedLink { target: String, linktype: i32 },

    #[error("capture read failed: {0}")]
    Read(#[from] pcap::Error),

    /// An offline source has delivered its last frame
    #[error("capture source exhausted")]
    Exhausted,
}

/// Pull-based source of captured frames
pub trait FrameSource {
    /// Next frame, or `Ok(None)` if nothing arrived within the read timeout
    fn next_frame(&mut self) -> Result<Option<CapturedFrame>, CaptureError>;

    /// Human readable description shown in the UI
    fn describe(&self) -> &str;
}

/// libpcap backed source over a live device or a saved capture file
pub struct PcapSource<T: Activated + ?Sized> {
    cap: Capture<T>,
    link: LinkKind,
    description: String,
}

impl PcapSource<Active> {
    /// Open a live capture on `interface`, or on the default device
    pub fn open_live(interface: Option<&str>) -> Result<Self, CaptureError> {
        let device = match interface {
            Some(name) => Device::from(name),
            None => Device::lookup()
                .map_err(|source| CaptureError::Open {
                    target: "default device".to_string(),
                    hint: open_hint(&source),
                    source,
                })?
                .ok_or(CaptureError::NoDevice)?,
        };
        let target = device.name.clone();

        let cap = Capture::from_device(device)
            .and_then(|c| {
                c.promisc(true)
                    .snaplen(CAPTURE_SNAPLEN)
                    .timeout(CAPTURE_TIMEOUT_MS)
                    .immediate_mode(true)
                    .open()
            })
            .map_err(|source| CaptureError::Open {
                target: target.clone(),
                hint: open_hint(&source),
                source,
            })?;

        let link = link_kind(cap.get_datalink().0, &target)?;
        info!(device = %target, ?link, "Opened live capture");

        Ok(Self {
            cap,
            link,
            description: format!("live: {}", target),
        })
    }
}

impl PcapSource<Offline> {
    /// Open a saved `.pcap` file for replay
    pub fn open_file(path: &Path) -> Result<Self, CaptureError> {
        let target = path.display().to_string();
        let cap = Capture::from_file(path).map_err(|source| CaptureError::Open {
            target: target.clone(),
            hint: "",
            source,
        })?;

        let link = link_kind(cap.get_datalink().0, &target)?;
        info!(file = %target, ?link, "Opened capture file");

        Ok(Self {
            cap,
            link,
            description: format!("file: {}", target),
        })
    }
}

impl<T: Activated + ?Sized> FrameSource for PcapSource<T> {
    fn next_frame(&mut self) -> Result<Option<CapturedFrame>, CaptureError> {
        match self.cap.next_packet() {
            Ok(packet) => Ok(Some(CapturedFrame {
                timestamp: packet.header.ts.tv_sec as i64,
                link: self.link,
                data: packet.data.to_vec(),
            })),
            Err(pcap::Error::TimeoutExpired) => Ok(None),
            Err(pcap::Error::NoMorePackets) => {
                debug!(source = %self.description, "Capture source exhausted");
                Err(CaptureError::Exhausted)
            }
            Err(e) => Err(CaptureError::Read(e)),
        }
    }

    fn describe(&self) -> &str {
        &self.description
    }
}

/// Map a libpcap DLT value to the framing the decoder understands
fn link_kind(dlt: i32, target: &str) -> Result<LinkKind, CaptureError> {
    match dlt {
        // DLT_EN10MB
        1 => Ok(LinkKind::Ethernet),
        // DLT_RAW (12, or 14 on OpenBSD), LINKTYPE_RAW, LINKTYPE_IPV4
        12 | 14 | 101 | 228 => Ok(LinkKind::RawIp),
        other => Err(CaptureError::UnsupportedLink {
            target: target.to_string(),
            linktype: other,
        }),
    }
}

fn open_hint(e: &pcap::Error) -> &'static str {
    if e.to_string().to_lowercase().contains("permission") {
        " (run with sudo or grant CAP_NET_RAW)"
    } else {
        ""
    }
}

/// In-memory source used by tests
#[cfg(test)]
pub struct VecSource {
    frames: std::collections::VecDeque<CapturedFrame>,
}

#[cfg(test)]
impl VecSource {
    pub fn new(frames: Vec<CapturedFrame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

#[cfg(test)]
impl FrameSource for VecSource {
    fn next_frame(&mut self) -> Result<Option<CapturedFrame>, CaptureError> {
        self.frames.pop_front().map(Some).ok_or(CaptureError::Exhausted)
    }

    fn describe(&self) -> &str {
        "memory"
    }
}
