// Flow classification
//
// Decides the direction of a packet relative to the local network and which
// side of it is the remote endpoint to geolocate.

use super::addr::{is_broadcast, is_local};
use super::frame::Packet;
use std::fmt;
use std::net::Ipv4Addr;

/// Direction of a classified connection relative to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Remote source, arc drawn in green
    Inbound,
    /// Local source, arc drawn in red
    Outbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inbound => f.write_str("inbound"),
            Direction::Outbound => f.write_str("outbound"),
        }
    }
}

/// Why a packet was dropped by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    Broadcast,
    LocalOnly,
}

/// Result of classifying one packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowVerdict {
    Ignore(IgnoreReason),
    Outbound { remote: Ipv4Addr },
    Inbound { remote: Ipv4Addr },
}

/// Classify a packet by its addresses
///
/// Any non-local source is inbound, including remote-to-remote traffic
/// seen in promiscuous mode.
pub fn classify(pkt: &Packet) -> FlowVerdict {
    classify_addrs(pkt.source_address, pkt.dest_address)
}

pub fn classify_addrs(source: Ipv4Addr, dest: Ipv4Addr) -> FlowVerdict {
    if is_broadcast(source) || is_broadcast(dest) {
        return FlowVerdict::Ignore(IgnoreReason::Broadcast);
    }

    if is_local(source) {
        if is_local(dest) {
            FlowVerdict::Ignore(IgnoreReason::LocalOnly)
        } else {
            FlowVerdict::Outbound { remote: dest }
        }
    } else {
        FlowVerdict::Inbound { remote: source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ip(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    #[test]
    fn test_outbound_remote_is_dest() {
        assert_eq!(
            classify_addrs(ip("192.168.1.5"), ip("93.184.216.34")),
            FlowVerdict::Outbound { remote: ip("93.184.216.34") }
        );
    }

    #[test]
    fn test_inbound_remote_is_source() {
        assert_eq!(
            classify_addrs(ip("8.8.8.8"), ip("192.168.1.5")),
            FlowVerdict::Inbound { remote: ip("8.8.8.8") }
        );
    }

    #[test]
    fn test_local_only_is_ignored() {
        assert_eq!(
            classify_addrs(ip("10.0.0.1"), ip("10.0.0.2")),
            FlowVerdict::Ignore(IgnoreReason::LocalOnly)
        );
    }

    #[test]
    fn test_remote_to_remote_is_inbound() {
        assert_eq!(
            classify_addrs(ip("1.1.1.1"), ip("8.8.8.8")),
            FlowVerdict::Inbound { remote: ip("1.1.1.1") }
        );
    }

    #[test]
    fn test_172_17_counts_as_remote() {
        assert_eq!(
            classify_addrs(ip("172.17.0.2"), ip("192.168.0.10")),
            FlowVerdict::Inbound { remote: ip("172.17.0.2") }
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_broadcast_dest_always_ignored(src in any::<[u8; 4]>()) {
            let verdict = classify_addrs(Ipv4Addr::from(src), Ipv4Addr::BROADCAST);
            prop_assert_eq!(verdict, FlowVerdict::Ignore(IgnoreReason::Broadcast));
        }

        #[test]
        fn prop_broadcast_source_always_ignored(dst in any::<[u8; 4]>()) {
            let verdict = classify_addrs(Ipv4Addr::BROADCAST, Ipv4Addr::from(dst));
            prop_assert_eq!(verdict, FlowVerdict::Ignore(IgnoreReason::Broadcast));
        }

        #[test]
        fn prop_remote_is_never_local(src in any::<[u8; 4]>(), dst in any::<[u8; 4]>()) {
            let verdict = classify_addrs(Ipv4Addr::from(src), Ipv4Addr::from(dst));
            if let FlowVerdict::Outbound { remote } = verdict {
                prop_assert!(!is_local(remote));
            }
            if let FlowVerdict::Inbound { remote } = verdict {
                prop_assert!(!is_local(remote));
            }
        }
    }
}
