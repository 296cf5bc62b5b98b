// Frame decoding
//
// Turns a captured link-layer frame into the IPv4 fields the classifier
// needs. Anything that is not a well-formed IPv4 packet yields None.

use etherparse::{NetSlice, SlicedPacket};
use std::net::Ipv4Addr;

/// Link-layer framing of captured bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Ethernet II, optionally VLAN tagged
    Ethernet,
    /// Bare IP packets with no link header (DLT_RAW)
    RawIp,
}

/// The fields of one captured IPv4 packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub source_address: Ipv4Addr,
    pub dest_address: Ipv4Addr,
    /// IP protocol number (6 = TCP, 17 = UDP, ...)
    pub protocol: u8,
    /// Capture timestamp in whole seconds since the epoch
    pub timestamp: i64,
}

/// Decode a frame into a [`Packet`]
///
/// Returns `None` for non-IP frames (ARP, IPv6, LLDP, ...) and for frames
/// that fail to parse. Neither case is an error for the caller.
pub fn decode_frame(data: &[u8], link: LinkKind, timestamp: i64) -> Option<Packet> {
    let sliced = match link {
        LinkKind::Ethernet => SlicedPacket::from_ethernet(data),
        LinkKind::RawIp => SlicedPacket::from_ip(data),
    }
    .ok()?;

    match sliced.net {
        Some(NetSlice::Ipv4(ipv4)) => {
            let header = ipv4.header();
            Some(Packet {
                source_address: header.source_addr(),
                dest_address: header.destination_addr(),
                protocol: header.protocol().0,
                timestamp,
            })
        }
        _ => None,
    }
}

/// Frame builders shared by tests across the crate
#[cfg(test)]
pub mod test_frames {
    use etherparse::{PacketBuilder, VlanId};

    const SRC_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
    const DST_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x02];

    /// Ethernet + IPv4 + UDP frame between two addresses
    pub fn ethernet_udp(src: [u8; 4], dst: [u8; 4]) -> Vec<u8> {
        let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
            .ipv4(src, dst, 64)
            .udp(40000, 443);
        let payload = [0xab; 8];
        let mut out = Vec::with_capacity(builder.size(payload.len()));
        builder.write(&mut out, &payload).unwrap();
        out
    }

    /// Ethernet + IPv4 + TCP frame between two addresses
    pub fn ethernet_tcp(src: [u8; 4], dst: [u8; 4]) -> Vec<u8> {
        let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
            .ipv4(src, dst, 64)
            .tcp(51000, 80, 1, 4096);
        let mut out = Vec::with_capacity(builder.size(0));
        builder.write(&mut out, &[]).unwrap();
        out
    }

    /// 802.1Q tagged Ethernet + IPv4 + UDP frame
    pub fn ethernet_vlan_udp(src: [u8; 4], dst: [u8; 4], vlan: u16) -> Vec<u8> {
        let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
            .single_vlan(VlanId::try_new(vlan).unwrap())
            .ipv4(src, dst, 64)
            .udp(40000, 53);
        let mut out = Vec::with_capacity(builder.size(0));
        builder.write(&mut out, &[]).unwrap();
        out
    }

    /// Ethernet + IPv6 + UDP frame
    pub fn ethernet_ipv6() -> Vec<u8> {
        let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
            .ipv6([0x20; 16], [0x21; 16], 64)
            .udp(40000, 53);
        let mut out = Vec::with_capacity(builder.size(0));
        builder.write(&mut out, &[]).unwrap();
        out
    }

    /// A minimal ARP request frame
    pub fn ethernet_arp() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&[0xff; 6]);
        out.extend_from_slice(&SRC_MAC);
        out.extend_from_slice(&[0x08, 0x06]);
        // htype, ptype, hlen, plen, oper
        out.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01]);
        out.extend_from_slice(&SRC_MAC);
        out.extend_from_slice(&[192, 168, 1, 5]);
        out.extend_from_slice(&[0x00; 6]);
        out.extend_from_slice(&[192, 168, 1, 1]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::test_frames::*;
    use super::*;

    #[test]
    fn test_decode_udp_frame() {
        let frame = ethernet_udp([192, 168, 1, 5], [93, 184, 216, 34]);
        let pkt = decode_frame(&frame, LinkKind::Ethernet, 1_700_000_000).unwrap();
        assert_eq!(pkt.source_address, Ipv4Addr::new(192, 168, 1, 5));
        assert_eq!(pkt.dest_address, Ipv4Addr::new(93, 184, 216, 34));
        assert_eq!(pkt.protocol, 17);
        assert_eq!(pkt.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_decode_tcp_frame_protocol() {
        let frame = ethernet_tcp([8, 8, 8, 8], [10, 0, 0, 7]);
        let pkt = decode_frame(&frame, LinkKind::Ethernet, 0).unwrap();
        assert_eq!(pkt.protocol, 6);
    }

    #[test]
    fn test_decode_raw_ip() {
        let frame = ethernet_udp([1, 2, 3, 4], [5, 6, 7, 8]);
        // Strip the 14 byte Ethernet header
        let pkt = decode_frame(&frame[14..], LinkKind::RawIp, 5).unwrap();
        assert_eq!(pkt.source_address, Ipv4Addr::new(1, 2, 3, 4));
        assert_eq!(pkt.dest_address, Ipv4Addr::new(5, 6, 7, 8));
    }

    #[test]
    fn test_decode_vlan_tagged_frame() {
        let frame = ethernet_vlan_udp([192, 168, 1, 5], [8, 8, 8, 8], 0x123);
        // EtherType 0x8100 after the MAC addresses
        assert_eq!(&frame[12..14], &[0x81, 0x00]);

        let pkt = decode_frame(&frame, LinkKind::Ethernet, 7).unwrap();
        assert_eq!(pkt.source_address, Ipv4Addr::new(192, 168, 1, 5));
        assert_eq!(pkt.dest_address, Ipv4Addr::new(8, 8, 8, 8));
        assert_eq!(pkt.protocol, 17);
        assert_eq!(pkt.timestamp, 7);
    }

    #[test]
    fn test_non_ip_frames_are_skipped() {
        assert!(decode_frame(&ethernet_arp(), LinkKind::Ethernet, 0).is_none());
        assert!(decode_frame(&ethernet_ipv6(), LinkKind::Ethernet, 0).is_none());
    }

    #[test]
    fn test_malformed_frames_are_skipped() {
        assert!(decode_frame(&[], LinkKind::Ethernet, 0).is_none());
        assert!(decode_frame(&[0x45, 0x00, 0x00], LinkKind::RawIp, 0).is_none());

        let mut truncated = ethernet_udp([1, 2, 3, 4], [5, 6, 7, 8]);
        truncated.truncate(20);
        assert!(decode_frame(&truncated, LinkKind::Ethernet, 0).is_none());
    }
}
