// Address classification
//
// Decides whether an IPv4 address belongs to the host's local network or is
// the limited broadcast address. The local check is a textual prefix match on
// the decimal-dotted form, not a CIDR test: 172.17.x.x through 172.30.x.x are
// treated as remote even though RFC1918 reserves all of 172.16.0.0/12.

use std::net::Ipv4Addr;

/// Decimal-dotted prefixes treated as the local network
pub const LOCAL_PREFIXES: [&str; 4] = ["192.168.", "10.", "172.16.", "172.31."];

/// True iff `addr` is 255.255.255.255
pub fn is_broadcast(addr: Ipv4Addr) -> bool {
    addr == Ipv4Addr::BROADCAST
}

/// True iff the decimal-dotted form of `addr` starts with one of
/// [`LOCAL_PREFIXES`]
///
/// Known gap: 172.17.0.0 - 172.30.255.255 is not considered local.
pub fn is_local(addr: Ipv4Addr) -> bool {
    let dotted = addr.to_string();
    LOCAL_PREFIXES
        .iter()
        .any(|prefix| dotted.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ip(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    #[test]
    fn test_is_broadcast() {
        assert!(is_broadcast(ip("255.255.255.255")));
        assert!(!is_broadcast(ip("255.255.255.254")));
        assert!(!is_broadcast(ip("192.168.1.255")));
    }

    #[test]
    fn test_is_local_recognized_prefixes() {
        assert!(is_local(ip("192.168.1.5")));
        assert!(is_local(ip("10.0.0.1")));
        assert!(is_local(ip("172.16.4.4")));
        assert!(is_local(ip("172.31.255.1")));
    }

    #[test]
    fn test_is_local_middle_of_172_block_is_remote() {
        assert!(!is_local(ip("172.17.0.1")));
        assert!(!is_local(ip("172.20.10.3")));
        assert!(!is_local(ip("172.30.0.1")));
    }

    #[test]
    fn test_is_local_prefix_is_textual() {
        // "10." must match as a whole octet, so 100.x and 110.x are remote
        assert!(!is_local(ip("100.64.0.1")));
        assert!(!is_local(ip("110.0.0.1")));
        assert!(!is_local(ip("8.8.8.8")));
        assert!(!is_local(ip("192.169.0.1")));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_broadcast_only_for_all_ones(octets in any::<[u8; 4]>()) {
            let addr = Ipv4Addr::from(octets);
            prop_assert_eq!(is_broadcast(addr), octets == [255, 255, 255, 255]);
        }

        #[test]
        fn prop_recognized_prefixes_are_local(
            which in 0usize..4,
            a in any::<u8>(),
            b in any::<u8>(),
            c in any::<u8>(),
        ) {
            let addr = match which {
                0 => Ipv4Addr::new(192, 168, b, c),
                1 => Ipv4Addr::new(10, a, b, c),
                2 => Ipv4Addr::new(172, 16, b, c),
                _ => Ipv4Addr::new(172, 31, b, c),
            };
            prop_assert!(is_local(addr));
        }

        #[test]
        fn prop_unlisted_first_octets_are_remote(
            first in any::<u8>().prop_filter("not 10/172/192", |o| ![10, 172, 192].contains(o)),
            rest in any::<[u8; 3]>(),
        ) {
            let addr = Ipv4Addr::new(first, rest[0], rest[1], rest[2]);
            prop_assert!(!is_local(addr));
        }
    }
}
