use std::net::{IpAddr, Ipv4Addr};

use ipnetwork::Ipv4Network;
use pnet::datalink;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubnetError {
    #[error("no active non-loopback IPv4 interface found")]
    NoInterfaceFound,
}

/// Find the local IPv4 subnet to scan: the first address of the first
/// interface that is up, not loopback and actually carries IPv4.
/// Interfaces that only speak IPv6 are skipped.
pub fn local_subnet() -> Result<Ipv4Network, SubnetError> {
    for interface in datalink::interfaces() {
        if !interface.is_up() || interface.is_loopback() {
            continue;
        }
        for net in &interface.ips {
            if let IpAddr::V4(addr) = net.ip() {
                if addr.is_loopback() {
                    continue;
                }
                if let Ok(subnet) = Ipv4Network::new(addr, net.prefix()) {
                    return Ok(subnet);
                }
            }
        }
    }
    Err(SubnetError::NoInterfaceFound)
}

/// Advance an address by one in network byte order, wrapping silently at
/// the top of the space. Callers bound iteration by subnet containment.
pub fn increment_address(ip: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(ip).wrapping_add(1))
}

/// Skip addresses ending in `.0` or `.255`. This is a textual stand-in for
/// "network / broadcast address" and is only accurate for /24-or-shorter
/// byte-aligned subnets; kept for parity with the reference behavior.
pub fn is_excluded_address(ip: &str) -> bool {
    ip.ends_with(".0") || ip.ends_with(".255")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_carries_into_the_next_octet() {
        let mut ip = Ipv4Addr::new(10, 0, 0, 0);
        for _ in 0..256 {
            ip = increment_address(ip);
        }
        assert_eq!(ip, Ipv4Addr::new(10, 0, 1, 0));
    }

    #[test]
    fn increment_wraps_at_the_top_of_the_space() {
        assert_eq!(
            increment_address(Ipv4Addr::new(255, 255, 255, 255)),
            Ipv4Addr::new(0, 0, 0, 0)
        );
    }

    #[test]
    fn network_and_broadcast_suffixes_are_excluded() {
        assert!(is_excluded_address("10.0.0.0"));
        assert!(is_excluded_address("10.0.0.255"));
        assert!(!is_excluded_address("10.0.0.1"));
        assert!(!is_excluded_address("10.0.0.25"));
    }
}
