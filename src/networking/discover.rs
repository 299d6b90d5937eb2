use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream};
use std::time::Duration;

use ipnetwork::{IpNetworkError, Ipv4Network};
use log::{debug, info};
use thiserror::Error;

use crate::common::globals::UNKNOWN_HOSTNAME;
use crate::networking::subnet::{increment_address, is_excluded_address};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid subnet {cidr:?}: {source}")]
    InvalidSubnet {
        cidr: String,
        #[source]
        source: IpNetworkError,
    },
}

/// A host that answered the connect scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub addr: Ipv4Addr,
    pub hostname: String,
}

/// Walk the subnet in ascending address order and try a TCP connect on each
/// candidate port; the first accepted connection marks the host as active
/// and ends probing for that address. Refusals and timeouts are the normal
/// case and are simply skipped. The result is deduplicated and preserves
/// discovery order.
pub fn scan_network(
    cidr: &str,
    ports: &[u16],
    timeout: Duration,
    resolve: bool,
) -> Result<Vec<Device>, ScanError> {
    let subnet: Ipv4Network = cidr.parse().map_err(|source| ScanError::InvalidSubnet {
        cidr: cidr.to_string(),
        source,
    })?;

    info!("scanning subnet {}", subnet);

    let mut found: Vec<Device> = Vec::new();
    let mut addr = subnet.network();
    while subnet.contains(addr) {
        if !is_excluded_address(&addr.to_string()) {
            for &port in ports {
                let target = SocketAddr::from((addr, port));
                match TcpStream::connect_timeout(&target, timeout) {
                    Ok(_stream) => {
                        debug!("{} accepted the connection", target);
                        if !found.iter().any(|d| d.addr == addr) {
                            found.push(Device {
                                addr,
                                hostname: resolve_hostname(addr, resolve),
                            });
                        }
                        break;
                    }
                    // closed, filtered or timed out; try the next port
                    Err(_) => {}
                }
            }
        }

        let next = increment_address(addr);
        if next == subnet.network() {
            break; // wrapped around the whole address space
        }
        addr = next;
    }

    info!("scan finished, {} active host(s)", found.len());
    Ok(found)
}

fn resolve_hostname(addr: Ipv4Addr, resolve: bool) -> String {
    if !resolve {
        return UNKNOWN_HOSTNAME.to_string();
    }
    match dns_lookup::lookup_addr(&IpAddr::V4(addr)) {
        Ok(name) => name,
        Err(e) => {
            debug!("reverse lookup for {} failed: {}", addr, e);
            UNKNOWN_HOSTNAME.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn loopback_listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    // A port that was just bound and released, so nothing is listening on it.
    fn closed_port() -> u16 {
        let (listener, port) = loopback_listener();
        drop(listener);
        port
    }

    const TIMEOUT: Duration = Duration::from_millis(250);

    #[test]
    fn invalid_cidr_is_rejected() {
        let err = scan_network("not-a-subnet", &[80], TIMEOUT, false).unwrap_err();
        assert!(matches!(err, ScanError::InvalidSubnet { .. }));
    }

    #[test]
    fn finds_exactly_the_listening_host() {
        let (_listener, port) = loopback_listener();
        let devices = scan_network("127.0.0.0/30", &[port], TIMEOUT, false).unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].addr, Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(devices[0].hostname, UNKNOWN_HOSTNAME);
    }

    #[test]
    fn host_answering_only_the_last_port_is_still_found_once() {
        let (_listener, open) = loopback_listener();
        let ports = [closed_port(), closed_port(), open];
        let devices = scan_network("127.0.0.1/32", &ports, TIMEOUT, false).unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].addr, Ipv4Addr::new(127, 0, 0, 1));
    }

    #[test]
    fn multiple_open_ports_yield_a_single_entry() {
        let (_a, port_a) = loopback_listener();
        let (_b, port_b) = loopback_listener();
        let devices = scan_network("127.0.0.1/32", &[port_a, port_b], TIMEOUT, false).unwrap();
        assert_eq!(devices.len(), 1);
    }

    #[test]
    fn excluded_suffixes_are_never_probed() {
        let (_listener, port) = loopback_listener();
        // /32 around an address ending in .0: the only candidate is excluded.
        let devices = scan_network("127.0.0.0/32", &[port], TIMEOUT, false).unwrap();
        assert!(devices.is_empty());
    }
}
