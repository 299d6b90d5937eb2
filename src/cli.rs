use clap::Parser;

use crate::common::globals;

/// lanwatch - live LAN traffic dashboard with on-demand host discovery.
#[derive(Parser, Debug)]
#[command(name = globals::APP_NAME, author, version, about, long_about = None)]
pub struct Cli {
    /// Network interface to capture on (first enumerated device if omitted)
    #[arg(short, long, value_name = "INTERFACE")]
    pub interface: Option<String>,

    /// Dashboard refresh period in seconds
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value_t = globals::DEFAULT_REFRESH_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub refresh: u64,

    /// Per-port connect timeout for the discovery scan, in milliseconds
    #[arg(
        short,
        long,
        value_name = "MILLIS",
        default_value_t = globals::DEFAULT_CONNECT_TIMEOUT.as_millis() as u64
    )]
    pub timeout_ms: u64,

    /// Ports probed during discovery, in order (default: 80,443,22)
    #[arg(short, long, value_name = "PORTS", value_delimiter = ',')]
    pub ports: Option<Vec<u16>>,

    /// Skip reverse hostname resolution for discovered hosts
    #[arg(short, long)]
    pub numeric: bool,
}

impl Cli {
    pub fn scan_ports(&self) -> Vec<u16> {
        self.ports
            .clone()
            .unwrap_or_else(|| globals::DEFAULT_SCAN_PORTS.to_vec())
    }
}
