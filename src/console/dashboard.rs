use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use colored::Colorize;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::common::globals::format_bytes;
use crate::console::io;
use crate::networking::stats::{SharedStats, TrafficStats};

/// Periodic renderer: every tick take a snapshot under the stats lock and
/// repaint the dashboard. Skips ticks while discovery owns the display;
/// never mutates any counter.
pub async fn run(
    stats: SharedStats,
    paused: Arc<AtomicBool>,
    cancel: CancellationToken,
    period: Duration,
) {
    let started = Local::now();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if paused.load(Ordering::Relaxed) {
            continue;
        }
        render(&stats.snapshot(), &started);
    }
}

fn render(snap: &TrafficStats, started: &DateTime<Local>) {
    io::clear_screen();
    io::println(&format!(
        "{}  (since {}, 'd' to discover devices, 'q' to quit)",
        "Traffic stats".bold(),
        started.format("%H:%M:%S")
    ));
    io::println("----------------------------------------------");
    io::println(&format!("Total packets: {}", snap.packets));
    io::println(&format!(
        "Total bytes  : {} ({})",
        snap.bytes,
        format_bytes(snap.bytes)
    ));
    io::println(&format!("TCP          : {}", snap.tcp));
    io::println(&format!("UDP          : {}", snap.udp));
    io::println(&format!("ICMP         : {}", snap.icmp));
    io::println(&format!("Others       : {}", snap.others));
    io::println("----------------------------------------------");
    io::flush();
}
