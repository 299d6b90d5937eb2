//! lanwatch - live LAN traffic dashboard with on-demand host discovery

mod cli;
mod common;
mod console;
mod networking;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::info;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use cli::Cli;
use common::globals;
use console::keys::ScanOptions;
use networking::capture;
use networking::SharedStats;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Cli::parse();

    // Fatal if no device or the handle cannot be opened; without a capture
    // handle there is nothing to monitor.
    let device = capture::pick_device(args.interface.as_deref())?;
    info!("capturing on device {}", device.name);
    let handle = capture::open_capture(device)?;

    let stats = SharedStats::new();
    let paused = Arc::new(AtomicBool::new(false));
    let cancel = CancellationToken::new();

    // Packet ingestion thread feeding the dispatcher below.
    let running = Arc::new(AtomicBool::new(true));
    let (tx, mut rx) = mpsc::channel(globals::CHANNEL_SIZE);
    let capture_thread = capture::spawn_capture(handle, tx, Arc::clone(&running));

    tokio::spawn(console::dashboard::run(
        stats.clone(),
        Arc::clone(&paused),
        cancel.clone(),
        Duration::from_secs(args.refresh),
    ));

    // Keyboard controller on a plain OS thread: event reads are blocking
    // and must not hold the runtime's blocking pool open on shutdown.
    {
        let paused = Arc::clone(&paused);
        let cancel = cancel.clone();
        let opts = ScanOptions {
            ports: args.scan_ports(),
            timeout: Duration::from_millis(args.timeout_ms),
            resolve: !args.numeric,
        };
        thread::spawn(move || console::keys::run(paused, cancel, opts));
    }

    // SIGTERM also shuts down cleanly, like the interrupt key.
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                cancel.cancel();
            }
        });
    }

    // Dispatcher: fold packets into the shared counters until an interrupt
    // signal or the quit key cancels the token.
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            maybe = rx.recv() => match maybe {
                Some(meta) => stats.record(&meta),
                None => break, // capture thread is gone
            },
            _ = &mut ctrl_c => {
                cancel.cancel();
                break;
            }
            _ = cancel.cancelled() => break,
        }
    }

    running.store(false, Ordering::Relaxed);
    let _ = capture_thread.join();

    // The keyboard thread may still be blocked in a read; restore the
    // terminal here before the process exits.
    let _ = crossterm::terminal::disable_raw_mode();
    console::io::println("Exiting...");
    console::io::flush();
    Ok(())
}
