use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use log::warn;
use tokio_util::sync::CancellationToken;

use crate::console::io;
use crate::networking::{discover, subnet};

/// Settings the discovery scan runs with, fixed at startup from the CLI.
pub struct ScanOptions {
    pub ports: Vec<u16>,
    pub timeout: Duration,
    pub resolve: bool,
}

/// Keyboard controller loop. Runs on its own OS thread with the terminal
/// in raw mode: `q` / Ctrl-C cancels the shared token, `d` pauses the
/// dashboard, runs a discovery scan and waits for a key before resuming.
pub fn run(paused: Arc<AtomicBool>, cancel: CancellationToken, opts: ScanOptions) {
    if let Err(e) = terminal::enable_raw_mode() {
        warn!("could not enable raw mode, keyboard control disabled: {}", e);
        return;
    }

    loop {
        if cancel.is_cancelled() {
            break;
        }
        let ev = match event::read() {
            Ok(ev) => ev,
            Err(e) => {
                warn!("keyboard read failed: {}", e);
                break;
            }
        };
        let Event::Key(key) = ev else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                cancel.cancel();
                break;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                cancel.cancel();
                break;
            }
            KeyCode::Char('d') | KeyCode::Char('D') => run_discovery(&paused, &opts),
            _ => {}
        }
    }

    let _ = terminal::disable_raw_mode();
}

/// Suspend the dashboard, scan the local subnet, show the results and wait
/// for an acknowledgment key. The capture loop keeps counting in the
/// background the whole time; only rendering is paused.
fn run_discovery(paused: &AtomicBool, opts: &ScanOptions) {
    paused.store(true, Ordering::Relaxed);

    io::clear_screen();
    io::println(&format!(
        "{}",
        "Discovering devices on your network...".bold()
    ));
    io::flush();

    match subnet::local_subnet() {
        Ok(cidr) => {
            io::print_info(&format!("Scanning subnet {}", cidr));
            io::flush();
            let result = discover::scan_network(
                &cidr.to_string(),
                &opts.ports,
                opts.timeout,
                opts.resolve,
            );
            match result {
                Ok(devices) if devices.is_empty() => io::println("No devices found."),
                Ok(devices) => {
                    io::println(&format!("Devices found: {}", devices.len()));
                    for device in &devices {
                        io::println(&format!(" - {:<15}  {}", device.addr, device.hostname));
                    }
                }
                Err(e) => io::print_error(&e.to_string()),
            }
        }
        Err(e) => io::print_error(&e.to_string()),
    }

    io::println("");
    io::println("Press any key to return to live stats.");
    io::flush();
    let _ = event::read();

    paused.store(false, Ordering::Relaxed);
}
