use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use pcap::{Active, Capture, Device};
use tokio::sync::mpsc;

use crate::common::globals::{CAPTURE_READ_TIMEOUT_MS, SNAPLEN};
use crate::networking::classify::{parse_packet, PacketMeta};

/// Pick the capture device: the named one if the operator asked for it,
/// otherwise the first enumerated device.
pub fn pick_device(preferred: Option<&str>) -> Result<Device> {
    let devices = Device::list().context("failed to enumerate capture devices")?;

    match preferred {
        Some(name) => devices
            .into_iter()
            .find(|d| d.name == name)
            .ok_or_else(|| anyhow!("capture device {:?} not found", name)),
        None => devices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no capture devices found")),
    }
}

/// Open a live capture handle on the device. Failure here is fatal to the
/// program; without a handle there is nothing to monitor.
pub fn open_capture(device: Device) -> Result<Capture<Active>> {
    let name = device.name.clone();
    Capture::from_device(device)
        .with_context(|| format!("failed to create capture on {:?}", name))?
        .promisc(true)
        .snaplen(SNAPLEN)
        .timeout(CAPTURE_READ_TIMEOUT_MS)
        .open()
        .with_context(|| format!("failed to open capture handle on {:?}", name))
}

/// Run the packet ingestion loop on its own OS thread (pcap reads are
/// blocking). Each frame is decoded to a [`PacketMeta`] and pushed down the
/// channel; the read timeout keeps the `running` flag observed even on an
/// idle link. Dropping the receiver or clearing the flag ends the loop, and
/// the capture handle is released when the thread returns.
pub fn spawn_capture(
    mut capture: Capture<Active>,
    tx: mpsc::Sender<PacketMeta>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            match capture.next_packet() {
                Ok(packet) => {
                    let meta = parse_packet(packet.data);
                    if tx.blocking_send(meta).is_err() {
                        debug!("packet channel closed, stopping capture");
                        break;
                    }
                }
                // no traffic within the read timeout; idle, not an error
                Err(pcap::Error::TimeoutExpired) => continue,
                Err(e) => {
                    warn!("capture read failed: {}", e);
                    break;
                }
            }
        }
    })
}
