use std::sync::Arc;

use parking_lot::Mutex;

use crate::networking::classify::{classify, Bucket, PacketMeta};

/// Running traffic counters. Only ever read or written under the lock held
/// by [`SharedStats`], so a snapshot is always internally consistent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrafficStats {
    pub packets: u64,
    pub bytes: u64,
    pub tcp: u64,
    pub udp: u64,
    pub icmp: u64,
    pub others: u64,
}

impl TrafficStats {
    /// Apply one classified packet: totals always, bucket only when the
    /// frame carried a network layer.
    fn apply(&mut self, bucket: Option<Bucket>, len: u64) {
        self.packets += 1;
        self.bytes += len;
        match bucket {
            Some(Bucket::Tcp) => self.tcp += 1,
            Some(Bucket::Udp) => self.udp += 1,
            Some(Bucket::Icmp) => self.icmp += 1,
            Some(Bucket::Other) => self.others += 1,
            None => {}
        }
    }
}

/// Handle to the shared counter aggregate. Cloned into every task that
/// needs it; all access goes through the single mutex so readers can never
/// observe a half-applied update.
#[derive(Clone)]
pub struct SharedStats {
    inner: Arc<Mutex<TrafficStats>>,
}

impl SharedStats {
    pub fn new() -> Self {
        SharedStats {
            inner: Arc::new(Mutex::new(TrafficStats::default())),
        }
    }

    /// Classify a packet and fold it into the counters as one atomic unit.
    pub fn record(&self, meta: &PacketMeta) {
        let bucket = classify(meta);
        self.inner.lock().apply(bucket, meta.len as u64);
    }

    /// Consistent point-in-time copy of all counters.
    pub fn snapshot(&self) -> TrafficStats {
        self.inner.lock().clone()
    }
}

impl Default for SharedStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networking::classify::Transport;

    fn meta(len: usize, transport: Option<Transport>, is_icmp: bool) -> PacketMeta {
        PacketMeta {
            len,
            has_network: true,
            transport,
            is_icmp,
        }
    }

    fn no_network_meta(len: usize) -> PacketMeta {
        PacketMeta {
            len,
            has_network: false,
            transport: None,
            is_icmp: false,
        }
    }

    #[test]
    fn mixed_sequence_yields_expected_aggregate() {
        let stats = SharedStats::new();
        stats.record(&meta(100, Some(Transport::Tcp), false));
        stats.record(&meta(50, Some(Transport::Udp), false));
        stats.record(&no_network_meta(20));

        let snap = stats.snapshot();
        assert_eq!(
            snap,
            TrafficStats {
                packets: 3,
                bytes: 170,
                tcp: 1,
                udp: 1,
                icmp: 0,
                others: 0,
            }
        );
    }

    #[test]
    fn bucketed_packets_keep_counter_sum_invariant() {
        let stats = SharedStats::new();
        let inputs = [
            meta(10, Some(Transport::Tcp), false),
            meta(20, Some(Transport::Udp), false),
            meta(30, None, true),
            meta(40, Some(Transport::Other), false),
            meta(50, None, false),
        ];
        for m in &inputs {
            stats.record(m);
            let s = stats.snapshot();
            assert_eq!(s.packets, s.tcp + s.udp + s.icmp + s.others);
        }
    }

    #[test]
    fn frames_without_network_layer_only_touch_totals() {
        let stats = SharedStats::new();
        stats.record(&no_network_meta(64));
        let snap = stats.snapshot();
        assert_eq!(snap.packets, 1);
        assert_eq!(snap.bytes, 64);
        assert_eq!(snap.tcp + snap.udp + snap.icmp + snap.others, 0);
    }

    #[test]
    fn concurrent_readers_never_see_torn_updates() {
        let stats = SharedStats::new();
        let writer = {
            let stats = stats.clone();
            std::thread::spawn(move || {
                for _ in 0..5_000 {
                    stats.record(&meta(60, Some(Transport::Tcp), false));
                }
            })
        };

        for _ in 0..1_000 {
            let s = stats.snapshot();
            assert_eq!(s.packets, s.tcp);
            assert_eq!(s.bytes, s.packets * 60);
        }
        writer.join().unwrap();

        let s = stats.snapshot();
        assert_eq!(s.packets, 5_000);
        assert_eq!(s.bytes, 300_000);
    }
}
