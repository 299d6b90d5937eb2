use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::{IpNextHeaderProtocol, IpNextHeaderProtocols};
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::Packet;

/// Transport-layer type as declared by the IP header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Tcp,
    Udp,
    Other,
}

/// Protocol bucket a packet is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Tcp,
    Udp,
    Icmp,
    Other,
}

/// Per-packet metadata extracted from a captured frame. This is the only
/// thing that crosses from the capture thread to the dispatcher; the raw
/// frame is dropped as soon as it has been decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketMeta {
    pub len: usize,
    pub has_network: bool,
    pub transport: Option<Transport>,
    pub is_icmp: bool,
}

/// Decode an Ethernet frame just deep enough to classify it.
pub fn parse_packet(frame: &[u8]) -> PacketMeta {
    let mut meta = PacketMeta {
        len: frame.len(),
        has_network: false,
        transport: None,
        is_icmp: false,
    };

    let Some(eth) = EthernetPacket::new(frame) else {
        return meta;
    };

    match eth.get_ethertype() {
        EtherTypes::Ipv4 => {
            if let Some(ip) = Ipv4Packet::new(eth.payload()) {
                meta.has_network = true;
                apply_protocol(&mut meta, ip.get_next_level_protocol());
            }
        }
        EtherTypes::Ipv6 => {
            if let Some(ip) = Ipv6Packet::new(eth.payload()) {
                meta.has_network = true;
                apply_protocol(&mut meta, ip.get_next_header());
            }
        }
        // ARP and friends carry no network layer we care about
        _ => {}
    }

    meta
}

fn apply_protocol(meta: &mut PacketMeta, proto: IpNextHeaderProtocol) {
    match proto {
        IpNextHeaderProtocols::Tcp => meta.transport = Some(Transport::Tcp),
        IpNextHeaderProtocols::Udp => meta.transport = Some(Transport::Udp),
        // ICMPv4 is not a transport; it gets its own bucket. ICMPv6 lands
        // in the catch-all below, matching the reference behavior.
        IpNextHeaderProtocols::Icmp => meta.is_icmp = true,
        _ => meta.transport = Some(Transport::Other),
    }
}

/// Map a packet to its bucket. `None` means the frame carried no network
/// layer: it still counts toward the packet/byte totals but credits no
/// bucket (an asymmetry kept for parity with the original behavior).
pub fn classify(meta: &PacketMeta) -> Option<Bucket> {
    if !meta.has_network {
        return None;
    }
    Some(match meta.transport {
        Some(Transport::Tcp) => Bucket::Tcp,
        Some(Transport::Udp) => Bucket::Udp,
        Some(Transport::Other) => Bucket::Other,
        None if meta.is_icmp => Bucket::Icmp,
        None => Bucket::Other,
    })
}
