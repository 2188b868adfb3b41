use pnet::packet::ethernet::{EtherType, EtherTypes, EthernetPacket};
use pnet::packet::ip::{IpNextHeaderProtocol, IpNextHeaderProtocols};
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::tcp::TcpPacket;
use pnet::packet::udp::UdpPacket;
use pnet::packet::vlan::VlanPacket;
use pnet::packet::Packet;

// libpcap LINKTYPE_* values
const LINKTYPE_NULL: i32 = 0;
const LINKTYPE_ETHERNET: i32 = 1;
const LINKTYPE_RAW_BSD: i32 = 12;
const LINKTYPE_RAW_BSDOS: i32 = 14;
const LINKTYPE_RAW: i32 = 101;
const LINKTYPE_LOOP: i32 = 108;
const LINKTYPE_LINUX_SLL: i32 = 113;
const LINKTYPE_IPV4: i32 = 228;
const LINKTYPE_IPV6: i32 = 229;
const LINKTYPE_LINUX_SLL2: i32 = 276;

const LOOPBACK_HEADER_LEN: usize = 4;
const SLL_HEADER_LEN: usize = 16;
const SLL2_HEADER_LEN: usize = 20;
const UDP_HEADER_LEN: usize = 8;
const ICMP_HEADER_LEN: usize = 8;

/// Framing of the frames stored in a capture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkLayer {
    Ethernet,
    /// BSD loopback: 4-byte address family, then an IP packet.
    Loopback,
    /// Bare IP packet, version taken from the first nibble.
    RawIp,
    Ipv4,
    Ipv6,
    LinuxSll,
    LinuxSll2,
}

impl LinkLayer {
    pub fn from_linktype(linktype: i32) -> Option<Self> {
        match linktype {
            LINKTYPE_ETHERNET => Some(LinkLayer::Ethernet),
            LINKTYPE_NULL | LINKTYPE_LOOP => Some(LinkLayer::Loopback),
            LINKTYPE_RAW | LINKTYPE_RAW_BSD | LINKTYPE_RAW_BSDOS => Some(LinkLayer::RawIp),
            LINKTYPE_IPV4 => Some(LinkLayer::Ipv4),
            LINKTYPE_IPV6 => Some(LinkLayer::Ipv6),
            LINKTYPE_LINUX_SLL => Some(LinkLayer::LinuxSll),
            LINKTYPE_LINUX_SLL2 => Some(LinkLayer::LinuxSll2),
            _ => None,
        }
    }

    /// Length of the application-layer payload carried by `frame`.
    ///
    /// Returns `None` for frames without payload: non-IP traffic, bare
    /// transport headers (TCP ACKs, empty datagrams) and frames too short to
    /// hold the headers they announce.
    pub fn payload_len(self, frame: &[u8]) -> Option<usize> {
        let len = match self {
            LinkLayer::Ethernet => {
                let ethernet = EthernetPacket::new(frame)?;
                ethertype_payload(ethernet.get_ethertype(), ethernet.payload())
            }
            LinkLayer::Loopback => ip_payload(frame.get(LOOPBACK_HEADER_LEN..)?),
            LinkLayer::RawIp => ip_payload(frame),
            LinkLayer::Ipv4 => ipv4_payload(frame),
            LinkLayer::Ipv6 => ipv6_payload(frame),
            LinkLayer::LinuxSll => {
                let protocol = read_u16(frame, SLL_HEADER_LEN - 2)?;
                ethertype_payload(EtherType(protocol), frame.get(SLL_HEADER_LEN..)?)
            }
            LinkLayer::LinuxSll2 => {
                let protocol = read_u16(frame, 0)?;
                ethertype_payload(EtherType(protocol), frame.get(SLL2_HEADER_LEN..)?)
            }
        }?;

        (len > 0).then_some(len)
    }
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn ethertype_payload(ethertype: EtherType, data: &[u8]) -> Option<usize> {
    match ethertype {
        EtherTypes::Ipv4 => ipv4_payload(data),
        EtherTypes::Ipv6 => ipv6_payload(data),
        // 802.1Q, 802.1ad and the legacy QinQ tag all share the same layout
        EtherTypes::Vlan | EtherType(0x88a8) | EtherType(0x9100) => {
            let vlan = VlanPacket::new(data)?;
            ethertype_payload(vlan.get_ethertype(), vlan.payload())
        }
        _ => None,
    }
}

fn ip_payload(data: &[u8]) -> Option<usize> {
    match data.first()? >> 4 {
        4 => ipv4_payload(data),
        6 => ipv6_payload(data),
        _ => None,
    }
}

fn ipv4_payload(data: &[u8]) -> Option<usize> {
    let ipv4 = Ipv4Packet::new(data)?;
    // Trailing fragments carry no transport header, their bytes are all data.
    if ipv4.get_fragment_offset() > 0 {
        return Some(ipv4.payload().len());
    }
    transport_payload(ipv4.get_next_level_protocol(), ipv4.payload())
}

fn ipv6_payload(data: &[u8]) -> Option<usize> {
    let ipv6 = Ipv6Packet::new(data)?;
    transport_payload(ipv6.get_next_header(), ipv6.payload())
}

fn transport_payload(protocol: IpNextHeaderProtocol, data: &[u8]) -> Option<usize> {
    match protocol {
        IpNextHeaderProtocols::Tcp => TcpPacket::new(data).map(|tcp| tcp.payload().len()),
        IpNextHeaderProtocols::Udp => UdpPacket::new(data).map(|udp| {
            let captured = udp.payload().len();
            match (udp.get_length() as usize).checked_sub(UDP_HEADER_LEN) {
                Some(declared) => declared.min(captured),
                None => captured,
            }
        }),
        IpNextHeaderProtocols::Icmp | IpNextHeaderProtocols::Icmpv6 => {
            Some(data.len().saturating_sub(ICMP_HEADER_LEN))
        }
        _ => Some(data.len()),
    }
}
