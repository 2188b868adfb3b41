//! Builders for synthetic frames and libpcap files used by the unit tests.

use std::fs;
use std::io;
use std::path::Path;

pub(crate) const ETHERNET_HEADER_LEN: usize = 14;

const PCAP_MAGIC_MICROS: u32 = 0xa1b2_c3d4;

fn ethernet_header(ethertype: u16) -> Vec<u8> {
    let mut header = vec![0x02, 0x00, 0x00, 0x00, 0x00, 0x02]; // destination
    header.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]); // source
    header.extend_from_slice(&ethertype.to_be_bytes());
    header
}

fn ipv4_header(protocol: u8, payload_len: usize) -> Vec<u8> {
    let total_len = (20 + payload_len) as u16;
    let mut header = vec![0x45, 0x00];
    header.extend_from_slice(&total_len.to_be_bytes());
    header.extend_from_slice(&[0x00, 0x01, 0x40, 0x00, 64, protocol, 0x00, 0x00]);
    header.extend_from_slice(&[10, 0, 0, 1]);
    header.extend_from_slice(&[10, 0, 0, 2]);
    header
}

/// Ethernet + IPv4 + UDP frame carrying `payload`.
pub(crate) fn udp_frame(payload: &[u8]) -> Vec<u8> {
    let udp_len = (8 + payload.len()) as u16;
    let mut frame = ethernet_header(0x0800);
    frame.extend(ipv4_header(17, udp_len as usize));
    frame.extend_from_slice(&5004u16.to_be_bytes());
    frame.extend_from_slice(&5005u16.to_be_bytes());
    frame.extend_from_slice(&udp_len.to_be_bytes());
    frame.extend_from_slice(&[0x00, 0x00]);
    frame.extend_from_slice(payload);
    frame
}

/// Ethernet + IPv4 + TCP (no options) frame carrying `payload`.
pub(crate) fn tcp_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = ethernet_header(0x0800);
    frame.extend(ipv4_header(6, 20 + payload.len()));
    frame.extend_from_slice(&443u16.to_be_bytes());
    frame.extend_from_slice(&51000u16.to_be_bytes());
    frame.extend_from_slice(&1u32.to_be_bytes()); // sequence
    frame.extend_from_slice(&1u32.to_be_bytes()); // acknowledgement
    frame.extend_from_slice(&[0x50, 0x18, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00]);
    frame.extend_from_slice(payload);
    frame
}

pub(crate) fn arp_frame() -> Vec<u8> {
    let mut frame = ethernet_header(0x0806);
    frame.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 6, 4, 0x00, 0x01]);
    frame.extend_from_slice(&[0u8; 20]);
    frame
}

/// In-memory libpcap file (microsecond timestamps, little endian).
pub(crate) struct PcapFixture {
    linktype: u32,
    frames: Vec<(f64, Vec<u8>)>,
}

impl PcapFixture {
    pub(crate) fn ethernet() -> Self {
        Self::with_linktype(1)
    }

    pub(crate) fn with_linktype(linktype: u32) -> Self {
        Self {
            linktype,
            frames: Vec::new(),
        }
    }

    pub(crate) fn frame(mut self, timestamp: f64, data: Vec<u8>) -> Self {
        self.frames.push((timestamp, data));
        self
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&PCAP_MAGIC_MICROS.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&4u16.to_le_bytes());
        bytes.extend_from_slice(&0i32.to_le_bytes()); // thiszone
        bytes.extend_from_slice(&0u32.to_le_bytes()); // sigfigs
        bytes.extend_from_slice(&65535u32.to_le_bytes()); // snaplen
        bytes.extend_from_slice(&self.linktype.to_le_bytes());

        for (timestamp, data) in &self.frames {
            let seconds = timestamp.trunc();
            let micros = ((timestamp - seconds) * 1_000_000.0).round();
            bytes.extend_from_slice(&(seconds as u32).to_le_bytes());
            bytes.extend_from_slice(&(micros as u32).to_le_bytes());
            bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
            bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
            bytes.extend_from_slice(data);
        }
        bytes
    }

    pub(crate) fn write(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_bytes())
    }
}
