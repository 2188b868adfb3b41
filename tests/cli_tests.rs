use assert_cmd::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// Minimal little-endian libpcap file of Ethernet/IPv4/UDP frames.
fn write_udp_capture(path: &Path, frames: &[(u32, u32, usize)]) {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&4u16.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 8]);
    bytes.extend_from_slice(&65535u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());

    for &(seconds, micros, payload) in frames {
        let udp_len = (8 + payload) as u16;
        let ip_len = 20 + udp_len;
        let mut frame = vec![0x02, 0, 0, 0, 0, 0x02, 0x02, 0, 0, 0, 0, 0x01, 0x08, 0x00];
        frame.extend_from_slice(&[0x45, 0x00]);
        frame.extend_from_slice(&ip_len.to_be_bytes());
        frame.extend_from_slice(&[0, 1, 0x40, 0, 64, 17, 0, 0, 10, 0, 0, 1, 10, 0, 0, 2]);
        frame.extend_from_slice(&[0x13, 0x8c, 0x13, 0x8d]);
        frame.extend_from_slice(&udp_len.to_be_bytes());
        frame.extend_from_slice(&[0, 0]);
        frame.extend(std::iter::repeat(0u8).take(payload));

        bytes.extend_from_slice(&seconds.to_le_bytes());
        bytes.extend_from_slice(&micros.to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&frame);
    }
    fs::write(path, bytes).unwrap();
}

#[test]
fn writes_chart_data_per_folder() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let recordings = dir.path().join("wireshark_recordings");
    fs::create_dir(&recordings)?;
    write_udp_capture(&recordings.join("audio.pcap"), &[(0, 0, 160), (0, 20_000, 160), (0, 60_000, 160)]);
    write_udp_capture(&recordings.join("text.pcap"), &[(5, 0, 40), (7, 500_000, 90)]);
    fs::write(recordings.join("readme.txt"), "not a capture")?;
    let output = dir.path().join("res");

    let mut cmd = Command::cargo_bin("packet-analyzer")?;
    cmd.arg(&recordings).arg("-o").arg(&output);
    cmd.assert().success();

    let batch = output.join("wireshark_recordings");
    for name in ["1", "2", "3", "4", "ccdf_combined", "packet_length_cdf", "table_1", "table_2"] {
        assert!(batch.join(format!("{name}.json")).is_file(), "missing {name}.json");
    }
    assert!(!batch.join("5.json").exists());
    Ok(())
}

#[test]
fn malformed_capture_aborts_the_batch() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let recordings = dir.path().join("attacker_attacked");
    fs::create_dir(&recordings)?;
    fs::write(recordings.join("corrupt.pcap"), b"definitely not pcap")?;

    let mut cmd = Command::cargo_bin("packet-analyzer")?;
    cmd.arg(&recordings).arg("-o").arg(dir.path().join("res"));
    let output = cmd.output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("corrupt.pcap"), "stderr was: {stderr}");
    Ok(())
}
