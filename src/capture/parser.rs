use std::path::{Path, PathBuf};

use log::{debug, warn};
use pcap::Capture;
use thiserror::Error;

use crate::capture::payload::LinkLayer;
use crate::capture::record::{CaptureRecord, CaptureRecordBuilder};

#[derive(Error, Debug)]
pub enum CaptureReadError {
    #[error("Cannot open capture file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        source: pcap::Error,
    },

    #[error("Malformed capture file '{}' after {frame} frames: {source}", path.display())]
    Malformed {
        path: PathBuf,
        frame: u64,
        source: pcap::Error,
    },

    #[error("Capture file '{}' uses unsupported link type {linktype}", path.display())]
    UnsupportedLinkType { path: PathBuf, linktype: i32 },
}

impl CaptureReadError {
    /// The capture file that could not be read.
    pub fn path(&self) -> &Path {
        match self {
            CaptureReadError::Open { path, .. }
            | CaptureReadError::Malformed { path, .. }
            | CaptureReadError::UnsupportedLinkType { path, .. } => path,
        }
    }
}

/// Turns a libpcap capture file into a [`CaptureRecord`].
///
/// The parser holds no state between files: every call to [`parse`] starts
/// from a fresh builder.
///
/// [`parse`]: CaptureParser::parse
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureParser;

impl CaptureParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse<P: AsRef<Path>>(&self, path: P) -> Result<CaptureRecord, CaptureReadError> {
        let path = path.as_ref();

        let mut capture = Capture::from_file(path).map_err(|source| CaptureReadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let linktype = capture.get_datalink().0;
        let link = LinkLayer::from_linktype(linktype).ok_or_else(|| {
            CaptureReadError::UnsupportedLinkType {
                path: path.to_path_buf(),
                linktype,
            }
        })?;

        let mut builder = CaptureRecordBuilder::new(path);
        let mut frames: u64 = 0;

        loop {
            match capture.next_packet() {
                Ok(packet) => {
                    frames += 1;
                    if let Some(size) = link.payload_len(packet.data) {
                        let ts = packet.header.ts;
                        builder.push(size, to_seconds(ts.tv_sec as i64, ts.tv_usec as i64));
                    }
                }
                Err(pcap::Error::NoMorePackets) => break,
                Err(source) => {
                    return Err(CaptureReadError::Malformed {
                        path: path.to_path_buf(),
                        frame: frames,
                        source,
                    })
                }
            }
        }

        if builder.negative_delays() > 0 {
            warn!(
                "{}: {} frames are timestamped before their predecessor",
                path.display(),
                builder.negative_delays()
            );
        }
        debug!(
            "{}: {} frames, {} with payload ({:?})",
            path.display(),
            frames,
            builder.len(),
            link
        );

        Ok(builder.finish())
    }
}

fn to_seconds(seconds: i64, micros: i64) -> f64 {
    seconds as f64 + micros as f64 / 1_000_000.0
}
