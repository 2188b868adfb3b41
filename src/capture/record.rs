use std::path::{Path, PathBuf};

/// Size and timing columns extracted from one capture file.
///
/// The three series are aligned: entry `i` of each describes the `i`-th
/// payload-bearing frame of the capture. A record is only ever produced by
/// [`CaptureRecordBuilder::finish`], so the alignment always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRecord {
    source: PathBuf,
    sizes: Vec<usize>,
    timestamps: Vec<f64>,
    inter_arrival_delays: Vec<f64>,
}

impl CaptureRecord {
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Payload length in bytes of every payload-bearing frame.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Capture timestamp in seconds of every payload-bearing frame.
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Seconds since the previous payload-bearing frame, `0.0` for the first one.
    pub fn inter_arrival_delays(&self) -> &[f64] {
        &self.inter_arrival_delays
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.sizes.iter().map(|&size| size as u64).sum()
    }

    /// Seconds between the first and the last payload-bearing frame.
    pub fn span_seconds(&self) -> f64 {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// File stem of the source capture, used when no explicit label is given.
    pub fn display_name(&self) -> String {
        self.source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// Mutable, in-progress form of a [`CaptureRecord`].
#[derive(Debug)]
pub struct CaptureRecordBuilder {
    source: PathBuf,
    sizes: Vec<usize>,
    timestamps: Vec<f64>,
    inter_arrival_delays: Vec<f64>,
    last_timestamp: Option<f64>,
    negative_delays: usize,
}

impl CaptureRecordBuilder {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            sizes: Vec::new(),
            timestamps: Vec::new(),
            inter_arrival_delays: Vec::new(),
            last_timestamp: None,
            negative_delays: 0,
        }
    }

    /// Append one payload-bearing frame.
    ///
    /// The delay is measured against the previous *payload-bearing* frame,
    /// so frames the parser skipped never shorten or stretch it. A negative
    /// delay (timestamps going backwards) is kept as-is.
    pub fn push(&mut self, size: usize, timestamp: f64) {
        let delay = match self.last_timestamp {
            Some(previous) => timestamp - previous,
            None => 0.0,
        };
        if delay < 0.0 {
            self.negative_delays += 1;
        }

        self.sizes.push(size);
        self.timestamps.push(timestamp);
        self.inter_arrival_delays.push(delay);
        self.last_timestamp = Some(timestamp);
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Number of frames whose timestamp went backwards so far.
    pub fn negative_delays(&self) -> usize {
        self.negative_delays
    }

    pub fn finish(self) -> CaptureRecord {
        CaptureRecord {
            source: self.source,
            sizes: self.sizes,
            timestamps: self.timestamps,
            inter_arrival_delays: self.inter_arrival_delays,
        }
    }
}
