use std::path::Path;

use log::info;

use crate::capture::{CaptureParser, CaptureReadError, CaptureRecord};

/// A batch of parsed captures, kept in input order.
///
/// The session is the sole owner of its records; callers only ever get
/// shared views. Labels are given up front and matched to records by
/// position. A record without a label falls back to its file stem.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    parser: CaptureParser,
    records: Vec<CaptureRecord>,
    labels: Vec<String>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Parse one capture and append it. Nothing is appended on failure.
    pub fn add_capture<P: AsRef<Path>>(&mut self, path: P) -> Result<&CaptureRecord, CaptureReadError> {
        let record = self.parser.parse(path)?;
        info!(
            "Loaded {} ({} payload packets)",
            record.source().display(),
            record.len()
        );
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Parse `paths` in order, stopping at the first capture that cannot be read.
    ///
    /// Records parsed before the failing file stay in the session; files
    /// after it are never opened.
    pub fn add_all<I, P>(&mut self, paths: I) -> Result<(), CaptureReadError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.add_capture(path)?;
        }
        Ok(())
    }

    pub fn records(&self) -> &[CaptureRecord] {
        &self.records
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Presentation label of the record at `index`, `None` past the last record.
    pub fn label(&self, index: usize) -> Option<String> {
        let record = self.records.get(index)?;
        Some(
            self.labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| record.display_name()),
        )
    }

    pub fn labeled_records(&self) -> impl Iterator<Item = (String, &CaptureRecord)> + '_ {
        self.records.iter().enumerate().map(move |(index, record)| {
            let label = self
                .labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| record.display_name());
            (label, record)
        })
    }
}
