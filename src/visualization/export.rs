use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;

use crate::analysis::AnalysisSession;
use crate::visualization::charts::{Artifact, CaptureTable};

/// Consumer of the chart data built for a session.
///
/// Implementations turn an [`Artifact`] into something on disk (an image,
/// a data file) and report where it went.
pub trait ChartRenderer {
    fn render(&mut self, artifact: &Artifact) -> Result<PathBuf>;
}

/// Writes every artifact as `<name>.json` in an output directory.
pub struct JsonRenderer {
    directory: PathBuf,
    pretty: bool,
}

#[derive(Serialize)]
struct LabeledTable<'a> {
    label: &'a str,
    source: &'a Path,
    #[serde(flatten)]
    table: CaptureTable,
}

impl JsonRenderer {
    /// Creates `directory` when it does not exist yet.
    pub fn new<P: Into<PathBuf>>(directory: P, pretty: bool) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)
            .with_context(|| format!("Cannot create output directory '{}'", directory.display()))?;
        Ok(Self { directory, pretty })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let path = self.directory.join(format!("{name}.json"));
        let file = File::create(&path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, value)?;
        } else {
            serde_json::to_writer(&mut writer, value)?;
        }
        writer.flush()?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Writes the aligned `Size` / `Seconds` / `Inter-Message Delays` columns
    /// of every record as `table_<n>.json`, numbered from 1 in batch order.
    pub fn write_tables(&mut self, session: &AnalysisSession) -> Result<Vec<PathBuf>> {
        session
            .labeled_records()
            .enumerate()
            .map(|(index, (label, record))| {
                let table = LabeledTable {
                    label: &label,
                    source: record.source(),
                    table: CaptureTable::from(record),
                };
                self.write_json(&format!("table_{}", index + 1), &table)
            })
            .collect()
    }
}

impl ChartRenderer for JsonRenderer {
    fn render(&mut self, artifact: &Artifact) -> Result<PathBuf> {
        self.write_json(&artifact.name, &artifact.chart)
    }
}

/// Render `artifacts` in order, stopping at the first renderer failure.
pub fn render_all<R: ChartRenderer + ?Sized>(renderer: &mut R, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    artifacts
        .iter()
        .map(|artifact| {
            renderer
                .render(artifact)
                .with_context(|| format!("Cannot render chart '{}'", artifact.name))
        })
        .collect()
}
