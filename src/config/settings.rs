use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    /// Extension of the files picked up from a capture folder.
    pub extension: String,
    /// Order discovered files by path instead of directory listing order.
    pub sort_paths: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub histogram_bins: usize,
    pub fit_points: usize,
    /// Presentation label per capture, by position in the batch.
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub pretty: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extension: "pcap".to_string(),
            sort_paths: false,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 50,
            fit_points: 1000,
            labels: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("res"),
            pretty: true,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read configuration '{}'", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid configuration '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), content)
            .with_context(|| format!("Cannot write configuration '{}'", path.as_ref().display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.analysis.histogram_bins == 0 {
            bail!("analysis.histogram_bins must be at least 1");
        }
        if self.analysis.fit_points == 0 {
            bail!("analysis.fit_points must be at least 1");
        }
        if self.input.extension.trim_start_matches('.').is_empty() {
            bail!("input.extension must not be empty");
        }
        Ok(())
    }
}
