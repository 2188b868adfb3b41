// Library exports for packet-analyzer
pub mod analysis;
pub mod capture;
pub mod config;
pub mod utils;
pub mod visualization;

pub use analysis::{session, statistics};
pub use capture::{discovery, parser, payload, record};
pub use config::settings;
pub use utils::formatting;
pub use visualization::{charts, export};

pub use analysis::{AnalysisSession, StatsError};
pub use capture::{CaptureParser, CaptureReadError, CaptureRecord};

// Error types
pub use anyhow::{Error, Result};
