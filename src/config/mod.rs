pub mod settings;

pub use settings::{AnalysisConfig, Config, InputConfig, OutputConfig};
