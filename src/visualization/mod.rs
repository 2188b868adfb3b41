pub mod charts;
pub mod export;

pub use charts::{build_artifacts, Artifact, CaptureTable, Chart, ChartOptions};
pub use export::{render_all, ChartRenderer, JsonRenderer};
