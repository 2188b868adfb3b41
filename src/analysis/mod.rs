pub mod session;
pub mod statistics;

pub use session::AnalysisSession;
pub use statistics::{
    combined_ccdf, combined_size_cdf, empirical_ccdf, empirical_cdf, exponential_fit, histogram,
    summarize, Distribution, ExponentialFit, FitCurve, Histogram, RecordSummary, StatsError,
};
