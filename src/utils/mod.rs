pub mod formatting;

pub use formatting::{format_bytes, format_rate, format_seconds};
