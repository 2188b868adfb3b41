pub mod discovery;
pub mod parser;
pub mod payload;
pub mod record;

#[cfg(test)]
pub(crate) mod testutil;

pub use discovery::discover_captures;
pub use parser::{CaptureParser, CaptureReadError};
pub use payload::LinkLayer;
pub use record::{CaptureRecord, CaptureRecordBuilder};
