pub mod errors;
pub mod record;

// Public re-exports for easy access
pub use errors::ProtocolError;
pub use record::{LogRecord, RecordFields};
