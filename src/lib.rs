pub mod core;
mod config;

pub use config::HubConfig;
pub use logcast_protocol::LogRecord;
