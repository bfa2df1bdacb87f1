mod config;
pub mod error;
pub mod runtime;
pub mod server;

pub use config::ServerConfig;
pub use error::ServerError;
