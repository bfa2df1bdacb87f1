pub mod client;
mod error;

pub use client::LogcastClient;
pub use error::ClientError;
