use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use logcast::core::LifecycleError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Server did not stop within the {0:?} grace period")]
    ShutdownTimeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Server task failed: {0}")]
    Task(#[from] JoinError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}
