use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinError;

use crate::core::consumer::ConsumerId;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("Consumer connection closed")]
    Closed,

    #[error("Send timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Consumer {0} is already registered")]
    AlreadyRegistered(ConsumerId),

    #[error("Registry is closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum ProduceError {
    #[error("Record source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("{task} task terminated abnormally: {source}")]
    TaskPanicked {
        task: &'static str,
        #[source]
        source: JoinError,
    },
}
