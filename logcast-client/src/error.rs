use logcast_protocol::ProtocolError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    #[error("Connection died: {0}")]
    ConnectionDied(#[from] tungstenite::Error),

    #[error("Malformed log record: {0}")]
    Protocol(#[from] ProtocolError),
}
