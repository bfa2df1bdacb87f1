use futures_util::StreamExt;
use logcast_protocol::LogRecord;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::error::ClientError;

pub struct LogcastClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl LogcastClient {
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (stream, _response) = connect_async(url)
            .await
            .map_err(|source| ClientError::Connect {
                url: url.to_string(),
                source,
            })?;

        debug!(%url, "websocket connection opened");
        Ok(LogcastClient { stream })
    }

    /// Waits for the next record.
    ///
    /// `Ok(None)` means the server closed the connection cleanly. Empty
    /// messages are skipped, control frames are handled transparently.
    pub async fn next_record(&mut self) -> Result<Option<LogRecord>, ClientError> {
        loop {
            let message = match self.stream.next().await {
                Some(Ok(message)) => message,
                Some(Err(tungstenite::Error::ConnectionClosed)) | None => return Ok(None),
                Some(Err(e)) => return Err(e.into()),
            };

            match message {
                Message::Text(text) => {
                    if text.is_empty() {
                        warn!("empty log message received");
                        continue;
                    }
                    return Ok(Some(LogRecord::new(text.as_str())));
                }
                Message::Binary(payload) => {
                    if payload.is_empty() {
                        warn!("empty log message received");
                        continue;
                    }
                    return Ok(Some(LogRecord::from_utf8(payload)?));
                }
                Message::Close(frame) => {
                    match frame {
                        Some(frame) => info!(
                            code = ?frame.code,
                            reason = frame.reason.as_str(),
                            "closed cleanly"
                        ),
                        None => info!("closed cleanly"),
                    }
                    return Ok(None);
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
    }

    /// Sends a close frame and waits for the server to acknowledge it.
    pub async fn close(mut self) -> Result<(), ClientError> {
        match self.stream.close(None).await {
            Ok(()) | Err(tungstenite::Error::ConnectionClosed) => {}
            Err(e) => return Err(e.into()),
        }
        // drain until the closing handshake completes
        while let Some(Ok(_)) = self.stream.next().await {}
        Ok(())
    }
}
