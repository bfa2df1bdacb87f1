use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use logcast::core::{lifecycle, ConsumerSink, RegistryError, SendError};
use logcast_protocol::LogRecord;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::server::listener::AppState;

pub(crate) async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Write half of an upgraded connection, as seen by the hub.
struct WsConsumer {
    sink: Mutex<SplitSink<WebSocket, Message>>,
}

#[async_trait]
impl ConsumerSink for WsConsumer {
    async fn send(&self, record: &LogRecord) -> Result<(), SendError> {
        self.sink
            .lock()
            .await
            .send(Message::Text(record.as_str().into()))
            .await
            .map_err(|e| SendError::Transport(e.to_string()))
    }

    async fn close(&self) {
        // the peer may already be gone
        let _ = self.sink.lock().await.close().await;
    }
}

/// Registers the connection, reads until the peer leaves or shutdown begins,
/// then unregisters it. Anything the client sends is ignored.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let mut shutdown = state.shutdown.clone();
    let (sink, mut stream) = socket.split();
    let consumer = Arc::new(WsConsumer {
        sink: Mutex::new(sink),
    });

    if *shutdown.borrow_and_update() {
        consumer.close().await;
        return;
    }

    let id = match state.hub.connect(consumer.clone()).await {
        Ok(id) => id,
        Err(RegistryError::Closed) => {
            debug!("hub stopped before the connection could register");
            consumer.close().await;
            return;
        }
        Err(e) => {
            warn!(error = %e, "could not register connection");
            consumer.close().await;
            return;
        }
    };

    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(frame))) => {
                    debug!(consumer_id = %id, ?frame, "client closed the connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(consumer_id = %id, error = %e, "connection read failed");
                    break;
                }
                None => break,
            },
            _ = lifecycle::stopped(&mut shutdown) => {
                debug!(consumer_id = %id, "closing connection for shutdown");
                break;
            }
        }
    }

    state.hub.disconnect(id).await;
    consumer.close().await;
}
