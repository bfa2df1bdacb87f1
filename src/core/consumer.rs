use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use logcast_protocol::LogRecord;

use crate::core::error::SendError;

/// Process-unique identity of a connected consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumerId(u64);

impl ConsumerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "consumer-{}", self.0)
    }
}

/// Write half of a consumer connection, owned by the transport.
///
/// The hub only ever calls [`send`](Self::send) and [`close`](Self::close).
/// `send` must be safe to call while the transport reads from the same
/// connection, and must fail instead of waiting forever on a dead peer.
#[async_trait]
pub trait ConsumerSink: Send + Sync + 'static {
    async fn send(&self, record: &LogRecord) -> Result<(), SendError>;

    async fn close(&self);
}

/// A registered receiver: its identity plus a non-owning handle to the
/// connection's write half.
#[derive(Clone)]
pub struct Consumer {
    id: ConsumerId,
    sink: Arc<dyn ConsumerSink>,
}

impl Consumer {
    pub fn new(id: ConsumerId, sink: Arc<dyn ConsumerSink>) -> Self {
        Self { id, sink }
    }

    pub fn id(&self) -> ConsumerId {
        self.id
    }

    pub fn sink(&self) -> &Arc<dyn ConsumerSink> {
        &self.sink
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer").field("id", &self.id).finish()
    }
}
