use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use logcast_protocol::LogRecord;
use tokio::sync::{mpsc, watch};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::core::consumer::{Consumer, ConsumerId, ConsumerSink};
use crate::core::error::{RegistryError, SendError};
use crate::core::registry::ConsumerRegistry;
use crate::HubConfig;

/// Outcome of one fan-out pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FanOut {
    pub delivered: usize,
    pub evicted: Vec<ConsumerId>,
}

/// Distributes a single producer's records to every registered consumer.
///
/// The hub is the only reader of the distribution channel and the only
/// writer into consumer connections.
pub struct Hub {
    registry: Arc<ConsumerRegistry>,
    config: HubConfig,
    next_consumer_id: AtomicU64,
}

impl Hub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            registry: Arc::new(ConsumerRegistry::new()),
            config,
            next_consumer_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ConsumerRegistry> {
        &self.registry
    }

    /// Registers a freshly accepted connection and returns its identity.
    ///
    /// Fails with [`RegistryError::Closed`] once the distribution loop ended.
    pub async fn connect(
        &self,
        sink: Arc<dyn ConsumerSink>,
    ) -> Result<ConsumerId, RegistryError> {
        let id = ConsumerId::new(self.next_consumer_id.fetch_add(1, Ordering::Relaxed));
        self.registry.register(Consumer::new(id, sink)).await?;
        info!(consumer_id = %id, "consumer connected");
        Ok(id)
    }

    /// Counterpart of [`connect`](Self::connect) for a connection the
    /// transport saw close. Returns false if the consumer was already gone.
    pub async fn disconnect(&self, id: ConsumerId) -> bool {
        let removed = self.registry.unregister(id).await.is_some();
        if removed {
            info!(consumer_id = %id, "consumer disconnected");
        }
        removed
    }

    /// Sends `record` to every consumer registered when the pass begins.
    ///
    /// A failed or timed out send evicts and closes that consumer only; the
    /// rest of the pass is unaffected and the error is not propagated.
    pub async fn distribute(&self, record: &LogRecord) -> FanOut {
        let send_timeout = self.config.send_timeout;
        let mut visited = 0usize;

        let evicted = self
            .registry
            .for_each(|consumer| {
                visited += 1;
                let record = record.clone();
                async move {
                    match timeout(send_timeout, consumer.sink().send(&record)).await {
                        Ok(sent) => sent,
                        Err(_) => Err(SendError::Timeout(send_timeout)),
                    }
                }
            })
            .await;

        let mut fan_out = FanOut {
            delivered: visited - evicted.len(),
            evicted: Vec::with_capacity(evicted.len()),
        };

        for gone in evicted {
            let id = gone.consumer.id();
            warn!(consumer_id = %id, error = %gone.error, "send failed; evicting consumer");
            if timeout(send_timeout, gone.consumer.sink().close()).await.is_err() {
                debug!(consumer_id = %id, "close did not complete in time");
            }
            fan_out.evicted.push(id);
        }

        fan_out
    }

    /// Distribution loop. Returns once shutdown is signalled or the channel
    /// is closed and drained; the registry is closed on the way out, so no
    /// consumer can join a hub that no longer distributes.
    ///
    /// Records still queued when shutdown is observed are discarded.
    pub async fn run(
        &self,
        mut records: mpsc::Receiver<LogRecord>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!("broadcast hub started");

        loop {
            if *shutdown.borrow_and_update() {
                discard_queued(&mut records);
                break;
            }

            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() {
                        // signal owner is gone; nobody can stop us later
                        discard_queued(&mut records);
                        break;
                    }
                }

                next = records.recv() => match next {
                    Some(record) => {
                        let fan_out = self.distribute(&record).await;
                        debug!(
                            record = %record,
                            delivered = fan_out.delivered,
                            evicted = fan_out.evicted.len(),
                            "record distributed"
                        );
                    }
                    None => {
                        info!("distribution channel closed and drained");
                        break;
                    }
                },
            }
        }

        let cleared = self.registry.close().await;
        info!(cleared, "broadcast hub stopped");
    }
}

fn discard_queued(records: &mut mpsc::Receiver<LogRecord>) {
    records.close();
    let mut discarded = 0usize;
    while records.try_recv().is_ok() {
        discarded += 1;
    }
    info!(discarded, "shutdown observed; stopping distribution");
}
