use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;

use tokio::sync::Mutex;
use tracing::debug;

use crate::core::consumer::{Consumer, ConsumerId};
use crate::core::error::{RegistryError, SendError};

/// A consumer removed during [`ConsumerRegistry::for_each`], with the error
/// that caused the removal.
#[derive(Debug)]
pub struct Evicted {
    pub consumer: Consumer,
    pub error: SendError,
}

/// Set of connected consumers, keyed by identity.
///
/// One mutex guards the whole set. It is held for the entire duration of
/// `for_each`, so a slow consumer write also stalls registration and the next
/// broadcast. Fine at this scale; per-consumer outboxes would lift that.
///
/// Once [`close`](Self::close)d the registry stays empty for good.
#[derive(Debug, Default)]
pub struct ConsumerRegistry {
    members: Mutex<Members>,
}

#[derive(Debug, Default)]
struct Members {
    consumers: HashMap<ConsumerId, Consumer>,
    closed: bool,
}

impl ConsumerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a consumer. Registering an identity twice is rejected and leaves
    /// the existing entry untouched; so is any registration after `close`.
    pub async fn register(&self, consumer: Consumer) -> Result<(), RegistryError> {
        let mut members = self.members.lock().await;
        if members.closed {
            return Err(RegistryError::Closed);
        }
        let consumers = &mut members.consumers;
        match consumers.entry(consumer.id()) {
            Entry::Occupied(_) => Err(RegistryError::AlreadyRegistered(consumer.id())),
            Entry::Vacant(slot) => {
                let id = consumer.id();
                slot.insert(consumer);
                debug!(consumer_id = %id, members = consumers.len(), "consumer registered");
                Ok(())
            }
        }
    }

    /// Removes a consumer if present. Returns the removed entry.
    pub async fn unregister(&self, id: ConsumerId) -> Option<Consumer> {
        let mut members = self.members.lock().await;
        let removed = members.consumers.remove(&id);
        if removed.is_some() {
            debug!(consumer_id = %id, members = members.consumers.len(), "consumer unregistered");
        }
        removed
    }

    /// Runs `f` once per registered consumer while holding the lock, so the
    /// membership seen here is frozen for the whole pass.
    ///
    /// Consumers for which `f` fails are removed before the lock is released
    /// and handed back to the caller.
    pub async fn for_each<F, Fut>(&self, mut f: F) -> Vec<Evicted>
    where
        F: FnMut(Consumer) -> Fut,
        Fut: Future<Output = Result<(), SendError>>,
    {
        let mut members = self.members.lock().await;

        let mut failed = Vec::new();
        for consumer in members.consumers.values() {
            if let Err(error) = f(consumer.clone()).await {
                failed.push((consumer.id(), error));
            }
        }

        failed
            .into_iter()
            .filter_map(|(id, error)| {
                members
                    .consumers
                    .remove(&id)
                    .map(|consumer| Evicted { consumer, error })
            })
            .collect()
    }

    /// Drops every entry without closing the connections behind them.
    pub async fn clear(&self) -> usize {
        let mut members = self.members.lock().await;
        let cleared = members.consumers.len();
        members.consumers.clear();
        cleared
    }

    /// Clears the registry and refuses every later registration, under one
    /// lock acquisition. Returns the number of entries dropped.
    pub async fn close(&self) -> usize {
        let mut members = self.members.lock().await;
        members.closed = true;
        let cleared = members.consumers.len();
        members.consumers.clear();
        cleared
    }

    pub async fn is_closed(&self) -> bool {
        self.members.lock().await.closed
    }

    pub async fn len(&self) -> usize {
        self.members.lock().await.consumers.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.members.lock().await.consumers.is_empty()
    }

    pub async fn contains(&self, id: ConsumerId) -> bool {
        self.members.lock().await.consumers.contains_key(&id)
    }

    /// Snapshot of the current membership.
    pub async fn ids(&self) -> Vec<ConsumerId> {
        self.members.lock().await.consumers.keys().copied().collect()
    }
}
