//! Start-up and graceful shutdown of the source and hub tasks.
//!
//! ```text
//!   Running ──shutdown()──► ShuttingDown ──source + hub joined──► Stopped
//! ```
//!
//! `shutdown()` raises a `watch` flag that both loops observe at their next
//! suspension point, joins the source (which drops the only channel sender),
//! joins the hub (which closes the registry) and only then returns. A closed
//! registry refuses new consumers, so `Stopped` stays empty.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::info;

use crate::core::error::LifecycleError;
use crate::core::hub::Hub;
use crate::core::source::{MessageSource, RecordProducer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    ShuttingDown,
    Stopped,
}

struct Tasks {
    source: JoinHandle<u64>,
    hub: JoinHandle<()>,
}

pub struct Lifecycle {
    hub: Arc<Hub>,
    shutdown_tx: watch::Sender<bool>,
    state_tx: watch::Sender<LifecycleState>,
    tasks: Mutex<Option<Tasks>>,
}

impl Lifecycle {
    /// Wires the distribution channel and spawns the source and hub tasks.
    pub fn start<P: RecordProducer>(hub: Arc<Hub>, producer: P) -> Self {
        let config = hub.config().clone();
        let (record_tx, record_rx) = mpsc::channel(config.effective_capacity());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (state_tx, _) = watch::channel(LifecycleState::Running);

        let source =
            MessageSource::new(config.period, producer).spawn(record_tx, shutdown_rx.clone());
        let hub_task = {
            let hub = Arc::clone(&hub);
            tokio::spawn(async move { hub.run(record_rx, shutdown_rx).await })
        };

        info!(?config, "lifecycle running");

        Self {
            hub,
            shutdown_tx,
            state_tx,
            tasks: Mutex::new(Some(Tasks {
                source,
                hub: hub_task,
            })),
        }
    }

    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    pub fn state(&self) -> LifecycleState {
        *self.state_tx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state() == LifecycleState::Running
    }

    pub fn subscribe_state(&self) -> watch::Receiver<LifecycleState> {
        self.state_tx.subscribe()
    }

    /// Flag raised when shutdown begins. The transport uses it to stop
    /// accepting and to close its open connections.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Stops production and distribution and waits until both tasks exited.
    ///
    /// Safe to call more than once or concurrently: later callers wait for
    /// the first one and then return `Ok`.
    pub async fn shutdown(&self) -> Result<(), LifecycleError> {
        let mut tasks = self.tasks.lock().await;
        let Some(Tasks { source, hub: hub_task }) = tasks.take() else {
            return Ok(());
        };

        self.state_tx.send_replace(LifecycleState::ShuttingDown);
        info!("shutting down");
        self.shutdown_tx.send_replace(true);

        let source_result = source.await;
        let hub_result = hub_task.await;

        // a panicked hub never reached its own close()
        self.hub.registry().close().await;
        self.state_tx.send_replace(LifecycleState::Stopped);

        let produced = source_result.map_err(|source| LifecycleError::TaskPanicked {
            task: "source",
            source,
        })?;
        hub_result.map_err(|source| LifecycleError::TaskPanicked { task: "hub", source })?;

        info!(produced, "lifecycle stopped");
        Ok(())
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        self.shutdown_tx.send_replace(true);
    }
}

/// Resolves once `signal` is raised or its sender is gone.
pub async fn stopped(signal: &mut watch::Receiver<bool>) {
    loop {
        if *signal.borrow_and_update() {
            return;
        }
        if signal.changed().await.is_err() {
            return;
        }
    }
}
