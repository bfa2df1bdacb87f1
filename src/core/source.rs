use std::time::Duration;

use chrono::{DateTime, Utc};
use logcast_protocol::LogRecord;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::error::ProduceError;

/// Builds one record per tick.
///
/// An error skips that tick; the source keeps running.
pub trait RecordProducer: Send + 'static {
    fn produce(&mut self, tick: DateTime<Utc>) -> Result<LogRecord, ProduceError>;
}

/// Default producer: a time-ordered UUID and the tick time.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampProducer;

impl RecordProducer for TimestampProducer {
    fn produce(&mut self, tick: DateTime<Utc>) -> Result<LogRecord, ProduceError> {
        Ok(LogRecord::stamped(Uuid::now_v7(), tick))
    }
}

/// Periodic producer feeding the distribution channel.
pub struct MessageSource<P> {
    period: Duration,
    producer: P,
}

impl<P: RecordProducer> MessageSource<P> {
    pub fn new(period: Duration, producer: P) -> Self {
        Self { period, producer }
    }

    /// Spawns [`run`](Self::run). The handle resolves to the number of
    /// records handed to the channel.
    pub fn spawn(
        self,
        sink: mpsc::Sender<LogRecord>,
        shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<u64> {
        tokio::spawn(self.run(sink, shutdown))
    }

    /// Produces a record every `period` (first one after a full period) until
    /// shutdown is signalled. When the channel is full the source waits for
    /// capacity rather than dropping the record.
    ///
    /// The source owns the only sender, so returning closes the channel.
    pub async fn run(
        mut self,
        sink: mpsc::Sender<LogRecord>,
        mut shutdown: watch::Receiver<bool>,
    ) -> u64 {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut produced = 0u64;

        info!(period = ?self.period, "message source started");

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            let record = match self.producer.produce(Utc::now()) {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "skipping tick; producer failed");
                    continue;
                }
            };

            tokio::select! {
                biased;

                _ = shutdown.changed() => {
                    debug!("shutdown while waiting for channel capacity; record dropped");
                    break;
                }
                sent = sink.send(record) => {
                    if sent.is_err() {
                        if *shutdown.borrow() {
                            break;
                        }
                        error!("distribution channel closed while the source is running");
                        debug_assert!(
                            false,
                            "hub dropped the distribution channel before the source stopped"
                        );
                        break;
                    }
                    produced += 1;
                }
            }
        }

        info!(produced, "message source stopped");
        produced
    }
}
