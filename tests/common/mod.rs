#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logcast::core::{ConsumerSink, ProduceError, RecordProducer, SendError};
use logcast::LogRecord;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// Records everything it is sent; can be switched to fail or stall.
#[derive(Default)]
pub struct TestSink {
    received: Mutex<Vec<String>>,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
    closes: AtomicUsize,
}

impl TestSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn stalled(delay: Duration) -> Arc<Self> {
        let sink = Self::default();
        *sink.delay.lock().unwrap() = Some(delay);
        Arc::new(sink)
    }

    /// Simulates the peer going away: every later send fails.
    pub fn break_connection(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConsumerSink for TestSink {
    async fn send(&self, record: &LogRecord) -> Result<(), SendError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SendError::Closed);
        }
        self.received.lock().unwrap().push(record.as_str().to_string());
        Ok(())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Replays a fixed script; `None` entries fail the tick. Once the script is
/// exhausted every tick fails.
pub struct ScriptedProducer {
    script: VecDeque<Option<String>>,
}

impl ScriptedProducer {
    pub fn new<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            script: script.into_iter().map(|s| s.map(Into::into)).collect(),
        }
    }
}

impl RecordProducer for ScriptedProducer {
    fn produce(&mut self, _tick: DateTime<Utc>) -> Result<LogRecord, ProduceError> {
        match self.script.pop_front() {
            Some(Some(text)) => Ok(LogRecord::from(text)),
            Some(None) => Err(ProduceError::Unavailable("scripted failure".into())),
            None => Err(ProduceError::Unavailable("script exhausted".into())),
        }
    }
}
