mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use logcast::core::{Hub, Lifecycle, LifecycleState, RegistryError, TimestampProducer};
use logcast::HubConfig;

use crate::common::{init_tracing, ScriptedProducer, TestSink};

fn hub(period: Duration) -> Arc<Hub> {
    Arc::new(Hub::new(HubConfig::default().period(period)))
}

#[tokio::test(start_paused = true)]
async fn test_records_flow_until_shutdown() {
    init_tracing();
    let lifecycle = Lifecycle::start(hub(Duration::from_secs(5)), TimestampProducer);
    let sink = TestSink::new();
    lifecycle.hub().connect(sink.clone()).await.unwrap();
    assert!(lifecycle.is_running());

    tokio::time::sleep(Duration::from_secs(16)).await;
    lifecycle.shutdown().await.expect("clean shutdown");

    let received = sink.received();
    assert_eq!(received.len(), 3, "one record per elapsed period");

    let hashes: HashSet<_> = received
        .iter()
        .map(|text| {
            let record = logcast::LogRecord::from(text.as_str());
            record.fields().expect("default layout").hash.to_string()
        })
        .collect();
    assert_eq!(hashes.len(), received.len(), "record ids are unique");

    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    assert!(!lifecycle.is_running());
    assert!(lifecycle.hub().registry().is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_records_arrive_in_production_order() {
    let script = (0..5).map(|n| Some(format!("record-{n}")));
    let lifecycle = Lifecycle::start(hub(Duration::from_secs(1)), ScriptedProducer::new(script));
    let sink = TestSink::new();
    lifecycle.hub().connect(sink.clone()).await.unwrap();

    tokio::time::sleep(Duration::from_millis(5_500)).await;
    lifecycle.shutdown().await.unwrap();

    let expected: Vec<String> = (0..5).map(|n| format!("record-{n}")).collect();
    assert_eq!(sink.received(), expected);
}

#[tokio::test(start_paused = true)]
async fn test_failing_producer_skips_ticks() {
    let script = vec![Some("first"), None, None, Some("fourth")];
    let lifecycle = Lifecycle::start(hub(Duration::from_secs(1)), ScriptedProducer::new(script));
    let sink = TestSink::new();
    lifecycle.hub().connect(sink.clone()).await.unwrap();

    tokio::time::sleep(Duration::from_millis(4_500)).await;
    lifecycle.shutdown().await.unwrap();

    assert_eq!(sink.received(), vec!["first".to_string(), "fourth".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_twice_is_harmless() {
    let lifecycle = Lifecycle::start(hub(Duration::from_secs(5)), TimestampProducer);
    lifecycle.hub().connect(TestSink::new()).await.unwrap();

    lifecycle.shutdown().await.unwrap();
    lifecycle.shutdown().await.unwrap();

    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    assert!(lifecycle.hub().registry().is_empty().await);
}

#[tokio::test]
async fn test_concurrent_shutdown_calls_both_return() {
    let lifecycle = Arc::new(Lifecycle::start(hub(Duration::from_millis(10)), TimestampProducer));

    let first = {
        let lifecycle = Arc::clone(&lifecycle);
        tokio::spawn(async move { lifecycle.shutdown().await })
    };
    let second = {
        let lifecycle = Arc::clone(&lifecycle);
        tokio::spawn(async move { lifecycle.shutdown().await })
    };

    let (first, second) = tokio::time::timeout(Duration::from_secs(5), async {
        (first.await.unwrap(), second.await.unwrap())
    })
    .await
    .expect("shutdown must not deadlock");

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_state_and_signal_observers_see_transitions() {
    let lifecycle = Lifecycle::start(hub(Duration::from_secs(5)), TimestampProducer);
    let mut states = lifecycle.subscribe_state();
    let mut signal = lifecycle.shutdown_signal();
    assert!(!*signal.borrow());

    lifecycle.shutdown().await.unwrap();

    assert!(*signal.borrow_and_update());
    assert_eq!(*states.borrow_and_update(), LifecycleState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_full_channel_does_not_block_shutdown() {
    // a stalled consumer keeps the hub busy while the source fills the channel
    let config = HubConfig::default()
        .period(Duration::from_millis(10))
        .channel_capacity(1)
        .send_timeout(Duration::from_secs(3_600));
    let lifecycle = Lifecycle::start(Arc::new(Hub::new(config)), TimestampProducer);
    lifecycle
        .hub()
        .connect(TestSink::stalled(Duration::from_secs(60)))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;

    let shutdown = tokio::time::timeout(Duration::from_secs(120), lifecycle.shutdown()).await;
    assert!(matches!(shutdown, Ok(Ok(()))));
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_stopped_hub_refuses_new_consumers() {
    let lifecycle = Lifecycle::start(hub(Duration::from_secs(5)), TimestampProducer);
    lifecycle.shutdown().await.unwrap();

    let late = TestSink::new();
    let joined = lifecycle.hub().connect(late.clone()).await;
    assert_eq!(joined, Err(RegistryError::Closed));

    lifecycle.shutdown().await.unwrap();
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    assert!(lifecycle.hub().registry().is_empty().await);
    assert!(late.received().is_empty());
}
