#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use logcast::core::Hub;
use tokio::net::TcpListener;

pub async fn local_listener() -> (TcpListener, SocketAddr) {
    let listener = logcast_server::server::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no local address");
    (listener, addr)
}

pub fn ws_url(addr: SocketAddr) -> String {
    format!("ws://{}/ws", addr)
}

/// Polls the registry until it holds `expected` consumers.
pub async fn wait_for_members(hub: &Hub, expected: usize) {
    let polled = tokio::time::timeout(Duration::from_secs(5), async {
        while hub.registry().len().await != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(polled.is_ok(), "registry never reached {} members", expected);
}
