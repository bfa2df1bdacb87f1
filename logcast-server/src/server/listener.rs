use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use logcast::core::lifecycle;
use logcast::core::Hub;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::error::ServerError;
use crate::server::{page, ws};

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub(crate) hub: Arc<Hub>,
    pub(crate) shutdown: watch::Receiver<bool>,
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// `/ws` upgrades to the record stream, `/` serves the log viewer page.
pub fn router(hub: Arc<Hub>, shutdown: watch::Receiver<bool>) -> Router {
    Router::new()
        .route("/ws", get(ws::upgrade))
        .route("/", get(page::index))
        .with_state(AppState { hub, shutdown })
}

/// Serves until `shutdown` is raised, then stops accepting and waits for
/// in-flight requests.
pub async fn serve(
    listener: TcpListener,
    hub: Arc<Hub>,
    shutdown: watch::Receiver<bool>,
) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    info!(%addr, "log streaming server listening");

    let mut signal = shutdown.clone();
    axum::serve(listener, router(hub, shutdown))
        .with_graceful_shutdown(async move { lifecycle::stopped(&mut signal).await })
        .await?;

    info!("listener stopped");
    Ok(())
}
