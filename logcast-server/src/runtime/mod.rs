/*
Ties the broadcast core to the network listener for the lifetime of the process:

start source + hub -> serve -> wait for shutdown -> stop source + hub -> give the
listener `grace_period` to finish, or fail
*/
use std::future::Future;
use std::sync::Arc;

use logcast::core::{Hub, Lifecycle, TimestampProducer};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::server;

mod signal;

pub use signal::wait_for_shutdown_signal;

pub async fn run<F>(config: ServerConfig, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()>,
{
    let listener = server::bind(config.addr).await?;
    run_on(listener, config, shutdown).await
}

/// Same as [`run`] on an already bound listener.
pub async fn run_on<F>(
    listener: TcpListener,
    config: ServerConfig,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()>,
{
    let hub = Arc::new(Hub::new(config.hub.clone()));
    let lifecycle = Lifecycle::start(Arc::clone(&hub), TimestampProducer);
    let mut listener_task = tokio::spawn(server::serve(
        listener,
        Arc::clone(&hub),
        lifecycle.shutdown_signal(),
    ));

    tokio::select! {
        _ = shutdown => info!("shutdown requested"),
        finished = &mut listener_task => {
            // the listener gave up on its own; stop the core before reporting it
            lifecycle.shutdown().await?;
            return match finished {
                Ok(result) => result,
                Err(e) => Err(e.into()),
            };
        }
    }

    lifecycle.shutdown().await?;

    match timeout(config.grace_period, listener_task).await {
        Ok(joined) => joined??,
        Err(_) => {
            error!(grace_period = ?config.grace_period, "server shutdown failed");
            return Err(ServerError::ShutdownTimeout(config.grace_period));
        }
    }

    info!("server exited properly");
    Ok(())
}
