use anyhow::{Context, Result};
use clap::Parser;
use logcast_server::runtime::{self, wait_for_shutdown_signal};
use logcast_server::server::params::Params;
use logcast_server::ServerConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .with_thread_ids(true)
        .compact()
        .init();

    let config = ServerConfig::from(Params::parse());
    info!("logcast starting with config: {:?}", config);

    runtime::run(config, async {
        match wait_for_shutdown_signal().await {
            Ok(()) => info!("termination signal received"),
            Err(e) => error!(error = %e, "could not install signal handlers; shutting down"),
        }
    })
    .await
    .context("log streaming server failed")
}
