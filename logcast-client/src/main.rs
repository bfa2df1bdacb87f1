use anyhow::Result;
use clap::Parser;
use logcast_client::LogcastClient;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "logcast-client")]
struct Params {
    #[arg(long, env = "LOGCAST_URL", default_value = "ws://localhost:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .with_thread_ids(true)
        .compact()
        .init();

    let params = Params::parse();
    let mut client = LogcastClient::connect(&params.url).await?;

    loop {
        match client.next_record().await {
            Ok(Some(record)) => info!("log message received: {}", record),
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "connection died");
                break;
            }
        }
    }

    Ok(())
}
