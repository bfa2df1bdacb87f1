use std::net::SocketAddr;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "logcast-server")]
pub struct Params {
    #[arg(long, env = "LOGCAST_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,
}
