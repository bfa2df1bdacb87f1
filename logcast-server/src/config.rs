use std::net::SocketAddr;
use std::time::Duration;

use logcast::HubConfig;

use crate::server::params::Params;

/// Everything the server binary needs; built from [`Params`] plus defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address of the HTTP/WebSocket listener.
    pub addr: SocketAddr,

    /// How long the listener may take to stop once shutdown began.
    pub grace_period: Duration,

    pub hub: HubConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            grace_period: Duration::from_secs(5),
            hub: HubConfig::default(),
        }
    }
}

impl From<Params> for ServerConfig {
    fn from(params: Params) -> Self {
        Self {
            addr: params.addr,
            ..Self::default()
        }
    }
}
