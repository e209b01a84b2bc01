//! Gateway configuration

use market_data::seed::SeedConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Listener address plus the seeding parameters for the market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub bind_address: String,
    pub port: u16,
    pub market: SeedConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            market: SeedConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.bind_address, self.port).parse()?)
    }
}
