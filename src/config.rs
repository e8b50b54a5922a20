use anyhow::Result;
use figment::{providers::{Env, Format, Serialized, Toml}, Figment};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub tariff: TariffConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            enable_cors: false,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Flat-tariff operation settings: the fixed horizon and the unit rate
/// applied to every charged or discharged unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    pub flat_horizon_steps: usize,
    pub flat_rate: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            flat_horizon_steps: 6,
            flat_rate: 0.1,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("BSCHED__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_flat_tariff_contract() {
        let cfg = Config::default();
        assert_eq!(cfg.tariff.flat_horizon_steps, 6);
        assert_eq!(cfg.tariff.flat_rate, 0.1);
    }

    #[test]
    fn test_socket_addr_parses() {
        let cfg = Config::default();
        assert!(cfg.server.socket_addr().is_ok());
    }
}
