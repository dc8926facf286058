//! Listener settings for the HTTP services
//!
//! Values come from `<PREFIX>_HOST` / `<PREFIX>_PORT` environment variables
//! layered over built-in defaults.

use config::{Config, Environment};
use serde::Deserialize;

/// Bind address for a service
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load settings for the service identified by `prefix` (e.g. `AUTH`)
    pub fn load(prefix: &str, default_port: u16) -> anyhow::Result<Self> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(default_port))?
            .add_source(Environment::with_prefix(prefix))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// `host:port` string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
