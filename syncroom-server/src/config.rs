use crate::error::ConfigError;
use std::env;
use std::net::SocketAddr;

const DEFAULT_PORT: u16 = 5000;

/// Environment-driven server configuration.
///
/// `SYNCROOM_ADDR` — listen address, default `0.0.0.0:5000`.
/// `SYNCROOM_ALLOWED_ORIGIN` — exact CORS origin; any origin when unset.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = match env::var("SYNCROOM_ADDR") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidAddr(raw))?,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
        };

        let allowed_origin = env::var("SYNCROOM_ALLOWED_ORIGIN").ok();

        Ok(Self {
            bind_addr,
            allowed_origin,
        })
    }
}
