use std::net::SocketAddr;

use thiserror::Error;

use crate::catalog::{BoxCatalog, CatalogError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u32 = 30 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },
    #[error("{var} must be a whole number of seconds, got {value}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("BOX_CATALOG is invalid: {0}")]
    Catalog(#[from] CatalogError),
}

/// Process settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    /// PostgreSQL reservation store; in-memory when absent
    pub database_url: Option<String>,
    /// Telegram bot credential; the Telegram transport runs only when set
    pub bot_token: Option<String>,
    pub catalog: BoxCatalog,
    /// `None` keeps abandoned sessions until restart
    pub session_idle_timeout: Option<chrono::Duration>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr = non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr.parse().map_err(|_| ConfigError::InvalidAddr {
            var: "BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        let catalog = match non_empty("BOX_CATALOG") {
            Some(list) => BoxCatalog::parse(&list)?,
            None => BoxCatalog::default(),
        };

        let idle_secs = match non_empty("SESSION_IDLE_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidNumber {
                var: "SESSION_IDLE_TIMEOUT_SECS",
                value: value.clone(),
            })?,
            None => DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
        };
        let session_idle_timeout = (idle_secs > 0)
            .then(|| chrono::Duration::seconds(i64::from(idle_secs)));

        Ok(Self {
            bind_addr,
            database_url: non_empty("DATABASE_URL"),
            bot_token: non_empty("BOT_TOKEN"),
            catalog,
            session_idle_timeout,
        })
    }
}
