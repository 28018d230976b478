//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tictactoe::{
    StoreConfig,
    store::config::{DEFAULT_INVITE_BASE_URL, DEFAULT_RETENTION_SECS},
};

/// Bind address used when neither `--bind` nor `SERVER_BIND` is given.
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8000);

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Base URL of the web client, used to build invite links
    pub frontend_url: String,
    /// Seconds a game is kept before it is swept
    pub retention_secs: i64,
    /// Prometheus scrape listener, disabled when unset
    pub metrics_bind: Option<SocketAddr>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env(bind_override: Option<SocketAddr>) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_env("SERVER_BIND")?.unwrap_or(DEFAULT_BIND),
        };

        let frontend_url = non_empty_env("FRONTEND_URL")
            .or_else(|| non_empty_env("GAME_URL"))
            .unwrap_or_else(|| DEFAULT_INVITE_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let retention_secs = parse_env("GAME_RETENTION_SECS")?.unwrap_or(DEFAULT_RETENTION_SECS);
        let metrics_bind = parse_env("METRICS_BIND")?;

        Ok(ServerConfig {
            bind,
            frontend_url,
            retention_secs,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retention_secs <= 0 {
            return Err(ConfigError::Invalid {
                var: "GAME_RETENTION_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if !(self.frontend_url.starts_with("http://") || self.frontend_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid {
                var: "FRONTEND_URL".to_string(),
                reason: format!("Must be an http(s) URL, got '{}'", self.frontend_url),
            });
        }

        Ok(())
    }

    /// Settings handed to the game store
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            retention: chrono::Duration::seconds(self.retention_secs),
            invite_base_url: self.frontend_url.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND,
            frontend_url: DEFAULT_INVITE_BASE_URL.to_string(),
            retention_secs: DEFAULT_RETENTION_SECS,
            metrics_bind: None,
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an environment variable, treating unset or blank as `None`
fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    non_empty_env(key)
        .map(|v| {
            v.parse().map_err(|e: T::Err| ConfigError::Invalid {
                var: key.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}
