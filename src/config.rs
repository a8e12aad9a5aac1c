use std::{env, net::SocketAddr, time::Duration};

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub system_protocol: String,
    pub system_properties_path: String,
    pub fetch_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
    #[error("SYSTEM_PROTOCOL must be http or https")]
    InvalidProtocol,
    #[error("SYSTEM_PROPERTIES_PATH must start with '/'")]
    InvalidPropertiesPath,
    #[error("FETCH_TIMEOUT_SECS must be a positive integer")]
    InvalidFetchTimeout,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = read("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = read("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(9080);

        let system_protocol = read("SYSTEM_PROTOCOL")
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_else(|| "http".to_string());
        if system_protocol != "http" && system_protocol != "https" {
            return Err(ConfigError::InvalidProtocol);
        }

        let system_properties_path =
            read("SYSTEM_PROPERTIES_PATH").unwrap_or_else(|| "/system/properties".to_string());
        if !system_properties_path.starts_with('/') {
            return Err(ConfigError::InvalidPropertiesPath);
        }

        let fetch_timeout = read("FETCH_TIMEOUT_SECS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or(ConfigError::InvalidFetchTimeout)
            })
            .transpose()?
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        let config = Self {
            bind_addr,
            bind_port,
            system_protocol,
            system_properties_path,
            fetch_timeout,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}
