use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4050";
pub const DEFAULT_PILVYTIS_URL: &str = "https://pilvytis.mysterium.network/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Runtime configuration, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub pilvytis_url: String,
    pub upstream_timeout: Duration,
    /// Hex private keys of the identities this node can sign for.
    pub identity_keys: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: format!("{}", e),
            })?;

        let pilvytis_url = lookup("PILVYTIS_URL")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_PILVYTIS_URL.to_string());
        if !pilvytis_url.starts_with("http://") && !pilvytis_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "PILVYTIS_URL",
                reason: format!("'{}' is not an http(s) URL", pilvytis_url),
            });
        }

        let timeout_secs = match lookup("PILVYTIS_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "PILVYTIS_TIMEOUT_SECS",
                    reason: format!("'{}' is not a positive integer", raw),
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let identity_keys = lookup("IDENTITY_PRIVATE_KEYS")
            .map(|raw| {
                raw.split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            pilvytis_url,
            upstream_timeout: Duration::from_secs(timeout_secs),
            identity_keys,
        })
    }
}
