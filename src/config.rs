//! Host configuration parsed from environment variables.
//!
//! `.env` is loaded by `main` before this runs, so local overrides and the
//! process environment read the same way.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} ({reason})")]
    Invalid { var: &'static str, value: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Overrides the Leptos site root (where `pkg/` is served from).
    pub site_root: Option<String>,
}

impl ServerConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `HOST`: bind address, default `0.0.0.0`
    /// - `PORT`: default 3000
    /// - `DEVHIVE_SITE_ROOT`: overrides `[package.metadata.leptos] site-root`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `HOST` or `PORT` do not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host_raw = non_empty(lookup("HOST")).unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let host = host_raw.parse::<IpAddr>().map_err(|e| ConfigError::Invalid {
            var: "HOST",
            value: host_raw.clone(),
            reason: e.to_string(),
        })?;

        let port = match non_empty(lookup("PORT")) {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
        };

        let site_root = non_empty(lookup("DEVHIVE_SITE_ROOT"));

        Ok(Self { host, port, site_root })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}
