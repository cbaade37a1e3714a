//! Configuration types.
//!
//! Everything is read from the process environment (optionally seeded from a
//! `.env` file in `main`).

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default listen port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 5000;

/// Default HubSpot API host.
pub const DEFAULT_HUBSPOT_BASE_URL: &str = "https://api.hubapi.com";

/// Default Aircall API host.
pub const DEFAULT_AIRCALL_BASE_URL: &str = "https://api.aircall.io";

/// HubSpot CRM credentials and endpoint.
#[derive(Debug, Clone)]
pub struct HubspotConfig {
    pub base_url: String,
    pub api_key: SecretString,
}

/// Aircall credentials and endpoint.
#[derive(Debug, Clone)]
pub struct AircallConfig {
    pub base_url: String,
    pub api_id: String,
    pub api_token: SecretString,
}

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    pub hubspot: HubspotConfig,
    pub aircall: AircallConfig,
    /// Timeout applied to every outbound request. `None` waits indefinitely.
    pub http_timeout: Option<Duration>,
}

impl RelayConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("'{raw}' is not a valid port"),
            })?,
            None => DEFAULT_PORT,
        };

        let http_timeout = match lookup("RELAY_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "RELAY_HTTP_TIMEOUT_SECS".to_string(),
                    message: format!("'{raw}' is not a whole number of seconds"),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let hubspot = HubspotConfig {
            base_url: lookup("HUBSPOT_BASE_URL")
                .unwrap_or_else(|| DEFAULT_HUBSPOT_BASE_URL.to_string()),
            api_key: SecretString::from(required("HS_API_KEY")?),
        };

        let aircall = AircallConfig {
            base_url: lookup("AIRCALL_BASE_URL")
                .unwrap_or_else(|| DEFAULT_AIRCALL_BASE_URL.to_string()),
            api_id: required("API_ID")?,
            api_token: SecretString::from(required("API_TOKEN")?),
        };

        Ok(Self {
            host,
            port,
            hubspot,
            aircall,
            http_timeout,
        })
    }

    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
