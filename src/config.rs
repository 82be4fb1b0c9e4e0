//! Service configuration loaded from environment variables.
//!
//! ## Required
//! - `DATABASE_URL` - Postgres connection string
//! - `KASSALAPP_API_KEY` - bearer token for the upstream price API
//!
//! ## Optional
//! - `KASSALAPP_BASE_URL` - upstream base URL (default: https://kassal.app/api/v1)
//! - `HOST` - bind address (default: 127.0.0.1)
//! - `PORT` - listen port (default: 3000)
//! - `UPSTREAM_TIMEOUT_SECS` - upstream request timeout (default: 10)
//! - `PERSIST_TIMEOUT_SECS` - bound on the ingest transaction (default: 10)

use std::net::IpAddr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://kassal.app/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    pub upstream: UpstreamConfig,
    pub persist_timeout: Duration,
}

/// Settings for the upstream product-search API.
///
/// `Debug` comes from `SecretString`, which prints the key redacted.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: SecretString,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup, so tests need not touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let database_url = SecretString::from(required("DATABASE_URL")?);
        let api_key = SecretString::from(required("KASSALAPP_API_KEY")?);

        let base_url = lookup("KASSALAPP_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let host = parse_or(&lookup, "HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or(&lookup, "PORT", 3000u16)?;
        let upstream_secs = parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let persist_secs = parse_or(&lookup, "PERSIST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            database_url,
            host,
            port,
            upstream: UpstreamConfig {
                base_url,
                api_key,
                timeout: Duration::from_secs(upstream_secs),
            },
            persist_timeout: Duration::from_secs(persist_secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        _ => Ok(default),
    }
}
