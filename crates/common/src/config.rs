//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(anyhow::anyhow!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL). Items are kept in memory when unset.
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    /// Identity provider
    pub auth_issuer: String,
    pub auth_audience: String,
    pub auth_jwks_uri: String,
    pub jwks_requests_per_minute: u32,
    pub jwks_cache_ttl_secs: u64,

    /// Compiled UI bundle served for non-API paths
    pub static_dir: String,

    /// Runtime configuration
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub rust_log: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let auth_issuer =
            var("AUTH_ISSUER").ok_or_else(|| anyhow::anyhow!("AUTH_ISSUER is required"))?;
        let auth_audience =
            var("AUTH_AUDIENCE").ok_or_else(|| anyhow::anyhow!("AUTH_AUDIENCE is required"))?;
        let auth_jwks_uri =
            var("AUTH_JWKS_URI").unwrap_or_else(|| default_jwks_uri(&auth_issuer));

        let config = Self {
            database_url: var("DATABASE_URL"),
            database_max_connections: parse_or(
                var("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                10,
            )?,

            auth_issuer,
            auth_audience,
            auth_jwks_uri,
            jwks_requests_per_minute: parse_or(
                var("JWKS_REQUESTS_PER_MINUTE"),
                "JWKS_REQUESTS_PER_MINUTE",
                5,
            )?,
            jwks_cache_ttl_secs: parse_or(
                var("JWKS_CACHE_TTL_SECS"),
                "JWKS_CACHE_TTL_SECS",
                36_000,
            )?,

            static_dir: var("STATIC_DIR").unwrap_or_else(|| "./public".to_string()),

            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(var("PORT"), "PORT", 3000)?,
            log_format: var("LOG_FORMAT")
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or_default(),
            rust_log: var("RUST_LOG")
                .unwrap_or_else(|| "gearshare=info,tower_http=info".to_string()),
        };

        Ok(config)
    }
}

/// Conventional key-set location for an issuer origin
fn default_jwks_uri(issuer: &str) -> String {
    format!("{}/.well-known/jwks.json", issuer.trim_end_matches('/'))
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: '{}'", key, raw)),
        None => Ok(default),
    }
}
