//! Authentication configuration

use std::time::Duration;

/// Key-set requests allowed per minute when no limit is configured
pub const DEFAULT_JWKS_REQUESTS_PER_MINUTE: u32 = 5;

/// How long fetched signing keys are trusted before a refetch
pub const DEFAULT_JWKS_CACHE_TTL: Duration = Duration::from_secs(10 * 60 * 60);

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Expected `iss` claim (identity provider origin)
    pub issuer: String,
    /// Expected `aud` claim (API identifier)
    pub audience: String,
    /// Key-set endpoint publishing the provider's signing keys
    pub jwks_uri: String,
    pub jwks_requests_per_minute: u32,
    pub jwks_cache_ttl: Duration,
}

impl AuthConfig {
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        jwks_uri: impl Into<String>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            jwks_uri: jwks_uri.into(),
            jwks_requests_per_minute: DEFAULT_JWKS_REQUESTS_PER_MINUTE,
            jwks_cache_ttl: DEFAULT_JWKS_CACHE_TTL,
        }
    }
}
