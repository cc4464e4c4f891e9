//! Concrete authentication backend
//!
//! Wraps the signing key cache and validation rules, and turns a raw bearer
//! token into an `AuthContext`.

use std::sync::Arc;

use jsonwebtoken::Validation;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::jwks::JwksCache;
use crate::jwt::{build_validation, validate_jwt_token, ACCEPTED_ALGORITHM};

/// Concrete authentication backend.
///
/// Cheap to clone; clones share the key cache.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    validation: Arc<Validation>,
    keys: Arc<JwksCache>,
}

impl AuthBackend {
    /// Backend that fetches signing keys from `config.jwks_uri`
    pub fn new(config: AuthConfig) -> Result<Self, reqwest::Error> {
        let keys = JwksCache::remote(
            config.jwks_uri.clone(),
            config.jwks_requests_per_minute,
            config.jwks_cache_ttl,
        )?;
        Ok(Self::with_keys(config, keys))
    }

    /// Backend over an explicit key cache (static key sets, tests)
    pub fn with_keys(config: AuthConfig, keys: JwksCache) -> Self {
        Self {
            validation: Arc::new(build_validation(&config)),
            keys: Arc::new(keys),
        }
    }

    /// Validate a bearer token and build the caller's context.
    pub async fn authenticate_jwt(&self, token: &str) -> Result<AuthContext, AuthError> {
        let header = jsonwebtoken::decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Unreadable JWT header");
            AuthError::MalformedToken
        })?;

        // Checked before key lookup so foreign algorithms never cost a key-set fetch
        if header.alg != ACCEPTED_ALGORITHM {
            tracing::debug!(alg = ?header.alg, "Rejected JWT signing algorithm");
            return Err(AuthError::InvalidAlgorithm);
        }

        let key = self.keys.key_for(header.kid.as_deref()).await?;
        let claims = validate_jwt_token(token, &key, &self.validation)?;

        tracing::debug!(sub = ?claims.sub, "Bearer token accepted");
        Ok(AuthContext::new(claims))
    }
}
