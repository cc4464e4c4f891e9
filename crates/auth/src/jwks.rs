//! Signing key retrieval and caching
//!
//! Keys are fetched from the identity provider's key-set endpoint, cached
//! by `kid`, and refetched when they go stale or when a token names a key
//! the cache has never seen (key rotation). Refetches share a sliding
//! one-minute request budget.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{JwkSet, PublicKeyUse};
use jsonwebtoken::DecodingKey;
use tokio::sync::RwLock;

use crate::error::AuthError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const RATE_WINDOW: Duration = Duration::from_secs(60);

#[derive(Clone)]
struct SigningKey {
    kid: Option<String>,
    key: DecodingKey,
}

#[derive(Default)]
struct CachedKeys {
    keys: Vec<SigningKey>,
    fetched_at: Option<Instant>,
}

impl CachedKeys {
    /// A token without `kid` is only matched when the set is unambiguous
    fn find(&self, kid: Option<&str>) -> Option<DecodingKey> {
        let found = match kid {
            Some(kid) => self.keys.iter().find(|k| k.kid.as_deref() == Some(kid)),
            None if self.keys.len() == 1 => self.keys.first(),
            None => None,
        };
        found.map(|k| k.key.clone())
    }
}

/// Sliding-window counter for key-set requests
struct FetchWindow {
    limit: usize,
    window: Duration,
    recent: VecDeque<Instant>,
}

impl FetchWindow {
    fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit: limit as usize,
            window,
            recent: VecDeque::new(),
        }
    }

    fn try_acquire(&mut self, now: Instant) -> bool {
        while let Some(&oldest) = self.recent.front() {
            if now.duration_since(oldest) >= self.window {
                self.recent.pop_front();
            } else {
                break;
            }
        }

        if self.recent.len() >= self.limit {
            return false;
        }
        self.recent.push_back(now);
        true
    }
}

enum KeySource {
    Remote { http: reqwest::Client, uri: String },
    Static,
}

/// Cache of verification keys, safe for concurrent use.
pub struct JwksCache {
    source: KeySource,
    ttl: Duration,
    cache: RwLock<CachedKeys>,
    refresh: tokio::sync::Mutex<()>,
    limiter: Mutex<FetchWindow>,
}

impl JwksCache {
    /// Cache backed by a remote key-set endpoint
    pub fn remote(
        uri: impl Into<String>,
        requests_per_minute: u32,
        ttl: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;

        Ok(Self {
            source: KeySource::Remote {
                http,
                uri: uri.into(),
            },
            ttl,
            cache: RwLock::new(CachedKeys::default()),
            refresh: tokio::sync::Mutex::new(()),
            limiter: Mutex::new(FetchWindow::new(requests_per_minute, RATE_WINDOW)),
        })
    }

    /// Fixed key set that never touches the network
    pub fn from_key_set(set: &JwkSet) -> Self {
        Self {
            source: KeySource::Static,
            ttl: Duration::MAX,
            cache: RwLock::new(CachedKeys {
                keys: signing_keys(set),
                fetched_at: None,
            }),
            refresh: tokio::sync::Mutex::new(()),
            limiter: Mutex::new(FetchWindow::new(0, RATE_WINDOW)),
        }
    }

    /// Resolve the verification key for a token's `kid`.
    pub async fn key_for(&self, kid: Option<&str>) -> Result<DecodingKey, AuthError> {
        let requested_at = Instant::now();

        if let Some(key) = self.cached_key(kid, true).await {
            return Ok(key);
        }

        let (http, uri) = match &self.source {
            KeySource::Static => return Err(key_not_found(kid)),
            KeySource::Remote { http, uri } => (http, uri),
        };

        let _refresh = self.refresh.lock().await;

        // Another request may have refreshed the set while this one waited
        let refreshed_meanwhile = self
            .cache
            .read()
            .await
            .fetched_at
            .is_some_and(|at| at >= requested_at);
        if refreshed_meanwhile {
            return self
                .cached_key(kid, false)
                .await
                .ok_or_else(|| key_not_found(kid));
        }

        if !self.try_acquire_fetch() {
            tracing::warn!(jwks_uri = %uri, "Key set request budget exhausted");
            return self.stale_key(kid).await;
        }

        match fetch_key_set(http, uri).await {
            Ok(set) => {
                let keys = signing_keys(&set);
                tracing::info!(jwks_uri = %uri, key_count = keys.len(), "Fetched signing keys");

                let mut cache = self.cache.write().await;
                cache.keys = keys;
                cache.fetched_at = Some(Instant::now());
                cache.find(kid).ok_or_else(|| key_not_found(kid))
            }
            Err(e) => {
                tracing::warn!(error = %e, jwks_uri = %uri, "Failed to fetch signing keys");
                self.stale_key(kid).await
            }
        }
    }

    async fn cached_key(&self, kid: Option<&str>, require_fresh: bool) -> Option<DecodingKey> {
        let cache = self.cache.read().await;
        if require_fresh && !self.is_fresh(&cache) {
            return None;
        }
        cache.find(kid)
    }

    /// Fall back to an expired entry when the endpoint cannot be consulted
    async fn stale_key(&self, kid: Option<&str>) -> Result<DecodingKey, AuthError> {
        self.cached_key(kid, false)
            .await
            .ok_or(AuthError::KeySetUnavailable)
    }

    fn is_fresh(&self, cache: &CachedKeys) -> bool {
        match self.source {
            KeySource::Static => true,
            KeySource::Remote { .. } => cache
                .fetched_at
                .is_some_and(|at| at.elapsed() < self.ttl),
        }
    }

    fn try_acquire_fetch(&self) -> bool {
        self.limiter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .try_acquire(Instant::now())
    }
}

fn key_not_found(kid: Option<&str>) -> AuthError {
    AuthError::SigningKeyNotFound(kid.unwrap_or("(none)").to_string())
}

async fn fetch_key_set(http: &reqwest::Client, uri: &str) -> Result<JwkSet, reqwest::Error> {
    http.get(uri)
        .send()
        .await?
        .error_for_status()?
        .json::<JwkSet>()
        .await
}

/// Keep signature keys the crypto backend can load; skip the rest.
fn signing_keys(set: &JwkSet) -> Vec<SigningKey> {
    set.keys
        .iter()
        .filter(|jwk| {
            matches!(
                jwk.common.public_key_use,
                None | Some(PublicKeyUse::Signature)
            )
        })
        .filter_map(|jwk| match DecodingKey::from_jwk(jwk) {
            Ok(key) => Some(SigningKey {
                kid: jwk.common.key_id.clone(),
                key,
            }),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kid = ?jwk.common.key_id,
                    "Skipping unusable signing key"
                );
                None
            }
        })
        .collect()
}
