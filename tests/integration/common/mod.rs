//! Common test utilities and fixtures for integration tests
//!
//! This module provides shared infrastructure for all integration tests including:
//! - A composed application over the in-memory item store
//! - RS256 token minting with the fixture signing keys
//! - Request and response helpers

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    http::{Method, Request, Response},
    Router,
};
use gearshare_auth::{AuthBackend, AuthConfig, JwkSet, JwksCache};
use gearshare_items::{ItemsState, MemoryItemStore};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tempfile::TempDir;

pub const ISSUER: &str = "https://gearshare.test.auth0.com/";
pub const AUDIENCE: &str = "https://db-api";

pub const KID: &str = "gearshare-test-key";
pub const ROTATED_KID: &str = "gearshare-rotated-key";

pub const PRIVATE_KEY_PEM: &str = include_str!("../../../crates/auth/test-data/rsa_private.pem");
pub const ROTATED_PRIVATE_KEY_PEM: &str =
    include_str!("../../../crates/auth/test-data/rsa_other_private.pem");
pub const JWKS_JSON: &str = include_str!("../../../crates/auth/test-data/jwks.json");
pub const ROTATED_JWKS_JSON: &str = include_str!("../../../crates/auth/test-data/jwks_rotated.json");

pub const INDEX_HTML: &str = "<!doctype html><title>Gearshare</title><div id=\"root\"></div>";
pub const APP_JS: &str = "console.log('gearshare');";

/// Composed application backed by an in-memory store
pub struct TestApp {
    pub store: Arc<MemoryItemStore>,
    router: Router,
    _static_dir: TempDir,
}

impl TestApp {
    /// Application that trusts the fixture key set without any network access
    pub fn new() -> Self {
        let keys = JwksCache::from_key_set(&key_set(JWKS_JSON));
        Self::with_backend(AuthBackend::with_keys(
            auth_config("http://127.0.0.1:9/.well-known/jwks.json"),
            keys,
        ))
    }

    pub fn with_backend(auth: AuthBackend) -> Self {
        let static_dir = tempfile::tempdir().expect("Failed to create static dir");
        std::fs::write(static_dir.path().join("index.html"), INDEX_HTML)
            .expect("Failed to write index.html");
        std::fs::write(static_dir.path().join("app.js"), APP_JS).expect("Failed to write app.js");

        let store = Arc::new(MemoryItemStore::new());
        let state = ItemsState::new(store.clone(), auth);
        let router = gearshare_app::build_router(state, static_dir.path());

        Self {
            store,
            router,
            _static_dir: static_dir,
        }
    }

    /// Fresh router handle for a single `oneshot` call
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

pub fn auth_config(jwks_uri: &str) -> AuthConfig {
    AuthConfig::new(ISSUER, AUDIENCE, jwks_uri)
}

pub fn key_set(json: &str) -> JwkSet {
    serde_json::from_str(json).expect("fixture key set is valid JSON")
}

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_secs()
}

/// Claims accepted by `TestApp`
pub fn test_claims() -> Value {
    json!({
        "sub": "auth0|alice",
        "iss": ISSUER,
        "aud": [AUDIENCE, "https://gearshare.test.auth0.com/userinfo"],
        "iat": now(),
        "exp": now() + 3600,
        "scope": "openid profile email",
    })
}

pub fn sign_with(claims: &Value, kid: &str, pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("fixture key is valid PEM");
    jsonwebtoken::encode(&header, claims, &key).expect("Failed to encode JWT")
}

/// Create a test JWT signed with the primary fixture key
pub fn create_test_jwt() -> String {
    sign_with(&test_claims(), KID, PRIVATE_KEY_PEM)
}

/// Build a request, optionally authenticated and with a JSON body
pub fn request(method: Method, uri: &str, jwt: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = jwt {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    if let Some(b) = body {
        builder = builder.header("content-type", "application/json");
        builder
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

pub fn authed_request(method: Method, uri: &str, jwt: &str, body: Option<Value>) -> Request<Body> {
    request(method, uri, Some(jwt), body)
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Parse response body as JSON Value
pub async fn parse_body(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Example item payload
pub fn tent() -> Value {
    json!({
        "name": "Tent",
        "owner": "Alex",
        "img": "https://x/tent.png",
        "description": "2-person",
    })
}
