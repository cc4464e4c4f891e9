//! Authentication middleware for the Gearshare API
//!
//! Provides bearer-token validation against an identity provider's published
//! key set, plus an axum extractor and middleware that work with any state
//! implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwks;
mod jwt;

pub use backend::AuthBackend;
pub use claims::{AccessClaims, Audience};
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::{require_auth, AuthUser};
pub use jsonwebtoken::jwk::JwkSet;
pub use jwks::JwksCache;
