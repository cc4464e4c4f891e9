//! Axum extractor and middleware for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::backend::AuthBackend;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::jwt::extract_bearer_token;

async fn authenticate_headers(
    backend: &AuthBackend,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorization)?;

    let token = extract_bearer_token(auth_header)?;
    backend.authenticate_jwt(token).await
}

/// Authenticated caller extractor.
///
/// Reuses the context placed by [`require_auth`] when the route sits behind
/// it, otherwise validates the bearer token itself.
#[derive(Debug)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<AuthContext>() {
            return Ok(AuthUser(ctx.clone()));
        }

        let backend = AuthBackend::from_ref(state);
        let auth_context = authenticate_headers(&backend, &parts.headers).await?;

        Ok(AuthUser(auth_context))
    }
}

/// Middleware that rejects the request with 401 unless it carries a valid
/// bearer token. Nothing behind it runs for unauthenticated requests.
///
/// ```ignore
/// router.layer(axum::middleware::from_fn_with_state(backend, require_auth))
/// ```
pub async fn require_auth(
    State(backend): State<AuthBackend>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_context = authenticate_headers(&backend, req.headers()).await?;
    req.extensions_mut().insert(auth_context);
    Ok(next.run(req).await)
}
