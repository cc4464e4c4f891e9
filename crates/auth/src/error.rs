//! Authentication errors

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
///
/// The display text is the rejection reason reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("No authorization token was found")]
    MissingAuthorization,

    #[error("Format is Authorization: Bearer [token]")]
    InvalidAuthorizationFormat,

    #[error("jwt malformed")]
    MalformedToken,

    #[error("invalid algorithm")]
    InvalidAlgorithm,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("jwt expired")]
    Expired,

    #[error("jwt not active")]
    NotYetValid,

    #[error("jwt audience invalid")]
    InvalidAudience,

    #[error("jwt issuer invalid")]
    InvalidIssuer,

    #[error("jwt missing required claim {0}")]
    MissingClaim(String),

    #[error("unable to find a signing key that matches '{0}'")]
    SigningKeyNotFound(String),

    #[error("unable to retrieve signing key")]
    KeySetUnavailable,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self, "Rejected unauthenticated request");

        let body = Json(json!({
            "msg": format!("UnauthorizedError: {}", self),
        }));

        let mut response = (StatusCode::UNAUTHORIZED, body).into_response();
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        response
    }
}
