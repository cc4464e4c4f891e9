//! JWT validation and token extraction helpers

use axum::http::HeaderValue;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::claims::AccessClaims;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// The only signing algorithm accepted from the identity provider
pub(crate) const ACCEPTED_ALGORITHM: Algorithm = Algorithm::RS256;

/// Validation rules for access tokens: RS256 only, issuer and audience pinned,
/// no clock tolerance
pub(crate) fn build_validation(config: &AuthConfig) -> Validation {
    let mut validation = Validation::new(ACCEPTED_ALGORITHM);
    validation.set_issuer(&[&config.issuer]);
    validation.set_audience(&[&config.audience]);
    validation.set_required_spec_claims(&["exp", "iss", "aud"]);
    validation.validate_nbf = true;
    validation.leeway = 0;
    validation
}

/// Validate an access token's signature and claims with a resolved key
pub(crate) fn validate_jwt_token(
    token: &str,
    key: &DecodingKey,
    validation: &Validation,
) -> Result<AccessClaims, AuthError> {
    let token_data = decode::<AccessClaims>(token, key, validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        rejection_for(&e)
    })?;

    Ok(token_data.claims)
}

fn rejection_for(err: &JwtError) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::ImmatureSignature => AuthError::NotYetValid,
        ErrorKind::InvalidAudience => AuthError::InvalidAudience,
        ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            AuthError::InvalidAlgorithm
        }
        ErrorKind::MissingRequiredClaim(claim) => AuthError::MissingClaim(claim.clone()),
        _ => AuthError::MalformedToken,
    }
}

/// Extract bearer token from Authorization header
pub(crate) fn extract_bearer_token(header: &HeaderValue) -> Result<&str, AuthError> {
    let header_str = header
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    let mut parts = header_str.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("Bearer") => Ok(token),
        _ => Err(AuthError::InvalidAuthorizationFormat),
    }
}
