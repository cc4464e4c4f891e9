//! Authorization context for authenticated requests

use crate::claims::AccessClaims;

/// Represents an authenticated caller
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: AccessClaims,
}

impl AuthContext {
    pub fn new(claims: AccessClaims) -> Self {
        Self { claims }
    }

    /// Subject the token was issued to, if it names one
    pub fn subject(&self) -> Option<&str> {
        self.claims.sub.as_deref()
    }
}
