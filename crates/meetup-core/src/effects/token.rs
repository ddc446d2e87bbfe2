//! Token verification effect

use crate::identifiers::UserId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Claims carried by a signed requestor token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject account
    #[serde(rename = "sub")]
    pub user_id: UserId,
    /// Organizer flag at issue time
    #[serde(rename = "org")]
    pub is_organizer: bool,
    /// Admin flag at issue time
    #[serde(rename = "adm")]
    pub is_admin: bool,
    /// Expiry, unix seconds
    #[serde(rename = "exp")]
    pub expires_at: u64,
}

/// Error type for token verification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TokenError {
    /// No token was presented
    #[error("no token presented")]
    Missing,
    /// Token is not in the expected shape
    #[error("malformed token: {0}")]
    Malformed(String),
    /// Signature does not match
    #[error("token signature invalid")]
    BadSignature,
    /// Token is past its expiry
    #[error("token expired")]
    Expired,
    /// Verification could not run (e.g. clock unavailable); a fault, not a denial
    #[error("token could not be verified: {0}")]
    Unverifiable(String),
}

/// Verifies presented tokens
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify signature and expiry, returning the claims
    async fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
