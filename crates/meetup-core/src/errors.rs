//! Unified error system for the meetup backend
//!
//! A single error type covers every rejection the authorization evaluator and
//! raffle engine can produce. Collaborator errors (store, token, attendee
//! directory, notifier) convert into it so callers only match on one enum.

use crate::effects::{AttendeeError, NotifyError, StoreError, TimeError, TokenError};
use serde::{Deserialize, Serialize};

/// Coarse classification used by callers to map rejections onto responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Missing, malformed, or expired credentials
    Authentication,
    /// A rule rejected the request
    AuthorizationDenied,
    /// A referenced resource does not exist
    NotFound,
    /// Malformed input
    Validation,
    /// Attendee lookup or notifier unreachable
    ExternalDependency,
    /// An operation would break a counter invariant
    InvariantViolation,
    /// Persistence failure
    Storage,
    /// Anything else
    Internal,
}

/// Unified error type for all meetup operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum MeetupError {
    /// Bad or missing token
    #[error("Authentication failed: {message}")]
    Authentication {
        /// What was wrong with the presented credentials
        message: String,
    },

    /// Rule check failed
    #[error("Authorization denied: {message}")]
    AuthorizationDenied {
        /// Which rule rejected the request
        message: String,
    },

    /// Referenced resource absent
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found
        message: String,
    },

    /// Malformed input
    #[error("Invalid: {message}")]
    Validation {
        /// What was invalid
        message: String,
    },

    /// Attendee lookup or notifier failure
    #[error("External dependency failed: {message}")]
    ExternalDependency {
        /// Which dependency failed
        message: String,
    },

    /// Claim attempted past the entry limit
    #[error("Invariant violation: {message}")]
    InvariantViolation {
        /// Which invariant would break
        message: String,
    },

    /// Persistence failure
    #[error("Storage error: {message}")]
    Storage {
        /// Store-level detail (never shown to end users)
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Internal detail (never shown to end users)
        message: String,
    },
}

impl MeetupError {
    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an authorization denied error
    pub fn denied(message: impl Into<String>) -> Self {
        Self::AuthorizationDenied {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an external dependency error
    pub fn external(message: impl Into<String>) -> Self {
        Self::ExternalDependency {
            message: message.into(),
        }
    }

    /// Create an invariant violation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::AuthorizationDenied { .. } => ErrorKind::AuthorizationDenied,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::ExternalDependency { .. } => ErrorKind::ExternalDependency,
            Self::InvariantViolation { .. } => ErrorKind::InvariantViolation,
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Message safe to show to the requestor.
    ///
    /// Storage, internal, and external-dependency detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Storage { .. } | Self::Internal { .. } => "Internal server error".to_string(),
            Self::ExternalDependency { .. } => "Upstream service unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

/// Standard Result type for meetup operations
pub type Result<T> = std::result::Result<T, MeetupError>;

impl From<StoreError> for MeetupError {
    fn from(err: StoreError) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<TokenError> for MeetupError {
    fn from(err: TokenError) -> Self {
        Self::authentication(err.to_string())
    }
}

impl From<AttendeeError> for MeetupError {
    fn from(err: AttendeeError) -> Self {
        Self::external(err.to_string())
    }
}

impl From<TimeError> for MeetupError {
    fn from(err: TimeError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<NotifyError> for MeetupError {
    fn from(err: NotifyError) -> Self {
        Self::external(err.to_string())
    }
}
