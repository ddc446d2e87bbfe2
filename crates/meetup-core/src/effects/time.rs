//! Wall-clock time effect, used for token expiry and draw timestamps

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for time operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TimeError {
    /// System clock is before the unix epoch or otherwise unusable
    #[error("clock unavailable: {reason}")]
    ClockUnavailable {
        /// Why the clock could not be read
        reason: String,
    },
}

/// Physical clock
#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Current unix time in seconds
    async fn now_unix_secs(&self) -> Result<u64, TimeError>;
}
