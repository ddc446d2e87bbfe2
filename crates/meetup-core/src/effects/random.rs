//! Randomness effect
//!
//! Raffle draws are a party game, not a security control, so handlers need
//! not be cryptographically secure. Tests use a seeded handler for
//! reproducible draws.

use async_trait::async_trait;
use std::ops::Range;

/// Random number source
#[async_trait]
pub trait RandomEffects: Send + Sync {
    /// Uniform value in `range`. `range` must be non-empty.
    async fn random_range(&self, range: Range<u64>) -> u64;

    /// Uniform index into a collection of `len` elements (`len > 0`)
    async fn random_index(&self, len: usize) -> usize {
        self.random_range(0..len as u64).await as usize
    }
}
