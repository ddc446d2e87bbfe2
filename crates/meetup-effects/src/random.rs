//! Random effect handler
//!
//! Uses `rand::thread_rng()`; this is the one place system randomness enters
//! the draw path.

use async_trait::async_trait;
use meetup_core::effects::RandomEffects;
use rand::Rng;
use std::ops::Range;

/// Real random handler backed by the thread-local generator
#[derive(Debug, Clone, Default)]
pub struct RealRandomHandler;

impl RealRandomHandler {
    /// Create a new real random handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RandomEffects for RealRandomHandler {
    async fn random_range(&self, range: Range<u64>) -> u64 {
        rand::thread_rng().gen_range(range)
    }
}
