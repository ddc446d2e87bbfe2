use async_trait::async_trait;
use meetup_core::effects::RandomEffects;
use parking_lot::Mutex;
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
use std::collections::VecDeque;
use std::ops::Range;
use std::sync::Arc;

/// Seeded random source; the same seed yields the same draw sequence
#[derive(Debug, Clone)]
pub struct MockRandomHandler {
    rng: Arc<Mutex<ChaCha20Rng>>,
}

impl MockRandomHandler {
    /// Create a handler from a 64-bit seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(seed))),
        }
    }

    /// Create a handler from a full 32-byte seed
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            rng: Arc::new(Mutex::new(ChaCha20Rng::from_seed(seed))),
        }
    }
}

impl Default for MockRandomHandler {
    fn default() -> Self {
        Self::new(42)
    }
}

#[async_trait]
impl RandomEffects for MockRandomHandler {
    async fn random_range(&self, range: Range<u64>) -> u64 {
        self.rng.lock().gen_range(range)
    }
}

/// Returns queued offsets into the requested range, then the range start
///
/// `push(2)` followed by `random_range(10..20)` yields 12. Offsets wrap at
/// the range length.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandomHandler {
    offsets: Arc<Mutex<VecDeque<u64>>>,
}

impl ScriptedRandomHandler {
    /// Create a handler that will return `offsets` in order
    pub fn new(offsets: impl IntoIterator<Item = u64>) -> Self {
        Self {
            offsets: Arc::new(Mutex::new(offsets.into_iter().collect())),
        }
    }

    /// Queue another offset
    pub fn push(&self, offset: u64) {
        self.offsets.lock().push_back(offset);
    }
}

#[async_trait]
impl RandomEffects for ScriptedRandomHandler {
    async fn random_range(&self, range: Range<u64>) -> u64 {
        let span = range.end.saturating_sub(range.start).max(1);
        let offset = self.offsets.lock().pop_front().unwrap_or(0);
        range.start + offset % span
    }
}
