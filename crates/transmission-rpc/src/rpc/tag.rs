//! Correlation tags attached to every request.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

/// Upper bound (exclusive) of the random starting point.
const SEED_LIMIT: u64 = 1 << 31;

/// Hands out request tags.
///
/// Tags come from a counter seeded at a random point, so two calls in flight
/// on the same client never share a tag, and tags of separate clients are
/// unlikely to collide in daemon logs.
#[derive(Debug)]
pub(crate) struct TagGenerator {
    next: AtomicU64,
}

impl Default for TagGenerator {
    fn default() -> Self {
        Self::starting_at(rand::rng().random_range(1..SEED_LIMIT))
    }
}

impl TagGenerator {
    pub(crate) fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    pub(crate) fn next_tag(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
