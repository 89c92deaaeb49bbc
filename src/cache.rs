//! Time-boxed memoization of resource list fetches.
//!
//! A cache cell holds one list of resources plus the instant it was set.
//! Consumers must check expiry themselves before reuse: there is no
//! background refresh or eviction beyond expired/not-expired. The cell is
//! process-local and accessed from the single command-execution thread.

use std::time::{Duration, Instant};

/// How long a cached list stays fresh.
pub const CACHE_TTL: Duration = Duration::from_secs(60);

pub struct ListCache<T> {
    entry: Option<Entry<T>>,
}

struct Entry<T> {
    items: Vec<T>,
    set_at: Instant,
}

impl<T> ListCache<T> {
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// Replace the cell's contents and reset its age.
    pub fn set(&mut self, items: Vec<T>, now: Instant) {
        self.entry = Some(Entry { items, set_at: now });
    }

    /// True once the cell is empty or its age exceeds [`CACHE_TTL`].
    pub fn is_expired(&self, now: Instant) -> bool {
        match &self.entry {
            None => true,
            Some(entry) => now.duration_since(entry.set_at) > CACHE_TTL,
        }
    }

    /// The cached items, while still fresh.
    pub fn fresh(&self, now: Instant) -> Option<&[T]> {
        self.entry
            .as_ref()
            .filter(|entry| now.duration_since(entry.set_at) <= CACHE_TTL)
            .map(|entry| entry.items.as_slice())
    }
}

impl<T> Default for ListCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
