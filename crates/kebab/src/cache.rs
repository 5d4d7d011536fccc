//! Snapshot cache with explicit invalidation and a secondary expiry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::Result;

/// Holds the most recent derived snapshot.
///
/// Writes call [`SnapshotCache::invalidate`]; the time-to-live only catches
/// changes made behind the ledger's back.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    snapshot: Option<Arc<T>>,
    loaded_at: Option<Instant>,
    ttl: Duration,
}

impl<T> SnapshotCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            snapshot: None,
            loaded_at: None,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether a snapshot is held and younger than the time-to-live.
    pub fn is_fresh(&self) -> bool {
        match (&self.snapshot, self.loaded_at) {
            (Some(_), Some(loaded_at)) => loaded_at.elapsed() < self.ttl,
            _ => false,
        }
    }

    /// The cached snapshot, reloading it first if it is missing or stale.
    ///
    /// A failing loader leaves the cache empty.
    pub fn get_or_refresh<F>(&mut self, loader: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        if self.is_fresh() {
            if let Some(snapshot) = &self.snapshot {
                return Ok(Arc::clone(snapshot));
            }
        }

        self.invalidate();
        let snapshot = Arc::new(loader()?);
        self.snapshot = Some(Arc::clone(&snapshot));
        self.loaded_at = Some(Instant::now());
        Ok(snapshot)
    }

    pub fn invalidate(&mut self) {
        self.snapshot = None;
        self.loaded_at = None;
    }
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new(Duration::from_secs(600))
    }
}
