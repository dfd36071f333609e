use crate::clock::Clock;
use crate::error::CacheError;
use crate::storage::Storage;
use chrono::Duration;
use tracing::debug;

/// A time-invalidated cache of raw API payloads.
///
/// A snapshot is fresh while its age does not exceed the TTL; the boundary
/// itself counts as fresh. A forced refresh is the caller bypassing `fresh`,
/// not cache state.
pub struct SnapshotCache<S: Storage, C: Clock> {
    storage: S,
    clock: C,
    ttl: Duration,
}

impl<S: Storage, C: Clock> SnapshotCache<S, C> {
    pub fn new(storage: S, clock: C, ttl: Duration) -> Self {
        Self { storage, clock, ttl }
    }

    /// The stored body for `key`, but only while it is within the TTL.
    pub fn fresh(&self, key: &str) -> Result<Option<String>, CacheError> {
        let Some(snapshot) = self.storage.read(key)? else {
            return Ok(None);
        };

        let age = self.clock.now() - snapshot.written_at;
        if age > self.ttl {
            debug!(key, age_minutes = age.num_minutes(), "snapshot is stale");
            return Ok(None);
        }
        Ok(Some(snapshot.body))
    }

    /// The stored body for `key` regardless of age. The fallback path when a
    /// fetch fails and stale data beats no data.
    pub fn any(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.storage.read(key)?.map(|snapshot| snapshot.body))
    }

    pub fn store(&self, key: &str, body: &str) -> Result<(), CacheError> {
        debug!(key, bytes = body.len(), "storing snapshot");
        self.storage.write(key, body)
    }
}
