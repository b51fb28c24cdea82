//! Single-slot TTL cache
//!
//! The story list is read on every request but only changes when the
//! sync pipeline reruns, so reads go through one cached slot with a
//! time-to-live. The clock is injected so tests can move time instead
//! of sleeping; there is no module-global state.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Injectable time source.
pub type Clock = Arc<dyn Fn() -> Instant + Send + Sync>;

struct Slot<T> {
    value: Arc<T>,
    expires_at: Instant,
}

/// One cached value with an expiry, refreshed through a loader closure.
pub struct TtlCache<T> {
    ttl: Duration,
    clock: Clock,
    slot: Mutex<Option<Slot<T>>>,
}

impl<T> TtlCache<T> {
    /// Cache against the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(Instant::now))
    }

    /// Cache against a caller-supplied clock.
    pub fn with_clock(ttl: Duration, clock: Clock) -> Self {
        Self {
            ttl,
            clock,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached value, or run `load` and cache its result.
    ///
    /// A failed load leaves any expired value evicted and caches
    /// nothing, so the next request retries.
    pub fn get_or_load<E>(
        &self,
        load: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        let now = (self.clock)();
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = slot.as_ref() {
            if now < entry.expires_at {
                return Ok(entry.value.clone());
            }
        }
        *slot = None;

        let value = Arc::new(load()?);
        *slot = Some(Slot {
            value: value.clone(),
            expires_at: now + self.ttl,
        });
        Ok(value)
    }
}

// ============================================================================
// Tests
// ============================================================================
