//! Nullable clock: deterministic time for testing.

use fradium_types::{Clock, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to. Thread-safe so it can be shared
/// with an engine running on a multi-threaded runtime.
pub struct NullClock {
    current_nanos: AtomicU64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current_nanos: AtomicU64::new(Timestamp::from_secs(initial_secs).as_nanos()),
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.advance_by(Duration::from_secs(secs));
    }

    pub fn advance_by(&self, duration: Duration) {
        let next = self.now().saturating_add(duration);
        self.current_nanos.store(next.as_nanos(), Ordering::SeqCst);
    }

    /// Set the time to a specific instant.
    pub fn set(&self, at: Timestamp) {
        self.current_nanos.store(at.as_nanos(), Ordering::SeqCst);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_nanos(self.current_nanos.load(Ordering::SeqCst))
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(0)
    }
}
