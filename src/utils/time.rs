//! Clock abstraction for picking a session's start instant

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Time provider trait for dependency injection and testing
///
/// The generator itself never reads a clock; only the caller uses a provider
/// to pick the session's first start instant.
pub trait TimeProvider: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> u64;
}

/// System time provider using the wall clock
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> u64 {
        current_timestamp_millis()
    }
}

/// Mock time provider for deterministic testing
pub struct MockTimeProvider {
    current_time: AtomicU64,
}

impl MockTimeProvider {
    /// Clock frozen at `initial_time_millis`
    pub fn new(initial_time_millis: u64) -> Self {
        Self {
            current_time: AtomicU64::new(initial_time_millis),
        }
    }

    /// Move the clock forward
    pub fn advance_by(&self, millis: u64) {
        self.current_time.fetch_add(millis, Ordering::Relaxed);
    }

    /// Jump to an absolute instant
    pub fn set_time(&self, millis: u64) {
        self.current_time.store(millis, Ordering::Relaxed);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_millis(&self) -> u64 {
        self.current_time.load(Ordering::Relaxed)
    }
}

/// Milliseconds since the Unix epoch
pub fn current_timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider() {
        let clock = MockTimeProvider::new(1_700_000_000_000);
        assert_eq!(clock.now_millis(), 1_700_000_000_000);
        clock.advance_by(250);
        assert_eq!(clock.now_millis(), 1_700_000_000_250);
        clock.set_time(5);
        assert_eq!(clock.now_millis(), 5);
    }

    #[test]
    fn test_system_provider_is_past_2020() {
        assert!(SystemTimeProvider.now_millis() > 1_577_836_800_000);
    }
}
