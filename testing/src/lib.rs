//! # BusConnect Testing
//!
//! Testing utilities and helpers for the BusConnect booking engine.
//!
//! This crate provides:
//! - Deterministic implementations of the environment traits
//! - In-memory and always-failing key-value stores
//! - The Given/When/Then [`ReducerTest`] builder and effect assertions
//!
//! ## Example
//!
//! ```ignore
//! use busconnect_testing::{test_clock, SequentialIds, MemoryStore};
//!
//! let env = BookingEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIds::new()));
//! let mut service = BookingService::new(env, Arc::new(MemoryStore::new()));
//!
//! let outcome = service.book_seats(2, "City Center", "Tech Park")?;
//! assert!(outcome.booking.is_free);
//! ```

use chrono::{DateTime, Utc};
use busconnect_core::environment::{Clock, IdGenerator};

/// Mock implementations of the environment and storage traits.
pub mod mocks {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    use busconnect_core::storage::{KeyValueStore, StorageError};
    use uuid::Uuid;

    use super::{Clock, DateTime, IdGenerator, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use busconnect_testing::mocks::FixedClock;
    /// use busconnect_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to
    /// parse, which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Sequential id generator for stable record ids across runs
    #[derive(Debug, Default)]
    pub struct SequentialIds {
        next: AtomicU64,
    }

    impl SequentialIds {
        /// Create a generator starting at id 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                next: AtomicU64::new(1),
            }
        }
    }

    impl IdGenerator for SequentialIds {
        fn generate(&self) -> Uuid {
            let n = self.next.fetch_add(1, Ordering::Relaxed);
            Uuid::from_u128(u128::from(n))
        }
    }

    /// In-memory key-value store
    ///
    /// Shares the `KeyValueStore` contract with the production file
    /// store; tests can inspect what was written with
    /// [`MemoryStore::get`].
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        entries: Mutex<HashMap<String, serde_json::Value>>,
    }

    impl MemoryStore {
        /// Create an empty store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Direct read of a stored value, bypassing the trait
        #[must_use]
        pub fn get(&self, key: &str) -> Option<serde_json::Value> {
            self.entries
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .get(key)
                .cloned()
        }

        /// Number of stored keys
        #[must_use]
        pub fn len(&self) -> usize {
            self.entries
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .len()
        }

        /// True when nothing has been saved
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl KeyValueStore for MemoryStore {
        fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
            Ok(self.get(key))
        }

        fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
            self.entries
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .insert(key.to_owned(), value.clone());
            Ok(())
        }
    }

    /// Key-value store whose every operation fails
    ///
    /// Exercises the degraded paths: hydration falling back to defaults
    /// and failed saves landing in the dead letter queue.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FailingStore;

    impl FailingStore {
        /// Create a failing store
        #[must_use]
        pub const fn new() -> Self {
            Self
        }

        fn refuse() -> StorageError {
            StorageError::Io(std::io::Error::other("storage medium unavailable"))
        }
    }

    impl KeyValueStore for FailingStore {
        fn load(&self, _key: &str) -> Result<Option<serde_json::Value>, StorageError> {
            Err(Self::refuse())
        }

        fn save(&self, _key: &str, _value: &serde_json::Value) -> Result<(), StorageError> {
            Err(Self::refuse())
        }
    }
}

/// Reducer test builder and effect assertions
pub mod reducer_test;

// Re-export commonly used items
pub use mocks::{FailingStore, FixedClock, MemoryStore, SequentialIds, test_clock};
pub use reducer_test::{ReducerTest, assertions};
