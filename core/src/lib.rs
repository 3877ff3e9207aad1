//! # BusConnect Core
//!
//! Core traits and types for the BusConnect booking engine.
//!
//! This crate provides the fundamental abstractions the rest of the
//! workspace is built on: a pure reducer over domain state, effect
//! descriptions for the store runtime to execute, and the environment
//! traits through which time, ids, and persistence are injected.
//!
//! ## Core Concepts
//!
//! - **State**: owned domain state for a feature
//! - **Action**: all possible inputs to a reducer (commands and events)
//! - **Reducer**: pure function `(State, Action, Environment) → Effects`
//! - **Effect**: side effect descriptions (not execution)
//! - **Environment**: injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional core, imperative shell
//! - Unidirectional data flow
//! - Explicit effects (no hidden I/O)
//! - Single-threaded, synchronous execution: effects run inline on the
//!   calling thread, and the store serializes transactions through
//!   `&mut self` rather than locks
//!
//! ## Example
//!
//! ```ignore
//! use busconnect_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for BookingReducer {
//!     type State = BookingState;
//!     type Action = BookingAction;
//!     type Environment = BookingEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut BookingState,
//!         action: BookingAction,
//!         env: &BookingEnvironment,
//!     ) -> SmallVec<[Effect<BookingAction>; 4]> {
//!         // Business logic goes here
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - the core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → Effects`.
/// They contain all business logic and are deterministic and testable;
/// anything nondeterministic (time, ids) comes in through the environment.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: the domain state this reducer operates on
    /// - `Action`: the action type this reducer processes
    /// - `Environment`: the injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for BookingReducer {
    ///     type State = BookingState;
    ///     type Action = BookingAction;
    ///     type Environment = BookingEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut BookingState,
    ///         action: BookingAction,
    ///         env: &BookingEnvironment,
    ///     ) -> SmallVec<[Effect<BookingAction>; 4]> {
    ///         match action {
    ///             BookingAction::ConfirmBooking { seats, .. } => {
    ///                 // validate, apply, describe persistence
    ///                 SmallVec::new()
    ///             },
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// No mutation may happen on a rejected action; validation is
        /// all-or-nothing.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are NOT executed by the reducer. They are descriptions of what
/// should happen, returned from reducers and executed inline by the store
/// runtime. In this synchronous model there are two real effects: writing
/// a snapshot to the key-value store, and dispatching a follow-up action
/// back into the reducer.
pub mod effect {
    use serde::Serialize;

    use crate::storage::StorageError;

    /// A pending write of one persisted snapshot to the key-value store.
    ///
    /// The payload is serialized when the effect is described, so the
    /// store runtime can execute it without knowing the domain types.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SaveOp {
        /// Key-value store key to write
        pub key: String,
        /// Pre-serialized snapshot payload
        pub value: serde_json::Value,
    }

    impl SaveOp {
        /// Describe a JSON write of `value` under `key`.
        ///
        /// # Errors
        ///
        /// Returns [`StorageError::Encode`] if the value cannot be
        /// represented as JSON.
        pub fn json<T: Serialize>(key: &str, value: &T) -> Result<Self, StorageError> {
            match serde_json::to_value(value) {
                Ok(value) => Ok(Self {
                    key: key.to_owned(),
                    value,
                }),
                Err(source) => Err(StorageError::Encode {
                    key: key.to_owned(),
                    reason: source.to_string(),
                }),
            }
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: the action type that effects can feed back into the
    ///   reducer
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Persist a snapshot to the key-value store
        Save(SaveOp),

        /// Dispatch a follow-up action through the reducer
        Dispatch(Box<Action>),
    }

    impl<Action> Effect<Action> {
        /// True for effects the runtime actually has to execute.
        #[must_use]
        pub const fn is_operative(&self) -> bool {
            !matches!(self, Effect::None)
        }
    }
}

/// Environment module - dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter. Production implementations live next to
/// the traits; deterministic test doubles live in `busconnect-testing`.
pub mod environment {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - uses system clock
    /// let env = BookingEnvironment::new(Arc::new(SystemClock), Arc::new(RandomIds));
    ///
    /// // Test - fixed time for deterministic tests
    /// let env = BookingEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIds::new()));
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the operating system.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Id generator trait - abstracts id creation for testability
    ///
    /// Bookings and history entries are identified by UUIDs; tests inject
    /// a sequential generator so records are stable across runs.
    pub trait IdGenerator: Send + Sync {
        /// Produce the next unique id
        fn generate(&self) -> Uuid;
    }

    /// Production id generator producing random v4 UUIDs.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RandomIds;

    impl IdGenerator for RandomIds {
        fn generate(&self) -> Uuid {
            Uuid::new_v4()
        }
    }
}

/// Storage module - the persistence seam
///
/// The engine persists three independent snapshots (ledger, bookings,
/// history) through this trait. Implementations are synchronous and
/// local; failures are warning-level signals that never roll back a
/// committed in-memory transaction.
pub mod storage {
    use thiserror::Error;

    /// Errors surfaced by a [`KeyValueStore`]
    #[derive(Error, Debug)]
    pub enum StorageError {
        /// Reading or writing the underlying medium failed
        #[error("storage i/o failed: {0}")]
        Io(#[from] std::io::Error),

        /// The stored bytes under `key` are not valid JSON
        ///
        /// Hydration treats this the same as an absent key: defaults win.
        #[error("stored value for `{key}` is corrupt: {reason}")]
        Corrupt {
            /// Key whose value failed to parse
            key: String,
            /// Parser diagnostic
            reason: String,
        },

        /// A snapshot could not be encoded as JSON
        #[error("value for `{key}` could not be encoded: {reason}")]
        Encode {
            /// Key the snapshot was destined for
            key: String,
            /// Encoder diagnostic
            reason: String,
        },
    }

    /// A local, synchronous key-value store of JSON documents
    ///
    /// The production implementation is a file per key
    /// (`busconnect-storage`); tests use an in-memory map.
    pub trait KeyValueStore: Send + Sync {
        /// Load the value stored under `key`, if any.
        ///
        /// # Errors
        ///
        /// Returns [`StorageError::Io`] if the medium cannot be read and
        /// [`StorageError::Corrupt`] if the stored bytes fail to parse.
        fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

        /// Store `value` under `key`, replacing any previous value.
        ///
        /// # Errors
        ///
        /// Returns [`StorageError::Io`] if the write fails.
        fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError>;
    }
}
