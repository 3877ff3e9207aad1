//! # BusConnect Runtime
//!
//! Runtime implementation for the BusConnect booking engine.
//!
//! This crate provides the Store runtime that coordinates reducer
//! execution and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: owns state, runs the reducer, executes effects inline
//! - **Dead Letter Queue**: bounded record of saves that could not be
//!   written
//!
//! The execution model is single-threaded and synchronous: `send` runs
//! the reducer and every resulting effect to completion on the calling
//! thread before returning. The single-writer, non-reentrant invariant
//! is carried by `&mut self`; there are no locks because there is
//! nothing to lock against.
//!
//! ## Example
//!
//! ```ignore
//! use busconnect_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment, kv);
//!
//! // Send an action; effects (persistence writes) run inline
//! let summary = store.send(Action::DoSomething);
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use busconnect_core::{
    effect::{Effect, SaveOp},
    reducer::Reducer,
    storage::KeyValueStore,
};
use chrono::{DateTime, Utc};

/// Record of one save the key-value store refused
#[derive(Debug, Clone)]
pub struct FailedSave {
    /// Key the snapshot was destined for
    pub key: String,
    /// Why the write failed
    pub reason: String,
    /// When the failure happened
    pub failed_at: DateTime<Utc>,
}

/// Bounded, oldest-first queue of failed saves
///
/// A failed save never reverts the committed in-memory transaction that
/// produced it; the queue exists so callers can see that the store on
/// disk is behind. When full, the oldest record is dropped to make room.
#[derive(Debug, Clone)]
pub struct DeadLetterQueue {
    entries: VecDeque<FailedSave>,
    max_size: usize,
}

impl DeadLetterQueue {
    /// Create a queue bounded at `max_size` records
    #[must_use]
    pub const fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_size,
        }
    }

    /// Record a failed save, evicting the oldest record when full.
    pub fn push(&mut self, failure: FailedSave) {
        if self.entries.len() >= self.max_size {
            if let Some(dropped) = self.entries.pop_front() {
                tracing::warn!(key = %dropped.key, "dead letter queue full, dropping oldest record");
            }
        }
        self.entries.push_back(failure);
    }

    /// Iterate records, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &FailedSave> {
        self.entries.iter()
    }

    /// Number of records currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no save has failed (or all records were evicted)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of records held before eviction
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for DeadLetterQueue {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Configuration for the Store runtime
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum failed saves retained in the dead letter queue
    pub dlq_max_size: usize,
}

impl StoreConfig {
    /// Default configuration: DLQ bounded at 100 records
    #[must_use]
    pub const fn new() -> Self {
        Self { dlq_max_size: 100 }
    }

    /// Set the dead letter queue bound
    #[must_use]
    pub const fn with_dlq_max_size(mut self, max_size: usize) -> Self {
        self.dlq_max_size = max_size;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of effect execution for one dispatched action
///
/// `saves` counts attempts; `failed_saves` is the subset the key-value
/// store rejected. A non-zero `failed_saves` is a warning, not a
/// transaction failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectSummary {
    /// Save effects attempted
    pub saves: usize,
    /// Save effects the store rejected
    pub failed_saves: usize,
    /// Follow-up actions fed back through the reducer
    pub dispatched: usize,
}

/// The Store - runtime for the reducer architecture
///
/// The Store manages:
/// 1. State (owned directly; single-writer via `&mut self`)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (inline, with a feedback loop for dispatched
///    actions)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: S,
    reducer: R,
    environment: E,
    kv: Arc<dyn KeyValueStore>,
    dlq: DeadLetterQueue,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new store with initial state, reducer, environment, and
    /// the key-value store that `Save` effects write to.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E, kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(initial_state, reducer, environment, kv, StoreConfig::default())
    }

    /// Create a new store with custom configuration.
    #[must_use]
    pub fn with_config(
        initial_state: S,
        reducer: R,
        environment: E,
        kv: Arc<dyn KeyValueStore>,
        config: StoreConfig,
    ) -> Self {
        Self {
            state: initial_state,
            reducer,
            environment,
            kv,
            dlq: DeadLetterQueue::new(config.dlq_max_size),
        }
    }

    /// Send an action to the store.
    ///
    /// Runs the reducer, then executes every returned effect inline:
    /// `Save` effects go to the key-value store, `Dispatch` effects are
    /// fed back through the reducer until the queue drains. Returns a
    /// summary of what executed; failed saves are logged, counted, and
    /// recorded in the dead letter queue but never unwind state.
    #[tracing::instrument(skip_all, name = "store_send")]
    pub fn send(&mut self, action: A) -> EffectSummary {
        let mut summary = EffectSummary::default();
        let mut pending = VecDeque::from([action]);

        while let Some(action) = pending.pop_front() {
            metrics::counter!("store.actions").increment(1);
            let effects = self.reducer.reduce(&mut self.state, action, &self.environment);

            for effect in effects {
                match effect {
                    Effect::None => {},
                    Effect::Save(op) => self.execute_save(op, &mut summary),
                    Effect::Dispatch(next) => {
                        summary.dispatched += 1;
                        pending.push_back(*next);
                    },
                }
            }
        }

        summary
    }

    /// Read state through a closure.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let vacant = store.state(|s| s.bus.vacant_seats);
    /// ```
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&self.state)
    }

    /// The dead letter queue of failed saves
    #[must_use]
    pub const fn dlq(&self) -> &DeadLetterQueue {
        &self.dlq
    }

    /// The injected environment
    pub const fn environment(&self) -> &E {
        &self.environment
    }

    fn execute_save(&mut self, op: SaveOp, summary: &mut EffectSummary) {
        summary.saves += 1;
        match self.kv.save(&op.key, &op.value) {
            Ok(()) => {
                metrics::counter!("store.saves").increment(1);
                tracing::debug!(key = %op.key, "snapshot saved");
            },
            Err(error) => {
                summary.failed_saves += 1;
                metrics::counter!("store.saves.failed").increment(1);
                tracing::warn!(key = %op.key, %error, "save failed, in-memory state stands");
                self.dlq.push(FailedSave {
                    key: op.key,
                    reason: error.to_string(),
                    failed_at: Utc::now(),
                });
            },
        }
    }
}
