//! The facade the presentation layer calls.
//!
//! `BookingService` owns the store, hydrates it from the key-value store
//! at construction, and translates each synchronous dispatch into the
//! `Result` the caller renders. Persistence failures never surface here
//! as booking failures; they are logged by the store runtime and
//! retrievable via [`BookingService::dead_letters`].

use std::sync::Arc;

use busconnect_core::storage::KeyValueStore;
use busconnect_runtime::{FailedSave, Store, StoreConfig};
use serde::{Deserialize, Serialize};

use crate::booking::{BookingAction, BookingEnvironment, BookingReducer};
use crate::error::EngineError;
use crate::loyalty::RideStats;
use crate::persist;
use crate::types::{
    Booking, BookingState, Bus, BusInfoUpdate, ContactMessage, HistoryEntry, LoyaltyLedger,
};

/// Everything a committed booking hands back for rendering
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingOutcome {
    /// The committed booking
    pub booking: Booking,
    /// History entry summarizing it
    pub entry: HistoryEntry,
    /// Bus snapshot after the commit
    pub bus: Bus,
    /// Ledger snapshot after the commit
    pub ledger: LoyaltyLedger,
}

type BookingStore = Store<BookingState, BookingAction, BookingEnvironment, BookingReducer>;

/// Single-writer facade over the booking store
pub struct BookingService {
    store: BookingStore,
}

impl BookingService {
    /// Build a service whose state is hydrated from `kv`.
    #[must_use]
    pub fn new(env: BookingEnvironment, kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(env, kv, StoreConfig::default())
    }

    /// Build a service with a custom store configuration.
    #[must_use]
    pub fn with_config(
        env: BookingEnvironment,
        kv: Arc<dyn KeyValueStore>,
        config: StoreConfig,
    ) -> Self {
        let state = persist::hydrate(kv.as_ref());
        Self {
            store: Store::with_config(state, BookingReducer::new(), env, kv, config),
        }
    }

    /// Book `seats` seats on the active bus.
    ///
    /// # Errors
    ///
    /// Returns the validation error when the request is rejected; the
    /// engine state is untouched in that case.
    pub fn book_seats(
        &mut self,
        seats: u32,
        pickup: &str,
        destination: &str,
    ) -> Result<BookingOutcome, EngineError> {
        self.dispatch(BookingAction::ConfirmBooking {
            seats,
            pickup: pickup.to_owned(),
            destination: destination.to_owned(),
        });
        self.store.state(|state| {
            if let Some(error) = &state.last_error {
                return Err(error.clone());
            }
            let booking = state
                .latest_booking()
                .cloned()
                .ok_or_else(|| EngineError::Internal("commit left no booking record".into()))?;
            let entry = state
                .history
                .front()
                .cloned()
                .ok_or_else(|| EngineError::Internal("commit left no history entry".into()))?;
            Ok(BookingOutcome {
                booking,
                entry,
                bus: state.bus.clone(),
                ledger: state.ledger.clone(),
            })
        })
    }

    /// Conductor adjustment of the vacant-seat count.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InventoryOutOfRange`] when the delta would
    /// breach `[0, capacity]`; state is unchanged.
    pub fn adjust_inventory(&mut self, delta: i32) -> Result<Bus, EngineError> {
        self.dispatch(BookingAction::AdjustSeats { delta });
        self.on_success(|state| state.bus.clone())
    }

    /// Conductor replacement of the bus metadata.
    ///
    /// # Errors
    ///
    /// Returns the validation error for empty fields or a capacity below
    /// one.
    pub fn update_bus_info(&mut self, update: BusInfoUpdate) -> Result<Bus, EngineError> {
        self.dispatch(BookingAction::UpdateBusInfo { update });
        self.on_success(|state| state.bus.clone())
    }

    /// Record a contact-form submission in the history log.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingField`] when any field is empty.
    pub fn submit_contact(&mut self, message: ContactMessage) -> Result<HistoryEntry, EngineError> {
        self.dispatch(BookingAction::SubmitContact { message });
        self.store.state(|state| {
            if let Some(error) = &state.last_error {
                return Err(error.clone());
            }
            state
                .history
                .front()
                .cloned()
                .ok_or_else(|| EngineError::Internal("submission left no history entry".into()))
        })
    }

    /// The newest `limit` history entries, newest first.
    #[must_use]
    pub fn history_snapshot(&self, limit: usize) -> Vec<HistoryEntry> {
        self.store
            .state(|state| state.history.recent(limit).cloned().collect())
    }

    /// Ledger-derived ride statistics.
    #[must_use]
    pub fn stats(&self) -> RideStats {
        self.store.state(|state| state.ledger.stats())
    }

    /// Snapshot of the active bus.
    #[must_use]
    pub fn bus(&self) -> Bus {
        self.store.state(|state| state.bus.clone())
    }

    /// Snapshot of the loyalty ledger.
    #[must_use]
    pub fn ledger(&self) -> LoyaltyLedger {
        self.store.state(|state| state.ledger.clone())
    }

    /// All committed bookings, oldest first.
    #[must_use]
    pub fn bookings(&self) -> Vec<Booking> {
        self.store.state(|state| state.bookings.clone())
    }

    /// Saves that could not be written, oldest first.
    ///
    /// A non-empty list means the in-memory state is ahead of the
    /// key-value store; the committed transactions themselves stand.
    #[must_use]
    pub fn dead_letters(&self) -> Vec<FailedSave> {
        self.store.dlq().iter().cloned().collect()
    }

    fn dispatch(&mut self, action: BookingAction) {
        tracing::debug!(action = action.label(), "dispatching command");
        let summary = self.store.send(action);
        if summary.failed_saves > 0 {
            tracing::warn!(
                failed = summary.failed_saves,
                "persistence is behind the committed state"
            );
        }
    }

    fn on_success<T>(&self, read: impl FnOnce(&BookingState) -> T) -> Result<T, EngineError> {
        self.store.state(|state| match &state.last_error {
            Some(error) => Err(error.clone()),
            None => Ok(read(state)),
        })
    }
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService").finish_non_exhaustive()
    }
}
