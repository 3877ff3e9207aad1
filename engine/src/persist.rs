//! Persisted snapshots: keys, save effects, and startup hydration.
//!
//! Three independent snapshots go to the key-value store: the loyalty
//! ledger, the booking list, and the history log. The bus itself is not
//! persisted; it re-derives from defaults at startup.

use busconnect_core::{
    SmallVec,
    effect::{Effect, SaveOp},
    smallvec,
    storage::KeyValueStore,
};
use serde::de::DeserializeOwned;

use crate::booking::BookingAction;
use crate::types::BookingState;

/// Key-value store keys, one per persisted snapshot
pub mod keys {
    /// Loyalty ledger snapshot
    pub const PASSENGER: &str = "busconnect_passenger";
    /// Booking list snapshot, oldest first
    pub const BOOKINGS: &str = "busconnect_bookings";
    /// History snapshot, newest first
    pub const HISTORY: &str = "busconnect_history";
}

/// Describe the writes that bring the store up to date with `state`.
///
/// Every committing command re-saves all three snapshots; per-key dirty
/// tracking would change nothing observable.
#[must_use]
#[allow(clippy::expect_used)] // snapshots are plain data structs and always encode as JSON
pub fn snapshot_effects(state: &BookingState) -> SmallVec<[Effect<BookingAction>; 4]> {
    smallvec![
        Effect::Save(
            SaveOp::json(keys::PASSENGER, &state.ledger).expect("ledger snapshot encodes"),
        ),
        Effect::Save(
            SaveOp::json(keys::BOOKINGS, &state.bookings).expect("booking list encodes"),
        ),
        Effect::Save(SaveOp::json(keys::HISTORY, &state.history).expect("history encodes")),
    ]
}

/// Build the startup state from whatever the key-value store holds.
///
/// Absent or unreadable snapshots fall back to defaults; a fresh
/// install and a corrupt one boot identically, with a warning for the
/// latter. The bus always starts from its defaults.
#[must_use]
pub fn hydrate(store: &dyn KeyValueStore) -> BookingState {
    BookingState {
        ledger: load_or_default(store, keys::PASSENGER),
        bookings: load_or_default(store, keys::BOOKINGS),
        history: load_or_default(store, keys::HISTORY),
        ..BookingState::default()
    }
}

fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match store.load(key) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(error) => {
                tracing::warn!(key, %error, "saved snapshot does not match the expected shape, using defaults");
                T::default()
            },
        },
        Ok(None) => T::default(),
        Err(error) => {
            tracing::warn!(key, %error, "saved snapshot unreadable, using defaults");
            T::default()
        },
    }
}
