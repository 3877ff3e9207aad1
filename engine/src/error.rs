//! Error types for the booking engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by booking-engine validation
///
/// Every variant is detected before any state mutation; a rejected
/// command leaves the engine exactly as it found it. There are no
/// recoverable persistence errors here; those are surfaced separately
/// by the store runtime and never fail a committed transaction.
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineError {
    /// A booking requested fewer than one seat
    #[error("at least one seat must be requested")]
    InvalidSeatCount,

    /// A booking requested more seats than are vacant
    #[error("not enough seats available: requested {requested}, only {available} vacant")]
    InsufficientSeats {
        /// Seats the passenger asked for
        requested: u32,
        /// Seats currently vacant
        available: u32,
    },

    /// A conductor adjustment would leave the vacancy outside `[0, capacity]`
    #[error("adjustment of {delta} would push the vacancy outside 0..={capacity}")]
    InventoryOutOfRange {
        /// The rejected adjustment
        delta: i32,
        /// Capacity bounding the vacancy
        capacity: u32,
    },

    /// A bus-info update specified a capacity below one
    #[error("bus capacity must be at least 1")]
    InvalidCapacity,

    /// A required text field was left empty
    #[error("{field} must not be empty")]
    MissingField {
        /// Name of the empty field
        field: String,
    },

    /// An invariant the engine relies on was violated mid-transaction
    ///
    /// This is a defect report, not a user error: it means validation
    /// passed but the commit step still failed.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl EngineError {
    /// Shorthand for a [`EngineError::MissingField`] rejection.
    #[must_use]
    pub fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_owned(),
        }
    }
}
