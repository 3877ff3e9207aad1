//! Booking reducer.
//!
//! Commands validate against current state; a command that passes
//! commits in one synchronous sequence (reserve seats, record the ride,
//! append the records) and describes the persistence writes. A command
//! that fails applies a `ValidationFailed` event and mutates nothing
//! else. Validation is all-or-nothing.

use std::sync::Arc;

use busconnect_core::{
    SmallVec,
    effect::Effect,
    environment::{Clock, IdGenerator, RandomIds, SystemClock},
    reducer::Reducer,
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::persist;
use crate::types::{
    Booking, BookingId, BookingState, BusInfoUpdate, ContactMessage, EntryId, EntryKind,
    HistoryEntry, Money,
};

/// Environment dependencies for the booking reducer
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Clock for timestamps on bookings and history entries
    pub clock: Arc<dyn Clock>,
    /// Id source for bookings and history entries
    pub ids: Arc<dyn IdGenerator>,
}

impl BookingEnvironment {
    /// Creates a new `BookingEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Production wiring: system clock, random v4 ids.
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(RandomIds))
    }
}

impl std::fmt::Debug for BookingEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingEnvironment").finish_non_exhaustive()
    }
}

/// Actions for the booking engine (commands and events)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum BookingAction {
    // ========== Commands ==========
    /// Command: Book seats on the active bus
    ConfirmBooking {
        /// Seats requested
        seats: u32,
        /// Pickup location shown in the history entry
        pickup: String,
        /// Destination shown in the history entry
        destination: String,
    },

    /// Command: Conductor adjusts the vacant-seat count
    AdjustSeats {
        /// Signed seat delta
        delta: i32,
    },

    /// Command: Conductor replaces the bus metadata
    UpdateBusInfo {
        /// Replacement metadata
        update: BusInfoUpdate,
    },

    /// Command: Record a contact-form submission
    SubmitContact {
        /// The submitted message
        message: ContactMessage,
    },

    // ========== Events ==========
    /// Event: A booking transaction committed
    BookingCommitted {
        /// The committed booking
        booking: Booking,
        /// History entry summarizing it
        entry: HistoryEntry,
    },

    /// Event: The vacancy was adjusted
    SeatsAdjusted {
        /// New vacant-seat count
        vacant_seats: u32,
    },

    /// Event: The bus metadata was replaced
    BusInfoUpdated {
        /// Applied metadata
        update: BusInfoUpdate,
        /// History entry recording the update
        entry: HistoryEntry,
    },

    /// Event: A contact-form submission was recorded
    ContactRecorded {
        /// History entry recording the submission
        entry: HistoryEntry,
    },

    /// Event: Command validation failed
    ValidationFailed {
        /// The typed rejection
        error: EngineError,
    },
}

impl BookingAction {
    /// Returns true if this action is a command
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::ConfirmBooking { .. }
                | Self::AdjustSeats { .. }
                | Self::UpdateBusInfo { .. }
                | Self::SubmitContact { .. }
        )
    }

    /// Returns true if this action is an event
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }

    /// Stable name used in log lines
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ConfirmBooking { .. } => "confirm_booking",
            Self::AdjustSeats { .. } => "adjust_seats",
            Self::UpdateBusInfo { .. } => "update_bus_info",
            Self::SubmitContact { .. } => "submit_contact",
            Self::BookingCommitted { .. } => "booking_committed",
            Self::SeatsAdjusted { .. } => "seats_adjusted",
            Self::BusInfoUpdated { .. } => "bus_info_updated",
            Self::ContactRecorded { .. } => "contact_recorded",
            Self::ValidationFailed { .. } => "validation_failed",
        }
    }
}

/// Reducer for the booking engine
#[derive(Clone, Copy, Debug, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a `ConfirmBooking` command
    fn validate_booking(state: &BookingState, seats: u32) -> Result<(), EngineError> {
        if seats < 1 {
            return Err(EngineError::InvalidSeatCount);
        }
        if seats > state.bus.vacant_seats {
            return Err(EngineError::InsufficientSeats {
                requested: seats,
                available: state.bus.vacant_seats,
            });
        }
        Ok(())
    }

    /// Validates a `SubmitContact` command
    fn validate_contact(message: &ContactMessage) -> Result<(), EngineError> {
        if message.name.trim().is_empty() {
            return Err(EngineError::missing("name"));
        }
        if message.email.trim().is_empty() {
            return Err(EngineError::missing("email"));
        }
        if message.subject.trim().is_empty() {
            return Err(EngineError::missing("subject"));
        }
        if message.message.trim().is_empty() {
            return Err(EngineError::missing("message"));
        }
        Ok(())
    }

    fn booking_entry(
        env: &BookingEnvironment,
        booking: &Booking,
        pickup: &str,
        destination: &str,
    ) -> HistoryEntry {
        let fare_text = if booking.is_free {
            "FREE".to_string()
        } else {
            booking.fare.to_string()
        };
        HistoryEntry {
            id: EntryId::from_uuid(env.ids.generate()),
            kind: EntryKind::Booking,
            title: format!("Booked {} seat(s) on {}", booking.seats, booking.bus_name),
            description: format!("{pickup} → {destination}"),
            details: format!("Bus: {} | Fare: {}", booking.bus_number, fare_text),
            recorded_at: booking.booked_at,
        }
    }

    /// Applies an event to state
    ///
    /// For `BookingCommitted` the inventory and ledger mutation already
    /// happened in the command path (the commit sequence); the event
    /// appends the records produced by that transaction.
    fn apply_event(state: &mut BookingState, event: &BookingAction) {
        match event {
            BookingAction::BookingCommitted { booking, entry } => {
                state.bookings.push(booking.clone());
                state.history.prepend(entry.clone());
                state.last_error = None;
            },
            BookingAction::SeatsAdjusted { vacant_seats } => {
                state.bus.vacant_seats = *vacant_seats;
                state.last_error = None;
            },
            BookingAction::BusInfoUpdated { update, entry } => {
                state.bus.apply_info(update);
                state.history.prepend(entry.clone());
                state.last_error = None;
            },
            BookingAction::ContactRecorded { entry } => {
                state.history.prepend(entry.clone());
                state.last_error = None;
            },
            BookingAction::ValidationFailed { error } => {
                state.last_error = Some(error.clone());
            },
            // Commands are not applied to state
            BookingAction::ConfirmBooking { .. }
            | BookingAction::AdjustSeats { .. }
            | BookingAction::UpdateBusInfo { .. }
            | BookingAction::SubmitContact { .. } => {},
        }
    }

    fn confirm_booking(
        state: &mut BookingState,
        env: &BookingEnvironment,
        seats: u32,
        pickup: &str,
        destination: &str,
    ) -> SmallVec<[Effect<BookingAction>; 4]> {
        if let Err(error) = Self::validate_booking(state, seats) {
            Self::apply_event(state, &BookingAction::ValidationFailed { error });
            return SmallVec::new();
        }

        let is_free = state.ledger.is_next_ride_free();
        let fare = if is_free {
            Money::ZERO
        } else {
            state.bus.fare.times(seats)
        };

        // Commit. Validation above guarantees the reservation fits; a
        // failure here means the vacancy moved underneath us and the
        // transaction is reported as a defect, not swallowed.
        if let Err(reserve_error) = state.bus.try_reserve(seats) {
            let error = EngineError::Internal(format!(
                "reservation failed after validation: {reserve_error}"
            ));
            tracing::error!(%error, "booking commit aborted");
            Self::apply_event(state, &BookingAction::ValidationFailed { error });
            return SmallVec::new();
        }

        state.ledger.record_ride(seats, state.bus.fare, is_free);

        let booking = Booking {
            id: BookingId::from_uuid(env.ids.generate()),
            bus_name: state.bus.name.clone(),
            bus_number: state.bus.number.clone(),
            seats,
            fare,
            booked_at: env.clock.now(),
            is_free,
        };
        let entry = Self::booking_entry(env, &booking, pickup, destination);

        tracing::info!(
            seats,
            fare = %booking.fare,
            free = booking.is_free,
            vacant = state.bus.vacant_seats,
            "booking committed"
        );
        Self::apply_event(state, &BookingAction::BookingCommitted { booking, entry });
        persist::snapshot_effects(state)
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            BookingAction::ConfirmBooking {
                seats,
                pickup,
                destination,
            } => Self::confirm_booking(state, env, seats, &pickup, &destination),

            BookingAction::AdjustSeats { delta } => match state.bus.adjust(delta) {
                Ok(vacant_seats) => {
                    tracing::info!(delta, vacant = vacant_seats, "vacancy adjusted");
                    Self::apply_event(state, &BookingAction::SeatsAdjusted { vacant_seats });
                    persist::snapshot_effects(state)
                },
                Err(error) => {
                    Self::apply_event(state, &BookingAction::ValidationFailed { error });
                    SmallVec::new()
                },
            },

            BookingAction::UpdateBusInfo { update } => match update.validate() {
                Ok(()) => {
                    let entry = HistoryEntry {
                        id: EntryId::from_uuid(env.ids.generate()),
                        kind: EntryKind::BusInfoUpdate,
                        title: "Bus Information Updated".to_string(),
                        description: format!("Updated {} details", update.name),
                        details: format!(
                            "New capacity: {} | Route: {}",
                            update.capacity, update.route
                        ),
                        recorded_at: env.clock.now(),
                    };
                    Self::apply_event(state, &BookingAction::BusInfoUpdated { update, entry });
                    persist::snapshot_effects(state)
                },
                Err(error) => {
                    Self::apply_event(state, &BookingAction::ValidationFailed { error });
                    SmallVec::new()
                },
            },

            BookingAction::SubmitContact { message } => {
                match Self::validate_contact(&message) {
                    Ok(()) => {
                        let entry = HistoryEntry {
                            id: EntryId::from_uuid(env.ids.generate()),
                            kind: EntryKind::Contact,
                            title: "Contact Form Submitted".to_string(),
                            description: format!("Subject: {}", message.subject),
                            details: format!("From: {} ({})", message.name, message.email),
                            recorded_at: env.clock.now(),
                        };
                        Self::apply_event(state, &BookingAction::ContactRecorded { entry });
                        persist::snapshot_effects(state)
                    },
                    Err(error) => {
                        Self::apply_event(state, &BookingAction::ValidationFailed { error });
                        SmallVec::new()
                    },
                }
            },

            // ========== Events ==========
            BookingAction::BookingCommitted { .. }
            | BookingAction::SeatsAdjusted { .. }
            | BookingAction::BusInfoUpdated { .. }
            | BookingAction::ContactRecorded { .. }
            | BookingAction::ValidationFailed { .. } => {
                // Events are applied (for feedback or external events)
                Self::apply_event(state, &action);
                SmallVec::new()
            },
        }
    }
}
