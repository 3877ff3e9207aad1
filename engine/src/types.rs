//! Domain types for the booking engine.
//!
//! One bus, one passenger identity, a loyalty ledger, and the records the
//! engine appends as it runs: bookings (tail-append, chronological) and
//! history entries (front-prepend, newest first).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::history::HistoryLog;

/// Unique identifier for a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a `BookingId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a history entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Creates an `EntryId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money amount in cents (avoids floating point issues)
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a new `Money` amount from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` amount from dollars
    #[must_use]
    pub const fn from_dollars(dollars: u64) -> Self {
        Self(dollars * 100)
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if this amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies a per-unit amount by a count (per-seat fare × seats)
    #[must_use]
    pub fn times(self, count: u32) -> Self {
        Self(self.0 * u64::from(count))
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// The single active bus: metadata plus the live seat inventory
///
/// `vacant_seats` is bounded by `capacity` at all times; both mutation
/// paths (`try_reserve`, `adjust`) enforce the bound before applying.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bus {
    /// Display name of the bus
    pub name: String,
    /// Registration number
    pub number: String,
    /// Route description
    pub route: String,
    /// Ordered stops along the route
    pub stops: Vec<String>,
    /// Total seats on the bus
    pub capacity: u32,
    /// Seats not currently reserved
    pub vacant_seats: u32,
    /// Fare charged per seat
    pub fare: Money,
}

impl Default for Bus {
    fn default() -> Self {
        Self {
            name: "City Express".to_string(),
            number: "KA-01-AB-1234".to_string(),
            route: "City Center - Suburbs".to_string(),
            stops: vec![
                "City Center".to_string(),
                "Market Street".to_string(),
                "University".to_string(),
                "Tech Park".to_string(),
                "North Suburbs".to_string(),
            ],
            capacity: 40,
            vacant_seats: 15,
            fare: Money::from_dollars(25),
        }
    }
}

/// Conductor-supplied replacement metadata for the bus
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusInfoUpdate {
    /// New display name
    pub name: String,
    /// New registration number
    pub number: String,
    /// New route description
    pub route: String,
    /// New total capacity
    pub capacity: u32,
}

/// Contact-form submission recorded in the history log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Sender name
    pub name: String,
    /// Sender email address
    pub email: String,
    /// Message subject
    pub subject: String,
    /// Message body
    pub message: String,
}

/// Per-passenger loyalty state
///
/// Every sixth completed ride grants a free-ride credit; consuming a
/// credit books the ride at zero fare and accrues the skipped amount in
/// `total_savings`. All fields stay non-negative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyLedger {
    /// Completed bookings ever made by this passenger
    pub ride_count: u32,
    /// Unused free-ride credits currently available
    pub free_rides: u32,
    /// Ride count at which the next credit is granted
    pub next_free_ride_at: u32,
    /// Fare amounts skipped via free rides, accumulated
    pub total_savings: Money,
}

impl Default for LoyaltyLedger {
    fn default() -> Self {
        Self {
            ride_count: 0,
            free_rides: 1,
            next_free_ride_at: crate::loyalty::FREE_RIDE_INTERVAL,
            total_savings: Money::ZERO,
        }
    }
}

/// A committed seat reservation
///
/// Immutable once created; the booking list is append-only and ordered
/// by insertion (chronological).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking identifier
    pub id: BookingId,
    /// Bus name at booking time
    pub bus_name: String,
    /// Bus registration number at booking time
    pub bus_number: String,
    /// Seats reserved
    pub seats: u32,
    /// Total fare charged (zero when the ride was free)
    pub fare: Money,
    /// When the booking was committed
    pub booked_at: DateTime<Utc>,
    /// Whether a free-ride credit paid for this booking
    pub is_free: bool,
}

/// Kind of activity a history entry records
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    /// A committed seat reservation
    Booking,
    /// A conductor bus-info update
    BusInfoUpdate,
    /// A contact-form submission
    Contact,
}

/// One record in the newest-first history log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Entry identifier
    pub id: EntryId,
    /// What happened
    pub kind: EntryKind,
    /// Short headline
    pub title: String,
    /// One-line description
    pub description: String,
    /// Extra detail line
    pub details: String,
    /// When the entry was recorded
    pub recorded_at: DateTime<Utc>,
}

/// The whole application state owned by the store
///
/// One instance exists per store; nothing else mutates the bus or the
/// ledger outside the reducer's documented operations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BookingState {
    /// The single active bus
    pub bus: Bus,
    /// The current passenger's loyalty ledger
    pub ledger: LoyaltyLedger,
    /// All committed bookings, oldest first
    pub bookings: Vec<Booking>,
    /// Activity history, newest first
    pub history: HistoryLog,
    /// Outcome of the most recent command: the validation error if it
    /// was rejected, cleared when a command commits. Not persisted.
    #[serde(skip)]
    pub last_error: Option<EngineError>,
}

impl BookingState {
    /// Number of committed bookings
    #[must_use]
    pub fn booking_count(&self) -> usize {
        self.bookings.len()
    }

    /// The most recently committed booking, if any
    #[must_use]
    pub fn latest_booking(&self) -> Option<&Booking> {
        self.bookings.last()
    }
}
