//! # BusConnect Engine
//!
//! The booking-and-loyalty state engine: seat inventory on a single bus,
//! a per-passenger loyalty ledger that grants a free-ride credit every
//! sixth ride, and the newest-first activity history those transactions
//! produce.
//!
//! The engine is a pure reducer ([`booking::BookingReducer`]) over an
//! explicit state struct ([`types::BookingState`]), driven through the
//! synchronous store in `busconnect-runtime`. Rendering layers talk to
//! [`service::BookingService`], which exposes `Result`-returning
//! operations and never requires callers to touch state directly.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use busconnect_engine::{BookingEnvironment, BookingService};
//! use busconnect_storage::JsonFileStore;
//!
//! let kv = Arc::new(JsonFileStore::open("./busconnect-data")?);
//! let mut service = BookingService::new(BookingEnvironment::production(), kv);
//!
//! let outcome = service.book_seats(2, "City Center", "Tech Park")?;
//! println!("fare: {}", outcome.booking.fare);
//! ```

/// Booking reducer: actions, environment, commit sequence
pub mod booking;
/// Engine validation errors
pub mod error;
/// Newest-first activity history
pub mod history;
/// Seat inventory operations
pub mod inventory;
/// Loyalty ledger rules and ride statistics
pub mod loyalty;
/// Persisted snapshots and hydration
pub mod persist;
/// Facade for presentation layers
pub mod service;
/// Domain types
pub mod types;

pub use booking::{BookingAction, BookingEnvironment, BookingReducer};
pub use error::EngineError;
pub use history::HistoryLog;
pub use loyalty::{FREE_RIDE_INTERVAL, RideStats};
pub use service::{BookingOutcome, BookingService};
pub use types::{
    Booking, BookingId, BookingState, Bus, BusInfoUpdate, ContactMessage, EntryId, EntryKind,
    HistoryEntry, LoyaltyLedger, Money,
};
