//! Seat inventory operations on the bus.
//!
//! All mutation goes through [`Bus::try_reserve`] and [`Bus::adjust`];
//! both validate before touching the vacancy so a rejected request is a
//! perfect no-op.

use crate::error::EngineError;
use crate::types::{Bus, BusInfoUpdate};

impl Bus {
    /// Reserve `seats` vacant seats for a booking.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidSeatCount`] when `seats` is zero
    /// - [`EngineError::InsufficientSeats`] when `seats` exceeds the
    ///   current vacancy
    pub fn try_reserve(&mut self, seats: u32) -> Result<(), EngineError> {
        if seats < 1 {
            return Err(EngineError::InvalidSeatCount);
        }
        if seats > self.vacant_seats {
            return Err(EngineError::InsufficientSeats {
                requested: seats,
                available: self.vacant_seats,
            });
        }
        self.vacant_seats -= seats;
        Ok(())
    }

    /// Apply a conductor vacancy adjustment and return the new vacancy.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InventoryOutOfRange`] when the result would
    /// fall below zero or exceed the capacity; the vacancy is untouched.
    pub fn adjust(&mut self, delta: i32) -> Result<u32, EngineError> {
        let next = if delta.is_negative() {
            self.vacant_seats.checked_sub(delta.unsigned_abs())
        } else {
            self.vacant_seats.checked_add(delta.unsigned_abs())
        };
        match next {
            Some(vacant) if vacant <= self.capacity => {
                self.vacant_seats = vacant;
                Ok(vacant)
            },
            _ => Err(EngineError::InventoryOutOfRange {
                delta,
                capacity: self.capacity,
            }),
        }
    }

    /// Current occupancy as a percentage, rounded to one decimal.
    ///
    /// A zero-capacity bus reports 0.0 rather than dividing by zero;
    /// the update path rejects such capacities, so this only matters for
    /// hand-built values.
    #[must_use]
    pub fn occupancy_percent(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        let occupied = f64::from(self.capacity - self.vacant_seats);
        let percent = occupied / f64::from(self.capacity) * 100.0;
        (percent * 10.0).round() / 10.0
    }

    /// Replace the bus metadata with a validated conductor update.
    ///
    /// The vacancy is clamped down if the new capacity is smaller than
    /// the seats currently vacant.
    pub fn apply_info(&mut self, update: &BusInfoUpdate) {
        self.name.clone_from(&update.name);
        self.number.clone_from(&update.number);
        self.route.clone_from(&update.route);
        self.capacity = update.capacity;
        if self.vacant_seats > self.capacity {
            self.vacant_seats = self.capacity;
        }
    }
}

impl BusInfoUpdate {
    /// Validate a conductor update before it is applied.
    ///
    /// # Errors
    ///
    /// - [`EngineError::MissingField`] for an empty name, number, or route
    /// - [`EngineError::InvalidCapacity`] for a capacity below one
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.name.trim().is_empty() {
            return Err(EngineError::missing("bus name"));
        }
        if self.number.trim().is_empty() {
            return Err(EngineError::missing("bus number"));
        }
        if self.route.trim().is_empty() {
            return Err(EngineError::missing("route"));
        }
        if self.capacity < 1 {
            return Err(EngineError::InvalidCapacity);
        }
        Ok(())
    }
}
