//! Loyalty ledger: ride counting, free-ride credits, savings.

use serde::{Deserialize, Serialize};

use crate::types::{LoyaltyLedger, Money};

/// Rides between free-ride credit grants
pub const FREE_RIDE_INTERVAL: u32 = 6;

impl LoyaltyLedger {
    /// Whether the passenger's next booking rides free.
    ///
    /// Only the very first ride (count still at zero) can redeem a
    /// credit. Credits granted at later thresholds accrue in
    /// `free_rides` and show up in [`LoyaltyLedger::stats`], but this
    /// check never re-opens for them.
    #[must_use]
    pub const fn is_next_ride_free(&self) -> bool {
        self.ride_count == 0 && self.free_rides > 0
    }

    /// Record one completed booking transaction.
    ///
    /// Counts one ride per booking regardless of seat count. When the
    /// ride consumed a credit (`was_free`), one credit is spent (never
    /// below zero) and the skipped fare accrues as savings. The
    /// threshold check then runs unconditionally: reaching
    /// `next_free_ride_at` grants a credit and moves the threshold up by
    /// [`FREE_RIDE_INTERVAL`].
    pub fn record_ride(&mut self, seats: u32, fare_per_seat: Money, was_free: bool) {
        self.ride_count += 1;

        if was_free {
            self.free_rides = self.free_rides.saturating_sub(1);
            self.total_savings += fare_per_seat.times(seats);
        }

        if self.ride_count >= self.next_free_ride_at {
            self.free_rides += 1;
            self.next_free_ride_at += FREE_RIDE_INTERVAL;
        }
    }

    /// Derive the ride statistics shown on the history screen.
    ///
    /// Totals come from the ledger, not from the history log length.
    #[must_use]
    pub fn stats(&self) -> RideStats {
        RideStats {
            total_rides: self.ride_count,
            free_rides_earned: self.ride_count / FREE_RIDE_INTERVAL
                + u32::from(self.free_rides > 0),
            total_savings: self.total_savings,
        }
    }
}

/// Ledger-derived ride statistics
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideStats {
    /// Completed bookings ever made
    pub total_rides: u32,
    /// Estimated credits earned: one per six rides, plus one while a
    /// credit is still unspent
    pub free_rides_earned: u32,
    /// Accumulated fare skipped via free rides
    pub total_savings: Money,
}
