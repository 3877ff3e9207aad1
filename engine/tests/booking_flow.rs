//! End-to-end tests through the service facade.
//!
//! These drive the full path a rendering layer would: hydrate from a
//! key-value store, dispatch operations, and read the results back.

use std::sync::Arc;

use busconnect_engine::{
    BookingEnvironment, BookingService, BusInfoUpdate, ContactMessage, EngineError, EntryKind,
    Money,
};
use busconnect_testing::{FailingStore, MemoryStore, SequentialIds, test_clock};

fn service_over(kv: Arc<MemoryStore>) -> BookingService {
    let env = BookingEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIds::new()));
    BookingService::new(env, kv)
}

fn fresh_service() -> BookingService {
    service_over(Arc::new(MemoryStore::new()))
}

#[test]
fn first_booking_scenario_rides_free() {
    // Seeded state: capacity 40, 15 vacant, $25 per seat, one credit.
    let mut service = fresh_service();

    let outcome = service.book_seats(2, "City Center", "Tech Park").unwrap();

    assert!(outcome.booking.is_free);
    assert!(outcome.booking.fare.is_zero());
    assert_eq!(outcome.bus.vacant_seats, 13);
    assert_eq!(outcome.ledger.ride_count, 1);
    assert_eq!(outcome.ledger.free_rides, 0);
    assert_eq!(outcome.ledger.total_savings, Money::from_dollars(50));
}

#[test]
fn sixth_ride_crosses_the_loyalty_threshold() {
    let mut service = fresh_service();

    // Free first ride, then four paid single-seat rides.
    service.book_seats(2, "City Center", "Tech Park").unwrap();
    for _ in 0..4 {
        let outcome = service.book_seats(1, "City Center", "University").unwrap();
        assert!(!outcome.booking.is_free);
        assert_eq!(outcome.booking.fare, Money::from_dollars(25));
    }
    assert_eq!(service.ledger().ride_count, 5);
    assert_eq!(service.ledger().free_rides, 0);

    // The sixth booking grants a credit and moves the threshold.
    let outcome = service.book_seats(1, "City Center", "University").unwrap();
    assert_eq!(outcome.ledger.ride_count, 6);
    assert_eq!(outcome.ledger.free_rides, 1);
    assert_eq!(outcome.ledger.next_free_ride_at, 12);

    // The earned credit does not make the seventh ride free.
    let outcome = service.book_seats(1, "City Center", "University").unwrap();
    assert!(!outcome.booking.is_free);
    assert_eq!(outcome.booking.fare, Money::from_dollars(25));
}

#[test]
fn rejected_bookings_leave_everything_unchanged() {
    let mut service = fresh_service();
    let bus_before = service.bus();
    let ledger_before = service.ledger();

    assert_eq!(
        service.book_seats(0, "A", "B"),
        Err(EngineError::InvalidSeatCount)
    );
    assert_eq!(
        service.book_seats(16, "A", "B"),
        Err(EngineError::InsufficientSeats {
            requested: 16,
            available: 15
        })
    );

    assert_eq!(service.bus(), bus_before);
    assert_eq!(service.ledger(), ledger_before);
    assert!(service.bookings().is_empty());
    assert!(service.history_snapshot(10).is_empty());
}

#[test]
fn conductor_adjustments_respect_bounds() {
    let mut service = fresh_service();

    let bus = service.adjust_inventory(3).unwrap();
    assert_eq!(bus.vacant_seats, 18);

    assert_eq!(
        service.adjust_inventory(-19),
        Err(EngineError::InventoryOutOfRange {
            delta: -19,
            capacity: 40
        })
    );
    assert_eq!(service.bus().vacant_seats, 18);

    assert_eq!(
        service.adjust_inventory(23),
        Err(EngineError::InventoryOutOfRange {
            delta: 23,
            capacity: 40
        })
    );
}

#[test]
fn history_is_newest_first_across_operation_kinds() {
    let mut service = fresh_service();

    service.book_seats(1, "City Center", "Tech Park").unwrap();
    service
        .update_bus_info(BusInfoUpdate {
            name: "City Express".to_string(),
            number: "KA-01-AB-1234".to_string(),
            route: "City Center - Suburbs".to_string(),
            capacity: 40,
        })
        .unwrap();
    service
        .submit_contact(ContactMessage {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            subject: "Timing".to_string(),
            message: "Is the 8am still running?".to_string(),
        })
        .unwrap();

    let history = service.history_snapshot(10);
    let kinds: Vec<EntryKind> = history.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        [EntryKind::Contact, EntryKind::BusInfoUpdate, EntryKind::Booking]
    );

    // A limit below the log length truncates from the newest end.
    let top = service.history_snapshot(1);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].kind, EntryKind::Contact);
}

#[test]
fn stats_follow_the_ledger_not_the_log() {
    let mut service = fresh_service();
    service.book_seats(2, "City Center", "Tech Park").unwrap();

    let stats = service.stats();
    assert_eq!(stats.total_rides, 1);
    // One ride, credit spent: nothing earned yet by the estimate.
    assert_eq!(stats.free_rides_earned, 0);
    assert_eq!(stats.total_savings, Money::from_dollars(50));
}

#[test]
fn state_survives_a_restart_through_the_store() {
    let kv = Arc::new(MemoryStore::new());

    let (bookings, ledger, history) = {
        let mut service = service_over(Arc::clone(&kv));
        service.book_seats(2, "City Center", "Tech Park").unwrap();
        service.book_seats(1, "Market Street", "University").unwrap();
        (
            service.bookings(),
            service.ledger(),
            service.history_snapshot(10),
        )
    };

    // A new service over the same store hydrates identical records.
    let service = service_over(kv);
    assert_eq!(service.bookings(), bookings);
    assert_eq!(service.ledger(), ledger);
    assert_eq!(service.history_snapshot(10), history);

    // The bus is not persisted: it re-derives from defaults.
    assert_eq!(service.bus().vacant_seats, 15);
}

#[test]
fn failed_saves_never_fail_the_booking() {
    let env = BookingEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIds::new()));
    let mut service = BookingService::new(env, Arc::new(FailingStore::new()));

    let outcome = service.book_seats(2, "City Center", "Tech Park").unwrap();
    assert!(outcome.booking.is_free);
    assert_eq!(service.ledger().ride_count, 1);

    // Three snapshots were refused and recorded.
    let dead = service.dead_letters();
    assert_eq!(dead.len(), 3);
    assert!(dead.iter().all(|f| f.reason.contains("storage")));
}

#[test]
fn bus_info_update_applies_before_later_bookings() {
    let mut service = fresh_service();
    service
        .update_bus_info(BusInfoUpdate {
            name: "Night Owl".to_string(),
            number: "KA-09-ZZ-0001".to_string(),
            route: "Depot Loop".to_string(),
            capacity: 20,
        })
        .unwrap();

    let outcome = service.book_seats(1, "Depot", "Loop End").unwrap();
    assert_eq!(outcome.booking.bus_name, "Night Owl");
    assert_eq!(outcome.booking.bus_number, "KA-09-ZZ-0001");
}
