//! BusConnect demo binary
//!
//! Scripted walkthrough of the booking engine: a passenger books rides
//! (the first one free), a conductor adjusts the inventory and updates
//! the bus, a contact form lands in the history, and the ride stats are
//! printed at the end. State persists under `./busconnect-data`, so a
//! second run continues where the first left off.

use std::sync::Arc;

use busconnect_engine::{BookingEnvironment, BookingService, BusInfoUpdate, ContactMessage};
use busconnect_storage::JsonFileStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "busconnect=info,busconnect_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== BusConnect: Booking & Loyalty Demo ===\n");

    let kv = Arc::new(JsonFileStore::open("./busconnect-data")?);
    let mut service = BookingService::new(BookingEnvironment::production(), kv);

    let bus = service.bus();
    println!("Active bus: {} ({})", bus.name, bus.number);
    println!("Route: {}", bus.route);
    if let (Some(first), Some(last)) = (bus.stops.first(), bus.stops.last()) {
        println!("From {first} to {last}");
    }
    println!(
        "Seats: {} vacant of {} | occupancy {:.1}% | fare {} per seat",
        bus.vacant_seats,
        bus.capacity,
        bus.occupancy_percent(),
        bus.fare
    );

    // Passenger books two seats
    println!("\n>>> Booking 2 seats, City Center → Tech Park");
    match service.book_seats(2, "City Center", "Tech Park") {
        Ok(outcome) => {
            let tag = if outcome.booking.is_free {
                "FREE ride".to_string()
            } else {
                format!("fare {}", outcome.booking.fare)
            };
            println!(
                "Confirmed: {} ({tag}), {} seats now vacant",
                outcome.entry.title, outcome.bus.vacant_seats
            );
        },
        Err(error) => println!("Rejected: {error}"),
    }

    // A second booking is charged normally
    println!("\n>>> Booking 1 seat, Market Street → University");
    match service.book_seats(1, "Market Street", "University") {
        Ok(outcome) => println!(
            "Confirmed: {} (fare {})",
            outcome.entry.title, outcome.booking.fare
        ),
        Err(error) => println!("Rejected: {error}"),
    }

    // Overbooking is rejected without touching state
    let vacant = service.bus().vacant_seats;
    println!("\n>>> Trying to book {} seats (only {vacant} vacant)", vacant + 1);
    match service.book_seats(vacant + 1, "City Center", "North Suburbs") {
        Ok(_) => println!("Unexpectedly confirmed"),
        Err(error) => println!("Rejected as expected: {error}"),
    }

    // Conductor frees three seats at a stop
    println!("\n>>> Conductor: three passengers got off (+3 seats)");
    match service.adjust_inventory(3) {
        Ok(bus) => println!(
            "Vacancy now {} of {} ({:.1}% occupied)",
            bus.vacant_seats,
            bus.capacity,
            bus.occupancy_percent()
        ),
        Err(error) => println!("Rejected: {error}"),
    }

    // Conductor updates the bus details
    println!("\n>>> Conductor: updating bus details");
    let updated = service.update_bus_info(BusInfoUpdate {
        name: "City Express".to_string(),
        number: "KA-01-AB-1234".to_string(),
        route: "City Center - North Suburbs".to_string(),
        capacity: 42,
    });
    match updated {
        Ok(bus) => println!("Bus updated: capacity {}, route {}", bus.capacity, bus.route),
        Err(error) => println!("Rejected: {error}"),
    }

    // A contact form submission
    println!("\n>>> Submitting contact form");
    let submitted = service.submit_contact(ContactMessage {
        name: "Asha".to_string(),
        email: "asha@example.com".to_string(),
        subject: "Great service".to_string(),
        message: "The 8am ride was right on time.".to_string(),
    });
    match submitted {
        Ok(entry) => println!("Recorded: {}", entry.title),
        Err(error) => println!("Rejected: {error}"),
    }

    // History and stats
    println!("\n=== Recent history (newest first) ===");
    for entry in service.history_snapshot(10) {
        println!(
            "- [{}] {} | {}",
            entry.recorded_at.format("%Y-%m-%d %H:%M"),
            entry.title,
            entry.details
        );
    }

    let stats = service.stats();
    println!("\n=== Ride stats ===");
    println!("Total rides:       {}", stats.total_rides);
    println!("Free rides earned: {}", stats.free_rides_earned);
    println!("Total savings:     {}", stats.total_savings);

    let dead = service.dead_letters();
    if !dead.is_empty() {
        println!("\nWarning: {} snapshot write(s) failed; data on disk is stale", dead.len());
    }

    println!("\nState saved under ./busconnect-data; run again to continue.");
    Ok(())
}
