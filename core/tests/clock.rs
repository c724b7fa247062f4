//! Clock behavior: monotonic ticks, calendar projection, frequency checks.

use chronica_core::{clock::WorldClock, config::CalendarConfig};

#[test]
fn starts_at_zero_and_only_increases() {
    let mut clock = WorldClock::new();
    assert_eq!(clock.current_tick(), 0);
    assert_eq!(clock.advance(), 1);
    assert_eq!(clock.advance_by(9), 10);
    assert_eq!(clock.advance_by(0), 10);
    assert_eq!(clock.current_tick(), 10);
}

#[test]
fn default_calendar_projection() {
    let clock = WorldClock::new();

    let d0 = clock.date_at(0);
    assert_eq!((d0.year, d0.month, d0.day), (1, 1, 1));

    let d29 = clock.date_at(29);
    assert_eq!((d29.year, d29.month, d29.day), (1, 1, 30));

    let d30 = clock.date_at(30);
    assert_eq!((d30.year, d30.month, d30.day), (1, 2, 1));

    let d359 = clock.date_at(359);
    assert_eq!((d359.year, d359.month, d359.day), (1, 12, 30));

    let d360 = clock.date_at(360);
    assert_eq!((d360.year, d360.month, d360.day), (2, 1, 1));
}

#[test]
fn current_date_tracks_the_tick() {
    let mut clock = WorldClock::new();
    clock.advance_by(365);
    let date = clock.current_date();
    assert_eq!((date.year, date.month, date.day), (2, 1, 6));
}

#[test]
fn custom_calendar_constants_apply_everywhere() {
    let calendar = CalendarConfig {
        days_per_month: 10,
        months_per_year: 4,
    };
    let clock = WorldClock::with_calendar(calendar);
    assert_eq!(calendar.days_per_year(), 40);

    let d = clock.date_at(45);
    assert_eq!((d.year, d.month, d.day), (2, 1, 6));
}

#[test]
fn is_due_matches_divisibility() {
    let mut clock = WorldClock::new();
    // Tick 0 is due for every frequency by the divisibility rule; the
    // engine advances before running systems, so tick 0 never executes.
    assert!(clock.is_due(1));
    assert!(clock.is_due(30));

    clock.advance_by(7);
    assert!(clock.is_due(1));
    assert!(clock.is_due(7));
    assert!(!clock.is_due(2));
    assert!(!clock.is_due(30));

    clock.advance_by(23); // tick 30
    assert!(clock.is_due(30));
    assert!(clock.is_due(15));
}

#[test]
#[should_panic(expected = "frequency must be positive")]
fn zero_frequency_is_a_wiring_bug() {
    let clock = WorldClock::new();
    clock.is_due(0);
}
