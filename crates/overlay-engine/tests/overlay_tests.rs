//! End-to-end tests: event configuration + fetched busy data → per-day overlay.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use overlay_engine::interval::{BusyInterval, Metadata};
use overlay_engine::{
    split_accounts_by_day, split_calendar_events_by_day, CalendarEventsMap, EventConfig,
    EventKind, OverlayError,
};
use serde_json::json;

fn utc(month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, month, day, hour, min, 0).unwrap()
}

fn busy(start: DateTime<Utc>, end: DateTime<Utc>) -> BusyInterval {
    BusyInterval {
        start,
        end,
        metadata: Metadata::new(),
    }
}

/// Tuesdays and Thursdays, 09:00-17:00 UTC.
fn weekly_event() -> EventConfig {
    EventConfig {
        kind: EventKind::RecurringWeekly,
        dates: vec![utc(1, 6, 9, 0), utc(1, 8, 9, 0)],
        duration: 8.0,
        start_on_monday: false,
    }
}

fn today() -> DateTime<Utc> {
    utc(3, 18, 12, 0)
}

#[test]
fn weekly_event_overlays_the_current_week() {
    let intervals = vec![
        busy(utc(3, 19, 10, 0), utc(3, 19, 11, 0)),
        busy(utc(3, 17, 8, 0), utc(3, 17, 9, 30)),
    ];

    let overlay = split_calendar_events_by_day(&weekly_event(), &intervals, 0, &today()).unwrap();

    assert_eq!(overlay[&0].len(), 1);
    assert_eq!(overlay[&0][0].hours_offset, 0.0);
    assert_eq!(overlay[&0][0].hours_length, 0.5);
    assert_eq!(overlay[&0][0].start, utc(1, 6, 9, 0));

    assert_eq!(overlay[&1].len(), 1);
    assert_eq!(overlay[&1][0].hours_offset, 1.0);
    assert_eq!(overlay[&1][0].hours_length, 1.0);
}

#[test]
fn week_offset_selects_which_fetched_week_shows() {
    let intervals = vec![busy(utc(3, 24, 13, 0), utc(3, 24, 14, 0))];

    let this_week = split_calendar_events_by_day(&weekly_event(), &intervals, 0, &today()).unwrap();
    assert!(this_week.values().all(Vec::is_empty));

    let next_week = split_calendar_events_by_day(&weekly_event(), &intervals, 1, &today()).unwrap();
    assert_eq!(next_week[&0].len(), 1);
    assert_eq!(next_week[&0][0].hours_offset, 4.0);
}

#[test]
fn specific_dates_use_fetched_instants() {
    let event = EventConfig {
        kind: EventKind::SpecificDates,
        dates: vec![utc(3, 16, 9, 0), utc(3, 17, 9, 0)],
        duration: 8.0,
        start_on_monday: false,
    };
    let intervals = vec![
        busy(utc(3, 17, 16, 30), utc(3, 17, 18, 0)),
        busy(utc(3, 16, 8, 0), utc(3, 16, 10, 0)),
    ];

    // week_offset has no effect on specific dates
    let overlay = split_calendar_events_by_day(&event, &intervals, 5, &today()).unwrap();

    assert_eq!(overlay[&0][0].hours_offset, 0.0);
    assert_eq!(overlay[&0][0].hours_length, 1.0);
    assert_eq!(overlay[&1][0].hours_offset, 7.5);
    assert_eq!(overlay[&1][0].hours_length, 0.5);
}

#[test]
fn weekdays_are_read_in_the_viewer_timezone() {
    // UTC+9: the Thursday window starts Thursday 18:00 local.
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    let today = tokyo.with_ymd_and_hms(2026, 3, 18, 12, 0, 0).unwrap();
    let intervals = vec![busy(utc(3, 19, 10, 0), utc(3, 19, 11, 0))];

    let overlay = split_calendar_events_by_day(&weekly_event(), &intervals, 0, &today).unwrap();
    assert_eq!(overlay[&1].len(), 1);
    assert_eq!(overlay[&1][0].hours_offset, 1.0);
}

#[test]
fn every_account_gets_its_own_overlay() {
    let mut events: CalendarEventsMap = CalendarEventsMap::new();
    events.insert(
        "ana@example.com_google".to_string(),
        vec![busy(utc(3, 17, 12, 0), utc(3, 17, 13, 0))],
    );
    events.insert("ben@example.com_outlook".to_string(), vec![]);

    let overlays = split_accounts_by_day(&weekly_event(), &events, 0, &today()).unwrap();

    assert_eq!(overlays.len(), 2);
    assert_eq!(overlays["ana@example.com_google"][&0][0].hours_offset, 3.0);
    assert!(overlays["ben@example.com_outlook"].values().all(Vec::is_empty));
}

#[test]
fn output_serializes_with_wire_names() {
    let intervals = vec![busy(utc(3, 17, 12, 0), utc(3, 17, 13, 0))];
    let overlay = split_calendar_events_by_day(&weekly_event(), &intervals, 0, &today()).unwrap();

    let value = serde_json::to_value(&overlay).unwrap();
    assert_eq!(value["0"][0]["hoursOffset"], json!(3.0));
    assert_eq!(value["0"][0]["hoursLength"], json!(1.0));
    assert!(value["0"][0]["startDate"].is_string());
    assert_eq!(value["1"], json!([]));
}

// ── Event configuration limits ─────────────────────────────────────────────

#[test]
fn huge_duration_parses_and_overlays_nothing() {
    let event = EventConfig::from_json(
        r#"{"type":"specific_dates","dates":["2026-03-16T09:00:00Z"],"duration":1e12}"#,
    )
    .unwrap();
    let intervals = vec![busy(utc(3, 16, 10, 0), utc(3, 16, 11, 0))];

    let overlay = split_calendar_events_by_day(&event, &intervals, 0, &today()).unwrap();
    assert_eq!(overlay.len(), 1);
    assert!(overlay[&0].is_empty());
}

#[test]
fn negative_duration_is_rejected() {
    let result = EventConfig::from_json(
        r#"{"type":"dow","dates":["2026-01-06T09:00:00Z"],"duration":-2}"#,
    );
    assert!(matches!(result, Err(OverlayError::InvalidDuration(d)) if d == -2.0));
}
