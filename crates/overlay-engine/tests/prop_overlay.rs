//! Property-based tests for alignment and clipping using proptest.
//!
//! These check invariants that must hold for any reference week, offset and
//! busy sequence, not just the hand-picked cases in the other test files.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use chrono_tz::Tz;
use overlay_engine::interval::{BusyInterval, Metadata};
use overlay_engine::{reconcile, AvailabilityWindow, Direction, ReferenceWeek};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Whole-hour offsets from UTC-12 to UTC+14.
fn arb_offset() -> impl Strategy<Value = FixedOffset> {
    (-12i32..=14).prop_map(|h| FixedOffset::east_opt(h * 3600).unwrap())
}

/// DST-observing zones on both sides of UTC.
fn arb_named_zone() -> impl Strategy<Value = Tz> {
    prop_oneof![
        Just(chrono_tz::Europe::Berlin),
        Just(chrono_tz::America::New_York),
        Just(chrono_tz::Australia::Sydney),
    ]
}

/// A non-empty subset of weekdays, as day numbers from Sunday.
fn arb_weekdays() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::btree_set(0u32..7, 1..=7).prop_map(|set| set.into_iter().collect())
}

/// (year, month, day, hour, minute) in 2025-2027; day capped at 28.
fn arb_ymdhm() -> impl Strategy<Value = (i32, u32, u32, u32, u32)> {
    (2025i32..=2027, 1u32..=12, 1u32..=28, 0u32..=23, 0u32..=59)
}

/// Like [`arb_ymdhm`], but 04:00 or later so the wall-clock time is never
/// inside a DST gap or fold.
fn arb_ymdhm_daytime() -> impl Strategy<Value = (i32, u32, u32, u32, u32)> {
    (2025i32..=2027, 1u32..=12, 1u32..=28, 4u32..=23, 0u32..=59)
}

/// Sorted busy intervals on the 14 days from 2026-03-15, in 15-minute steps.
fn arb_busy() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..14 * 96, 0i64..48), 0..40).prop_map(|mut raw| {
        raw.sort();
        raw
    })
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap()
}

fn busy_from(raw: &[(i64, i64)]) -> Vec<BusyInterval> {
    raw.iter()
        .map(|&(start, length)| {
            let start = base() + Duration::minutes(15 * start);
            BusyInterval {
                start,
                end: start + Duration::minutes(15 * length),
                metadata: Metadata::new(),
            }
        })
        .collect()
}

/// One window per day starting at `start_hour`, `duration` hours long.
fn daily_windows(days: usize, start_hour: i64, duration: f64) -> Vec<AvailabilityWindow> {
    (0..days)
        .map(|i| AvailabilityWindow {
            day_index: i,
            start: base() + Duration::days(i as i64) + Duration::hours(start_hour),
            duration_hours: duration,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Property 1: forward then reverse alignment is the identity
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn alignment_round_trips(
        tz in arb_offset(),
        weekdays in arb_weekdays(),
        ref_time in (0u32..=23, 0u32..=59),
        target in arb_ymdhm(),
        today in arb_ymdhm(),
        week_offset in -10i64..=10,
        start_on_monday in any::<bool>(),
    ) {
        // Sunday 2026-01-04 plus each weekday.
        let dates: Vec<_> = weekdays
            .iter()
            .map(|&d| tz.with_ymd_and_hms(2026, 1, 4 + d, ref_time.0, ref_time.1, 0).unwrap())
            .collect();
        let week = ReferenceWeek::new(dates, start_on_monday).unwrap();

        let (y, m, d, h, min) = target;
        let target = tz.with_ymd_and_hms(y, m, d, h, min, 0).unwrap();
        let (y, m, d, h, min) = today;
        let today = tz.with_ymd_and_hms(y, m, d, h, min, 0).unwrap();

        let there = week.align(&target, week_offset, Direction::Forward, &today);
        let back = week.align(&there, week_offset, Direction::Reverse, &today);
        prop_assert_eq!(back, target);
    }
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn alignment_round_trips_in_dst_zones(
        tz in arb_named_zone(),
        weekdays in arb_weekdays(),
        ref_time in (4u32..=23, 0u32..=59),
        target in arb_ymdhm_daytime(),
        today in arb_ymdhm_daytime(),
        week_offset in -10i64..=10,
        start_on_monday in any::<bool>(),
    ) {
        let dates: Vec<_> = weekdays
            .iter()
            .map(|&d| tz.with_ymd_and_hms(2026, 1, 4 + d, ref_time.0, ref_time.1, 0).unwrap())
            .collect();
        let week = ReferenceWeek::new(dates, start_on_monday).unwrap();

        let (y, m, d, h, min) = target;
        let target = tz.with_ymd_and_hms(y, m, d, h, min, 0).unwrap();
        let (y, m, d, h, min) = today;
        let today = tz.with_ymd_and_hms(y, m, d, h, min, 0).unwrap();

        let there = week.align(&target, week_offset, Direction::Forward, &today);
        let back = week.align(&there, week_offset, Direction::Reverse, &today);
        prop_assert_eq!(back, target);
    }
}

// ---------------------------------------------------------------------------
// Property 2: clipped intervals stay inside their window
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn clipped_intervals_fit_their_window(
        raw in arb_busy(),
        start_hour in 0i64..=16,
        duration in 0u32..=8,
    ) {
        let windows = daily_windows(14, start_hour, duration as f64);
        let overlay = reconcile(&windows, &busy_from(&raw));

        for window in &windows {
            for clipped in &overlay[&window.day_index] {
                prop_assert!(clipped.hours_offset >= 0.0);
                prop_assert!(clipped.hours_length > 0.0);
                prop_assert!(
                    clipped.hours_offset + clipped.hours_length <= window.duration_hours + 1e-9,
                    "{:?} overflows window of {} hours",
                    clipped,
                    window.duration_hours
                );
                prop_assert!(window.contains(clipped.start));
                prop_assert!(window.contains(clipped.end));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: intervals outside all windows produce nothing
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn intervals_between_windows_are_never_attributed(
        raw in prop::collection::vec((0i64..14, 0i64..32, 1i64..=4), 0..30),
    ) {
        // Windows 09:00-17:00; busy intervals start between 17:00 and 00:45
        // and last at most four hours, so they end by 04:45.
        let mut raw = raw;
        raw.sort();
        let intervals: Vec<BusyInterval> = raw
            .iter()
            .map(|&(day, quarter, hours)| {
                let start = base()
                    + Duration::days(day)
                    + Duration::hours(17)
                    + Duration::minutes(15 * quarter);
                BusyInterval {
                    start,
                    end: start + Duration::hours(hours),
                    metadata: Metadata::new(),
                }
            })
            .collect();

        let overlay = reconcile(&daily_windows(14, 9, 8.0), &intervals);
        prop_assert!(overlay.values().all(Vec::is_empty));
    }
}
