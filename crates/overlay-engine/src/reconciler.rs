//! Sweep normalized busy intervals across availability windows.
//!
//! Both inputs are chronologically ordered, so a single cursor walks the busy
//! intervals once while the windows are visited in order. Each interval is
//! examined by exactly one window: the first window whose end lies after the
//! interval's start. It is clipped to that window or dropped, and never looked
//! at again. An interval spanning two windows therefore only shows up in the
//! first of them.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::calendar::duration_to_hours;
use crate::event::AvailabilityWindow;
use crate::interval::{BusyInterval, ClippedInterval, DayOverlay};

/// Clip `intervals` onto `windows`.
///
/// Preconditions (unchecked): `windows` are in chronological order and do not
/// overlap, and `intervals` are sorted by start. Violating either yields an
/// unspecified but memory-safe overlay.
///
/// Every window gets an entry in the result, possibly empty. Intervals that
/// clip to zero length are discarded, and a window whose end is not a
/// representable instant receives nothing.
pub fn reconcile<M: Clone>(
    windows: &[AvailabilityWindow],
    intervals: &[BusyInterval<M>],
) -> DayOverlay<M> {
    let mut overlay: DayOverlay<M> = windows
        .iter()
        .map(|window| (window.day_index, Vec::new()))
        .collect();

    let mut cursor = 0;
    let mut dropped = 0usize;

    for window in windows {
        if cursor >= intervals.len() {
            break;
        }
        let Some(window_end) = window.end() else {
            debug!(day_index = window.day_index, "window end out of range, left empty");
            continue;
        };

        while let Some(interval) = intervals.get(cursor) {
            if interval.start >= window_end {
                break;
            }
            cursor += 1;

            match clip(window, window_end, interval) {
                Some(clipped) => overlay.entry(window.day_index).or_default().push(clipped),
                None => dropped += 1,
            }
        }
    }

    debug!(
        windows = windows.len(),
        intervals = intervals.len(),
        consumed = cursor,
        dropped,
        "reconciled busy intervals"
    );
    overlay
}

/// Truncate `interval` to `[window.start, window_end]`.
///
/// Returns `None` when the two do not touch or the truncated interval has no
/// positive length.
fn clip<M: Clone>(
    window: &AvailabilityWindow,
    window_end: DateTime<Utc>,
    interval: &BusyInterval<M>,
) -> Option<ClippedInterval<M>> {
    let within = |instant: DateTime<Utc>| window.start <= instant && instant <= window_end;
    let covers_window = interval.start <= window.start && window_end <= interval.end;

    if !(within(interval.start) || within(interval.end) || covers_window) {
        return None;
    }

    let start = interval.start.max(window.start);
    let end = interval.end.min(window_end);
    let hours_length = duration_to_hours(end - start);
    if hours_length <= 0.0 {
        return None;
    }

    Some(ClippedInterval {
        start,
        end,
        hours_offset: duration_to_hours(start - window.start),
        hours_length,
        metadata: interval.metadata.clone(),
    })
}
