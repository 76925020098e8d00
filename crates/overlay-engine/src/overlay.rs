//! End-to-end overlay: event configuration plus fetched busy data in, clipped
//! per-day intervals out.
//!
//! This is the composition of [`crate::normalizer`] and [`crate::reconciler`]
//! that an availability grid calls once per render.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};
use tracing::debug;

use crate::error::Result;
use crate::event::EventConfig;
use crate::fetch::CalendarEventsMap;
use crate::interval::{BusyInterval, DayOverlay};
use crate::normalizer::{normalize, Placement};
use crate::reconciler::reconcile;

/// Split one calendar's busy intervals into per-day clipped intervals.
///
/// `week_offset` selects the displayed week for recurring events relative to
/// the week containing `today`; it is ignored for specific-date events. Dates
/// are read in the timezone of `today`.
///
/// # Errors
/// Returns `OverlayError::EmptyReferenceWeek` for a recurring event with no
/// dates.
pub fn split_calendar_events_by_day<Tz: TimeZone, M: Clone>(
    event: &EventConfig,
    intervals: &[BusyInterval<M>],
    week_offset: i64,
    today: &DateTime<Tz>,
) -> Result<DayOverlay<M>> {
    let placement = Placement::for_event(event, week_offset, today)?;
    let normalized = normalize(intervals, &placement);
    Ok(reconcile(&event.windows(), &normalized))
}

/// [`split_calendar_events_by_day`] for every account in `events`.
pub fn split_accounts_by_day<Tz: TimeZone, M: Clone>(
    event: &EventConfig,
    events: &CalendarEventsMap<M>,
    week_offset: i64,
    today: &DateTime<Tz>,
) -> Result<BTreeMap<String, DayOverlay<M>>> {
    let placement = Placement::for_event(event, week_offset, today)?;
    let windows = event.windows();

    let overlays = events
        .iter()
        .map(|(account, intervals)| {
            let normalized = normalize(intervals, &placement);
            (account.clone(), reconcile(&windows, &normalized))
        })
        .collect::<BTreeMap<_, _>>();

    debug!(accounts = overlays.len(), "split calendar accounts by day");
    Ok(overlays)
}
