//! Normalize fetched busy intervals into one start-ordered sequence.
//!
//! For specific-date events the fetched instants are already where they belong.
//! For recurring events every interval is first moved into the reference week
//! (see [`crate::alignment`]) so it can be swept against the reference-week
//! windows.

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::alignment::{Direction, ReferenceWeek};
use crate::error::Result;
use crate::event::{EventConfig, EventKind};
use crate::interval::BusyInterval;

/// Where fetched intervals are placed, decided once per event.
#[derive(Debug, Clone)]
pub enum Placement<Tz: TimeZone> {
    /// Keep the fetched instants.
    Absolute,
    /// Move instants from the requested week into the reference week.
    Weekly {
        week: ReferenceWeek<Tz>,
        week_offset: i64,
        today: DateTime<Tz>,
    },
}

impl<Tz: TimeZone> Placement<Tz> {
    /// Pick the placement for `event`. Weekdays are read in the timezone of
    /// `today`.
    ///
    /// # Errors
    /// Returns `OverlayError::EmptyReferenceWeek` for a recurring event without
    /// dates.
    pub fn for_event(
        event: &EventConfig,
        week_offset: i64,
        today: &DateTime<Tz>,
    ) -> Result<Self> {
        match event.kind {
            EventKind::SpecificDates => Ok(Placement::Absolute),
            EventKind::RecurringWeekly | EventKind::RecurringGroup => {
                let tz = today.timezone();
                let week = ReferenceWeek::new(
                    event.dates.iter().map(|d| d.with_timezone(&tz)),
                    event.start_on_monday,
                )?;
                Ok(Placement::Weekly {
                    week,
                    week_offset,
                    today: today.clone(),
                })
            }
        }
    }

    fn place(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Placement::Absolute => instant,
            Placement::Weekly {
                week,
                week_offset,
                today,
            } => {
                let local = instant.with_timezone(&today.timezone());
                week.align(&local, *week_offset, Direction::Forward, today)
                    .with_timezone(&Utc)
            }
        }
    }
}

/// Place every interval and sort the result by start.
///
/// The input is never modified; the returned intervals are copies carrying the
/// original metadata. Intervals with equal starts keep their fetched order.
pub fn normalize<Tz: TimeZone, M: Clone>(
    intervals: &[BusyInterval<M>],
    placement: &Placement<Tz>,
) -> Vec<BusyInterval<M>> {
    let mut normalized: Vec<BusyInterval<M>> = intervals
        .iter()
        .map(|interval| BusyInterval {
            start: placement.place(interval.start),
            end: placement.place(interval.end),
            metadata: interval.metadata.clone(),
        })
        .collect();

    normalized.sort_by_key(|interval| interval.start);

    debug!(count = normalized.len(), "normalized busy intervals");
    normalized
}
