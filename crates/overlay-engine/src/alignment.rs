//! Weekday alignment for recurring events.
//!
//! A recurring event ("every Tuesday and Thursday") is stored as a handful of
//! concrete reference dates that all fall in one arbitrary week, the reference
//! week. Busy intervals fetched for the week the user is looking at have to be
//! moved into that reference week before they can be compared against the
//! event's windows, and dates picked in the reference week have to be moved back
//! out for display. Both directions shift by the same whole number of days: the
//! distance between the start of the reference week and the start of the
//! requested week.

use chrono::{DateTime, Datelike, Duration, TimeZone};
use tracing::trace;

use crate::calendar::{resolve_local, shift_days};
use crate::error::{OverlayError, Result};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Which way [`ReferenceWeek::align`] moves a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Calendar date in the requested week → the matching day of the reference week.
    #[default]
    Forward,
    /// Reference-week date → the matching day of the requested week.
    Reverse,
}

/// The reference dates of one recurring event, ordered by weekday.
#[derive(Debug, Clone)]
pub struct ReferenceWeek<Tz: TimeZone> {
    dates: Vec<DateTime<Tz>>,
    start_on_monday: bool,
}

/// Position of `date` within its week. Sunday is 0, or 7 when weeks start on
/// Monday.
fn weekday_index<Tz: TimeZone>(date: &DateTime<Tz>, start_on_monday: bool) -> u32 {
    match date.weekday().num_days_from_sunday() {
        0 if start_on_monday => 7,
        index => index,
    }
}

impl<Tz: TimeZone> ReferenceWeek<Tz> {
    /// Build a reference week from the event's dates, read in timezone `Tz`.
    ///
    /// Dates are ordered by weekday index rather than by instant. An event
    /// authored far east of the viewer can list a Saturday before the Sunday
    /// that follows it; ordering by weekday picks the Sunday as the anchor, so
    /// the whole pattern lands in the right week.
    ///
    /// # Errors
    /// Returns `OverlayError::EmptyReferenceWeek` if `dates` is empty.
    pub fn new<I>(dates: I, start_on_monday: bool) -> Result<Self>
    where
        I: IntoIterator<Item = DateTime<Tz>>,
    {
        let mut dates: Vec<DateTime<Tz>> = dates.into_iter().collect();
        if dates.is_empty() {
            return Err(OverlayError::EmptyReferenceWeek);
        }
        dates.sort_by_key(|d| weekday_index(d, start_on_monday));

        Ok(Self {
            dates,
            start_on_monday,
        })
    }

    /// Reference dates in weekday order.
    pub fn dates(&self) -> &[DateTime<Tz>] {
        &self.dates
    }

    pub fn start_on_monday(&self) -> bool {
        self.start_on_monday
    }

    /// The date the week is measured from: the first date in weekday order.
    pub fn anchor(&self) -> &DateTime<Tz> {
        &self.dates[0]
    }

    /// Sunday of the anchor's week, at the anchor's time of day.
    pub fn week_start(&self) -> DateTime<Tz> {
        let anchor = self.anchor();
        let back = anchor.weekday().num_days_from_sunday() as i64;
        shift_days(anchor, -back)
    }

    /// Whole days from the reference week start to the start of the week
    /// `week_offset` weeks after the one containing `today`.
    ///
    /// The two week starts share a time of day, so the difference is a whole
    /// number of days up to DST drift; rounding absorbs the drift.
    pub fn day_offset(&self, week_offset: i64, today: &DateTime<Tz>) -> i64 {
        let reference_start = self.week_start();
        let tz = reference_start.timezone();

        let today = today.with_timezone(&tz);
        let back = today.weekday().num_days_from_sunday() as i64;
        let target_sunday =
            today.date_naive() - Duration::days(back) + Duration::days(7 * week_offset);
        let target_start = resolve_local(
            &tz,
            target_sunday.and_time(reference_start.naive_local().time()),
        );

        let millis = (target_start - reference_start).num_milliseconds();
        let day_offset = (millis as f64 / MILLIS_PER_DAY).round() as i64;

        trace!(week_offset, day_offset, "computed reference week offset");
        day_offset
    }

    /// Move `target` between the requested week and the reference week.
    ///
    /// [`Direction::Forward`] subtracts the day offset, taking a real calendar
    /// date into reference-week space; [`Direction::Reverse`] adds it back. The
    /// wall-clock time of `target` is preserved.
    pub fn align(
        &self,
        target: &DateTime<Tz>,
        week_offset: i64,
        direction: Direction,
        today: &DateTime<Tz>,
    ) -> DateTime<Tz> {
        let offset = self.day_offset(week_offset, today);
        let offset = match direction {
            Direction::Forward => offset,
            Direction::Reverse => -offset,
        };
        shift_days(target, -offset)
    }
}
