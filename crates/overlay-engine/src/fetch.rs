//! The boundary to the calendar provider.
//!
//! Fetching itself happens elsewhere; this module decides which instants to ask
//! for, names calendar accounts, and defines the [`BusySource`] seam a provider
//! plugs into.

use std::collections::BTreeMap;
use std::convert::Infallible;

use chrono::{DateTime, Datelike, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::date_day_offset;
use crate::error::{OverlayError, Result};
use crate::event::{EventConfig, EventKind};
use crate::interval::{BusyInterval, Metadata};

/// Extra days fetched past the last date so late-night windows are covered.
const FETCH_BUFFER_DAYS: i64 = 2;

/// Busy intervals per calendar account, keyed by [`calendar_account_key`].
pub type CalendarEventsMap<M = Metadata> = BTreeMap<String, Vec<BusyInterval<M>>>;

/// The instant range to request from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRange {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
}

impl FetchRange {
    /// `timeMin=...&timeMax=...` with millisecond UTC timestamps.
    pub fn query(&self) -> String {
        format!(
            "timeMin={}&timeMax={}",
            self.time_min.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.time_max.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }

    /// Whether `interval` touches the range at all.
    pub fn overlaps<M>(&self, interval: &BusyInterval<M>) -> bool {
        interval.start < self.time_max && interval.end > self.time_min
    }
}

/// Compute the range of busy data needed to render `event`.
///
/// Specific-date events span from the first date to two days past the last.
/// Recurring events span the Saturday before the requested week through nine
/// days later, where the requested week is the one `week_offset` weeks from
/// `today` (weekday read in `today`'s timezone).
///
/// # Errors
/// Returns `OverlayError::EmptyEventDates` for a specific-date event without
/// dates.
pub fn fetch_range<Tz: TimeZone>(
    event: &EventConfig,
    week_offset: i64,
    today: &DateTime<Tz>,
) -> Result<FetchRange> {
    match event.kind {
        EventKind::SpecificDates => {
            let first = event.dates.first().ok_or(OverlayError::EmptyEventDates)?;
            let last = event.dates.last().ok_or(OverlayError::EmptyEventDates)?;
            Ok(FetchRange {
                time_min: *first,
                time_max: date_day_offset(last, FETCH_BUFFER_DAYS),
            })
        }
        EventKind::RecurringWeekly | EventKind::RecurringGroup => {
            let current = date_day_offset(today, 7 * week_offset);
            let back = current.weekday().num_days_from_sunday() as i64 + 1;
            let time_min = date_day_offset(&current, -back).with_timezone(&Utc);
            Ok(FetchRange {
                time_min,
                time_max: date_day_offset(&time_min, 7 + FETCH_BUFFER_DAYS),
            })
        }
    }
}

/// Key under which a calendar account's intervals are grouped.
pub fn calendar_account_key(email: &str, calendar_type: &str) -> String {
    format!("{}_{}", email, calendar_type)
}

/// Parse a JSON object mapping account keys to busy-record arrays.
pub fn events_map_from_json(json: &str) -> Result<CalendarEventsMap> {
    Ok(serde_json::from_str(json)?)
}

/// Something that can answer "what is busy between these instants".
///
/// Errors are the provider's own and pass through untouched.
pub trait BusySource<M = Metadata> {
    type Error;

    fn fetch(&self, range: &FetchRange) -> std::result::Result<CalendarEventsMap<M>, Self::Error>;
}

/// An in-memory map answers with the intervals that overlap the range.
impl<M: Clone> BusySource<M> for CalendarEventsMap<M> {
    type Error = Infallible;

    fn fetch(&self, range: &FetchRange) -> std::result::Result<CalendarEventsMap<M>, Infallible> {
        Ok(self
            .iter()
            .map(|(account, intervals)| {
                let hits = intervals
                    .iter()
                    .filter(|interval| range.overlaps(interval))
                    .cloned()
                    .collect();
                (account.clone(), hits)
            })
            .collect())
    }
}
