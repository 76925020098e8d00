//! Event configuration and the availability windows derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::hours_to_duration;
use crate::error::{OverlayError, Result};

/// How an event's dates are to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Each date is a concrete calendar day.
    #[serde(rename = "specific_dates")]
    SpecificDates,
    /// Dates name weekdays of a recurring weekly pattern.
    #[serde(rename = "dow")]
    RecurringWeekly,
    /// A standing group whose availability follows a weekly pattern.
    #[serde(rename = "group")]
    RecurringGroup,
}

impl EventKind {
    pub fn is_recurring(self) -> bool {
        matches!(self, EventKind::RecurringWeekly | EventKind::RecurringGroup)
    }
}

/// The parts of an event that decide where busy intervals land.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConfig {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Start instant of each day's window, in chronological order. For recurring
    /// events these are the reference-week dates.
    pub dates: Vec<DateTime<Utc>>,
    /// Length of every window, in hours.
    pub duration: f64,
    #[serde(default)]
    pub start_on_monday: bool,
}

impl EventConfig {
    /// Parse an event configuration.
    ///
    /// # Errors
    /// Returns `OverlayError::JsonParse` for malformed JSON and
    /// `OverlayError::InvalidDuration` when `duration` is negative or not finite.
    pub fn from_json(json: &str) -> Result<Self> {
        let event: Self = serde_json::from_str(json)?;
        if !event.duration.is_finite() || event.duration < 0.0 {
            return Err(OverlayError::InvalidDuration(event.duration));
        }
        Ok(event)
    }

    /// One window per date, indexed by position.
    pub fn windows(&self) -> Vec<AvailabilityWindow> {
        self.dates
            .iter()
            .enumerate()
            .map(|(day_index, start)| AvailabilityWindow {
                day_index,
                start: *start,
                duration_hours: self.duration,
            })
            .collect()
    }
}

/// The stretch of one day during which participants mark availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    pub day_index: usize,
    pub start: DateTime<Utc>,
    pub duration_hours: f64,
}

impl AvailabilityWindow {
    /// `start + duration_hours`, or `None` when that is not a representable
    /// instant.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        hours_to_duration(self.duration_hours)
            .and_then(|span| self.start.checked_add_signed(span))
    }

    /// Inclusive on both ends. A window without an end contains nothing.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.end()
            .is_some_and(|end| self.start <= instant && instant <= end)
    }
}
