//! Error types for overlay-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Invalid time number: {0} (expected a finite hour in [0, 24))")]
    InvalidTimeNum(f64),

    #[error("Invalid time of day: {hours:02}:{minutes:02}")]
    InvalidTimeOfDay { hours: u32, minutes: u32 },

    #[error("Invalid time string: '{0}' (expected HH:MM)")]
    InvalidTimeString(String),

    #[error("Reference week has no dates")]
    EmptyReferenceWeek,

    #[error("Invalid window duration: {0} hours")]
    InvalidDuration(f64),

    #[error("Event has no dates")]
    EmptyEventDates,

    #[error("Invalid timezone offset: {0} minutes")]
    InvalidOffset(i32),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
