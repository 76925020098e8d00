//! Fractional hour-of-day arithmetic.
//!
//! A [`TimeNum`] is an hour of the day in `[0, 24)` with minutes carried as the
//! fractional part: `13.5` is 13:30, `9.25` is 09:15. Availability grids are laid
//! out in these units, so every conversion between wall-clock instants and grid
//! rows goes through here.

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::calendar::date_with_time_num;
use crate::error::{OverlayError, Result};

/// Tolerance applied before flooring minutes, so `10 + 35/60` reads back as 35.
const MINUTE_EPSILON: f64 = 1e-9;

/// An hour of the day in `[0, 24)`, minutes expressed as the fractional part.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TimeNum(f64);

/// Which side of a [`TimeNum`] a date is clamped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampBound {
    /// The time-of-day may not be later than the bound.
    Upper,
    /// The time-of-day may not be earlier than the bound.
    Lower,
}

/// One entry of a whole-hour time picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeOption {
    pub text: String,
    pub value: u32,
}

impl TimeNum {
    /// Wrap a raw hour value.
    ///
    /// # Errors
    /// Returns `OverlayError::InvalidTimeNum` if `value` is not finite or falls
    /// outside `[0, 24)`.
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..24.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(OverlayError::InvalidTimeNum(value))
        }
    }

    /// Build a TimeNum from whole hours and minutes (`13, 30` → `13.5`).
    pub fn from_hours_minutes(hours: u32, minutes: u32) -> Result<Self> {
        if hours >= 24 || minutes >= 60 {
            return Err(OverlayError::InvalidTimeOfDay { hours, minutes });
        }
        Ok(Self(hours as f64 + minutes as f64 / 60.0))
    }

    /// Hour-of-day of `date` in its own timezone. Seconds are ignored.
    ///
    /// Pass a `DateTime<Utc>` to read the UTC hour, or a zoned value to read
    /// the wall-clock hour in that zone.
    pub fn from_date<Tz: TimeZone>(date: &DateTime<Tz>) -> Self {
        Self(date.hour() as f64 + date.minute() as f64 / 60.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Split into whole hours and whole minutes. Both components are floored.
    pub fn to_hours_minutes(self) -> (u32, u32) {
        let hours = self.0.floor();
        let minutes = ((self.0 - hours) * 60.0 + MINUTE_EPSILON).floor().min(59.0);
        (hours as u32, minutes as u32)
    }

    fn has_minutes(self) -> bool {
        self.0.fract() > 0.0
    }

    /// Human-readable time of day.
    ///
    /// In 12-hour mode the minutes are omitted for whole hours: `0` → `"12 am"`,
    /// `13.5` → `"1:30 pm"`. In 24-hour mode minutes are always shown: `"13:30"`,
    /// `"9:00"`.
    pub fn display_text(self, hour12: bool) -> String {
        let (hours, minutes) = self.to_hours_minutes();

        if !hour12 {
            return format!("{}:{:02}", hours, minutes);
        }

        let suffix = if self.has_minutes() {
            format!(":{:02}", minutes)
        } else {
            String::new()
        };

        match hours {
            0 => format!("12{} am", suffix),
            1..=11 => format!("{}{} am", hours, suffix),
            12 => format!("12{} pm", suffix),
            _ => format!("{}{} pm", hours - 12, suffix),
        }
    }

    /// Zero-padded `HH:MM:00`.
    pub fn iso_time_string(self) -> String {
        let (hours, minutes) = self.to_hours_minutes();
        format!("{:02}:{:02}:00", hours, minutes)
    }

    /// Whether `self` lies in `[lo, hi]`, where a range with `lo > hi` wraps
    /// past midnight (e.g. 22 → 2).
    pub fn is_between_wrapping(self, lo: TimeNum, hi: TimeNum) -> bool {
        if lo <= hi {
            lo <= self && self <= hi
        } else {
            self >= lo || self <= hi
        }
    }

    /// Convert a UTC hour to local time.
    ///
    /// `timezone_offset_minutes` follows the host-clock convention: minutes to
    /// add to local time to reach UTC, so zones west of UTC are positive.
    pub fn utc_to_local(self, timezone_offset_minutes: i32) -> Self {
        let local = (self.0 - timezone_offset_minutes as f64 / 60.0).rem_euclid(24.0);
        // rem_euclid can round a tiny negative up to exactly 24.0
        if local >= 24.0 {
            Self(0.0)
        } else {
            Self(local)
        }
    }
}

impl TryFrom<f64> for TimeNum {
    type Error = OverlayError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TimeNum> for f64 {
    fn from(t: TimeNum) -> f64 {
        t.0
    }
}

/// Clamp the time-of-day of `date` against `bound_time`.
///
/// With [`ClampBound::Upper`], a date whose time-of-day is later than
/// `bound_time` is moved back to `bound_time` on the same calendar day. With
/// [`ClampBound::Lower`], an earlier time-of-day is moved forward. Dates already
/// on the permitted side are returned unchanged.
pub fn clamp_date_to_time_num<Tz: TimeZone>(
    date: &DateTime<Tz>,
    bound_time: TimeNum,
    bound: ClampBound,
) -> DateTime<Tz> {
    let current = TimeNum::from_date(date);
    let outside = match bound {
        ClampBound::Upper => current > bound_time,
        ClampBound::Lower => current < bound_time,
    };

    if outside {
        date_with_time_num(date, bound_time)
    } else {
        date.clone()
    }
}

/// Whole-hour options for a time picker, in display order.
///
/// The 12-hour list runs 1 am through 11 pm and ends with 12 am (value 0), so
/// midnight sorts as the end of the day.
pub fn time_options(hour12: bool) -> Vec<TimeOption> {
    if !hour12 {
        return (0..24)
            .map(|h| TimeOption {
                text: format!("{}:00", h),
                value: h,
            })
            .collect();
    }

    let mut options: Vec<TimeOption> = (1..12)
        .map(|h| TimeOption {
            text: format!("{} am", h),
            value: h,
        })
        .collect();
    options.extend((0..12).map(|h| TimeOption {
        text: format!("{} pm", if h == 0 { 12 } else { h }),
        value: h + 12,
    }));
    options.push(TimeOption {
        text: "12 am".to_string(),
        value: 0,
    });
    options
}
