//! Calendar-day helpers shared by alignment, clamping and window construction.
//!
//! Day arithmetic comes in two flavours. [`shift_days`] moves along the wall
//! clock of the date's own timezone (a 09:00 meeting stays at 09:00 across a DST
//! change), while [`date_day_offset`] moves by exact 24-hour spans.

use std::cmp::Ordering;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Timelike,
};

use crate::error::{OverlayError, Result};
use crate::timenum::TimeNum;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Resolve a wall-clock time in `tz` to an instant.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Non-existent times
/// (DST spring-forward gap) are pushed forward by the gap, reading the naive
/// value with the offset in force just before the transition.
pub(crate) fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // A day earlier is before the transition on either side of UTC.
            let before = naive - Duration::days(1);
            let offset = tz.offset_from_utc_datetime(&before).fix();
            let utc = naive - Duration::seconds(offset.local_minus_utc() as i64);
            tz.from_utc_datetime(&utc)
        }
    }
}

/// Convert fractional hours to a duration, rounded to the millisecond.
///
/// Returns `None` for non-finite hours or spans chrono cannot represent.
pub fn hours_to_duration(hours: f64) -> Option<Duration> {
    let millis = (hours * MILLIS_PER_HOUR).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

/// Convert a duration to fractional hours.
pub fn duration_to_hours(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Number of days in `month` (1-12) of `year`, or `None` for an invalid month.
pub fn days_in_month(month: u32, year: i32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}

/// Split `"HH:MM"` into hours and minutes.
pub fn split_time(time: &str) -> Result<(u32, u32)> {
    let invalid = || OverlayError::InvalidTimeString(time.to_string());
    let (hours, minutes) = time.trim().split_once(':').ok_or_else(invalid)?;
    let hours = hours.parse::<u32>().map_err(|_| invalid())?;
    let minutes = minutes.parse::<u32>().map_err(|_| invalid())?;
    Ok((hours, minutes))
}

/// Move `date` by `days` calendar days, keeping its wall-clock time.
pub fn shift_days<Tz: TimeZone>(date: &DateTime<Tz>, days: i64) -> DateTime<Tz> {
    let naive = date.naive_local() + Duration::days(days);
    resolve_local(&date.timezone(), naive)
}

/// Move `date` by exactly `days × 24h`.
pub fn date_day_offset<Tz: TimeZone>(date: &DateTime<Tz>, days: i64) -> DateTime<Tz> {
    date.clone() + Duration::days(days)
}

/// Move `date` by a fractional number of hours.
///
/// The offset is split like a TimeNum: whole hours plus floored minutes, so
/// seconds in the fraction are dropped.
pub fn date_hours_offset<Tz: TimeZone>(date: &DateTime<Tz>, hours: f64) -> DateTime<Tz> {
    let whole = hours.floor();
    let minutes = ((hours - whole) * 60.0 + 1e-9).floor();
    date.clone() + Duration::hours(whole as i64) + Duration::minutes(minutes as i64)
}

/// Same calendar day as `date` (in its own timezone), at time-of-day `time`.
pub fn date_with_time_num<Tz: TimeZone>(date: &DateTime<Tz>, time: TimeNum) -> DateTime<Tz> {
    let (hours, minutes) = time.to_hours_minutes();
    let clock = NaiveTime::from_hms_opt(hours, minutes, 0).unwrap_or(NaiveTime::MIN);
    resolve_local(&date.timezone(), date.date_naive().and_time(clock))
}

/// Same calendar day as `date`, at the `"HH:MM"` time given.
pub fn date_with_time<Tz: TimeZone>(date: &DateTime<Tz>, time: &str) -> Result<DateTime<Tz>> {
    let (hours, minutes) = split_time(time)?;
    let time = TimeNum::from_hours_minutes(hours, minutes)?;
    Ok(date_with_time_num(date, time))
}

/// Inclusive instant range test.
pub fn is_date_between<Tz: TimeZone>(
    date: &DateTime<Tz>,
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
) -> bool {
    start <= date && date <= end
}

/// Whether `date` falls within `[start, start + duration_hours]`. False when
/// the end is not a representable instant.
pub fn is_date_in_range<Tz: TimeZone>(
    date: &DateTime<Tz>,
    start: &DateTime<Tz>,
    duration_hours: f64,
) -> bool {
    hours_to_duration(duration_hours)
        .and_then(|span| start.clone().checked_add_signed(span))
        .is_some_and(|end| is_date_between(date, start, &end))
}

/// Order two dates by calendar day only, each read in its own timezone.
pub fn compare_date_day<Tz1: TimeZone, Tz2: TimeZone>(
    a: &DateTime<Tz1>,
    b: &DateTime<Tz2>,
) -> Ordering {
    a.date_naive().cmp(&b.date_naive())
}

/// Whether `time` lies between the hour of `first` and the hour of `second`,
/// allowing the pair to straddle midnight.
pub fn is_time_num_between_dates<Tz: TimeZone>(
    time: TimeNum,
    first: &DateTime<Tz>,
    second: &DateTime<Tz>,
) -> bool {
    let t = time.value();
    let hour1 = first.hour() as f64;
    let hour2 = second.hour() as f64;

    if hour1 <= hour2 {
        hour1 <= t && t <= hour2
    } else {
        (hour1 <= t && t < 24.0) || (0.0 <= t && t <= hour2)
    }
}
