//! WASM bindings for overlay-engine.
//!
//! Exposes busy-interval splitting, fetch-range computation, and grid time
//! formatting to JavaScript via `wasm-bindgen`. Structured values cross the
//! boundary as JSON strings in the same camelCase shapes the engine serializes.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p overlay-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/overlay_engine_wasm.wasm
//! ```

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use overlay_engine::{
    days_in_month, fetch_range, split_calendar_events_by_day, timenum::time_options, BusyInterval,
    EventConfig, FetchRange, Preferences, TimeNum, Zone,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Boundary helpers
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse an ISO 8601 instant. A string without an offset is read as UTC.
fn parse_instant(s: &str) -> Result<DateTime<Utc>, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

/// The browser's `Date.getTimezoneOffset()` (minutes behind UTC) as an offset.
fn host_offset(timezone_offset_minutes: i32) -> Result<FixedOffset, JsValue> {
    timezone_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::west_opt)
        .ok_or_else(|| {
            JsValue::from_str(&format!(
                "Invalid timezone offset: {} minutes",
                timezone_offset_minutes
            ))
        })
}

fn parse_prefs(prefs_json: Option<String>) -> Result<Preferences, JsValue> {
    match prefs_json {
        Some(json) => Preferences::from_json(&json).map_err(js_err),
        None => Ok(Preferences::default()),
    }
}

fn resolve_zone(prefs_json: Option<String>, timezone_offset_minutes: i32) -> Result<Zone, JsValue> {
    let host = host_offset(timezone_offset_minutes)?;
    parse_prefs(prefs_json)?.resolve_zone(host).map_err(js_err)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn split_in<Tz: TimeZone>(
    event: &EventConfig,
    intervals: &[BusyInterval],
    week_offset: i32,
    today: DateTime<Utc>,
    tz: &Tz,
) -> Result<String, JsValue> {
    let overlay =
        split_calendar_events_by_day(event, intervals, week_offset.into(), &today.with_timezone(tz))
            .map_err(js_err)?;
    to_json(&overlay)
}

fn range_in<Tz: TimeZone>(
    event: &EventConfig,
    week_offset: i32,
    today: DateTime<Utc>,
    tz: &Tz,
) -> Result<FetchRange, JsValue> {
    fetch_range(event, week_offset.into(), &today.with_timezone(tz)).map_err(js_err)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Clip one calendar's busy intervals onto an event's days.
///
/// Returns a JSON object keyed by day index whose values are arrays of clipped
/// intervals (`startDate`, `endDate`, `hoursOffset`, `hoursLength`, plus the
/// input's own fields).
///
/// # Arguments
/// - `event_json` -- event configuration (`type`, `dates`, `duration`, `startOnMonday`)
/// - `events_json` -- array of `{startDate, endDate, ...}` busy intervals
/// - `week_offset` -- weeks from the current week (recurring events only)
/// - `prefs_json` -- optional stored preferences
/// - `timezone_offset_minutes` -- the host's `Date.getTimezoneOffset()`
/// - `today` -- the current instant as ISO 8601
#[wasm_bindgen(js_name = "splitCalendarEventsByDay")]
pub fn split_calendar_events_by_day_js(
    event_json: &str,
    events_json: &str,
    week_offset: i32,
    prefs_json: Option<String>,
    timezone_offset_minutes: i32,
    today: &str,
) -> Result<String, JsValue> {
    let event = EventConfig::from_json(event_json).map_err(js_err)?;
    let intervals = BusyInterval::list_from_json(events_json).map_err(js_err)?;
    let today = parse_instant(today)?;

    match resolve_zone(prefs_json, timezone_offset_minutes)? {
        Zone::Named(tz) => split_in(&event, &intervals, week_offset, today, &tz),
        Zone::Fixed(offset) => split_in(&event, &intervals, week_offset, today, &offset),
    }
}

fn compute_range(
    event_json: &str,
    week_offset: i32,
    prefs_json: Option<String>,
    timezone_offset_minutes: i32,
    today: &str,
) -> Result<FetchRange, JsValue> {
    let event = EventConfig::from_json(event_json).map_err(js_err)?;
    let today = parse_instant(today)?;

    match resolve_zone(prefs_json, timezone_offset_minutes)? {
        Zone::Named(tz) => range_in(&event, week_offset, today, &tz),
        Zone::Fixed(offset) => range_in(&event, week_offset, today, &offset),
    }
}

/// The instant range busy data should be fetched for, as `{timeMin, timeMax}`.
#[wasm_bindgen(js_name = "calendarFetchRange")]
pub fn calendar_fetch_range(
    event_json: &str,
    week_offset: i32,
    prefs_json: Option<String>,
    timezone_offset_minutes: i32,
    today: &str,
) -> Result<String, JsValue> {
    to_json(&compute_range(
        event_json,
        week_offset,
        prefs_json,
        timezone_offset_minutes,
        today,
    )?)
}

/// The same range as a `timeMin=...&timeMax=...` query string.
#[wasm_bindgen(js_name = "calendarFetchQuery")]
pub fn calendar_fetch_query(
    event_json: &str,
    week_offset: i32,
    prefs_json: Option<String>,
    timezone_offset_minutes: i32,
    today: &str,
) -> Result<String, JsValue> {
    let range = compute_range(
        event_json,
        week_offset,
        prefs_json,
        timezone_offset_minutes,
        today,
    )?;
    Ok(range.query())
}

/// Display text for a grid hour, e.g. `"1:30 pm"` or `"13:30"`.
#[wasm_bindgen(js_name = "timeNumToTimeText")]
pub fn time_num_to_time_text(value: f64, hour12: bool) -> Result<String, JsValue> {
    Ok(TimeNum::new(value).map_err(js_err)?.display_text(hour12))
}

/// Zero-padded `HH:MM:00` for a grid hour.
#[wasm_bindgen(js_name = "timeNumToTimeString")]
pub fn time_num_to_time_string(value: f64) -> Result<String, JsValue> {
    Ok(TimeNum::new(value).map_err(js_err)?.iso_time_string())
}

/// Convert a UTC grid hour to the preferred local hour.
#[wasm_bindgen(js_name = "utcTimeToLocalTime")]
pub fn utc_time_to_local_time(
    value: f64,
    prefs_json: Option<String>,
    timezone_offset_minutes: i32,
) -> Result<f64, JsValue> {
    let time = TimeNum::new(value).map_err(js_err)?;
    let host = host_offset(timezone_offset_minutes)?;
    let local = parse_prefs(prefs_json)?
        .utc_time_to_local_time(time, host)
        .map_err(js_err)?;
    Ok(local.value())
}

/// Whole-hour picker options as a JSON array of `{text, value}`.
#[wasm_bindgen(js_name = "timeOptions")]
pub fn time_options_js(hour12: bool) -> Result<String, JsValue> {
    to_json(&time_options(hour12))
}

/// Number of days in a month (1-12) of a year.
#[wasm_bindgen(js_name = "getDaysInMonth")]
pub fn get_days_in_month(month: u32, year: i32) -> Result<u32, JsValue> {
    days_in_month(month, year).ok_or_else(|| JsValue::from_str(&format!("Invalid month: {}", month)))
}
