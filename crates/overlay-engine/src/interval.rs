//! Busy intervals as fetched, and as clipped onto availability windows.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Provider fields carried through untouched (summary, calendar id, ...).
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A calendar occupancy record.
///
/// On the wire the bounds are `startDate` / `endDate`; every other field of the
/// record is kept in `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusyInterval<M = Metadata> {
    #[serde(rename = "startDate")]
    pub start: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end: DateTime<Utc>,
    #[serde(flatten)]
    pub metadata: M,
}

impl BusyInterval<Metadata> {
    /// Parse a JSON array of busy records.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A busy interval truncated to one availability window.
///
/// `hours_offset` is measured from the window start; `hours_offset +
/// hours_length` never exceeds the window's duration and `hours_length` is
/// always positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClippedInterval<M = Metadata> {
    #[serde(rename = "startDate")]
    pub start: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end: DateTime<Utc>,
    #[serde(rename = "hoursOffset")]
    pub hours_offset: f64,
    #[serde(rename = "hoursLength")]
    pub hours_length: f64,
    #[serde(flatten)]
    pub metadata: M,
}

/// Clipped intervals per window, keyed by day index. Every window has an
/// entry, possibly empty.
pub type DayOverlay<M = Metadata> = BTreeMap<usize, Vec<ClippedInterval<M>>>;
