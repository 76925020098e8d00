//! Persisted user preferences: display timezone and 12/24-hour clock.
//!
//! Nothing here reads ambient state. Callers pass the host's own offset and the
//! locale's clock default in, and each lookup falls back to them explicitly when
//! the preference is unset.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, Result};
use crate::timenum::TimeNum;

/// 12-hour or 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeType {
    #[serde(rename = "12h")]
    Hour12,
    #[serde(rename = "24h")]
    Hour24,
}

/// A stored timezone choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezonePreference {
    /// Minutes east of UTC.
    #[serde(alias = "offsetMinutes")]
    pub offset: i32,
    /// IANA name, when the user picked a named zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TimezonePreference {
    pub fn fixed_offset(&self) -> Result<FixedOffset> {
        self.offset
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(OverlayError::InvalidOffset(self.offset))
    }

    /// The named zone, if one was stored.
    pub fn named_zone(&self) -> Result<Option<Tz>> {
        self.value
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|_| OverlayError::InvalidTimezone(name.to_string()))
            })
            .transpose()
    }
}

/// The zone dates are read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// A DST-aware IANA zone.
    Named(Tz),
    /// A constant offset, either stored or taken from the host clock.
    Fixed(FixedOffset),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<TimezonePreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_type: Option<TimeType>,
}

impl Preferences {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The stored offset, or `host` when no timezone is stored.
    pub fn resolve_offset(&self, host: FixedOffset) -> Result<FixedOffset> {
        match &self.timezone {
            Some(timezone) => timezone.fixed_offset(),
            None => Ok(host),
        }
    }

    /// The stored named zone, else the stored offset, else `host`.
    pub fn resolve_zone(&self, host: FixedOffset) -> Result<Zone> {
        match &self.timezone {
            Some(timezone) => match timezone.named_zone()? {
                Some(tz) => Ok(Zone::Named(tz)),
                None => Ok(Zone::Fixed(timezone.fixed_offset()?)),
            },
            None => Ok(Zone::Fixed(host)),
        }
    }

    /// The stored clock choice, or `locale_default` when unset.
    pub fn prefers_12h(&self, locale_default: bool) -> bool {
        match self.time_type {
            Some(TimeType::Hour12) => true,
            Some(TimeType::Hour24) => false,
            None => locale_default,
        }
    }

    /// Convert a UTC grid hour to the preferred local hour.
    pub fn utc_time_to_local_time(&self, time: TimeNum, host: FixedOffset) -> Result<TimeNum> {
        let offset = self.resolve_offset(host)?;
        // utc_to_local takes minutes behind UTC
        Ok(time.utc_to_local(-offset.local_minus_utc() / 60))
    }
}

/// Read `instant` at the preferred offset.
pub fn apply_timezone(instant: DateTime<Utc>, offset: FixedOffset) -> DateTime<FixedOffset> {
    instant.with_timezone(&offset)
}
