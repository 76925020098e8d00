//! # overlay-engine
//!
//! Busy-interval overlay for group availability grids.
//!
//! Given an event's per-day availability windows and the busy intervals fetched
//! from participants' calendars, the engine works out which part of each day is
//! already taken. Recurring weekly events are handled by aligning the fetched
//! week onto the event's reference week before clipping.
//!
//! Everything here is pure and synchronous: no I/O, no shared state, no clock
//! reads. "Today" and the display timezone are always passed in.
//!
//! ## Modules
//!
//! - [`timenum`] — fractional hour-of-day arithmetic and display text
//! - [`calendar`] — calendar-day helpers (month lengths, day shifts, range tests)
//! - [`alignment`] — map dates between the requested week and a reference week
//! - [`event`] — event configuration and availability windows
//! - [`interval`] — busy and clipped interval types
//! - [`normalizer`] — place and sort fetched busy intervals
//! - [`reconciler`] — the single-pass clipping sweep
//! - [`overlay`] — normalize + reconcile in one call
//! - [`fetch`] — fetch ranges, account keys, the provider seam
//! - [`preferences`] — stored timezone and clock preferences
//! - [`error`] — Error types

pub mod alignment;
pub mod calendar;
pub mod error;
pub mod event;
pub mod fetch;
pub mod interval;
pub mod normalizer;
pub mod overlay;
pub mod preferences;
pub mod reconciler;
pub mod timenum;

pub use alignment::{Direction, ReferenceWeek};
pub use calendar::days_in_month;
pub use error::OverlayError;
pub use event::{AvailabilityWindow, EventConfig, EventKind};
pub use fetch::{calendar_account_key, fetch_range, BusySource, CalendarEventsMap, FetchRange};
pub use interval::{BusyInterval, ClippedInterval, DayOverlay, Metadata};
pub use normalizer::{normalize, Placement};
pub use overlay::{split_accounts_by_day, split_calendar_events_by_day};
pub use preferences::{Preferences, TimeType, TimezonePreference, Zone};
pub use reconciler::reconcile;
pub use timenum::{clamp_date_to_time_num, ClampBound, TimeNum};
