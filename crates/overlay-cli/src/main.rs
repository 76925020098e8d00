//! `overlay` CLI — compute availability-grid busy overlays from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Clip a calendar's busy intervals onto an event's days (stdin → stdout)
//! cat busy.json | overlay split --event event.json
//!
//! # Recurring event, next week, read in a named zone, at a fixed "now"
//! overlay split -e event.json -i busy.json --week-offset 1 \
//!   --tz America/Denver --today 2026-03-18T12:00:00Z
//!
//! # Use stored preferences for the timezone
//! overlay split -e event.json -i accounts.json --prefs prefs.json -o overlay.json
//!
//! # Which instants to fetch busy data for
//! overlay range -e event.json --today 2026-03-18T12:00:00Z
//!
//! # Format a grid time
//! overlay time 13.5 --clock 12h
//! ```

use std::collections::BTreeMap;
use std::io::{self, Read};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand, ValueEnum};
use overlay_engine::fetch::BusySource;
use overlay_engine::{
    fetch_range, split_accounts_by_day, split_calendar_events_by_day, BusyInterval,
    CalendarEventsMap, DayOverlay, EventConfig, Preferences, TimeNum, Zone,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

#[derive(Parser)]
#[command(
    name = "overlay",
    version,
    about = "Busy-interval overlay for availability grids"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write diagnostic logs to stderr (filter with RUST_LOG)
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Clip busy intervals onto an event's days
    Split {
        /// Event configuration JSON file
        #[arg(short, long)]
        event: String,
        /// Busy intervals JSON: an array, or an object keyed by calendar account
        /// (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Print the busy-data query range for an event
    Range {
        /// Event configuration JSON file
        #[arg(short, long)]
        event: String,
        /// Print the range as JSON instead of a query string
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Format a fractional hour (e.g. 13.5) as clock text
    Time {
        /// Hour of the day in [0, 24)
        value: f64,
        /// Clock style (falls back to the stored preference, then 12h)
        #[arg(long, value_enum)]
        clock: Option<Clock>,
        /// Print HH:MM:00 instead of display text
        #[arg(long)]
        iso: bool,
        /// Stored preferences JSON file
        #[arg(long)]
        prefs: Option<String>,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Weeks from the current week (recurring events only)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    week_offset: i64,
    /// Stored preferences JSON file
    #[arg(long)]
    prefs: Option<String>,
    /// IANA timezone, overriding the stored preference
    #[arg(long)]
    tz: Option<String>,
    /// Current instant as RFC 3339 (defaults to the system clock)
    #[arg(long)]
    today: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Clock {
    #[value(name = "12h")]
    Hour12,
    #[value(name = "24h")]
    Hour24,
}

/// Busy data as read from disk.
#[derive(Deserialize)]
#[serde(untagged)]
enum BusyInput {
    Calendar(Vec<BusyInterval>),
    Accounts(CalendarEventsMap),
}

/// Overlay as written out, mirroring the input shape.
#[derive(Serialize)]
#[serde(untagged)]
enum OverlayOutput {
    Calendar(DayOverlay),
    Accounts(BTreeMap<String, DayOverlay>),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .try_init();
    }

    match cli.command {
        Commands::Split {
            event,
            input,
            output,
            view,
        } => {
            let event = load_event(&event)?;
            let busy: BusyInput = serde_json::from_str(&read_input(input.as_deref())?)
                .context("Failed to parse busy intervals")?;

            let overlay = match resolve_zone(&view)? {
                Zone::Named(tz) => split(&event, busy, &view, &tz)?,
                Zone::Fixed(offset) => split(&event, busy, &view, &offset)?,
            };

            let json = serde_json::to_string_pretty(&overlay)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Range { event, json, view } => {
            let event = load_event(&event)?;
            let today = parse_today(view.today.as_deref())?;

            let range = match resolve_zone(&view)? {
                Zone::Named(tz) => fetch_range(&event, view.week_offset, &today.with_timezone(&tz)),
                Zone::Fixed(offset) => {
                    fetch_range(&event, view.week_offset, &today.with_timezone(&offset))
                }
            }
            .context("Failed to compute fetch range")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&range)?);
            } else {
                println!("{}", range.query());
            }
        }
        Commands::Time {
            value,
            clock,
            iso,
            prefs,
        } => {
            let time = TimeNum::new(value).context("Invalid time")?;
            if iso {
                println!("{}", time.iso_time_string());
            } else {
                let hour12 = match clock {
                    Some(Clock::Hour12) => true,
                    Some(Clock::Hour24) => false,
                    None => load_prefs(prefs.as_deref())?.prefers_12h(true),
                };
                println!("{}", time.display_text(hour12));
            }
        }
    }

    Ok(())
}

/// Restrict `busy` to the event's fetch range, then clip it onto the event's
/// days with dates read in `tz`.
fn split<Z: TimeZone>(
    event: &EventConfig,
    busy: BusyInput,
    view: &ViewArgs,
    tz: &Z,
) -> Result<OverlayOutput> {
    let today = parse_today(view.today.as_deref())?.with_timezone(tz);
    let range = fetch_range(event, view.week_offset, &today)
        .context("Failed to compute fetch range")?;
    info!(query = %range.query(), "splitting busy intervals");

    match busy {
        BusyInput::Calendar(intervals) => {
            let total = intervals.len();
            let intervals: Vec<BusyInterval> = intervals
                .into_iter()
                .filter(|interval| range.overlaps(interval))
                .collect();
            debug!(total, kept = intervals.len(), "filtered to fetch range");

            let overlay = split_calendar_events_by_day(event, &intervals, view.week_offset, &today)
                .context("Failed to split calendar events")?;
            Ok(OverlayOutput::Calendar(overlay))
        }
        BusyInput::Accounts(accounts) => {
            let fetched = accounts
                .fetch(&range)
                .unwrap_or_else(|never| match never {});
            let overlays = split_accounts_by_day(event, &fetched, view.week_offset, &today)
                .context("Failed to split calendar events")?;
            Ok(OverlayOutput::Accounts(overlays))
        }
    }
}

/// The zone dates are read in: `--tz`, else the stored preference, else the
/// host clock's current offset.
fn resolve_zone(view: &ViewArgs) -> Result<Zone> {
    if let Some(name) = view.tz.as_deref() {
        let tz: Tz = name
            .parse()
            .map_err(|_| anyhow!("Unknown timezone: '{}'", name))?;
        return Ok(Zone::Named(tz));
    }

    let prefs = load_prefs(view.prefs.as_deref())?;
    let host = Local::now().offset().fix();
    prefs
        .resolve_zone(host)
        .context("Invalid timezone preference")
}

fn parse_today(today: Option<&str>) -> Result<DateTime<Utc>> {
    match today {
        Some(raw) => Ok(DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Invalid --today instant: {}", raw))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

fn load_event(path: &str) -> Result<EventConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path))?;
    EventConfig::from_json(&json).with_context(|| format!("Invalid event configuration: {}", path))
}

/// Stored preferences, or the empty set when no file is given.
fn load_prefs(path: Option<&str>) -> Result<Preferences> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path))?;
            Preferences::from_json(&json).with_context(|| format!("Invalid preferences: {}", path))
        }
        None => Ok(Preferences::default()),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
