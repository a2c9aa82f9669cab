//! CF-style time units ("hours since 1-1-1 00:00:0.0").

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ReanalysisError, ReanalysisResult};

/// Calendar names accepted. All are read as proleptic Gregorian, including
/// `standard` and `gregorian` whose CF meaning switches to Julian before
/// 1582-10-15; reanalysis epochs such as `1-1-1` rely on this.
pub const SUPPORTED_CALENDARS: &[&str] = &["standard", "gregorian", "proleptic_gregorian"];

/// Unit of a time offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Parse a CF unit word (plural, singular or abbreviated).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => Some(Self::Seconds),
            "minutes" | "minute" | "mins" | "min" => Some(Self::Minutes),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(Self::Hours),
            "days" | "day" | "d" => Some(Self::Days),
            _ => None,
        }
    }

    /// Seconds in one unit.
    pub fn seconds(&self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3600.0,
            Self::Days => 86400.0,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
        };
        f.write_str(name)
    }
}

/// Parsed "<unit> since <epoch>" string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    pub unit: TimeUnit,
    pub epoch: DateTime<Utc>,
}

impl TimeUnits {
    /// Parse a CF time units attribute.
    ///
    /// Accepts `Y-M-D`, `Y-M-D H:M:S[.f]` and the ISO `T` form, with an
    /// optional trailing `Z` or `UTC`. Years and fields need not be
    /// zero-padded, so "hours since 1-1-1 00:00:0.0" is valid.
    pub fn parse(units: &str) -> ReanalysisResult<Self> {
        let unsupported = || ReanalysisError::UnsupportedEpoch(format!("cannot parse \"{}\"", units));

        let (unit_str, epoch_str) = units.split_once(" since ").ok_or_else(unsupported)?;
        let unit = TimeUnit::parse(unit_str).ok_or_else(unsupported)?;
        let epoch = parse_epoch(epoch_str).ok_or_else(unsupported)?;

        Ok(Self { unit, epoch })
    }

    /// Instant `value` units after the epoch.
    pub fn instant(&self, value: f64) -> ReanalysisResult<DateTime<Utc>> {
        let millis = (value * self.unit.seconds() * 1000.0).round();
        // i64 milliseconds overflow well before this bound
        if !millis.is_finite() || millis.abs() > 9.0e15 {
            return Err(ReanalysisError::UnsupportedEpoch(format!(
                "offset {} {} is not representable",
                value, self.unit
            )));
        }
        self.epoch
            .checked_add_signed(Duration::milliseconds(millis as i64))
            .ok_or_else(|| {
                ReanalysisError::UnsupportedEpoch(format!(
                    "{} {} since {} is out of range",
                    value, self.unit, self.epoch
                ))
            })
    }
}

/// Reject calendars that do not match the proleptic Gregorian calendar.
pub fn check_calendar(calendar: Option<&str>) -> ReanalysisResult<()> {
    match calendar {
        None => Ok(()),
        Some(c) if SUPPORTED_CALENDARS.contains(&c.trim().to_lowercase().as_str()) => Ok(()),
        Some(c) => Err(ReanalysisError::UnsupportedEpoch(format!(
            "calendar \"{}\" is not supported",
            c
        ))),
    }
}

fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let s = s
        .strip_suffix("UTC")
        .or_else(|| s.strip_suffix('Z'))
        .unwrap_or(s)
        .trim();

    let mut parts = s.splitn(2, |c: char| c == 'T' || c.is_whitespace());
    let date = parse_date(parts.next()?)?;
    let time = match parts.next().map(str::trim) {
        None | Some("") => NaiveTime::from_hms_opt(0, 0, 0)?,
        Some(t) => parse_clock(t)?,
    };

    Some(Utc.from_utc_datetime(&NaiveDateTime::new(date, time)))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let mut fields = s.split('-');
    let year: i32 = fields.next()?.trim().parse().ok()?;
    let month: u32 = fields.next()?.trim().parse().ok()?;
    let day: u32 = fields.next()?.trim().parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_clock(s: &str) -> Option<NaiveTime> {
    let mut fields = s.split(':');
    let hour: u32 = fields.next()?.trim().parse().ok()?;
    let minute: u32 = fields.next().map(|m| m.trim().parse()).unwrap_or(Ok(0)).ok()?;
    let seconds: f64 = fields.next().map(|m| m.trim().parse()).unwrap_or(Ok(0.0)).ok()?;
    if fields.next().is_some() || !(0.0..60.0).contains(&seconds) {
        return None;
    }
    let whole = seconds.trunc() as u32;
    let nanos = ((seconds - seconds.trunc()) * 1e9).round() as u32;
    NaiveTime::from_hms_nano_opt(hour, minute, whole, nanos.min(999_999_999))
}
