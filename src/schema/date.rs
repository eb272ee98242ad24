//! Calendar date recognition for `Date` fields
//!
//! Accepted inputs:
//! - RFC 3339 / ISO 8601 strings, with or without offset, date-only or year-month
//! - `YYYY-MM-DD HH:MM:SS` and RFC 2822 strings
//! - millisecond timestamps
//! - component arrays `[year, month0, day, hour, minute, second, ms]`
//! - unit objects `{ "year": .., "month": .., "day": .. }` with a zero-based month

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"];

/// Parses a value into a point in time, if it describes a valid one.
pub fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => {
            let millis = match n.as_i64() {
                Some(m) => m,
                None => {
                    let f = n.as_f64()?;
                    if !f.is_finite() {
                        return None;
                    }
                    f.trunc() as i64
                }
            };
            DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
        }
        Value::Array(parts) => parse_components(parts),
        Value::Object(units) => parse_units(units),
        Value::Null | Value::Bool(_) => None,
    }
}

/// Returns true if the value parses as a valid date.
pub fn is_valid_date(value: &Value) -> bool {
    parse_date(value).is_some()
}

fn parse_date_str(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    // Year-month only
    if s.len() == 7 {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    DateTime::parse_from_rfc2822(s).ok().map(|dt| dt.naive_utc())
}

fn parse_components(parts: &[Value]) -> Option<NaiveDateTime> {
    if parts.is_empty() {
        return Some(Utc::now().naive_utc());
    }
    if parts.len() > 7 {
        return None;
    }

    let mut fields = [0i64, 0, 1, 0, 0, 0, 0];
    for (slot, part) in fields.iter_mut().zip(parts) {
        *slot = part.as_i64()?;
    }
    build(fields)
}

fn parse_units(units: &Map<String, Value>) -> Option<NaiveDateTime> {
    let mut fields = [i64::from(Utc::now().year()), 0, 1, 0, 0, 0, 0];
    let names: [&[&str]; 7] = [
        &["year", "years", "y"],
        &["month", "months", "M"],
        &["day", "days", "date", "D"],
        &["hour", "hours", "h"],
        &["minute", "minutes", "m"],
        &["second", "seconds", "s"],
        &["millisecond", "milliseconds", "ms"],
    ];

    for (slot, aliases) in fields.iter_mut().zip(names) {
        if let Some(v) = aliases.iter().find_map(|name| units.get(*name)) {
            *slot = v.as_i64()?;
        }
    }
    build(fields)
}

fn build([year, month0, day, hour, minute, second, millis]: [i64; 7]) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month0.checked_add(1)?).ok()?,
        u32::try_from(day).ok()?,
    )?;
    date.and_hms_milli_opt(
        u32::try_from(hour).ok()?,
        u32::try_from(minute).ok()?,
        u32::try_from(second).ok()?,
        u32::try_from(millis).ok().filter(|ms| *ms < 1000)?,
    )
}
