//! Date literal helper.
//!
//! Two input grammars populate a [`Date`](crate::Date) leaf:
//!
//! - `/Date(N)/` or `/Date(N+HHMM)/`, optionally with the JSON-escaped `\/`
//!   delimiters. `N` counts milliseconds when its magnitude is at least
//!   [`MILLIS_THRESHOLD`], seconds otherwise.
//! - `YYYY-MM-DDTHH:MM:SS[.fff]` followed by `Z`, `±HHMM` or `±HH:MM`. The
//!   fields are read as UTC.
//!
//! Both subtract the zone offset. Output is always `YYYY-MM-DDTHH:MM:SSZ`.
use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::field::Timestamp;

/// Legacy values at or above this magnitude are milliseconds (about 5138 AD
/// as seconds, March 1973 as milliseconds).
pub const MILLIS_THRESHOLD: u64 = 100_000_000_000;

static LEGACY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\\?/Date\((-?[0-9]+)([+-][0-9]{4})?\)\\?/$").expect("legacy date pattern")
});

static ISO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^([0-9]{4})-([0-9]{2})-([0-9]{2})",
        r"T([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.[0-9]+)?",
        r"([Zz]|[+-][0-9]{2}:?[0-9]{2})$",
    ))
    .expect("iso date pattern")
});

pub fn parse(text: &str) -> Result<Timestamp> {
    let malformed = || Error::MalformedDate(text.to_owned());

    if let Some(captures) = LEGACY.captures(text) {
        let raw: i64 = captures[1].parse().map_err(|_| malformed())?;
        let secs = if raw.unsigned_abs() >= MILLIS_THRESHOLD { raw / 1000 } else { raw };
        let offset = captures.get(2).map_or(0, |zone| zone_offset(zone.as_str()));
        return Ok(Timestamp::from_secs(secs - offset));
    }

    let captures = ISO.captures(text).ok_or_else(malformed)?;
    let number = |index: usize| -> Result<u32> { captures[index].parse().map_err(|_| malformed()) };
    let year: i32 = captures[1].parse().map_err(|_| malformed())?;
    let local = NaiveDate::from_ymd_opt(year, number(2)?, number(3)?)
        .and_then(|date| date.and_hms_opt(number(4).ok()?, number(5).ok()?, number(6).ok()?))
        .ok_or_else(malformed)?;
    let offset = zone_offset(&captures[7]);
    Ok(Timestamp::from_secs(local.and_utc().timestamp() - offset))
}

/// `None` when the timestamp has no calendar representation.
pub fn format(timestamp: Timestamp) -> Option<String> {
    let utc = DateTime::from_timestamp(timestamp.secs(), 0)?;
    Some(utc.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Seconds east of UTC for `Z`, `±HHMM` or `±HH:MM`.
fn zone_offset(zone: &str) -> i64 {
    let sign = match zone.as_bytes().first() {
        Some(b'-') => -1,
        Some(b'+') => 1,
        _ => return 0,
    };
    let digits: String = zone[1..].chars().filter(char::is_ascii_digit).collect();
    let hours: i64 = digits.get(..2).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minutes: i64 = digits.get(2..4).and_then(|m| m.parse().ok()).unwrap_or(0);
    sign * (hours * 3600 + minutes * 60)
}
