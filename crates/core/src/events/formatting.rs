//! Conversions between the packed display strings stored on events and
//! their structured forms.
//!
//! Times travel in two shapes: the 24-hour `HH:MM` value produced by clock
//! inputs, and the compact 12-hour label (`2pm`, `2:30pm`) stored inside an
//! event's description as a `from-to` range. Dates are ISO-8601 strings that
//! are always built from their year/month/day components so that no time
//! zone can move them to a neighbouring day.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use super::FormatError;

/// How much of a date [`format_date`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `Mar 1, 2024`
    #[default]
    WithYear,
    /// `Mar 1`
    MonthDay,
}

/// Converts a 12-hour label such as `2:30 pm` or `2PM` into `HH:MM`.
pub fn to_24_hour(input: &str) -> Result<String, FormatError> {
    parse_12_hour(input).map(|time| time.format("%H:%M").to_string())
}

/// Converts an `HH:MM` clock value into a compact 12-hour label.
///
/// Minutes are omitted on the hour: `14:00` becomes `2pm`, `09:05` becomes `9:05am`.
pub fn to_12_hour(input: &str) -> Result<String, FormatError> {
    let time = parse_24_hour(input)?;
    let (is_pm, hour) = time.hour12();
    let suffix = if is_pm { "pm" } else { "am" };

    if time.minute() == 0 {
        Ok(format!("{hour}{suffix}"))
    } else {
        Ok(format!("{hour}:{:02}{suffix}", time.minute()))
    }
}

/// Builds the packed `from-to` label from two `HH:MM` clock values.
pub fn format_time_range(from: &str, to: &str) -> Result<String, FormatError> {
    Ok(format!("{}-{}", to_12_hour(from)?, to_12_hour(to)?))
}

/// Splits a packed `2pm-4pm` label back into `("14:00", "16:00")`.
///
/// Returns `None` for free text that is not a range of 12-hour labels.
pub fn parse_time_range(input: &str) -> Option<(String, String)> {
    let (from, to) = input.trim().split_once('-')?;
    Some((to_24_hour(from).ok()?, to_24_hour(to).ok()?))
}

/// Parses an `HH:MM` clock value.
pub fn parse_24_hour(input: &str) -> Result<NaiveTime, FormatError> {
    let invalid = || FormatError::InvalidTime(input.to_string());

    let (hour, minute) = input.trim().split_once(':').ok_or_else(invalid)?;
    let hour = parse_digits(hour, 1..=2).ok_or_else(invalid)?;
    let minute = parse_digits(minute, 2..=2).ok_or_else(invalid)?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

fn parse_12_hour(input: &str) -> Result<NaiveTime, FormatError> {
    let invalid = || FormatError::InvalidTime(input.to_string());

    let lower = input.trim().to_ascii_lowercase();
    let (clock, is_pm) = if let Some(clock) = lower.strip_suffix("pm") {
        (clock, true)
    } else if let Some(clock) = lower.strip_suffix("am") {
        (clock, false)
    } else {
        return Err(invalid());
    };

    let clock = clock.trim_end();
    let (hour, minute) = match clock.split_once(':') {
        Some((hour, minute)) => (hour, parse_digits(minute, 2..=2).ok_or_else(invalid)?),
        None => (clock, 0),
    };
    let hour = parse_digits(hour, 1..=2)
        .filter(|h| (1..=12).contains(h))
        .ok_or_else(invalid)?;

    let hour = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

fn parse_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parses a `YYYY-MM-DD` string by constructing the date from its parts.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, FormatError> {
    let invalid = || FormatError::InvalidDate(input.to_string());

    let mut parts = input.trim().split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let year = parse_digits(year, 4..=4).ok_or_else(invalid)?;
    let month = parse_digits(month, 1..=2).ok_or_else(invalid)?;
    let day = parse_digits(day, 1..=2).ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)
}

/// Renders a date as `YYYY-MM-DD`.
pub fn to_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Renders a date in the en-US short form, e.g. `Mar 1, 2024`.
pub fn format_date(date: NaiveDate, style: DateStyle) -> String {
    match style {
        DateStyle::WithYear => format!("{} {}, {}", date.format("%b"), date.day(), date.year()),
        DateStyle::MonthDay => format!("{} {}", date.format("%b"), date.day()),
    }
}

/// Parses an ISO date string and renders it with [`format_date`].
pub fn format_event_date(iso: &str, style: DateStyle) -> Result<String, FormatError> {
    parse_iso_date(iso).map(|date| format_date(date, style))
}

const REGIONAL_INDICATORS: std::ops::RangeInclusive<char> = '\u{1F1E6}'..='\u{1F1FF}';

/// Counts the regional indicator symbols at the end of `s`.
pub fn trailing_regional_indicators(s: &str) -> usize {
    s.trim_end()
        .chars()
        .rev()
        .take_while(|c| REGIONAL_INDICATORS.contains(c))
        .count()
}

/// Splits a country label into its name and trailing flag, if it carries one.
///
/// `France 🇫🇷` yields `("France", Some("🇫🇷"))`. A trailing run of regional
/// indicators that is not exactly one pair is left in the name.
pub fn split_country_flag(country: &str) -> (&str, Option<&str>) {
    let trimmed = country.trim_end();
    if trailing_regional_indicators(trimmed) != 2 {
        return (trimmed, None);
    }

    let flag_start = trimmed
        .char_indices()
        .rev()
        .nth(1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    (
        trimmed[..flag_start].trim_end(),
        Some(&trimmed[flag_start..]),
    )
}
