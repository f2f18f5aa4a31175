//! Lenient date and time parsing.
//!
//! User input is accepted in a handful of human formats and normalized to the
//! zero-padded `YYYY-MM-DD` / `HH:MM` forms used for storage and sorting. Only
//! the shape of the input is checked: a date like `31.02.2024` is reordered to
//! `2024-02-31` without any calendar validation.
use std::ops::Range;

use crate::InvalidFormat;

/// Parses a date in `DD.MM.YYYY`, `YYYY-MM-DD` or `DDMMYYYY` form.
///
/// Returns `Ok(None)` for empty or whitespace-only input, so callers can
/// decide whether the date is mandatory.
pub fn parse_date(input: &str) -> Result<Option<String>, InvalidFormat> {
    let value = input.trim();
    if value.is_empty() {
        return Ok(None);
    }

    dotted_date(value)
        .or_else(|| iso_date(value))
        .or_else(|| compact_date(value))
        .map(Some)
        .ok_or_else(|| InvalidFormat {
            input: input.to_string(),
        })
}

/// Renders a stored `YYYY-MM-DD` date as `DD.MM.YYYY`.
///
/// Anything else (empty, legacy or malformed values) is returned unchanged.
pub fn format_date_for_display(iso: &str) -> String {
    match iso_date(iso) {
        Some(_) => format!("{}.{}.{}", &iso[8..10], &iso[5..7], &iso[0..4]),
        None => iso.to_string(),
    }
}

/// Parses a time in `H:MM`, `HH:MM` or `HHMM` form into `HH:MM`.
///
/// Returns `Ok(None)` for empty or whitespace-only input.
pub fn parse_time(input: &str) -> Result<Option<String>, InvalidFormat> {
    let value = input.trim();
    if value.is_empty() {
        return Ok(None);
    }

    colon_time(value)
        .or_else(|| compact_time(value))
        .map(Some)
        .ok_or_else(|| InvalidFormat {
            input: input.to_string(),
        })
}

/// True iff the input is already a canonical `HH:MM` time.
pub fn validate_time(input: &str) -> bool {
    let bytes = input.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    match (digits(input, 0..2), digits(input, 3..5)) {
        (Some(hour), Some(minute)) => valid_hour(hour) && valid_minute(minute),
        _ => false,
    }
}

/// Joins a canonical date with an optional canonical time.
pub fn compose_date_time(date: &str, time: Option<&str>) -> String {
    match time {
        Some(time) if !time.is_empty() => format!("{} {}", date, time),
        _ => date.to_string(),
    }
}

/// Splits a stored `date-time` value into its date and time parts.
///
/// The time part is empty when the value carries no time.
pub fn split_date_time(value: &str) -> (&str, &str) {
    match value.split_once(' ') {
        Some((date, rest)) => (date, rest.split(' ').next().unwrap_or_default()),
        None => (value, ""),
    }
}

fn digits(value: &str, range: Range<usize>) -> Option<&str> {
    value
        .get(range)
        .filter(|part| part.bytes().all(|b| b.is_ascii_digit()))
}

fn valid_hour(hour: &str) -> bool {
    hour.parse::<u8>().is_ok_and(|h| h <= 23)
}

fn valid_minute(minute: &str) -> bool {
    minute.len() == 2 && minute.as_bytes()[0] <= b'5'
}

// DD.MM.YYYY
fn dotted_date(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[2] != b'.' || bytes[5] != b'.' {
        return None;
    }
    let day = digits(value, 0..2)?;
    let month = digits(value, 3..5)?;
    let year = digits(value, 6..10)?;
    Some(format!("{}-{}-{}", year, month, day))
}

// YYYY-MM-DD
fn iso_date(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    digits(value, 0..4)?;
    digits(value, 5..7)?;
    digits(value, 8..10)?;
    Some(value.to_string())
}

// DDMMYYYY
fn compact_date(value: &str) -> Option<String> {
    if value.len() != 8 {
        return None;
    }
    let day = digits(value, 0..2)?;
    let month = digits(value, 2..4)?;
    let year = digits(value, 4..8)?;
    Some(format!("{}-{}-{}", year, month, day))
}

// H:MM or HH:MM
fn colon_time(value: &str) -> Option<String> {
    let (hour, minute) = value.split_once(':')?;
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    digits(hour, 0..hour.len())?;
    digits(minute, 0..2)?;
    if !valid_hour(hour) || !valid_minute(minute) {
        return None;
    }
    let hour: u8 = hour.parse().ok()?;
    Some(format!("{:02}:{}", hour, minute))
}

// HHMM
fn compact_time(value: &str) -> Option<String> {
    if value.len() != 4 {
        return None;
    }
    let hour = digits(value, 0..2)?;
    let minute = digits(value, 2..4)?;
    if !valid_hour(hour) || !valid_minute(minute) {
        return None;
    }
    Some(format!("{}:{}", hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_three_date_shapes() {
        assert_eq!(parse_date("15.01.2024").unwrap().as_deref(), Some("2024-01-15"));
        assert_eq!(parse_date("2024-01-15").unwrap().as_deref(), Some("2024-01-15"));
        assert_eq!(parse_date("15012024").unwrap().as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(parse_date("  01.03.2024 ").unwrap().as_deref(), Some("2024-03-01"));
        assert_eq!(parse_time(" 7:30\t").unwrap().as_deref(), Some("07:30"));
    }

    #[test]
    fn empty_input_is_distinct_from_invalid() {
        assert_eq!(parse_date(""), Ok(None));
        assert_eq!(parse_date("   "), Ok(None));
        assert_eq!(parse_time(""), Ok(None));
        assert_eq!(parse_time(" "), Ok(None));
    }

    #[test]
    fn rejects_wrong_digit_counts() {
        assert!(parse_date("2024-1-15").is_err());
        assert!(parse_date("1.1.2024").is_err());
        assert!(parse_date("1512024").is_err());
        assert!(parse_date("15/01/2024").is_err());
        assert!(parse_date("2024-01-15 10:00").is_err());
        assert!(parse_date("ab.cd.efgh").is_err());
    }

    #[test]
    fn impossible_calendar_dates_pass_through() {
        assert_eq!(parse_date("32.01.2024").unwrap().as_deref(), Some("2024-01-32"));
        assert_eq!(parse_date("31.02.2024").unwrap().as_deref(), Some("2024-02-31"));
        assert_eq!(parse_date("00000000").unwrap().as_deref(), Some("0000-00-00"));
    }

    #[test]
    fn non_ascii_input_is_rejected_without_panicking() {
        assert!(parse_date("１５.01.2024").is_err());
        assert!(parse_date("день.месяц").is_err());
        assert!(parse_time("９:05").is_err());
        assert!(!validate_time("0９:05"));
    }

    #[test]
    fn display_format_round_trips_accepted_dates() {
        for input in ["15.01.2024", "15012024", "2024-01-15"] {
            let iso = parse_date(input).unwrap().unwrap();
            assert_eq!(format_date_for_display(&iso), "15.01.2024");
        }
        assert_eq!(format_date_for_display("32.01.2024"), "32.01.2024");
    }

    #[test]
    fn display_leaves_malformed_values_alone() {
        assert_eq!(format_date_for_display(""), "");
        assert_eq!(format_date_for_display("2024-1-15"), "2024-1-15");
        assert_eq!(format_date_for_display("garbage"), "garbage");
    }

    #[test]
    fn parses_times() {
        assert_eq!(parse_time("0905").unwrap().as_deref(), Some("09:05"));
        assert_eq!(parse_time("9:05").unwrap().as_deref(), Some("09:05"));
        assert_eq!(parse_time("09:05").unwrap().as_deref(), Some("09:05"));
        assert_eq!(parse_time("23:59").unwrap().as_deref(), Some("23:59"));
        assert_eq!(parse_time("0:00").unwrap().as_deref(), Some("00:00"));
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(parse_time("9:5").is_err());
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("12:60").is_err());
        assert!(parse_time("2400").is_err());
        assert!(parse_time("905").is_err());
        assert!(parse_time("123:00").is_err());
        assert!(parse_time("12:00:00").is_err());
    }

    #[test]
    fn validate_time_is_strict() {
        assert!(validate_time("00:00"));
        assert!(validate_time("23:59"));
        assert!(!validate_time("9:05"));
        assert!(!validate_time("0905"));
        assert!(!validate_time("24:00"));
        assert!(!validate_time("12:60"));
    }

    #[test]
    fn composes_and_splits_date_time() {
        assert_eq!(compose_date_time("2024-03-01", None), "2024-03-01");
        assert_eq!(compose_date_time("2024-03-01", Some("")), "2024-03-01");
        assert_eq!(compose_date_time("2024-03-01", Some("07:30")), "2024-03-01 07:30");
        assert_eq!(split_date_time("2024-03-01 07:30"), ("2024-03-01", "07:30"));
        assert_eq!(split_date_time("2024-03-01"), ("2024-03-01", ""));
        assert_eq!(split_date_time(""), ("", ""));
    }
}
