//! Date parsing and formatting for day records.

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

use crate::error::{DaybookError, Result};

/// Strict-parse a `YYYY-MM-DD` token.
///
/// This is the only date form accepted in day headers. Anything else
/// (including `2026-1-5` or `2026/01/05`) is rejected.
pub fn parse_strict(token: &str) -> Option<NaiveDate> {
    // NaiveDate accepts single-digit month/day with %Y-%m-%d, so enforce
    // the fixed-width form up front.
    if token.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()
}

/// Parse a user-supplied date string.
///
/// Supports: "today", "yesterday", "tomorrow", "YYYY-MM-DD".
pub fn parse_input(date_str: &str) -> Result<NaiveDate> {
    match date_str.to_lowercase().as_str() {
        "today" => Ok(Local::now().date_naive()),
        "yesterday" => Ok(Local::now().date_naive() - Duration::days(1)),
        "tomorrow" => Ok(Local::now().date_naive() + Duration::days(1)),
        _ => parse_strict(date_str).ok_or_else(|| DaybookError::InvalidDate(date_str.to_string())),
    }
}

/// Format a date as a day header line: `# YYYY-MM-DD <Weekday>`.
pub fn format_header(date: NaiveDate) -> String {
    format!("# {} {}", date.format("%Y-%m-%d"), weekday_name(date))
}

/// English weekday name for a date.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strict() {
        assert_eq!(
            parse_strict("2026-01-05"),
            NaiveDate::from_ymd_opt(2026, 1, 5)
        );
        assert_eq!(parse_strict("2026-1-5"), None);
        assert_eq!(parse_strict("2026/01/05"), None);
        assert_eq!(parse_strict("2026-13-05"), None);
        assert_eq!(parse_strict("not-a-date"), None);
        assert_eq!(parse_strict(""), None);
    }

    #[test]
    fn test_parse_input() {
        let date = parse_input("2024-01-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        // Relative forms resolve without panicking
        assert!(parse_input("today").is_ok());
        assert!(parse_input("yesterday").is_ok());
        assert!(parse_input("tomorrow").is_ok());

        assert!(parse_input("someday").is_err());
    }

    #[test]
    fn test_format_header() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(format_header(date), "# 2026-01-05 Monday");
    }
}
