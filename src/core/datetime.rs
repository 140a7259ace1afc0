//! Date parsing utilities.
//!
//! Completions are logged for days that already happened, so every relative
//! expression here resolves backward from `today`.

use chrono::{Datelike, Days, NaiveDate, TimeDelta, Weekday};

/// Parse a day expression relative to `today`.
///
/// Supports patterns like:
/// - `today`, `yesterday`
/// - `3 days ago`, `2 weeks ago`
/// - `monday`, `last fri` (most recent occurrence, today included for the bare form)
/// - `dec 15`, `december 15` (this year, or last year if that day is still ahead)
/// - `2024-12-15` (ISO format)
/// - `12/15`, `12/15/2024`
///
/// Returns `None` if the input cannot be parsed.
#[must_use]
pub fn parse_day(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let input = input.trim().to_lowercase();

    match input.as_str() {
        "today" => return Some(today),
        "yesterday" => return today.pred_opt(),
        _ => {},
    }

    parse_relative_offset(&input, today)
        .or_else(|| parse_weekday(&input, today))
        .or_else(|| parse_month_day(&input, today))
        .or_else(|| NaiveDate::parse_from_str(&input, "%Y-%m-%d").ok())
        .or_else(|| parse_us_date(&input, today))
}

/// The Sunday that starts the calendar week containing `date`.
///
/// Clamps to the earliest representable day for the first partial week.
#[must_use]
pub fn week_start_sunday(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_sunday())))
        .unwrap_or(NaiveDate::MIN)
}

/// The day `days` before `date`, or `None` if that is before the earliest
/// representable day.
#[must_use]
pub fn days_before(date: NaiveDate, days: u32) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(days)))
}

/// Parse "X days/weeks ago" patterns.
fn parse_relative_offset(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    if parts.len() == 3 && parts[2] == "ago" {
        let amount: i64 = parts[0].parse().ok()?;
        let days = match parts[1].trim_end_matches('s') {
            "day" => amount,
            "week" => amount.checked_mul(7)?,
            _ => return None,
        };
        return today.checked_sub_signed(TimeDelta::try_days(days)?);
    }

    None
}

/// Parse weekday names, resolving to the most recent occurrence.
fn parse_weekday(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let (is_last, day_str) = input
        .strip_prefix("last ")
        .map_or((false, input), |rest| (true, rest));

    let target = match day_str {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" | "tues" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" | "thur" | "thurs" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };

    let mut days_back = (u64::from(today.weekday().num_days_from_sunday()) + 7
        - u64::from(target.num_days_from_sunday()))
        % 7;

    // "last monday" on a Monday means a week ago
    if is_last && days_back == 0 {
        days_back = 7;
    }

    today.checked_sub_days(Days::new(days_back))
}

/// Parse month and day patterns.
fn parse_month_day(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    if parts.len() != 2 {
        return None;
    }

    let month = parse_month_name(parts[0])?;
    let day: u32 = parts[1].parse().ok()?;

    most_recent(today, month, day)
}

/// Parse month name to number.
fn parse_month_name(input: &str) -> Option<u32> {
    match input {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}

/// Parse US date format (MM/DD or MM/DD/YYYY).
fn parse_us_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split('/').collect();

    match parts.len() {
        2 => {
            let month: u32 = parts[0].parse().ok()?;
            let day: u32 = parts[1].parse().ok()?;
            most_recent(today, month, day)
        },
        3 => {
            let month: u32 = parts[0].parse().ok()?;
            let day: u32 = parts[1].parse().ok()?;
            let year: i32 = parts[2].parse().ok()?;

            // Handle 2-digit years
            let year = if year < 100 { 2000 + year } else { year };

            NaiveDate::from_ymd_opt(year, month, day)
        },
        _ => None,
    }
}

/// This year's month/day, or last year's if it has not happened yet.
fn most_recent(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let date = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if date > today {
        NaiveDate::from_ymd_opt(today.year() - 1, month, day)
    } else {
        Some(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Wednesday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_today_and_yesterday() {
        assert_eq!(parse_day("today", today()), Some(today()));
        assert_eq!(parse_day(" Yesterday ", today()), Some(date(2024, 3, 12)));
    }

    #[test]
    fn test_parse_days_ago() {
        assert_eq!(parse_day("3 days ago", today()), Some(date(2024, 3, 10)));
        assert_eq!(parse_day("1 day ago", today()), Some(date(2024, 3, 12)));
        assert_eq!(parse_day("2 weeks ago", today()), Some(date(2024, 2, 28)));
        assert_eq!(parse_day("2 months ago", today()), None);
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_day("monday", today()), Some(date(2024, 3, 11)));
        assert_eq!(parse_day("wed", today()), Some(today()));
        assert_eq!(parse_day("last wed", today()), Some(date(2024, 3, 6)));
        assert_eq!(parse_day("thursday", today()), Some(date(2024, 3, 7)));
    }

    #[test]
    fn test_parse_month_day() {
        assert_eq!(parse_day("mar 1", today()), Some(date(2024, 3, 1)));
        assert_eq!(parse_day("december 25", today()), Some(date(2023, 12, 25)));
        assert_eq!(parse_day("feb 30", today()), None);
    }

    #[test]
    fn test_parse_iso_and_us() {
        assert_eq!(parse_day("2024-01-05", today()), Some(date(2024, 1, 5)));
        assert_eq!(parse_day("1/5", today()), Some(date(2024, 1, 5)));
        assert_eq!(parse_day("12/31/23", today()), Some(date(2023, 12, 31)));
        assert_eq!(parse_day("not a date", today()), None);
    }

    #[test]
    fn test_week_start_sunday() {
        assert_eq!(week_start_sunday(today()), date(2024, 3, 10));
        assert_eq!(week_start_sunday(date(2024, 3, 10)), date(2024, 3, 10));
        assert_eq!(week_start_sunday(date(2024, 3, 16)), date(2024, 3, 10));
    }

    #[test]
    fn test_days_before() {
        assert_eq!(days_before(today(), 0), Some(today()));
        assert_eq!(days_before(today(), 13), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_out_of_range_offsets_do_not_panic() {
        assert_eq!(days_before(today(), 100_000_000), None);
        assert_eq!(days_before(today(), u32::MAX), None);
        assert_eq!(parse_day("99999999 days ago", today()), None);
        assert_eq!(parse_day("9223372036854775807 weeks ago", today()), None);
        assert_eq!(parse_day("yesterday", NaiveDate::MIN), None);
        assert_eq!(week_start_sunday(NaiveDate::MIN), NaiveDate::MIN);
    }
}
