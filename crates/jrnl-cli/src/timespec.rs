//! Free-text time expressions.
//!
//! An expression names a day relative to today ("yesterday", "3 days ago",
//! "last friday") or absolutely ("2024-05-17", an RFC 3339 instant). The
//! day becomes the half-open range from its midnight to the next one.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use jrnl_core::DayBoundary;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("failed to parse time from {0:?}")]
    Unrecognized(String),

    #[error("{0} has no midnight in the local time zone")]
    NoMidnight(NaiveDate),
}

/// Half-open `[after, before)` range covering one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub after: DateTime<Utc>,
    pub before: DateTime<Utc>,
}

/// Resolve `expr` to the day it names and return that day's range.
pub fn resolve_day(
    expr: &str,
    now: DateTime<Utc>,
    boundary: DayBoundary,
) -> Result<DayRange, TimeParseError> {
    let today = date_in(now, boundary);
    let day = resolve_date(expr, today, boundary)?;
    let next = day
        .succ_opt()
        .ok_or_else(|| TimeParseError::Unrecognized(expr.to_string()))?;
    Ok(DayRange {
        after: midnight(day, boundary)?,
        before: midnight(next, boundary)?,
    })
}

/// Parse a single bound: an RFC 3339 instant, or a date meaning its
/// midnight.
pub fn parse_instant(text: &str, boundary: DayBoundary) -> Result<DateTime<Utc>, TimeParseError> {
    let text = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Ok(t.with_timezone(&Utc));
    }
    match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        Ok(date) => midnight(date, boundary),
        Err(_) => Err(TimeParseError::Unrecognized(text.to_string())),
    }
}

fn date_in(t: DateTime<Utc>, boundary: DayBoundary) -> NaiveDate {
    match boundary {
        DayBoundary::Utc => t.date_naive(),
        DayBoundary::Local => t.with_timezone(&Local).date_naive(),
    }
}

fn midnight(date: NaiveDate, boundary: DayBoundary) -> Result<DateTime<Utc>, TimeParseError> {
    let naive = date.and_time(NaiveTime::MIN);
    match boundary {
        DayBoundary::Utc => Ok(Utc.from_utc_datetime(&naive)),
        DayBoundary::Local => Local
            .from_local_datetime(&naive)
            .earliest()
            // Midnight skipped by a DST change: the day starts an hour later.
            .or_else(|| Local.from_local_datetime(&(naive + Duration::hours(1))).earliest())
            .map(|t| t.with_timezone(&Utc))
            .ok_or(TimeParseError::NoMidnight(date)),
    }
}

fn resolve_date(
    expr: &str,
    today: NaiveDate,
    boundary: DayBoundary,
) -> Result<NaiveDate, TimeParseError> {
    let unrecognized = || TimeParseError::Unrecognized(expr.to_string());
    let lowered = expr.trim().to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    let days_back = |n: i64| {
        today
            .checked_sub_signed(Duration::days(n))
            .ok_or_else(unrecognized)
    };

    match words.as_slice() {
        ["today"] | ["now"] => Ok(today),
        ["yesterday"] => days_back(1),
        ["tomorrow"] => days_back(-1),
        [count, unit, "ago"] => {
            let n: i64 = match *count {
                "a" | "an" | "one" => 1,
                other => other.parse::<u32>().map_err(|_| unrecognized())?.into(),
            };
            match *unit {
                "day" | "days" => days_back(n),
                "week" | "weeks" => days_back(n * 7),
                _ => Err(unrecognized()),
            }
        }
        ["last", day] | [day] if day.parse::<Weekday>().is_ok() => {
            let weekday = day.parse::<Weekday>().map_err(|_| unrecognized())?;
            days_back(days_since(today.weekday(), weekday))
        }
        ["last", "week"] => days_back(7),
        [single] => {
            if let Ok(date) = NaiveDate::parse_from_str(single, "%Y-%m-%d") {
                return Ok(date);
            }
            // Instants keep their original casing; `lowered` broke the 'T'.
            DateTime::parse_from_rfc3339(expr.trim())
                .map(|t| date_in(t.with_timezone(&Utc), boundary))
                .map_err(|_| unrecognized())
        }
        _ => Err(unrecognized()),
    }
}

/// Days back to the most recent `target` strictly before a `from` day.
fn days_since(from: Weekday, target: Weekday) -> i64 {
    let diff = (7 + from.num_days_from_monday() - target.num_days_from_monday()) % 7;
    if diff == 0 {
        7
    } else {
        i64::from(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A Friday.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolve(expr: &str) -> Result<NaiveDate, TimeParseError> {
        resolve_date(expr, today(), DayBoundary::Utc)
    }

    #[test]
    fn relative_days() {
        assert_eq!(resolve("today").unwrap(), today());
        assert_eq!(resolve("Yesterday").unwrap(), date(2024, 5, 16));
        assert_eq!(resolve("tomorrow").unwrap(), date(2024, 5, 18));
        assert_eq!(resolve("3 days ago").unwrap(), date(2024, 5, 14));
        assert_eq!(resolve("a week ago").unwrap(), date(2024, 5, 10));
        assert_eq!(resolve("2 weeks ago").unwrap(), date(2024, 5, 3));
        assert_eq!(resolve("last week").unwrap(), date(2024, 5, 10));
    }

    #[test]
    fn weekdays_look_back() {
        assert_eq!(resolve("monday").unwrap(), date(2024, 5, 13));
        assert_eq!(resolve("last monday").unwrap(), date(2024, 5, 13));
        assert_eq!(resolve("thu").unwrap(), date(2024, 5, 16));
        // Same weekday as today means a week ago.
        assert_eq!(resolve("last friday").unwrap(), date(2024, 5, 10));
    }

    #[test]
    fn absolute_dates() {
        assert_eq!(resolve("2023-12-31").unwrap(), date(2023, 12, 31));
        assert_eq!(resolve("2023-12-31T23:30:00-02:00").unwrap(), date(2024, 1, 1));
    }

    #[test]
    fn nonsense_is_rejected() {
        assert_eq!(
            resolve("when pigs fly"),
            Err(TimeParseError::Unrecognized("when pigs fly".into()))
        );
        assert!(resolve("x days ago").is_err());
        assert!(resolve("3 fortnights ago").is_err());
        assert!(resolve("last").is_err());
    }

    #[test]
    fn utc_day_range_is_midnight_to_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 5, 17, 15, 4, 5).unwrap();
        let range = resolve_day("yesterday", now, DayBoundary::Utc).unwrap();
        assert_eq!(range.after, Utc.with_ymd_and_hms(2024, 5, 16, 0, 0, 0).unwrap());
        assert_eq!(range.before, Utc.with_ymd_and_hms(2024, 5, 17, 0, 0, 0).unwrap());
    }

    #[test]
    fn instants_and_dates_as_bounds() {
        assert_eq!(
            parse_instant("2024-05-17T12:30:00Z", DayBoundary::Utc).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 17, 12, 30, 0).unwrap()
        );
        assert_eq!(
            parse_instant("2024-05-17", DayBoundary::Utc).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 17, 0, 0, 0).unwrap()
        );
        assert!(parse_instant("noon", DayBoundary::Utc).is_err());
    }

    #[test]
    fn days_since_wraps_the_week() {
        assert_eq!(days_since(Weekday::Mon, Weekday::Sun), 1);
        assert_eq!(days_since(Weekday::Sun, Weekday::Mon), 6);
        assert_eq!(days_since(Weekday::Wed, Weekday::Wed), 7);
    }
}
