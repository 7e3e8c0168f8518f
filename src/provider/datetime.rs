use chrono::{Datelike, Month, NaiveDate};
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map_res},
    sequence::separated_pair,
    IResult,
};
use num_traits::FromPrimitive;
use std::fmt;
use std::str::FromStr;

use super::{Error, ErrorKind, Result};

const EVENT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of days in `month`, taken from the day preceding the first of the
/// following month.
pub fn days_of_month(month: &Month, year: i32) -> u32 {
    let (next_year, next_month) = if month.number_from_month() == 12 {
        (year + 1, 1)
    } else {
        (year, month.number_from_month() + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(0, |last| last.day())
}

/// Parses the `YYYY-MM-DD` date of an event record.
pub fn parse_event_date(s: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(s, EVENT_DATE_FORMAT)?)
}

/// A calendar month as it is keyed in the event document (`YYYY-MM`).
///
/// Ordering is chronological, which matches the lexicographic order of the
/// canonical string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    first_day: NaiveDate,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| MonthKey { first_day })
    }

    pub fn of<T: Datelike>(date: &T) -> Self {
        // Day one exists for every month chrono can represent
        MonthKey {
            first_day: NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                .unwrap_or(NaiveDate::MIN),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month_number(&self) -> u32 {
        self.first_day.month()
    }

    pub fn month(&self) -> Month {
        Month::from_u32(self.first_day.month()).unwrap_or(Month::January)
    }

    pub fn num_days(&self) -> u32 {
        days_of_month(&self.month(), self.year())
    }

    /// Weekday of the first day, counted from Sunday (0) to Saturday (6).
    pub fn start_weekday(&self) -> u32 {
        self.first_day.weekday().num_days_from_sunday()
    }

    pub fn contains<T: Datelike>(&self, date: &T) -> bool {
        date.year() == self.year() && date.month() == self.month_number()
    }

    pub fn date_of(&self, day: u32) -> Option<NaiveDate> {
        self.first_day.with_day(day)
    }
}

fn digits<'a>(n: usize) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    take_while_m_n(n, n, |c: char| c.is_ascii_digit())
}

fn month_key(input: &str) -> IResult<&str, (i32, u32)> {
    separated_pair(
        map_res(digits(4), |s: &str| s.parse::<i32>()),
        char('-'),
        map_res(digits(2), |s: &str| s.parse::<u32>()),
    )(input)
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (_, (year, month)) = all_consuming(month_key)(s)
            .map_err(|_| Error::new(ErrorKind::MonthKeyParse, &format!("'{}'", s)))?;

        MonthKey::new(year, month).ok_or_else(|| {
            Error::new(
                ErrorKind::MonthKeyParse,
                &format!("'{}' has no month {}", s, month),
            )
        })
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month_number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_lengths_follow_gregorian_calendar() {
        let expected = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (idx, &len) in expected.iter().enumerate() {
            let month = Month::from_u32(idx as u32 + 1).unwrap();
            assert_eq!(days_of_month(&month, 2025), len, "{:?}", month);
        }

        assert_eq!(days_of_month(&Month::February, 2024), 29);
        assert_eq!(days_of_month(&Month::February, 1900), 28);
        assert_eq!(days_of_month(&Month::February, 2000), 29);
        assert_eq!(days_of_month(&Month::December, 2025), 31);
    }

    #[test]
    fn parse_month_key() {
        let key: MonthKey = "2025-03".parse().unwrap();
        assert_eq!(key.year(), 2025);
        assert_eq!(key.month_number(), 3);
        assert_eq!(key.month(), Month::March);
        assert_eq!(key.to_string(), "2025-03");

        for bad in ["2025-3", "2025-13", "2025-00", "25-03", "2025-03-01", "2025/03", ""] {
            assert!(bad.parse::<MonthKey>().is_err(), "'{}' should not parse", bad);
        }
    }

    #[test]
    fn month_keys_order_chronologically() {
        let mut keys: Vec<MonthKey> = ["2025-10", "2024-12", "2025-02"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        keys.sort();

        let as_str: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(as_str, ["2024-12", "2025-02", "2025-10"]);
    }

    #[test]
    fn start_weekday_counts_from_sunday() {
        // 2025-06-01 is a Sunday, 2025-02-01 a Saturday, 2024-02-01 a Thursday
        assert_eq!(MonthKey::new(2025, 6).unwrap().start_weekday(), 0);
        assert_eq!(MonthKey::new(2025, 2).unwrap().start_weekday(), 6);
        assert_eq!(MonthKey::new(2024, 2).unwrap().start_weekday(), 4);
    }

    #[test]
    fn event_dates() {
        let date = parse_event_date("2025-01-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());

        assert!(parse_event_date("2025-01-xx").is_err());
        assert!(parse_event_date("2025-02-30").is_err());
        assert!(parse_event_date("2025-01").is_err());

        let key = MonthKey::of(&date);
        assert!(key.contains(&date));
        assert!(!MonthKey::new(2025, 2).unwrap().contains(&date));
        assert_eq!(key.date_of(15), Some(date));
        assert_eq!(key.date_of(32), None);
    }
}
