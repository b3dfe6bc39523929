use chrono::{DateTime, Datelike, Local, Month, NaiveDate, TimeZone};
use nom::{
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, recognize, verify},
    sequence::{pair, tuple},
    IResult,
};
use num_traits::FromPrimitive;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

/// A day-granularity date without time zone.
///
/// `month` is 1-based (1 = January) and `day` is 1-based. The triple is not
/// required to name a real calendar day; paging only looks at `(year, month)`.
/// Ordering is lexicographic over `(year, month, day)`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    /// # Panics
    ///
    /// Panics if `month` is not in `1..=12` or `day` is not in `1..=31`. Use
    /// [`CalendarDate::from_ymd_opt`] for unchecked input.
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        match CalendarDate::from_ymd_opt(year, month, day) {
            Some(date) => date,
            None => panic!("invalid date {}-{}-{}", year, month, day),
        }
    }

    /// Returns `None` if `month` is not in `1..=12` or `day` is not in `1..=31`.
    pub fn from_ymd_opt(year: i32, month: u32, day: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (1..=31).contains(&day) {
            Some(CalendarDate { year, month, day })
        } else {
            None
        }
    }

    pub fn today() -> Self {
        CalendarDate::from(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month_of_year(&self) -> Option<Month> {
        Month::from_u32(self.month)
    }

    pub fn is_before(&self, other: &CalendarDate) -> bool {
        self < other
    }

    pub fn is_after(&self, other: &CalendarDate) -> bool {
        self > other
    }

    pub fn is_same_month(&self, other: &CalendarDate) -> bool {
        self.year == other.year && self.month == other.month
    }

    pub fn month_start(&self) -> Self {
        CalendarDate { day: 1, ..*self }
    }

    /// First day of the following month.
    pub fn next_month(&self) -> Self {
        Self::from_month_ordinal(self.month_ordinal() + 1)
    }

    /// Same month and day `years` later (or earlier, if negative).
    pub fn add_years(&self, years: i32) -> Self {
        CalendarDate {
            year: self.year.saturating_add(years),
            ..*self
        }
    }

    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Months elapsed since January of year 0.
    pub(crate) fn month_ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    pub(crate) fn from_month_ordinal(ordinal: i64) -> Self {
        CalendarDate {
            year: ordinal.div_euclid(12) as i32,
            month: ordinal.rem_euclid(12) as u32 + 1,
            day: 1,
        }
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        CalendarDate::new(date.year(), date.month(), date.day())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for CalendarDate {
    fn from(datetime: DateTime<Tz>) -> Self {
        CalendarDate::from(datetime.date_naive())
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}-{:02}-{:02}", -(self.year as i64), self.month, self.day)
        } else {
            write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
        }
    }
}

fn year(input: &str) -> IResult<&str, i32> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse::<i32>)(input)
}

fn month(input: &str) -> IResult<&str, u32> {
    verify(map_res(digit1, str::parse::<u32>), |m: &u32| (1..=12).contains(m))(input)
}

fn day(input: &str) -> IResult<&str, u32> {
    verify(map_res(digit1, str::parse::<u32>), |d: &u32| (1..=31).contains(d))(input)
}

/// Parses `YYYY-MM-DD`, leaving any trailing input.
pub fn parse_date(input: &str) -> IResult<&str, CalendarDate> {
    let (rest, (y, _, m, _, d)) = tuple((year, char('-'), month, char('-'), day))(input)?;
    Ok((rest, CalendarDate::new(y, m, d)))
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        all_consuming(parse_date)(s.trim())
            .map(|(_, date)| date)
            .map_err(|_| {
                Error::new(
                    ErrorKind::DateParse,
                    &format!("'{}' is not a YYYY-MM-DD date", s),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_lexicographic() {
        let a = CalendarDate::new(2020, 6, 30);
        let b = CalendarDate::new(2020, 7, 1);
        let c = CalendarDate::new(2021, 1, 1);

        assert!(a.is_before(&b));
        assert!(c.is_after(&b));
        assert!(!a.is_after(&a));
        assert_eq!(a, CalendarDate::new(2020, 6, 30));
    }

    #[test]
    fn same_month_ignores_day() {
        let a = CalendarDate::new(2020, 2, 1);
        assert!(a.is_same_month(&CalendarDate::new(2020, 2, 29)));
        assert!(!a.is_same_month(&CalendarDate::new(2021, 2, 1)));
    }

    #[test]
    fn next_month_rolls_over_year() {
        let dec = CalendarDate::new(1999, 12, 31);
        assert_eq!(dec.next_month(), CalendarDate::new(2000, 1, 1));
        assert_eq!(
            CalendarDate::new(2000, 1, 15).next_month(),
            CalendarDate::new(2000, 2, 1)
        );
    }

    #[test]
    fn month_ordinal_handles_negative_years() {
        let date = CalendarDate::new(-1, 12, 1);
        assert_eq!(
            CalendarDate::from_month_ordinal(date.month_ordinal()),
            date
        );
        assert_eq!(date.next_month(), CalendarDate::new(0, 1, 1));
    }

    #[test]
    fn parse_and_display() {
        let date: CalendarDate = "2020-04-30".parse().unwrap();
        assert_eq!(date, CalendarDate::new(2020, 4, 30));
        assert_eq!(date.to_string(), "2020-04-30");
        assert_eq!(CalendarDate::new(800, 1, 2).to_string(), "0800-01-02");

        assert!("2020-13-01".parse::<CalendarDate>().is_err());
        assert!("2020-04-30x".parse::<CalendarDate>().is_err());
        assert!("yesterday".parse::<CalendarDate>().is_err());
    }

    #[test]
    fn checked_constructor_rejects_bad_fields() {
        assert_eq!(
            CalendarDate::from_ymd_opt(2020, 2, 29),
            Some(CalendarDate::new(2020, 2, 29))
        );
        assert_eq!(CalendarDate::from_ymd_opt(2020, 13, 1), None);
        assert_eq!(CalendarDate::from_ymd_opt(2020, 0, 1), None);
        assert_eq!(CalendarDate::from_ymd_opt(2020, 1, 0), None);
        assert_eq!(CalendarDate::from_ymd_opt(2020, 1, 32), None);
    }

    #[test]
    #[should_panic(expected = "invalid date 2020-13-1")]
    fn new_panics_on_month_13() {
        CalendarDate::new(2020, 13, 1);
    }

    #[test]
    fn add_years_saturates() {
        let date = CalendarDate::new(2020, 6, 1);
        assert_eq!(date.add_years(i32::MAX).year(), i32::MAX);
        assert_eq!(date.add_years(i32::MIN).year(), i32::MIN);
    }

    #[test]
    fn from_chrono() {
        let naive = NaiveDate::from_ymd_opt(2020, 9, 8).unwrap();
        assert_eq!(CalendarDate::from(naive), CalendarDate::new(2020, 9, 8));

        let datetime = chrono::Utc.from_utc_datetime(&naive.and_hms_opt(23, 0, 0).unwrap());
        assert_eq!(CalendarDate::from(datetime), CalendarDate::new(2020, 9, 8));
    }

    #[test]
    fn month_of_year() {
        assert_eq!(
            CalendarDate::new(2020, 12, 1).month_of_year(),
            Some(Month::December)
        );
    }
}
