//! Period selector and the calendar arithmetic behind every window.
//!
//! Month-based steps keep the day-of-month and let overflow roll forward
//! into the following month, so Mar 31 minus one month is Mar 3 (or Mar 2
//! in a leap year) and Feb 29 minus one year is Mar 1. Time of day is kept.
//! All arithmetic runs in UTC and saturates at [`DateTime::<Utc>::MIN_UTC`].

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    /// Moves `at` back by `n` units of this period.
    pub fn step_back(self, at: DateTime<Utc>, n: u32) -> DateTime<Utc> {
        let shifted = match self {
            Period::Week => at.checked_sub_signed(TimeDelta::days(7 * i64::from(n))),
            Period::Month => months_back(at, n),
            Period::Quarter => months_back(at, n.saturating_mul(3)),
            Period::Year => months_back(at, n.saturating_mul(12)),
        };
        shifted.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Inclusive lower bound of the current window ending at `now`.
    pub fn window_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.step_back(now, 1)
    }

    /// Display label for a trend bucket ending at `end`.
    pub fn label(self, end: DateTime<Utc>) -> String {
        match self {
            Period::Week => end.format("%b %-d").to_string(),
            Period::Month => end.format("%b").to_string(),
            Period::Quarter => format!("Q{}", end.month0() / 3 + 1),
            Period::Year => end.format("%Y").to_string(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
        }
    }
}

/// Start of the window of equal length immediately before `[start, now]`.
pub fn previous_window_start(start: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    start
        .checked_sub_signed(now - start)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn months_back(at: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    let naive = at.naive_utc();
    let date = naive.date();

    let total = date.year() * 12 + date.month0() as i32 - i32::try_from(months).ok()?;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;

    let rolled = NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_days(Days::new(u64::from(date.day() - 1)))?;

    Some(rolled.and_time(naive.time()).and_utc())
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            other => Err(anyhow::anyhow!("unknown period '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 15, 30, 0).unwrap()
    }

    #[test]
    fn test_week_is_fixed_seven_days() {
        assert_eq!(Period::Week.window_start(at(2024, 3, 5)), at(2024, 2, 27));
    }

    #[test]
    fn test_month_keeps_day_of_month() {
        assert_eq!(Period::Month.window_start(at(2024, 5, 15)), at(2024, 4, 15));
        assert_eq!(Period::Month.window_start(at(2024, 1, 10)), at(2023, 12, 10));
    }

    #[test]
    fn test_month_overflow_rolls_forward() {
        // Feb 31 does not exist: rolls to Mar 2 in a leap year, Mar 3 otherwise.
        assert_eq!(Period::Month.window_start(at(2024, 3, 31)), at(2024, 3, 2));
        assert_eq!(Period::Month.window_start(at(2023, 3, 31)), at(2023, 3, 3));
        assert_eq!(Period::Month.window_start(at(2023, 5, 31)), at(2023, 5, 1));
    }

    #[test]
    fn test_quarter_and_year() {
        assert_eq!(Period::Quarter.window_start(at(2024, 2, 10)), at(2023, 11, 10));
        assert_eq!(Period::Year.window_start(at(2024, 6, 1)), at(2023, 6, 1));
        assert_eq!(Period::Year.window_start(at(2024, 2, 29)), at(2023, 3, 1));
    }

    #[test]
    fn test_step_back_is_not_chained() {
        // Three single steps from Mar 31 would drift; one triple step does not.
        assert_eq!(Period::Month.step_back(at(2023, 3, 31), 3), at(2022, 12, 31));
    }

    #[test]
    fn test_previous_window_has_equal_length() {
        let now = at(2024, 3, 5);
        let start = Period::Week.window_start(now);
        let prev = previous_window_start(start, now);
        assert_eq!(start - prev, now - start);
        assert_eq!(prev, at(2024, 2, 20));
    }

    #[test]
    fn test_labels() {
        let end = at(2024, 8, 5);
        assert_eq!(Period::Week.label(end), "Aug 5");
        assert_eq!(Period::Month.label(end), "Aug");
        assert_eq!(Period::Quarter.label(end), "Q3");
        assert_eq!(Period::Year.label(end), "2024");
        assert_eq!(Period::Quarter.label(at(2024, 12, 1)), "Q4");
        assert_eq!(Period::Quarter.label(at(2024, 1, 1)), "Q1");
    }

    #[test]
    fn test_parse_period() {
        assert_eq!("Week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!(" quarter ".parse::<Period>().unwrap(), Period::Quarter);
        assert!("fortnight".parse::<Period>().is_err());
    }
}
