//! Chart series: the trailing seven-period trend and the zero-filled daily
//! histogram of the current period.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use std::collections::BTreeMap;

use crate::analytics::period::Period;
use crate::analytics::types::{DailyPoint, TrendPoint};
use crate::analytics::DEFAULT_PRICE_PER_VISIT;
use crate::records::{RevenueData, Visit};

/// Number of buckets in the trailing trend series.
pub const TREND_BUCKETS: u32 = 7;

/// Builds seven buckets ending at `now`, oldest first.
///
/// Bucket `i` covers `[step_back(now, i + 1), step_back(now, i))`. Both ends
/// are derived from `now` directly rather than chained from the neighbour.
pub fn generate_trend_data(
    visits: &[Visit],
    revenue_data: Option<&RevenueData>,
    period: Period,
    now: DateTime<Utc>,
) -> Vec<TrendPoint> {
    let price = revenue_data
        .map(|r| r.price_per_visit)
        .unwrap_or(DEFAULT_PRICE_PER_VISIT);

    (0..TREND_BUCKETS)
        .rev()
        .map(|i| {
            let start = period.step_back(now, i + 1);
            let end = period.step_back(now, i);

            let count = visits
                .iter()
                .filter_map(|v| v.created_at)
                .filter(|ts| *ts >= start && *ts < end)
                .count();

            TrendPoint {
                date: period.label(end),
                visits: count,
                bookings: 0,
                revenue: count as f64 * price,
            }
        })
        .collect()
}

/// One entry per calendar day from `period_start` through `now`, inclusive.
pub fn generate_daily_visit_data(
    visits: &[Visit],
    period_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Vec<DailyPoint> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();

    let mut cursor = period_start;
    while cursor <= now {
        days.insert(cursor.date_naive(), 0);
        match cursor.checked_add_signed(TimeDelta::days(1)) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    for ts in visits.iter().filter_map(|v| v.created_at) {
        if ts < period_start || ts > now {
            continue;
        }
        if let Some(count) = days.get_mut(&ts.date_naive()) {
            *count += 1;
        }
    }

    days.into_iter()
        .map(|(day, value)| DailyPoint {
            date: day.format("%b %-d").to_string(),
            value,
        })
        .collect()
}
