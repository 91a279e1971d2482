use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;

use crate::analytics::DEFAULT_PRICE_PER_VISIT;
use crate::analytics::change::calculate_percentage_change;
use crate::analytics::period::{Period, previous_window_start};
use crate::analytics::series::{generate_daily_visit_data, generate_trend_data};
use crate::analytics::types::MetricsSummary;
use crate::records::{Booking, RevenueData, Review, Visit};

/// Aggregates one club's raw rows into a [`MetricsSummary`] for `period`.
///
/// The current window is `created_at >= period_start` and the previous window
/// is `previous_start < created_at <= period_start`, so a row stamped exactly
/// at `period_start` is counted in both. Unique visitors are counted over the
/// whole `visits` input, not just the current window. Rows without a parsable
/// timestamp contribute to totals only.
///
/// Never fails: empty inputs yield zero counts and neutral trends.
pub fn calculate_analytics_metrics(
    visits: &[Visit],
    bookings: &[Booking],
    reviews: &[Review],
    revenue_data: Option<&RevenueData>,
    period: Period,
    club_avg_rating: Option<f64>,
    now: DateTime<Utc>,
) -> MetricsSummary {
    let unique_visitors = visits
        .iter()
        .map(|v| v.user_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let price = revenue_data
        .map(|r| r.price_per_visit)
        .unwrap_or(DEFAULT_PRICE_PER_VISIT);
    let estimated_revenue = revenue_data
        .map(|r| r.visits.len() as f64 * r.price_per_visit)
        .unwrap_or(0.0);

    let period_start = period.window_start(now);
    let previous_start = previous_window_start(period_start, now);

    let in_current = |ts: Option<DateTime<Utc>>| ts.is_some_and(|t| t >= period_start);
    let in_previous =
        |ts: Option<DateTime<Utc>>| ts.is_some_and(|t| t > previous_start && t <= period_start);

    let current_visits: Vec<Visit> = visits
        .iter()
        .filter(|v| in_current(v.created_at))
        .cloned()
        .collect();
    let previous_visits: Vec<Visit> = visits
        .iter()
        .filter(|v| in_previous(v.created_at))
        .cloned()
        .collect();
    let current_bookings: Vec<Booking> = bookings
        .iter()
        .filter(|b| in_current(b.created_at))
        .cloned()
        .collect();
    let previous_bookings: Vec<Booking> = bookings
        .iter()
        .filter(|b| in_previous(b.created_at))
        .cloned()
        .collect();

    let current_period_revenue = current_visits.len() as f64 * price;
    let previous_period_revenue = previous_visits.len() as f64 * price;

    let visits_trend =
        calculate_percentage_change(current_visits.len() as f64, previous_visits.len() as f64);
    let bookings_trend = calculate_percentage_change(
        current_bookings.len() as f64,
        previous_bookings.len() as f64,
    );
    let revenue_trend = calculate_percentage_change(current_period_revenue, previous_period_revenue);

    let top_day = busiest_weekday(&current_visits);

    let trend_data = generate_trend_data(visits, revenue_data, period, now);
    let daily_visit_data = generate_daily_visit_data(visits, period_start, now);
    let visits_trend_array = trend_data.iter().map(|p| p.visits).collect();
    let revenue_trend_array = trend_data.iter().map(|p| p.revenue).collect();

    debug!(
        %period,
        total_visits = visits.len(),
        current_visits = current_visits.len(),
        previous_visits = previous_visits.len(),
        current_bookings = current_bookings.len(),
        unique_visitors,
        "Analytics metrics computed"
    );

    MetricsSummary {
        period,
        generated_at: now,
        period_start,
        previous_period_start: previous_start,
        total_visits: visits.len(),
        total_bookings: bookings.len(),
        total_reviews: reviews.len(),
        unique_visitors,
        average_rating: format_rating(club_avg_rating.unwrap_or(0.0)),
        estimated_revenue,
        current_visits,
        previous_visits,
        current_bookings,
        previous_bookings,
        current_period_revenue,
        previous_period_revenue,
        visits_trend,
        bookings_trend,
        revenue_trend,
        top_day,
        trend_data,
        daily_visit_data,
        visits_trend_array,
        revenue_trend_array,
    }
}

/// Weekday name with the most visits. Ties go to the weekday seen first.
fn busiest_weekday(visits: &[Visit]) -> Option<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::with_capacity(7);

    for day in visits.iter().filter_map(|v| v.created_at).map(|t| t.format("%A").to_string()) {
        match counts.iter_mut().find(|(d, _)| *d == day) {
            Some((_, n)) => *n += 1,
            None => counts.push((day, 1)),
        }
    }

    counts.into_iter().fold(None, |best, (day, n)| match best {
        Some((_, top)) if top >= n => best,
        _ => Some((day, n)),
    })
}

/// One decimal, exact ties rounded away from zero (4.25 -> "4.3").
fn format_rating(rating: f64) -> String {
    format!("{:.1}", (rating * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::types::TrendDirection;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        // A Saturday.
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn ts(m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let s = calculate_analytics_metrics(&[], &[], &[], None, Period::Month, None, now());

        assert_eq!(s.total_visits, 0);
        assert_eq!(s.total_bookings, 0);
        assert_eq!(s.unique_visitors, 0);
        assert_eq!(s.estimated_revenue, 0.0);
        for t in [s.visits_trend, s.bookings_trend, s.revenue_trend] {
            assert_eq!(t.value, 0.0);
            assert_eq!(t.trend, TrendDirection::Neutral);
        }
        assert!(s.top_day.is_none());
        // May 15 through Jun 15 inclusive.
        assert_eq!(s.daily_visit_data.len(), 32);
        assert!(s.daily_visit_data.iter().all(|d| d.value == 0));
        assert_eq!(s.trend_data.len(), 7);
        assert!(s.trend_data.iter().all(|p| p.visits == 0 && p.revenue == 0.0));
        assert_eq!(s.average_rating, "0.0");
    }

    #[test]
    fn test_unique_visitors_ignore_period() {
        let mut visits = Vec::new();
        for i in 0..8 {
            visits.push(Visit::new(ts(1, 1 + i, 9), if i % 2 == 0 { "a" } else { "b" }));
        }
        visits.push(Visit::new(ts(6, 14, 9), "a"));
        visits.push(Visit::new(ts(6, 13, 9), "b"));

        let s = calculate_analytics_metrics(&visits, &[], &[], None, Period::Week, None, now());
        assert_eq!(s.total_visits, 10);
        assert_eq!(s.current_visits.len(), 2);
        assert_eq!(s.unique_visitors, 2);
    }

    #[test]
    fn test_estimated_revenue_from_revenue_data() {
        let visits = vec![
            Visit::new(ts(6, 14, 9), "a"),
            Visit::new(ts(6, 14, 10), "b"),
            Visit::new(ts(3, 1, 10), "c"),
        ];
        let revenue = RevenueData {
            visits: visits.clone(),
            price_per_visit: 25.0,
        };

        let s = calculate_analytics_metrics(
            &visits,
            &[],
            &[],
            Some(&revenue),
            Period::Week,
            Some(4.26),
            now(),
        );
        assert_eq!(s.estimated_revenue, 75.0);
        assert_eq!(s.current_period_revenue, 50.0);
        assert_eq!(s.previous_period_revenue, 0.0);
        assert_eq!(s.revenue_trend.trend, TrendDirection::Up);
        assert_eq!(s.revenue_trend.value, 100.0);
        assert_eq!(s.average_rating, "4.3");
    }

    #[test]
    fn test_window_boundaries() {
        let start = Period::Week.window_start(now());
        let prev_start = previous_window_start(start, now());

        let visits = vec![
            Visit::new(start, "at-start"),
            Visit::new(prev_start, "at-prev-start"),
            Visit::new(prev_start + chrono::TimeDelta::seconds(1), "just-after-prev"),
        ];
        let s = calculate_analytics_metrics(&visits, &[], &[], None, Period::Week, None, now());

        let current: Vec<_> = s.current_visits.iter().map(|v| v.user_id.as_str()).collect();
        let previous: Vec<_> = s.previous_visits.iter().map(|v| v.user_id.as_str()).collect();
        assert_eq!(current, vec!["at-start"]);
        assert_eq!(previous, vec!["at-start", "just-after-prev"]);
    }

    #[test]
    fn test_bookings_trend() {
        let bookings = vec![
            Booking::new(ts(6, 14, 9)),
            Booking::new(ts(6, 2, 9)),
            Booking::new(ts(6, 3, 9)),
            Booking::new(ts(6, 4, 9)),
            Booking::new(ts(6, 5, 9)),
            // Before the previous window opens at Jun 1 12:00.
            Booking::new(ts(6, 1, 9)),
        ];
        let s = calculate_analytics_metrics(&[], &bookings, &[], None, Period::Week, None, now());
        assert_eq!(s.current_bookings.len(), 1);
        assert_eq!(s.previous_bookings.len(), 4);
        assert_eq!(s.bookings_trend.value, 75.0);
        assert_eq!(s.bookings_trend.trend, TrendDirection::Down);
    }

    #[test]
    fn test_unparsable_timestamps_only_count_in_totals() {
        let visits = vec![Visit {
            created_at: None,
            user_id: "ghost".to_string(),
        }];
        let bookings = vec![Booking { created_at: None }];
        let s = calculate_analytics_metrics(&visits, &bookings, &[], None, Period::Year, None, now());
        assert_eq!(s.total_visits, 1);
        assert_eq!(s.total_bookings, 1);
        assert_eq!(s.unique_visitors, 1);
        assert!(s.current_visits.is_empty());
        assert!(s.previous_visits.is_empty());
        assert!(s.current_bookings.is_empty());
        assert_eq!(s.daily_visit_data.iter().map(|d| d.value).sum::<usize>(), 0);
        assert!(s.top_day.is_none());
    }

    #[test]
    fn test_top_day_tie_goes_to_first_seen() {
        let visits = vec![
            // Thursday first, then Tuesday, each twice.
            Visit::new(ts(6, 13, 9), "a"),
            Visit::new(ts(6, 11, 9), "b"),
            Visit::new(ts(6, 11, 10), "c"),
            Visit::new(ts(6, 13, 10), "d"),
        ];
        let s = calculate_analytics_metrics(&visits, &[], &[], None, Period::Week, None, now());
        assert_eq!(s.top_day, Some(("Thursday".to_string(), 2)));
    }

    #[test]
    fn test_top_day_picks_max() {
        let visits = vec![
            Visit::new(ts(6, 13, 9), "a"),
            Visit::new(ts(6, 11, 9), "b"),
            Visit::new(ts(6, 11, 10), "c"),
        ];
        let s = calculate_analytics_metrics(&visits, &[], &[], None, Period::Week, None, now());
        assert_eq!(s.top_day, Some(("Tuesday".to_string(), 2)));
    }

    #[test]
    fn test_arrays_project_trend_data() {
        let visits = vec![Visit::new(ts(6, 14, 9), "a"), Visit::new(ts(5, 1, 9), "b")];
        let s = calculate_analytics_metrics(&visits, &[], &[], None, Period::Month, None, now());
        let visits_col: Vec<usize> = s.trend_data.iter().map(|p| p.visits).collect();
        let revenue_col: Vec<f64> = s.trend_data.iter().map(|p| p.revenue).collect();
        assert_eq!(s.visits_trend_array, visits_col);
        assert_eq!(s.revenue_trend_array, revenue_col);
        assert_eq!(s.visits_trend_array.iter().sum::<usize>(), 2);
    }

    #[test]
    fn test_average_rating_rounds_ties_up() {
        for (rating, shown) in [(4.25, "4.3"), (3.75, "3.8"), (0.25, "0.3"), (4.24, "4.2")] {
            let s = calculate_analytics_metrics(&[], &[], &[], None, Period::Week, Some(rating), now());
            assert_eq!(s.average_rating, shown, "rating {rating}");
        }
    }

    #[test]
    fn test_reviews_are_counted() {
        let reviews = vec![
            Review {
                created_at: None,
                rating: 5.0,
            },
            Review {
                created_at: Some(ts(6, 1, 9)),
                rating: 3.0,
            },
        ];
        let s = calculate_analytics_metrics(&[], &[], &reviews, None, Period::Week, Some(4.0), now());
        assert_eq!(s.total_reviews, 2);
        assert_eq!(s.average_rating, "4.0");
    }
}
