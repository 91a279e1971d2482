//! Data types produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::period::Period;
use crate::records::{Booking, Visit};

/// Direction of change between two periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

impl TrendDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Neutral => "neutral",
        }
    }
}

/// Absolute percentage change plus its direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub value: f64,
    pub trend: TrendDirection,
}

/// One bucket of the trailing seven-period series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub visits: usize,
    /// Not computed yet, always 0.
    pub bookings: usize,
    pub revenue: f64,
}

/// Visit count for one calendar day of the current period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub value: usize,
}

/// Everything the club dashboard renders for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub period: Period,
    pub generated_at: DateTime<Utc>,
    pub period_start: DateTime<Utc>,
    pub previous_period_start: DateTime<Utc>,

    pub total_visits: usize,
    pub total_bookings: usize,
    pub total_reviews: usize,
    pub unique_visitors: usize,
    pub average_rating: String,
    pub estimated_revenue: f64,

    pub current_visits: Vec<Visit>,
    pub previous_visits: Vec<Visit>,
    pub current_bookings: Vec<Booking>,
    pub previous_bookings: Vec<Booking>,
    pub current_period_revenue: f64,
    pub previous_period_revenue: f64,

    pub visits_trend: Trend,
    pub bookings_trend: Trend,
    pub revenue_trend: Trend,

    /// `(weekday name, visits)` for the busiest weekday of the current period.
    pub top_day: Option<(String, usize)>,

    pub trend_data: Vec<TrendPoint>,
    pub daily_visit_data: Vec<DailyPoint>,
    pub visits_trend_array: Vec<usize>,
    pub revenue_trend_array: Vec<f64>,
}
