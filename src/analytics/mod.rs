//! Club dashboard analytics.
//!
//! Turns already-fetched visit, booking and review rows into a
//! [`MetricsSummary`]: totals, period-over-period trends, the busiest weekday,
//! a trailing seven-period series and a daily histogram of the current period.
//! Everything here is pure; "now" is always passed in.

pub mod aggregate;
pub mod change;
pub mod period;
pub mod series;
pub mod types;

pub use aggregate::calculate_analytics_metrics;
pub use change::calculate_percentage_change;
pub use period::Period;
pub use series::{generate_daily_visit_data, generate_trend_data};
pub use types::{DailyPoint, MetricsSummary, Trend, TrendDirection, TrendPoint};

/// Price used for revenue estimates when the club has no pricing data.
pub const DEFAULT_PRICE_PER_VISIT: f64 = 20.0;
