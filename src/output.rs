//! Output formatting and persistence for metrics summaries.
//!
//! Supports pretty-printing, JSON output, and CSV append of a flat headline
//! row.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::analytics::{MetricsSummary, Period};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Headline numbers of a [`MetricsSummary`], one CSV row per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub generated_at: DateTime<Utc>,
    pub club_id: Option<String>,
    pub period: Period,
    pub total_visits: usize,
    pub total_bookings: usize,
    pub total_reviews: usize,
    pub unique_visitors: usize,
    pub average_rating: String,
    pub estimated_revenue: f64,
    pub current_visits: usize,
    pub previous_visits: usize,
    pub current_bookings: usize,
    pub previous_bookings: usize,
    pub current_period_revenue: f64,
    pub previous_period_revenue: f64,
    pub visits_trend_pct: f64,
    pub visits_trend: &'static str,
    pub bookings_trend_pct: f64,
    pub bookings_trend: &'static str,
    pub revenue_trend_pct: f64,
    pub revenue_trend: &'static str,
    pub top_day: Option<String>,
    pub top_day_visits: Option<usize>,
}

impl SummaryRow {
    pub fn from_summary(summary: &MetricsSummary) -> Self {
        SummaryRow {
            generated_at: summary.generated_at,
            club_id: None,
            period: summary.period,
            total_visits: summary.total_visits,
            total_bookings: summary.total_bookings,
            total_reviews: summary.total_reviews,
            unique_visitors: summary.unique_visitors,
            average_rating: summary.average_rating.clone(),
            estimated_revenue: summary.estimated_revenue,
            current_visits: summary.current_visits.len(),
            previous_visits: summary.previous_visits.len(),
            current_bookings: summary.current_bookings.len(),
            previous_bookings: summary.previous_bookings.len(),
            current_period_revenue: summary.current_period_revenue,
            previous_period_revenue: summary.previous_period_revenue,
            visits_trend_pct: summary.visits_trend.value,
            visits_trend: summary.visits_trend.trend.as_str(),
            bookings_trend_pct: summary.bookings_trend.value,
            bookings_trend: summary.bookings_trend.trend.as_str(),
            revenue_trend_pct: summary.revenue_trend.value,
            revenue_trend: summary.revenue_trend.trend.as_str(),
            top_day: summary.top_day.as_ref().map(|(day, _)| day.clone()),
            top_day_visits: summary.top_day.as_ref().map(|(_, n)| *n),
        }
    }

    /// Set club metadata
    pub fn with_club_id(mut self, club_id: &str) -> Self {
        self.club_id = Some(club_id.to_string());
        self
    }
}

/// Logs a summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &MetricsSummary) {
    info!("{:#?}", summary);
}

/// Writes any serializable value as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Appends a [`SummaryRow`] to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, row: &SummaryRow) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}
