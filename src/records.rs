//! Raw rows consumed by the analytics pipeline.
//!
//! Rows mirror what the hosted store returns for a single club. Timestamps
//! that cannot be parsed are kept as `None` so the row still counts towards
//! totals but never lands in a time window.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// A physical check-in at the club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    pub user_id: String,
}

/// A class reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A member review. Only the number of reviews feeds the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    pub rating: f64,
}

/// Club-specific pricing context used for revenue estimates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueData {
    pub visits: Vec<Visit>,
    pub price_per_visit: f64,
}

impl Visit {
    pub fn new(created_at: DateTime<Utc>, user_id: &str) -> Self {
        Self {
            created_at: Some(created_at),
            user_id: user_id.to_string(),
        }
    }
}

impl Booking {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at: Some(created_at),
        }
    }
}

/// Parses the timestamp shapes the backend emits.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]` (taken as UTC) and a bare
/// `YYYY-MM-DD` (midnight UTC). Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let parsed = raw.as_deref().and_then(parse_timestamp);
    if parsed.is_none() {
        debug!(raw = ?raw, "Unparsable created_at, row excluded from time windows");
    }
    Ok(parsed)
}
