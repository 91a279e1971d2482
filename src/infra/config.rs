use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Per-club context supplied alongside the raw rows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClubProfile {
    pub price_per_visit: Option<f64>,
    /// Club-level average rating (0–5) maintained by the backend.
    pub avg_rating: Option<f64>,
}

/// Maps club IDs to their [`ClubProfile`].
///
/// Stored as a plain JSON object on disk:
/// ```json
/// {
///   "club-123": { "price_per_visit": 25.0, "avg_rating": 4.4 },
///   "club-456": { "price_per_visit": 18.0 }
/// }
/// ```
pub struct ClubDirectory {
    entries: HashMap<String, ClubProfile>,
}

impl ClubDirectory {
    /// Loads the directory from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading club directory {path}"))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let entries: HashMap<String, ClubProfile> =
            serde_json::from_str(content).context("parsing club directory")?;
        Ok(Self { entries })
    }

    /// Returns the profile for `club_id`, if one is configured.
    pub fn get(&self, club_id: &str) -> Option<&ClubProfile> {
        self.entries.get(club_id)
    }
}
