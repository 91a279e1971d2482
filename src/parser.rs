//! CSV loaders for exported club rows.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::records::{Booking, Review, Visit};

/// Reads `created_at,user_id` rows.
pub fn load_visits(path: impl AsRef<Path>) -> Result<Vec<Visit>> {
    load_csv(path.as_ref())
}

/// Reads `created_at` rows. Extra columns are ignored.
pub fn load_bookings(path: impl AsRef<Path>) -> Result<Vec<Booking>> {
    load_csv(path.as_ref())
}

/// Reads `rating[,created_at]` rows.
pub fn load_reviews(path: impl AsRef<Path>) -> Result<Vec<Review>> {
    load_csv(path.as_ref())
}

/// Deserializes every row of a headed CSV from any reader.
///
/// # Errors
///
/// Returns an error if a row is structurally invalid (missing required
/// column, non-numeric rating). Unparsable timestamps are not errors.
pub fn parse_rows<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: T = result?;
        rows.push(record);
    }

    Ok(rows)
}

fn load_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let rows = parse_rows(file).with_context(|| format!("reading {}", path.display()))?;
    debug!(path = %path.display(), rows = rows.len(), "Loaded CSV rows");
    Ok(rows)
}
