//! Domain model for a daily flock record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A medication or vaccination attached to a record: display name plus the
/// normalized slug derived from it (or the catalog identifier it was
/// selected by).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedItem {
    pub name: String,
    pub slug: String,
}

/// One entry in a flock's daily time series.
///
/// Derived fields (`day_age`, `week_age`, `current_population`) are always
/// recomputed by the record calculator, never accepted from a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub id: String,
    pub flock_id: String,
    pub date: NaiveDate,
    pub day_age: u32,
    pub week_age: u32,
    pub previous_population: u32,
    pub feed_grams: f64,
    pub dead_count: u32,
    pub current_population: u32,
    pub medications: Vec<NamedItem>,
    pub vaccinations: Vec<NamedItem>,
    pub created_at: DateTime<Utc>,
    /// Identifier of the authenticated principal, empty if not authenticated.
    pub created_by: String,
}

impl DailyRecord {
    /// Generate a unique record ID.
    /// Format: record::<uuid>
    pub fn generate_id() -> String {
        format!("record::{}", Uuid::new_v4())
    }
}
