//! Domain model for a layer flock's daily egg-production record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One day of egg production. Population attrition includes culled birds in
/// addition to deaths; feed is entered in sacks and stored alongside the
/// derived gram equivalent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayingRecord {
    pub id: String,
    pub flock_id: String,
    pub date: NaiveDate,
    pub previous_population: u32,
    pub dead_count: u32,
    pub culled_count: u32,
    pub current_population: u32,
    pub feed_sacks: f64,
    pub feed_grams: f64,
    pub egg_trays: u32,
    pub extra_eggs: u32,
    pub eggs_collected: u32,
    /// Hen-day production: eggs collected per bird, as a percentage.
    pub production_rate: f64,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl LayingRecord {
    /// Generate a unique laying record ID.
    /// Format: laying::<uuid>
    pub fn generate_id() -> String {
        format!("laying::{}", Uuid::new_v4())
    }
}
