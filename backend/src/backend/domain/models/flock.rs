//! Domain model for a flock (one managed cohort of birds).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a flock is raised for growth or for egg production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlockType {
    Grower,
    Layer,
}

impl FlockType {
    /// Stable lowercase token used in CSV columns and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlockType::Grower => "grower",
            FlockType::Layer => "layer",
        }
    }

    pub fn parse(s: &str) -> Option<FlockType> {
        match s {
            "grower" => Some(FlockType::Grower),
            "layer" => Some(FlockType::Layer),
            _ => None,
        }
    }
}

/// Domain model representing a flock. `start_date` marks day-age 1; the
/// record chain for the flock anchors on `initial_population`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flock {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub breed: String,
    pub flock_type: FlockType,
    pub start_date: NaiveDate,
    pub initial_population: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flock {
    /// Generate a unique flock ID.
    /// Format: flock::<uuid>
    pub fn generate_id() -> String {
        format!("flock::{}", Uuid::new_v4())
    }
}
