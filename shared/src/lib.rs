use serde::{Deserialize, Serialize};

/// A medication or vaccination as it appears on a record: a display name plus
/// a normalized, identifier-safe slug derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedItem {
    pub name: String,
    pub slug: String,
}

/// Whether a flock is raised for growth or for egg production
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlockType {
    Grower,
    Layer,
}

/// A managed cohort of birds tracked as one time series of daily records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flock {
    pub id: String,
    pub name: String,
    /// Normalized identifier derived from the name (lowercase, hyphenated)
    pub slug: String,
    pub breed: String,
    pub flock_type: FlockType,
    /// ISO 8601 date (YYYY-MM-DD) marking day-age 1
    pub start_date: String,
    pub initial_population: u32,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// RFC 3339 timestamp
    pub updated_at: String,
}

/// Request for creating a new flock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFlockRequest {
    pub name: String,
    pub breed: String,
    pub flock_type: FlockType,
    /// ISO 8601 date (YYYY-MM-DD)
    pub start_date: String,
    pub initial_population: i64,
}

/// Request for updating an existing flock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateFlockRequest {
    pub name: Option<String>,
    pub breed: Option<String>,
}

/// Response after creating or updating a flock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlockResponse {
    pub flock: Flock,
    pub success_message: String,
}

/// Response containing a list of flocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlockListResponse {
    pub flocks: Vec<Flock>,
}

/// One entry in a flock's daily time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub id: String,
    pub flock_id: String,
    /// ISO 8601 date (YYYY-MM-DD), the day this record covers
    pub date: String,
    /// Days since the flock's start date, inclusive of the start day (>= 1)
    pub day_age: u32,
    /// ceil(day_age / 7)
    pub week_age: u32,
    pub previous_population: u32,
    pub feed_grams: f64,
    pub dead_count: u32,
    pub current_population: u32,
    pub medications: Vec<NamedItem>,
    pub vaccinations: Vec<NamedItem>,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// Identifier of the authenticated principal, empty if not authenticated
    pub created_by: String,
}

/// Pre-filled values for the new-record entry form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDefaultsResponse {
    /// Suggested date for the next record (latest logged date + 1 day)
    pub date: String,
    pub day_age: u32,
    pub week_age: u32,
    pub previous_population: u32,
    /// Selectable dead counts: 0 up to 1% of the previous population
    pub dead_count_options: Vec<u32>,
}

/// Request for creating a daily record.
///
/// Medications and vaccinations accept two input modes: `*_ids` selects
/// entries from the fixed catalogs; `*_text` is the legacy comma-separated
/// free-text mode. When both are present the catalog selection wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecordRequest {
    /// ISO 8601 date (YYYY-MM-DD)
    pub date: String,
    pub feed_grams: f64,
    pub dead_count: f64,
    pub medication_ids: Option<Vec<String>>,
    pub medications_text: Option<String>,
    pub vaccination_ids: Option<Vec<String>>,
    pub vaccinations_text: Option<String>,
}

/// Request for editing a daily record. The date is fixed at creation; an edit
/// replaces the editable fields and recomputes the current population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecordRequest {
    pub feed_grams: f64,
    pub dead_count: f64,
    pub medication_ids: Option<Vec<String>>,
    pub medications_text: Option<String>,
    pub vaccination_ids: Option<Vec<String>>,
    pub vaccinations_text: Option<String>,
}

/// Response after creating or updating a daily record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse {
    pub record: DailyRecord,
    pub success_message: String,
}

/// Response containing a flock's records ordered by day-age ascending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordListResponse {
    pub records: Vec<DailyRecord>,
}

/// Request for deleting records by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecordsRequest {
    pub record_ids: Vec<String>,
}

/// Response after deleting records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecordsResponse {
    pub deleted_count: usize,
    pub success_message: String,
    pub not_found_ids: Vec<String>,
}

/// A single failed check on a submitted form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Body returned with HTTP 400 when a submission fails validation.
/// Every failing field is listed, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldViolation>,
}

/// Kind of a record form field, for schema-driven rendering and validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Date,
    Integer,
    Decimal,
    MultiSelect,
    Text,
}

/// One field of the record entry form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    /// Derived fields are shown but never accepted from the client
    pub read_only: bool,
    pub min: Option<f64>,
}

/// The ordered field list consumed identically by validation and rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFormSchemaResponse {
    pub fields: Vec<FieldSpec>,
}

/// One selectable option in a medications or vaccinations catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub identifier: String,
    pub display_name: String,
}

/// The fixed catalogs the structured input mode selects from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub medications: Vec<CatalogEntry>,
    pub vaccinations: Vec<CatalogEntry>,
}

/// One day of egg production for a layer flock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayingRecord {
    pub id: String,
    pub flock_id: String,
    /// ISO 8601 date (YYYY-MM-DD)
    pub date: String,
    pub previous_population: u32,
    pub dead_count: u32,
    pub culled_count: u32,
    pub current_population: u32,
    pub feed_sacks: f64,
    pub feed_grams: f64,
    pub egg_trays: u32,
    pub extra_eggs: u32,
    pub eggs_collected: u32,
    /// Hen-day production: eggs collected per bird, as a percentage
    pub production_rate: f64,
    /// RFC 3339 timestamp
    pub created_at: String,
    pub created_by: String,
}

/// Request for logging a day of egg production
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLayingRecordRequest {
    /// ISO 8601 date (YYYY-MM-DD)
    pub date: String,
    pub dead_count: f64,
    pub culled_count: f64,
    pub feed_sacks: f64,
    pub egg_trays: f64,
    pub extra_eggs: f64,
}

/// Response after logging egg production
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayingRecordResponse {
    pub record: LayingRecord,
    pub success_message: String,
}

/// Response containing a layer flock's production records, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayingRecordListResponse {
    pub records: Vec<LayingRecord>,
}

/// Request for signing in with configured credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response after a sign-in attempt. `token` is present only on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: Option<String>,
    /// RFC 3339 expiry of the issued session, if any
    pub expires_at: Option<String>,
    pub display_name: Option<String>,
    pub message: String,
}

/// Response describing the session behind a presented token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub principal: Option<String>,
}

impl FlockType {
    /// Stable lowercase token used in storage and query strings
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

impl ValidationErrorResponse {
    pub fn field_names(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flock_type_round_trip() {
        for ft in [FlockType::Grower, FlockType::Layer] {
            assert_eq!(FlockType::parse(ft.as_str()), Some(ft));
        }
        assert_eq!(FlockType::parse("broiler"), None);
    }

    #[test]
    fn test_named_item_serde() {
        let item = NamedItem {
            name: "MoreMeta Multivitamins".to_string(),
            slug: "moremeta-multivitamins".to_string(),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"name":"MoreMeta Multivitamins","slug":"moremeta-multivitamins"}"#
        );
        let back: NamedItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_validation_error_field_names() {
        let response = ValidationErrorResponse {
            errors: vec![
                FieldViolation {
                    field: "date".to_string(),
                    code: "required".to_string(),
                    message: "date must not be empty".to_string(),
                },
                FieldViolation {
                    field: "dead_count".to_string(),
                    code: "invalid_mortality".to_string(),
                    message: "dead count exceeds previous population".to_string(),
                },
            ],
        };
        assert_eq!(response.field_names(), vec!["date", "dead_count"]);
    }
}
