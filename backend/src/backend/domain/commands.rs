//! Domain-level command and query types.
//!
//! These structs are used by services inside the domain layer and are not
//! exposed over the public API. The REST layer maps the public DTOs defined
//! in the `shared` crate to these internal types.

pub mod flocks {
    use crate::backend::domain::models::flock::{Flock, FlockType};

    /// Input for creating a new flock. Dates and counts arrive as submitted
    /// and are validated by the service.
    #[derive(Debug, Clone)]
    pub struct CreateFlockCommand {
        pub name: String,
        pub breed: String,
        pub flock_type: FlockType,
        pub start_date: String,
        pub initial_population: i64,
    }

    /// Input for updating a flock's descriptive fields.
    #[derive(Debug, Clone)]
    pub struct UpdateFlockCommand {
        pub flock_id: String,
        pub name: Option<String>,
        pub breed: Option<String>,
    }

    /// Query for listing flocks, optionally by type.
    #[derive(Debug, Clone, Default)]
    pub struct FlockListQuery {
        pub flock_type: Option<FlockType>,
    }

    #[derive(Debug, Clone)]
    pub struct CreateFlockResult {
        pub flock: Flock,
    }

    #[derive(Debug, Clone)]
    pub struct UpdateFlockResult {
        pub flock: Flock,
    }

    #[derive(Debug, Clone)]
    pub struct FlockListResult {
        pub flocks: Vec<Flock>,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteFlockResult {
        pub success_message: String,
    }
}

pub mod records {
    use crate::backend::domain::calculator::RecordDefaults;
    use crate::backend::domain::models::record::DailyRecord;

    /// How medications or vaccinations were entered on the form.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub enum ItemInput {
        /// Structured mode: identifiers selected from the fixed catalog.
        Selected(Vec<String>),
        /// Legacy mode: comma-separated free text.
        FreeText(String),
        /// Field left untouched.
        #[default]
        Empty,
    }

    /// The editable fields of the daily record form, as submitted.
    #[derive(Debug, Clone)]
    pub struct RecordForm {
        pub date: String,
        pub feed_grams: f64,
        pub dead_count: f64,
        pub medications: ItemInput,
        pub vaccinations: ItemInput,
    }

    /// Input for creating a daily record.
    #[derive(Debug, Clone)]
    pub struct CreateRecordCommand {
        pub flock_id: String,
        pub form: RecordForm,
        pub created_by: String,
    }

    /// Input for editing a daily record in place. The date is fixed; the
    /// editable fields are replaced wholesale.
    #[derive(Debug, Clone)]
    pub struct UpdateRecordCommand {
        pub flock_id: String,
        pub record_id: String,
        pub feed_grams: f64,
        pub dead_count: f64,
        pub medications: ItemInput,
        pub vaccinations: ItemInput,
    }

    /// Input for deleting records by id.
    #[derive(Debug, Clone)]
    pub struct DeleteRecordsCommand {
        pub flock_id: String,
        pub record_ids: Vec<String>,
    }

    #[derive(Debug, Clone)]
    pub struct CreateRecordResult {
        pub record: DailyRecord,
    }

    #[derive(Debug, Clone)]
    pub struct UpdateRecordResult {
        pub record: DailyRecord,
        /// Downstream records whose populations were re-derived.
        pub reconciled_count: usize,
    }

    #[derive(Debug, Clone)]
    pub struct RecordListResult {
        pub records: Vec<DailyRecord>,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteRecordsResult {
        pub deleted_count: usize,
        pub not_found_ids: Vec<String>,
        pub success_message: String,
    }

    /// Pre-filled values for the entry form.
    #[derive(Debug, Clone)]
    pub struct RecordDefaultsResult {
        pub defaults: RecordDefaults,
        pub dead_count_options: Vec<u32>,
    }
}

pub mod laying {
    use crate::backend::domain::models::laying::LayingRecord;

    /// Input for logging one day of egg production.
    #[derive(Debug, Clone)]
    pub struct CreateLayingRecordCommand {
        pub flock_id: String,
        pub date: String,
        pub dead_count: f64,
        pub culled_count: f64,
        pub feed_sacks: f64,
        pub egg_trays: f64,
        pub extra_eggs: f64,
        pub created_by: String,
    }

    #[derive(Debug, Clone)]
    pub struct CreateLayingRecordResult {
        pub record: LayingRecord,
    }

    #[derive(Debug, Clone)]
    pub struct LayingRecordListResult {
        pub records: Vec<LayingRecord>,
    }
}

pub mod sessions {
    use crate::backend::domain::models::session::Session;

    /// Input for a sign-in attempt.
    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub username: String,
        pub password: String,
    }

    /// Outcome of a sign-in attempt. `session` is present only on success;
    /// a failed attempt is a normal outcome, not an error.
    #[derive(Debug, Clone)]
    pub struct LoginResult {
        pub session: Option<Session>,
        pub message: String,
    }
}
