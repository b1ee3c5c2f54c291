//! Daily record service.
//!
//! Validates submissions against the record form schema, derives the
//! calculated fields (day/week age, current population), normalizes
//! medication and vaccination input, and keeps the stored population chain
//! consistent across backdated inserts, edits and deletes.

use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::backend::domain::calculator;
use crate::backend::domain::catalog::{normalize_free_text, Catalog, Catalogs};
use crate::backend::domain::commands::records::{
    CreateRecordCommand, CreateRecordResult, DeleteRecordsCommand, DeleteRecordsResult,
    ItemInput, RecordDefaultsResult, RecordForm, RecordListResult, UpdateRecordCommand,
    UpdateRecordResult,
};
use crate::backend::domain::errors::{DomainError, DomainResult};
use crate::backend::domain::flock_service::FlockService;
use crate::backend::domain::models::flock::Flock;
use crate::backend::domain::models::record::{DailyRecord, NamedItem};
use crate::backend::domain::population_service::{self, PopulationService};
use crate::backend::domain::schema::{self, ValidationFailures, RECORD_FORM_SCHEMA};
use crate::backend::storage::csv::{CsvConnection, RecordRepository};
use crate::backend::storage::traits::RecordStore;

/// Everything `build_record` needs to know about the flock and the
/// submission's surroundings. Assembling a record is a pure computation over
/// this context; persistence happens afterwards in the service.
pub struct RecordContext<'a> {
    pub flock: &'a Flock,
    /// Ending population of the most recent prior record, or the flock's
    /// initial population if none exists.
    pub previous_population: u32,
    /// Dates already taken by other records of this flock.
    pub taken_dates: &'a [NaiveDate],
    /// The record being replaced, when editing.
    pub existing: Option<&'a DailyRecord>,
    pub catalogs: &'a Catalogs,
    pub created_by: &'a str,
    pub now: DateTime<Utc>,
}

fn resolve_items(input: &ItemInput, catalog: &Catalog) -> Vec<NamedItem> {
    match input {
        ItemInput::Selected(identifiers) => catalog.resolve(identifiers),
        ItemInput::FreeText(text) => normalize_free_text(text),
        ItemInput::Empty => Vec::new(),
    }
}

/// Validate a submitted form and assemble the full record.
///
/// Walks the form schema and collects every violation before reporting; a
/// rejected submission names all failing fields. On success the returned
/// record carries a fresh id (or the edited record's id), the derived ages
/// and the recomputed current population.
pub fn build_record(
    form: &RecordForm,
    ctx: &RecordContext<'_>,
) -> Result<DailyRecord, ValidationFailures> {
    let mut failures = ValidationFailures::new();

    let date_spec = schema::field(RECORD_FORM_SCHEMA, "date");
    let trimmed_date = form.date.trim();
    let date = if trimmed_date.is_empty() {
        failures.push(
            date_spec.name,
            "required",
            "Date must not be empty".to_string(),
        );
        None
    } else {
        match NaiveDate::parse_from_str(trimmed_date, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                failures.push(
                    date_spec.name,
                    "invalid_date",
                    "Date must be an ISO date (YYYY-MM-DD)".to_string(),
                );
                None
            }
        }
    };

    let feed_grams = failures.check_min(
        schema::field(RECORD_FORM_SCHEMA, "feed_grams"),
        form.feed_grams,
    );
    let dead_count = failures.check_integer(
        schema::field(RECORD_FORM_SCHEMA, "dead_count"),
        form.dead_count,
    );

    let mut ages = None;
    if let Some(date) = date {
        if ctx.taken_dates.contains(&date) {
            failures.push(
                date_spec.name,
                "duplicate_date",
                format!("A record for {date} already exists"),
            );
        }
        match calculator::day_age(ctx.flock.start_date, date) {
            Ok(day_age) => ages = Some((day_age, calculator::week_age(day_age))),
            Err(err) => {
                failures.push(date_spec.name, "unsupported_date_range", err.to_string())
            }
        }
    }

    let mut current_population = None;
    if let Some(dead_count) = dead_count {
        match calculator::apply_mortality(ctx.previous_population, dead_count) {
            Ok(current) => current_population = Some(current),
            Err(err) => failures.push("dead_count", "invalid_mortality", err.to_string()),
        }
    }

    let medications = resolve_items(&form.medications, &ctx.catalogs.medications);
    let vaccinations = resolve_items(&form.vaccinations, &ctx.catalogs.vaccinations);

    match (date, feed_grams, dead_count, ages, current_population) {
        (
            Some(date),
            Some(feed_grams),
            Some(dead_count),
            Some((day_age, week_age)),
            Some(current_population),
        ) if failures.is_empty() => Ok(DailyRecord {
            id: ctx
                .existing
                .map(|r| r.id.clone())
                .unwrap_or_else(DailyRecord::generate_id),
            flock_id: ctx.flock.id.clone(),
            date,
            day_age,
            week_age,
            previous_population: ctx.previous_population,
            feed_grams,
            dead_count,
            current_population,
            medications,
            vaccinations,
            created_at: ctx.existing.map(|r| r.created_at).unwrap_or(ctx.now),
            created_by: ctx
                .existing
                .map(|r| r.created_by.clone())
                .unwrap_or_else(|| ctx.created_by.to_string()),
        }),
        _ => Err(failures),
    }
}

/// Ending population of the latest record before `date` (all records when
/// `date` is unknown), falling back to the flock's initial population.
fn previous_population_at(
    records: &[DailyRecord],
    date: Option<NaiveDate>,
    initial_population: u32,
) -> u32 {
    let prior = match date {
        Some(date) => records.iter().filter(|r| r.date < date).next_back(),
        None => records.last(),
    };
    prior
        .map(|r| r.current_population)
        .unwrap_or(initial_population)
}

/// Service for creating, editing and deleting daily records.
#[derive(Clone)]
pub struct RecordService {
    record_repository: RecordRepository,
    population_service: PopulationService<RecordRepository>,
    flock_service: FlockService,
    catalogs: Arc<Catalogs>,
}

impl RecordService {
    pub fn new(
        connection: CsvConnection,
        flock_service: FlockService,
        catalogs: Arc<Catalogs>,
    ) -> Self {
        let record_repository = RecordRepository::new(connection.clone());
        let population_service = PopulationService::new(RecordRepository::new(connection));
        Self {
            record_repository,
            population_service,
            flock_service,
            catalogs,
        }
    }

    /// Pre-filled values for the entry form: the suggested next date, the
    /// derived ages for it, the carried-over population and the selectable
    /// dead counts.
    pub fn record_defaults(&self, flock_id: &str) -> DomainResult<RecordDefaultsResult> {
        let flock = self.flock_service.get_flock(flock_id)?;
        let records = self.record_repository.list_records(&flock.slug)?;

        let previous_population = records
            .last()
            .map(|r| r.current_population)
            .unwrap_or(flock.initial_population);
        let today = Utc::now().date_naive();
        let date = calculator::next_record_date(records.last().map(|r| r.date), today);
        let defaults = calculator::derive_defaults(flock.start_date, date, previous_population)?;

        Ok(RecordDefaultsResult {
            defaults,
            dead_count_options: calculator::dead_count_options(previous_population),
        })
    }

    /// List a flock's records, day-age ascending.
    pub fn list_records(&self, flock_id: &str) -> DomainResult<RecordListResult> {
        let flock = self.flock_service.get_flock(flock_id)?;
        let records = self.record_repository.list_records(&flock.slug)?;
        Ok(RecordListResult { records })
    }

    pub fn get_record(&self, flock_id: &str, record_id: &str) -> DomainResult<DailyRecord> {
        let flock = self.flock_service.get_flock(flock_id)?;
        self.record_repository
            .get_record(&flock.slug, record_id)?
            .ok_or_else(|| DomainError::NotFound(format!("record {record_id}")))
    }

    /// Create a record from a submitted form. A backdated date reconciles
    /// every record after it; if the new chain would drive any of them
    /// negative the whole submission is rejected and nothing is persisted.
    pub fn create_record(&self, command: CreateRecordCommand) -> DomainResult<CreateRecordResult> {
        let flock = self.flock_service.get_flock(&command.flock_id)?;
        let records = self.record_repository.list_records(&flock.slug)?;

        let parsed_date = NaiveDate::parse_from_str(command.form.date.trim(), "%Y-%m-%d").ok();
        let previous_population =
            previous_population_at(&records, parsed_date, flock.initial_population);
        let taken_dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();

        let context = RecordContext {
            flock: &flock,
            previous_population,
            taken_dates: &taken_dates,
            existing: None,
            catalogs: &self.catalogs,
            created_by: &command.created_by,
            now: Utc::now(),
        };
        let record = build_record(&command.form, &context)?;
        let record_id = record.id.clone();

        let mut chain = records;
        chain.push(record);
        population_service::recompute_chain(flock.initial_population, &mut chain)?;
        self.record_repository.replace_records(&flock.slug, &chain)?;

        let record = chain
            .into_iter()
            .find(|r| r.id == record_id)
            .ok_or_else(|| DomainError::Storage(anyhow!("record lost during reconciliation")))?;
        info!(
            "Created record {} for flock {} (day {})",
            record.id, flock.id, record.day_age
        );
        Ok(CreateRecordResult { record })
    }

    /// Replace a record's editable fields in place, recomputing the current
    /// population and re-deriving everything downstream. The record keeps
    /// its id, date and creation metadata.
    pub fn update_record(&self, command: UpdateRecordCommand) -> DomainResult<UpdateRecordResult> {
        let flock = self.flock_service.get_flock(&command.flock_id)?;
        let records = self.record_repository.list_records(&flock.slug)?;

        let existing = records
            .iter()
            .find(|r| r.id == command.record_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("record {}", command.record_id)))?;

        let others: Vec<DailyRecord> = records
            .into_iter()
            .filter(|r| r.id != existing.id)
            .collect();
        let previous_population =
            previous_population_at(&others, Some(existing.date), flock.initial_population);
        let taken_dates: Vec<NaiveDate> = others.iter().map(|r| r.date).collect();

        let form = RecordForm {
            date: existing.date.format("%Y-%m-%d").to_string(),
            feed_grams: command.feed_grams,
            dead_count: command.dead_count,
            medications: command.medications,
            vaccinations: command.vaccinations,
        };
        let context = RecordContext {
            flock: &flock,
            previous_population,
            taken_dates: &taken_dates,
            existing: Some(&existing),
            catalogs: &self.catalogs,
            created_by: &existing.created_by,
            now: Utc::now(),
        };
        let updated = build_record(&form, &context)?;

        let mut chain = others;
        chain.push(updated);
        let reconciled_count =
            population_service::recompute_chain(flock.initial_population, &mut chain)?;
        self.record_repository.replace_records(&flock.slug, &chain)?;

        let record = chain
            .into_iter()
            .find(|r| r.id == command.record_id)
            .ok_or_else(|| DomainError::Storage(anyhow!("record lost during reconciliation")))?;
        info!(
            "Updated record {} for flock {} ({} downstream change(s))",
            record.id, flock.id, reconciled_count
        );
        Ok(UpdateRecordResult {
            record,
            reconciled_count,
        })
    }

    /// Delete records by id and close the population chain over the gap.
    /// Unknown ids are reported back, not treated as errors.
    pub fn delete_records(&self, command: DeleteRecordsCommand) -> DomainResult<DeleteRecordsResult> {
        let flock = self.flock_service.get_flock(&command.flock_id)?;
        let records = self.record_repository.list_records(&flock.slug)?;

        let not_found_ids: Vec<String> = command
            .record_ids
            .iter()
            .filter(|id| !records.iter().any(|r| &r.id == *id))
            .cloned()
            .collect();

        let records_before = records.len();
        let mut chain: Vec<DailyRecord> = records
            .into_iter()
            .filter(|r| !command.record_ids.contains(&r.id))
            .collect();
        let deleted_count = records_before - chain.len();

        if deleted_count > 0 {
            population_service::recompute_chain(flock.initial_population, &mut chain)?;
            self.record_repository.replace_records(&flock.slug, &chain)?;
        }

        let success_message = match deleted_count {
            0 => "No records were deleted".to_string(),
            1 => "1 record deleted successfully".to_string(),
            n => format!("{n} records deleted successfully"),
        };
        info!(
            "Deleted {} record(s) for flock {}",
            deleted_count, flock.id
        );

        Ok(DeleteRecordsResult {
            deleted_count,
            not_found_ids,
            success_message,
        })
    }

    /// Diagnostic: report every population-chain violation for a flock.
    pub fn validate_chain(&self, flock_id: &str) -> DomainResult<Vec<String>> {
        let flock = self.flock_service.get_flock(flock_id)?;
        Ok(self.population_service.validate_chain(&flock)?)
    }
}
