//! Egg-production records for layer flocks.
//!
//! Laying records are append-only: each day's entry carries the previous
//! day's ending population forward, subtracts deaths and culls, and derives
//! feed grams, eggs collected and the hen-day production rate.

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::backend::domain::calculator;
use crate::backend::domain::commands::laying::{
    CreateLayingRecordCommand, CreateLayingRecordResult, LayingRecordListResult,
};
use crate::backend::domain::errors::DomainResult;
use crate::backend::domain::flock_service::FlockService;
use crate::backend::domain::models::flock::FlockType;
use crate::backend::domain::models::laying::LayingRecord;
use crate::backend::domain::schema::{self, ValidationFailures, LAYING_FORM_SCHEMA};
use crate::backend::storage::csv::{CsvConnection, LayingRepository};
use crate::backend::storage::traits::LayingStore;

/// Service for logging and listing egg production.
#[derive(Clone)]
pub struct LayingService {
    laying_repository: LayingRepository,
    flock_service: FlockService,
}

impl LayingService {
    pub fn new(connection: CsvConnection, flock_service: FlockService) -> Self {
        let laying_repository = LayingRepository::new(connection);
        Self {
            laying_repository,
            flock_service,
        }
    }

    /// List a layer flock's production records, oldest first.
    pub fn list_records(&self, flock_id: &str) -> DomainResult<LayingRecordListResult> {
        let flock = self.flock_service.get_flock(flock_id)?;
        let records = self.laying_repository.list_laying_records(&flock.slug)?;
        Ok(LayingRecordListResult { records })
    }

    /// Log one day of egg production. The entry must be for a layer flock
    /// and dated after the latest logged day.
    pub fn create_record(
        &self,
        command: CreateLayingRecordCommand,
    ) -> DomainResult<CreateLayingRecordResult> {
        let flock = self.flock_service.get_flock(&command.flock_id)?;
        let records = self.laying_repository.list_laying_records(&flock.slug)?;

        let latest = records.last();
        let previous_population = latest
            .map(|r| r.current_population)
            .unwrap_or(flock.initial_population);

        let mut failures = ValidationFailures::new();

        if flock.flock_type != FlockType::Layer {
            failures.push(
                "flock",
                "not_a_layer_flock",
                format!("Flock '{}' is not a layer flock", flock.name),
            );
        }

        let date_spec = schema::field(LAYING_FORM_SCHEMA, "date");
        let trimmed_date = command.date.trim();
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

        if let Some(date) = date {
            if date < flock.start_date {
                failures.push(
                    date_spec.name,
                    "unsupported_date_range",
                    format!("date {} precedes flock start date {}", date, flock.start_date),
                );
            }
            if let Some(latest) = latest {
                if date <= latest.date {
                    failures.push(
                        date_spec.name,
                        "not_after_latest",
                        format!("A production day on or after {} is already logged", date),
                    );
                }
            }
        }

        let dead_count =
            failures.check_integer(schema::field(LAYING_FORM_SCHEMA, "dead_count"), command.dead_count);
        let culled_count = failures.check_integer(
            schema::field(LAYING_FORM_SCHEMA, "culled_count"),
            command.culled_count,
        );
        let feed_sacks =
            failures.check_min(schema::field(LAYING_FORM_SCHEMA, "feed_sacks"), command.feed_sacks);
        let egg_trays =
            failures.check_integer(schema::field(LAYING_FORM_SCHEMA, "egg_trays"), command.egg_trays);
        let extra_eggs =
            failures.check_integer(schema::field(LAYING_FORM_SCHEMA, "extra_eggs"), command.extra_eggs);

        let mut current_population = None;
        if let (Some(dead), Some(culled)) = (dead_count, culled_count) {
            match calculator::apply_attrition(previous_population, dead, culled) {
                Ok(current) => current_population = Some(current),
                Err(err) => failures.push("dead_count", "invalid_mortality", err.to_string()),
            }
        }

        let record = match (
            date,
            dead_count,
            culled_count,
            feed_sacks,
            egg_trays,
            extra_eggs,
            current_population,
        ) {
            (
                Some(date),
                Some(dead_count),
                Some(culled_count),
                Some(feed_sacks),
                Some(egg_trays),
                Some(extra_eggs),
                Some(current_population),
            ) if failures.is_empty() => {
                let eggs_collected = calculator::eggs_collected(egg_trays, extra_eggs);
                LayingRecord {
                    id: LayingRecord::generate_id(),
                    flock_id: flock.id.clone(),
                    date,
                    previous_population,
                    dead_count,
                    culled_count,
                    current_population,
                    feed_sacks,
                    feed_grams: calculator::feed_grams_from_sacks(feed_sacks),
                    egg_trays,
                    extra_eggs,
                    eggs_collected,
                    production_rate: calculator::production_rate(
                        eggs_collected,
                        current_population,
                    ),
                    created_at: Utc::now(),
                    created_by: command.created_by,
                }
            }
            _ => return Err(failures.into()),
        };

        self.laying_repository
            .store_laying_record(&flock.slug, &record)?;
        info!(
            "Logged egg production for flock {} on {}: {} eggs from {} birds",
            flock.id, record.date, record.eggs_collected, record.current_population
        );
        Ok(CreateLayingRecordResult { record })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::backend::domain::commands::flocks::CreateFlockCommand;
    use crate::backend::domain::errors::DomainError;
    use crate::backend::domain::models::flock::Flock;
    use crate::backend::storage::csv::test_utils::temp_connection;

    fn setup_test() -> (LayingService, FlockService, TempDir) {
        let (connection, temp_dir) = temp_connection();
        let flock_service = FlockService::new(connection.clone());
        let laying_service = LayingService::new(connection, flock_service.clone());
        (laying_service, flock_service, temp_dir)
    }

    fn create_flock(flock_service: &FlockService, flock_type: FlockType) -> Flock {
        flock_service
            .create_flock(CreateFlockCommand {
                name: "Layer House".to_string(),
                breed: "Lohmann Brown".to_string(),
                flock_type,
                start_date: "2020-01-01".to_string(),
                initial_population: 4200,
            })
            .unwrap()
            .flock
    }

    fn command(flock: &Flock, date: &str) -> CreateLayingRecordCommand {
        CreateLayingRecordCommand {
            flock_id: flock.id.clone(),
            date: date.to_string(),
            dead_count: 120.0,
            culled_count: 15.0,
            feed_sacks: 9.5,
            egg_trays: 100.0,
            extra_eggs: 15.0,
            created_by: "test".to_string(),
        }
    }

    fn violation_codes(err: DomainError) -> Vec<String> {
        match err {
            DomainError::Invalid(failures) => {
                failures.violations.into_iter().map(|v| v.code).collect()
            }
            other => panic!("Expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_create_record_derives_everything() {
        let (service, flock_service, _temp_dir) = setup_test();
        let flock = create_flock(&flock_service, FlockType::Layer);

        let record = service
            .create_record(command(&flock, "2020-11-11"))
            .unwrap()
            .record;

        assert_eq!(record.previous_population, 4200);
        assert_eq!(record.current_population, 4065);
        assert_eq!(record.feed_grams, 95_000.0);
        assert_eq!(record.eggs_collected, 3015);
        let expected_rate = 3015.0 / 4065.0 * 100.0;
        assert!((record.production_rate - expected_rate).abs() < 1e-9);
        assert_eq!(record.created_by, "test");
    }

    #[test]
    fn test_population_carries_between_days() {
        let (service, flock_service, _temp_dir) = setup_test();
        let flock = create_flock(&flock_service, FlockType::Layer);

        let first = service
            .create_record(command(&flock, "2020-11-11"))
            .unwrap()
            .record;
        let second = service
            .create_record(command(&flock, "2020-11-12"))
            .unwrap()
            .record;

        assert_eq!(second.previous_population, first.current_population);
        assert_eq!(second.current_population, 3930);

        let records = service.list_records(&flock.id).unwrap().records;
        assert_eq!(records.len(), 2);
        assert!(records[0].date < records[1].date);
    }

    #[test]
    fn test_rejects_grower_flock() {
        let (service, flock_service, _temp_dir) = setup_test();
        let flock = create_flock(&flock_service, FlockType::Grower);

        let err = service
            .create_record(command(&flock, "2020-11-11"))
            .unwrap_err();
        assert!(violation_codes(err).contains(&"not_a_layer_flock".to_string()));
    }

    #[test]
    fn test_rejects_out_of_order_date() {
        let (service, flock_service, _temp_dir) = setup_test();
        let flock = create_flock(&flock_service, FlockType::Layer);

        service.create_record(command(&flock, "2020-11-12")).unwrap();
        let err = service
            .create_record(command(&flock, "2020-11-12"))
            .unwrap_err();
        assert!(violation_codes(err).contains(&"not_after_latest".to_string()));
    }

    #[test]
    fn test_rejects_attrition_beyond_population() {
        let (service, flock_service, _temp_dir) = setup_test();
        let flock = flock_service
            .create_flock(CreateFlockCommand {
                name: "Small House".to_string(),
                breed: "Lohmann Brown".to_string(),
                flock_type: FlockType::Layer,
                start_date: "2020-01-01".to_string(),
                initial_population: 100,
            })
            .unwrap()
            .flock;

        let mut cmd = command(&flock, "2020-11-11");
        cmd.dead_count = 60.0;
        cmd.culled_count = 50.0;
        let err = service.create_record(cmd).unwrap_err();
        assert!(violation_codes(err).contains(&"invalid_mortality".to_string()));
    }

    #[test]
    fn test_collects_field_violations_together() {
        let (service, flock_service, _temp_dir) = setup_test();
        let flock = create_flock(&flock_service, FlockType::Layer);

        let mut cmd = command(&flock, "");
        cmd.dead_count = -1.0;
        cmd.feed_sacks = -0.5;
        cmd.egg_trays = 2.5;
        let err = service.create_record(cmd).unwrap_err();
        let codes = violation_codes(err);
        assert!(codes.len() >= 4);
        assert!(codes.contains(&"required".to_string()));
        assert!(codes.contains(&"not_integral".to_string()));
        assert!(codes.contains(&"out_of_range".to_string()));
    }
}
