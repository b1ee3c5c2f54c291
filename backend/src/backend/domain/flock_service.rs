//! Flock management: the batches every record series hangs off.

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::backend::domain::catalog::slugify;
use crate::backend::domain::commands::flocks::{
    CreateFlockCommand, CreateFlockResult, DeleteFlockResult, FlockListQuery, FlockListResult,
    UpdateFlockCommand, UpdateFlockResult,
};
use crate::backend::domain::errors::{DomainError, DomainResult};
use crate::backend::domain::models::flock::Flock;
use crate::backend::domain::schema::ValidationFailures;
use crate::backend::storage::csv::{CsvConnection, FlockRepository};
use crate::backend::storage::traits::FlockStore;

const MAX_NAME_LENGTH: usize = 100;

/// Service for managing flocks.
#[derive(Clone)]
pub struct FlockService {
    flock_repository: FlockRepository,
}

impl FlockService {
    pub fn new(connection: CsvConnection) -> Self {
        let flock_repository = FlockRepository::new(connection);
        Self { flock_repository }
    }

    /// Create a new flock. The slug is derived from the name and fixed for
    /// the flock's lifetime; it doubles as the storage directory name.
    pub fn create_flock(&self, command: CreateFlockCommand) -> DomainResult<CreateFlockResult> {
        info!(
            "Creating flock: name={}, start_date={}",
            command.name, command.start_date
        );

        let mut failures = ValidationFailures::new();

        let name = command.name.trim();
        if name.is_empty() {
            failures.push("name", "required", "Flock name cannot be empty".to_string());
        } else if name.len() > MAX_NAME_LENGTH {
            failures.push(
                "name",
                "too_long",
                format!("Flock name cannot exceed {MAX_NAME_LENGTH} characters"),
            );
        }

        if command.breed.trim().is_empty() {
            failures.push("breed", "required", "Breed cannot be empty".to_string());
        }

        let start_date = match NaiveDate::parse_from_str(command.start_date.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                failures.push(
                    "start_date",
                    "invalid_date",
                    "Start date must be an ISO date (YYYY-MM-DD)".to_string(),
                );
                None
            }
        };

        let initial_population = if command.initial_population < 0 {
            failures.push(
                "initial_population",
                "out_of_range",
                "Initial population cannot be negative".to_string(),
            );
            None
        } else if command.initial_population > u32::MAX as i64 {
            failures.push(
                "initial_population",
                "out_of_range",
                "Initial population is too large".to_string(),
            );
            None
        } else {
            Some(command.initial_population as u32)
        };

        let slug = slugify(name);
        if !name.is_empty() && self.flock_repository.get_flock_by_slug(&slug)?.is_some() {
            failures.push(
                "name",
                "duplicate",
                format!("A flock named '{name}' already exists"),
            );
        }

        failures.into_result()?;
        let (start_date, initial_population) = match (start_date, initial_population) {
            (Some(date), Some(population)) => (date, population),
            // Unreachable: both are Some when no failure was pushed
            _ => return Err(DomainError::Invalid(ValidationFailures::new())),
        };

        let now = Utc::now();
        let flock = Flock {
            id: Flock::generate_id(),
            name: name.to_string(),
            slug,
            breed: command.breed.trim().to_string(),
            flock_type: command.flock_type,
            start_date,
            initial_population,
            created_at: now,
            updated_at: now,
        };

        self.flock_repository.store_flock(&flock)?;
        info!("Created flock: {} with ID: {}", flock.name, flock.id);

        Ok(CreateFlockResult { flock })
    }

    /// Get a flock by ID, failing with NotFound when absent.
    pub fn get_flock(&self, flock_id: &str) -> DomainResult<Flock> {
        self.flock_repository
            .get_flock(flock_id)?
            .ok_or_else(|| DomainError::NotFound(format!("flock {flock_id}")))
    }

    /// Get a flock by its slug.
    pub fn get_flock_by_slug(&self, slug: &str) -> DomainResult<Flock> {
        self.flock_repository
            .get_flock_by_slug(slug)?
            .ok_or_else(|| DomainError::NotFound(format!("flock {slug}")))
    }

    /// List flocks ordered by name, optionally filtered by type.
    pub fn list_flocks(&self, query: FlockListQuery) -> DomainResult<FlockListResult> {
        let mut flocks = self.flock_repository.list_flocks()?;
        if let Some(flock_type) = query.flock_type {
            flocks.retain(|f| f.flock_type == flock_type);
        }
        info!("Found {} flocks", flocks.len());
        Ok(FlockListResult { flocks })
    }

    /// Update a flock's descriptive fields. The slug stays fixed even when
    /// the name changes; it anchors the storage directory.
    pub fn update_flock(&self, command: UpdateFlockCommand) -> DomainResult<UpdateFlockResult> {
        info!("Updating flock: {}", command.flock_id);

        let mut flock = self.get_flock(&command.flock_id)?;

        let mut failures = ValidationFailures::new();
        if let Some(ref name) = command.name {
            if name.trim().is_empty() {
                failures.push("name", "required", "Flock name cannot be empty".to_string());
            } else if name.trim().len() > MAX_NAME_LENGTH {
                failures.push(
                    "name",
                    "too_long",
                    format!("Flock name cannot exceed {MAX_NAME_LENGTH} characters"),
                );
            }
        }
        if let Some(ref breed) = command.breed {
            if breed.trim().is_empty() {
                failures.push("breed", "required", "Breed cannot be empty".to_string());
            }
        }
        failures.into_result()?;

        if let Some(name) = command.name {
            flock.name = name.trim().to_string();
        }
        if let Some(breed) = command.breed {
            flock.breed = breed.trim().to_string();
        }
        flock.updated_at = Utc::now();

        self.flock_repository.update_flock(&flock)?;
        info!("Updated flock: {} with ID: {}", flock.name, flock.id);

        Ok(UpdateFlockResult { flock })
    }

    /// Delete a flock and its stored records.
    pub fn delete_flock(&self, flock_id: &str) -> DomainResult<DeleteFlockResult> {
        info!("Deleting flock: {}", flock_id);

        let flock = self.get_flock(flock_id)?;
        if !self.flock_repository.delete_flock(flock_id)? {
            warn!("Flock disappeared during delete: {}", flock_id);
            return Err(DomainError::NotFound(format!("flock {flock_id}")));
        }

        info!("Deleted flock: {} with ID: {}", flock.name, flock.id);
        Ok(DeleteFlockResult {
            success_message: format!("Flock '{}' deleted successfully", flock.name),
        })
    }
}
