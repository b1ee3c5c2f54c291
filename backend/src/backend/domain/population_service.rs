//! Population chain maintenance for daily records.
//!
//! A flock's records form a chain: each record's previous population equals
//! the prior record's current population, anchored at the flock's initial
//! population. Backdated inserts, edits and deletes invalidate everything
//! downstream, so every mutation re-derives the chain before persisting.
//!
//! The algorithm:
//! 1. Sort the records chronologically.
//! 2. Walk forward carrying the running population.
//! 3. Re-derive each record's previous/current population from the running
//!    total and its own dead count.
//!
//! A walk that would drive any record negative fails with
//! `InvalidMortality`; the caller rejects the whole mutation rather than
//! persist a broken chain.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::calculator::{self, CalculatorError};
use crate::backend::domain::models::flock::Flock;
use crate::backend::domain::models::record::DailyRecord;
use crate::backend::storage::traits::RecordStore;

/// Re-derive the previous/current populations of `records` in place,
/// anchored at `initial_population`. Records are sorted chronologically
/// first. Returns how many records changed.
pub fn recompute_chain(
    initial_population: u32,
    records: &mut [DailyRecord],
) -> Result<usize, CalculatorError> {
    records.sort_by(|a, b| a.date.cmp(&b.date));

    let mut running = initial_population;
    let mut changed = 0;
    for record in records.iter_mut() {
        let current = calculator::apply_mortality(running, record.dead_count)?;
        if record.previous_population != running || record.current_population != current {
            changed += 1;
        }
        record.previous_population = running;
        record.current_population = current;
        running = current;
    }
    Ok(changed)
}

/// Service responsible for keeping stored record chains consistent.
#[derive(Clone)]
pub struct PopulationService<R: RecordStore> {
    record_repository: Arc<R>,
}

impl<R: RecordStore> PopulationService<R> {
    pub fn new(record_repository: R) -> Self {
        Self {
            record_repository: Arc::new(record_repository),
        }
    }

    /// Reload a flock's records, re-derive the chain and persist any
    /// corrections. Returns how many records were updated.
    pub fn reconcile(&self, flock: &Flock) -> Result<usize> {
        let mut records = self.record_repository.list_records(&flock.slug)?;
        if records.is_empty() {
            info!("No records for flock {}, nothing to reconcile", flock.id);
            return Ok(0);
        }

        let changed = recompute_chain(flock.initial_population, &mut records)
            .map_err(anyhow::Error::from)?;
        if changed > 0 {
            self.record_repository.replace_records(&flock.slug, &records)?;
            info!(
                "Reconciled {} record(s) for flock {}",
                changed, flock.id
            );
        }
        Ok(changed)
    }

    /// Diagnostic pass: report every chain violation for a flock without
    /// mutating anything.
    pub fn validate_chain(&self, flock: &Flock) -> Result<Vec<String>> {
        let records = self.record_repository.list_records(&flock.slug)?;

        let mut errors = Vec::new();
        let mut expected_previous = flock.initial_population;

        for record in &records {
            if record.previous_population != expected_previous {
                errors.push(format!(
                    "Record {} has previous population {}, expected {}",
                    record.id, record.previous_population, expected_previous
                ));
            }
            let expected_current = record
                .previous_population
                .saturating_sub(record.dead_count);
            if record.current_population != expected_current
                || record.dead_count > record.previous_population
            {
                errors.push(format!(
                    "Record {} has current population {}, expected {}",
                    record.id, record.current_population, expected_current
                ));
            }
            match calculator::day_age(flock.start_date, record.date) {
                Ok(day_age) => {
                    if record.day_age != day_age {
                        errors.push(format!(
                            "Record {} has day age {}, expected {}",
                            record.id, record.day_age, day_age
                        ));
                    }
                    if record.week_age != calculator::week_age(day_age) {
                        errors.push(format!(
                            "Record {} has week age {}, expected {}",
                            record.id,
                            record.week_age,
                            calculator::week_age(day_age)
                        ));
                    }
                }
                Err(_) => errors.push(format!(
                    "Record {} is dated {} before the flock start {}",
                    record.id, record.date, flock.start_date
                )),
            }
            expected_previous = record.current_population;
        }

        if errors.is_empty() {
            info!("Record chain is consistent for flock {}", flock.id);
        } else {
            warn!(
                "Found {} chain violation(s) for flock {}",
                errors.len(),
                flock.id
            );
        }
        Ok(errors)
    }
}
