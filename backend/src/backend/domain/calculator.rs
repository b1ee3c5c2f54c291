//! Daily flock record calculator.
//!
//! Pure derivation rules for the record entry forms: day/week age from the
//! flock's start date, population bookkeeping, and the small helpers the
//! entry form pre-fills from (dead-count options, next date). Everything
//! here is side-effect free and safe to call concurrently.

use chrono::{Duration, NaiveDate};
use thiserror::Error;

/// Grams in one sack of layer feed.
pub const GRAMS_PER_SACK: f64 = 10_000.0;

/// Eggs in one full tray.
pub const EGGS_PER_TRAY: u32 = 30;

/// Errors from the derivation rules. Both are returned to the caller as
/// values; neither is ever clamped away or panicked on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculatorError {
    /// More deaths reported than birds available. The record must be
    /// rejected rather than persisted with a negative population.
    #[error("dead count {dead_count} exceeds previous population {previous_population}")]
    InvalidMortality {
        previous_population: u32,
        dead_count: u32,
    },
    /// A date before the flock's start date. Day-age is undefined there, so
    /// this is a caller error rather than a recoverable runtime condition.
    #[error("date {date} precedes flock start date {start_date}")]
    UnsupportedDateRange {
        start_date: NaiveDate,
        date: NaiveDate,
    },
}

/// Derived, read-only defaults for a new daily record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDefaults {
    pub date: NaiveDate,
    pub day_age: u32,
    pub week_age: u32,
    pub previous_population: u32,
}

/// Day-age of a flock on `date`: whole days since `start_date`, counting the
/// start day itself as day 1.
pub fn day_age(start_date: NaiveDate, date: NaiveDate) -> Result<u32, CalculatorError> {
    let offset = (date - start_date).num_days();
    if offset < 0 {
        return Err(CalculatorError::UnsupportedDateRange { start_date, date });
    }
    Ok(offset as u32 + 1)
}

/// Week-age for a day-age: ceil(day_age / 7).
pub fn week_age(day_age: u32) -> u32 {
    (day_age + 6) / 7
}

/// Compute the derived fields of a new record for `today`.
///
/// `previous_population` is the ending population of the most recent prior
/// record, or the flock's initial population if none exists.
pub fn derive_defaults(
    start_date: NaiveDate,
    today: NaiveDate,
    previous_population: u32,
) -> Result<RecordDefaults, CalculatorError> {
    let day_age = day_age(start_date, today)?;
    Ok(RecordDefaults {
        date: today,
        day_age,
        week_age: week_age(day_age),
        previous_population,
    })
}

/// Population after a day's deaths. Fails rather than going negative.
pub fn apply_mortality(
    previous_population: u32,
    dead_count: u32,
) -> Result<u32, CalculatorError> {
    if dead_count > previous_population {
        return Err(CalculatorError::InvalidMortality {
            previous_population,
            dead_count,
        });
    }
    Ok(previous_population - dead_count)
}

/// Population after a day's deaths and culls (layer flocks).
pub fn apply_attrition(
    previous_population: u32,
    dead_count: u32,
    culled_count: u32,
) -> Result<u32, CalculatorError> {
    let removed = dead_count.saturating_add(culled_count);
    if removed > previous_population {
        return Err(CalculatorError::InvalidMortality {
            previous_population,
            dead_count: removed,
        });
    }
    Ok(previous_population - removed)
}

/// Selectable dead counts for the entry form: 0 up to 1% of the previous
/// population, rounded up.
pub fn dead_count_options(previous_population: u32) -> Vec<u32> {
    let max_one_percent = previous_population.div_ceil(100);
    (0..=max_one_percent).collect()
}

/// Date to pre-fill for the next record: the day after the latest logged
/// date, or `today` when nothing has been logged yet.
pub fn next_record_date(latest_logged: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
    match latest_logged {
        Some(latest) => latest + Duration::days(1),
        None => today,
    }
}

/// Gram equivalent of feed entered in sacks.
pub fn feed_grams_from_sacks(feed_sacks: f64) -> f64 {
    feed_sacks * GRAMS_PER_SACK
}

/// Total eggs from full trays plus loose extras.
pub fn eggs_collected(egg_trays: u32, extra_eggs: u32) -> u32 {
    egg_trays * EGGS_PER_TRAY + extra_eggs
}

/// Hen-day production: eggs collected per bird as a percentage.
/// 0.0 for an empty flock.
pub fn production_rate(eggs: u32, population: u32) -> f64 {
    if population == 0 {
        return 0.0;
    }
    (eggs as f64 / population as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_first_day_is_day_one() {
        let start = date("2025-01-01");
        let defaults = derive_defaults(start, start, 2000).unwrap();
        assert_eq!(defaults.day_age, 1);
        assert_eq!(defaults.week_age, 1);
        assert_eq!(defaults.previous_population, 2000);
        assert_eq!(defaults.date, start);
    }

    #[test]
    fn test_day_fourteen_is_week_two() {
        let start = date("2025-01-01");
        let today = date("2025-01-14"); // start + 13 days
        let defaults = derive_defaults(start, today, 500).unwrap();
        assert_eq!(defaults.day_age, 14);
        assert_eq!(defaults.week_age, 2);
    }

    #[test]
    fn test_week_age_boundaries() {
        assert_eq!(week_age(1), 1);
        assert_eq!(week_age(7), 1);
        assert_eq!(week_age(8), 2);
        assert_eq!(week_age(14), 2);
        assert_eq!(week_age(15), 3);
    }

    #[test]
    fn test_derive_defaults_before_start_is_unsupported() {
        let start = date("2025-01-10");
        let today = date("2025-01-09");
        let err = derive_defaults(start, today, 100).unwrap_err();
        assert_eq!(
            err,
            CalculatorError::UnsupportedDateRange {
                start_date: start,
                date: today,
            }
        );
    }

    #[test]
    fn test_apply_mortality_exact_subtraction() {
        assert_eq!(apply_mortality(2000, 5).unwrap(), 1995);
        assert_eq!(apply_mortality(100, 0).unwrap(), 100);
        assert_eq!(apply_mortality(100, 100).unwrap(), 0);
    }

    #[test]
    fn test_apply_mortality_rejects_excess_deaths() {
        let err = apply_mortality(100, 150).unwrap_err();
        assert_eq!(
            err,
            CalculatorError::InvalidMortality {
                previous_population: 100,
                dead_count: 150,
            }
        );
    }

    #[test]
    fn test_apply_attrition_counts_culls() {
        assert_eq!(apply_attrition(4200, 120, 15).unwrap(), 4065);
        assert!(apply_attrition(100, 60, 50).is_err());
    }

    #[test]
    fn test_dead_count_options_one_percent_ceiling() {
        assert_eq!(dead_count_options(0), vec![0]);
        assert_eq!(dead_count_options(100), vec![0, 1]);
        // ceil(1% of 1995) = 20
        assert_eq!(dead_count_options(1995).len(), 21);
        assert_eq!(*dead_count_options(1995).last().unwrap(), 20);
    }

    #[test]
    fn test_next_record_date_advances_past_latest() {
        let today = date("2025-05-09");
        assert_eq!(next_record_date(None, today), today);
        assert_eq!(
            next_record_date(Some(date("2025-05-08")), today),
            date("2025-05-09")
        );
        // Backfill pending: suggestion still follows the log, not the clock
        assert_eq!(
            next_record_date(Some(date("2025-05-01")), today),
            date("2025-05-02")
        );
    }

    #[test]
    fn test_laying_derivations() {
        assert_eq!(feed_grams_from_sacks(9.5), 95_000.0);
        assert_eq!(eggs_collected(10, 15), 315);
        assert_eq!(production_rate(315, 420), 75.0);
        assert_eq!(production_rate(100, 0), 0.0);
    }
}
