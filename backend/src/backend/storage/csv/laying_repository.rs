use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, StringRecord, Writer};

use super::connection::CsvConnection;
use crate::backend::domain::models::laying::LayingRecord;
use crate::backend::storage::traits::LayingStore;

const HEADER: [&str; 15] = [
    "id",
    "flock_id",
    "date",
    "previous_population",
    "dead_count",
    "culled_count",
    "current_population",
    "feed_sacks",
    "feed_grams",
    "egg_trays",
    "extra_eggs",
    "eggs_collected",
    "production_rate",
    "created_at",
    "created_by",
];

/// CSV-based egg-production repository. One `laying.csv` per layer flock.
#[derive(Clone)]
pub struct LayingRepository {
    connection: CsvConnection,
}

impl LayingRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_records(&self, flock_slug: &str) -> Result<Vec<LayingRecord>> {
        let file_path = self.connection.laying_file_path(flock_slug);
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let row = result?;
            records.push(Self::parse_row(&row)?);
        }

        Ok(records)
    }

    fn write_records(&self, flock_slug: &str, records: &[LayingRecord]) -> Result<()> {
        self.connection.ensure_flock_directory(flock_slug)?;
        let file_path = self.connection.laying_file_path(flock_slug);
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));

            csv_writer.write_record(HEADER)?;
            for record in records {
                csv_writer.write_record([
                    record.id.clone(),
                    record.flock_id.clone(),
                    record.date.format("%Y-%m-%d").to_string(),
                    record.previous_population.to_string(),
                    record.dead_count.to_string(),
                    record.culled_count.to_string(),
                    record.current_population.to_string(),
                    record.feed_sacks.to_string(),
                    record.feed_grams.to_string(),
                    record.egg_trays.to_string(),
                    record.extra_eggs.to_string(),
                    record.eggs_collected.to_string(),
                    record.production_rate.to_string(),
                    record.created_at.to_rfc3339(),
                    record.created_by.clone(),
                ])?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }

    fn parse_row(row: &StringRecord) -> Result<LayingRecord> {
        let field = |i: usize| row.get(i).unwrap_or("").to_string();
        let count = |i: usize| -> Result<u32> {
            row.get(i)
                .unwrap_or("0")
                .parse::<u32>()
                .with_context(|| format!("Invalid count in laying file column {i}"))
        };
        let decimal = |i: usize| -> Result<f64> {
            row.get(i)
                .unwrap_or("0")
                .parse::<f64>()
                .with_context(|| format!("Invalid number in laying file column {i}"))
        };

        let date = NaiveDate::parse_from_str(row.get(2).unwrap_or(""), "%Y-%m-%d")
            .context("Invalid date in laying file")?;
        let created_at = DateTime::parse_from_rfc3339(row.get(13).unwrap_or(""))
            .context("Invalid created_at in laying file")?
            .with_timezone(&Utc);

        Ok(LayingRecord {
            id: field(0),
            flock_id: field(1),
            date,
            previous_population: count(3)?,
            dead_count: count(4)?,
            culled_count: count(5)?,
            current_population: count(6)?,
            feed_sacks: decimal(7)?,
            feed_grams: decimal(8)?,
            egg_trays: count(9)?,
            extra_eggs: count(10)?,
            eggs_collected: count(11)?,
            production_rate: decimal(12)?,
            created_at,
            created_by: field(14),
        })
    }
}

impl LayingStore for LayingRepository {
    fn list_laying_records(&self, flock_slug: &str) -> Result<Vec<LayingRecord>> {
        let mut records = self.read_records(flock_slug)?;
        records.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(records)
    }

    fn store_laying_record(&self, flock_slug: &str, record: &LayingRecord) -> Result<()> {
        let mut records = self.read_records(flock_slug)?;
        records.push(record.clone());
        self.write_records(flock_slug, &records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::csv::test_utils::temp_connection;

    fn sample_record(date: &str) -> LayingRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        LayingRecord {
            id: LayingRecord::generate_id(),
            flock_id: "flock::layers".to_string(),
            date,
            previous_population: 4200,
            dead_count: 120,
            culled_count: 15,
            current_population: 4065,
            feed_sacks: 9.5,
            feed_grams: 95_000.0,
            egg_trays: 100,
            extra_eggs: 15,
            eggs_collected: 3015,
            production_rate: 74.17,
            created_at: Utc::now(),
            created_by: String::new(),
        }
    }

    #[test]
    fn test_store_and_list_round_trip() {
        let (connection, _temp_dir) = temp_connection();
        let repo = LayingRepository::new(connection);

        let first = sample_record("2020-11-11");
        let second = sample_record("2020-11-12");
        repo.store_laying_record("layer-house", &second).unwrap();
        repo.store_laying_record("layer-house", &first).unwrap();

        let records = repo.list_laying_records("layer-house").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], first);
        assert_eq!(records[1], second);
    }

    #[test]
    fn test_list_empty_without_file() {
        let (connection, _temp_dir) = temp_connection();
        let repo = LayingRepository::new(connection);
        assert!(repo.list_laying_records("never-written").unwrap().is_empty());
    }
}
