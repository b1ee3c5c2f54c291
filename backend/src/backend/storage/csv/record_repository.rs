use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, StringRecord, Writer};

use super::connection::CsvConnection;
use crate::backend::domain::models::record::{DailyRecord, NamedItem};
use crate::backend::storage::traits::RecordStore;

const HEADER: [&str; 13] = [
    "id",
    "flock_id",
    "date",
    "day_age",
    "week_age",
    "previous_population",
    "feed_grams",
    "dead_count",
    "current_population",
    "medications",
    "vaccinations",
    "created_at",
    "created_by",
];

/// CSV-based daily record repository. One `records.csv` per flock directory;
/// medication and vaccination lists are JSON-encoded into single columns.
#[derive(Clone)]
pub struct RecordRepository {
    connection: CsvConnection,
}

impl RecordRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_records(&self, flock_slug: &str) -> Result<Vec<DailyRecord>> {
        let file_path = self.connection.records_file_path(flock_slug);
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

    fn write_records(&self, flock_slug: &str, records: &[DailyRecord]) -> Result<()> {
        self.connection.ensure_flock_directory(flock_slug)?;
        let file_path = self.connection.records_file_path(flock_slug);
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
                    record.day_age.to_string(),
                    record.week_age.to_string(),
                    record.previous_population.to_string(),
                    record.feed_grams.to_string(),
                    record.dead_count.to_string(),
                    record.current_population.to_string(),
                    serde_json::to_string(&record.medications)?,
                    serde_json::to_string(&record.vaccinations)?,
                    record.created_at.to_rfc3339(),
                    record.created_by.clone(),
                ])?;
            }
            csv_writer.flush()?;
        }

        // Atomic move from temp to final file
        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }

    fn parse_row(row: &StringRecord) -> Result<DailyRecord> {
        let field = |i: usize| row.get(i).unwrap_or("").to_string();
        let number = |i: usize| -> Result<u32> {
            row.get(i)
                .unwrap_or("0")
                .parse::<u32>()
                .with_context(|| format!("Invalid count in records file column {i}"))
        };

        let date = NaiveDate::parse_from_str(row.get(2).unwrap_or(""), "%Y-%m-%d")
            .context("Invalid date in records file")?;
        let feed_grams = row
            .get(6)
            .unwrap_or("0")
            .parse::<f64>()
            .context("Invalid feed_grams in records file")?;
        let medications: Vec<NamedItem> = serde_json::from_str(row.get(9).unwrap_or("[]"))
            .context("Invalid medications in records file")?;
        let vaccinations: Vec<NamedItem> = serde_json::from_str(row.get(10).unwrap_or("[]"))
            .context("Invalid vaccinations in records file")?;
        let created_at = DateTime::parse_from_rfc3339(row.get(11).unwrap_or(""))
            .context("Invalid created_at in records file")?
            .with_timezone(&Utc);

        Ok(DailyRecord {
            id: field(0),
            flock_id: field(1),
            date,
            day_age: number(3)?,
            week_age: number(4)?,
            previous_population: number(5)?,
            feed_grams,
            dead_count: number(7)?,
            current_population: number(8)?,
            medications,
            vaccinations,
            created_at,
            created_by: field(12),
        })
    }
}

impl RecordStore for RecordRepository {
    fn list_records(&self, flock_slug: &str) -> Result<Vec<DailyRecord>> {
        let mut records = self.read_records(flock_slug)?;
        records.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(records)
    }

    fn get_record(&self, flock_slug: &str, record_id: &str) -> Result<Option<DailyRecord>> {
        Ok(self
            .read_records(flock_slug)?
            .into_iter()
            .find(|r| r.id == record_id))
    }

    fn replace_records(&self, flock_slug: &str, records: &[DailyRecord]) -> Result<()> {
        self.write_records(flock_slug, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::csv::test_utils::temp_connection;

    fn sample_record(date: &str, dead: u32, previous: u32) -> DailyRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        DailyRecord {
            id: DailyRecord::generate_id(),
            flock_id: "flock::test".to_string(),
            date,
            day_age: 1,
            week_age: 1,
            previous_population: previous,
            feed_grams: 1500.0,
            dead_count: dead,
            current_population: previous - dead,
            medications: vec![NamedItem {
                name: "PureTubig".to_string(),
                slug: "puretubig".to_string(),
            }],
            vaccinations: Vec::new(),
            created_at: Utc::now(),
            created_by: "test".to_string(),
        }
    }

    #[test]
    fn test_replace_and_list_round_trip() {
        let (connection, _temp_dir) = temp_connection();
        let repo = RecordRepository::new(connection);

        let records = vec![
            sample_record("2025-05-06", 0, 1995),
            sample_record("2025-05-05", 1, 1996),
        ];
        repo.replace_records("alpha-flock", &records).unwrap();

        let listed = repo.list_records("alpha-flock").unwrap();
        assert_eq!(listed.len(), 2);
        // Chronological regardless of stored order
        assert!(listed[0].date < listed[1].date);
        assert_eq!(listed[1], records[0]);
    }

    #[test]
    fn test_medication_lists_survive_round_trip() {
        let (connection, _temp_dir) = temp_connection();
        let repo = RecordRepository::new(connection);

        let mut record = sample_record("2025-05-05", 1, 1996);
        record.medications.push(NamedItem {
            name: "MoreMeta Multivitamins".to_string(),
            slug: "moremeta-multivitamins".to_string(),
        });
        record.vaccinations.push(NamedItem {
            name: "Ma5+clone30".to_string(),
            slug: "ma5clone30".to_string(),
        });
        repo.replace_records("alpha-flock", std::slice::from_ref(&record))
            .unwrap();

        let loaded = repo.get_record("alpha-flock", &record.id).unwrap().unwrap();
        assert_eq!(loaded.medications, record.medications);
        assert_eq!(loaded.vaccinations, record.vaccinations);
    }

    #[test]
    fn test_list_records_empty_without_file() {
        let (connection, _temp_dir) = temp_connection();
        let repo = RecordRepository::new(connection);
        assert!(repo.list_records("never-written").unwrap().is_empty());
    }

    #[test]
    fn test_get_record_missing_id() {
        let (connection, _temp_dir) = temp_connection();
        let repo = RecordRepository::new(connection);

        let record = sample_record("2025-05-05", 1, 1996);
        repo.replace_records("alpha-flock", std::slice::from_ref(&record))
            .unwrap();

        assert!(repo
            .get_record("alpha-flock", "record::missing")
            .unwrap()
            .is_none());
    }
}
