use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::{Reader, StringRecord, Writer};

use super::connection::CsvConnection;
use crate::backend::domain::models::session::LoginAttempt;
use crate::backend::storage::traits::LoginAttemptStore;

const HEADER: [&str; 4] = ["id", "username", "success", "timestamp"];

/// CSV-based log of sign-in attempts, shared across all users.
#[derive(Clone)]
pub struct LoginAttemptRepository {
    connection: CsvConnection,
}

impl LoginAttemptRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_attempts(&self) -> Result<Vec<LoginAttempt>> {
        let file_path = self.connection.login_attempts_file_path();
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut attempts = Vec::new();
        for result in csv_reader.records() {
            let row = result?;
            attempts.push(Self::parse_row(&row)?);
        }
        Ok(attempts)
    }

    fn write_attempts(&self, attempts: &[LoginAttempt]) -> Result<()> {
        let file_path = self.connection.login_attempts_file_path();
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));

            csv_writer.write_record(HEADER)?;
            for attempt in attempts {
                csv_writer.write_record([
                    attempt.id.to_string(),
                    attempt.username.clone(),
                    attempt.success.to_string(),
                    attempt.timestamp.to_rfc3339(),
                ])?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }

    fn parse_row(row: &StringRecord) -> Result<LoginAttempt> {
        let id = row
            .get(0)
            .unwrap_or("0")
            .parse::<i64>()
            .context("Invalid id in login attempts file")?;
        let success = row
            .get(2)
            .unwrap_or("false")
            .parse::<bool>()
            .context("Invalid success flag in login attempts file")?;
        let timestamp = DateTime::parse_from_rfc3339(row.get(3).unwrap_or(""))
            .context("Invalid timestamp in login attempts file")?
            .with_timezone(&Utc);

        Ok(LoginAttempt {
            id,
            username: row.get(1).unwrap_or("").to_string(),
            success,
            timestamp,
        })
    }
}

impl LoginAttemptStore for LoginAttemptRepository {
    fn record_attempt(&self, username: &str, success: bool) -> Result<i64> {
        let mut attempts = self.read_attempts()?;
        let now = Utc::now();
        let id = now.timestamp_millis();

        attempts.push(LoginAttempt {
            id,
            username: username.to_string(),
            success,
            timestamp: now,
        });
        self.write_attempts(&attempts)?;
        Ok(id)
    }

    fn list_attempts(&self, limit: Option<u32>) -> Result<Vec<LoginAttempt>> {
        let mut attempts = self.read_attempts()?;
        attempts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = limit {
            attempts.truncate(limit as usize);
        }
        Ok(attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::csv::test_utils::temp_connection;

    #[test]
    fn test_record_and_list_attempts() {
        let (connection, _temp_dir) = temp_connection();
        let repo = LoginAttemptRepository::new(connection);

        repo.record_attempt("test", false).unwrap();
        repo.record_attempt("test", true).unwrap();

        let attempts = repo.list_attempts(None).unwrap();
        assert_eq!(attempts.len(), 2);
        assert!(attempts.iter().any(|a| a.success));
        assert!(attempts.iter().any(|a| !a.success));

        let limited = repo.list_attempts(Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
    }
}
