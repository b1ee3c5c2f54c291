use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, StringRecord, Writer};

use super::connection::CsvConnection;
use crate::backend::domain::models::flock::{Flock, FlockType};
use crate::backend::storage::traits::FlockStore;

const HEADER: [&str; 9] = [
    "id",
    "name",
    "slug",
    "breed",
    "flock_type",
    "start_date",
    "initial_population",
    "created_at",
    "updated_at",
];

/// CSV-based flock repository. All flocks live in a single index file;
/// deleting a flock also removes its per-flock directory.
#[derive(Clone)]
pub struct FlockRepository {
    connection: CsvConnection,
}

impl FlockRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_flocks(&self) -> Result<Vec<Flock>> {
        let file_path = self.connection.flocks_file_path();
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut flocks = Vec::new();
        for result in csv_reader.records() {
            let row = result?;
            flocks.push(Self::parse_row(&row)?);
        }

        Ok(flocks)
    }

    fn write_flocks(&self, flocks: &[Flock]) -> Result<()> {
        let file_path = self.connection.flocks_file_path();
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(file));

            csv_writer.write_record(HEADER)?;
            for flock in flocks {
                csv_writer.write_record([
                    flock.id.clone(),
                    flock.name.clone(),
                    flock.slug.clone(),
                    flock.breed.clone(),
                    flock.flock_type.as_str().to_string(),
                    flock.start_date.format("%Y-%m-%d").to_string(),
                    flock.initial_population.to_string(),
                    flock.created_at.to_rfc3339(),
                    flock.updated_at.to_rfc3339(),
                ])?;
            }
            csv_writer.flush()?;
        }

        // Atomic move from temp to final file
        std::fs::rename(&temp_path, &file_path)?;
        Ok(())
    }

    fn parse_row(row: &StringRecord) -> Result<Flock> {
        let field = |i: usize| row.get(i).unwrap_or("").to_string();

        let flock_type = FlockType::parse(row.get(4).unwrap_or(""))
            .ok_or_else(|| anyhow!("Unknown flock type: {:?}", row.get(4)))?;
        let start_date = NaiveDate::parse_from_str(row.get(5).unwrap_or(""), "%Y-%m-%d")
            .context("Invalid start_date in flocks file")?;
        let initial_population = row
            .get(6)
            .unwrap_or("0")
            .parse::<u32>()
            .context("Invalid initial_population in flocks file")?;
        let created_at = DateTime::parse_from_rfc3339(row.get(7).unwrap_or(""))
            .context("Invalid created_at in flocks file")?
            .with_timezone(&Utc);
        let updated_at = DateTime::parse_from_rfc3339(row.get(8).unwrap_or(""))
            .context("Invalid updated_at in flocks file")?
            .with_timezone(&Utc);

        Ok(Flock {
            id: field(0),
            name: field(1),
            slug: field(2),
            breed: field(3),
            flock_type,
            start_date,
            initial_population,
            created_at,
            updated_at,
        })
    }
}

impl FlockStore for FlockRepository {
    fn store_flock(&self, flock: &Flock) -> Result<()> {
        let mut flocks = self.read_flocks()?;
        flocks.push(flock.clone());
        self.connection.ensure_flock_directory(&flock.slug)?;
        self.write_flocks(&flocks)
    }

    fn get_flock(&self, flock_id: &str) -> Result<Option<Flock>> {
        Ok(self.read_flocks()?.into_iter().find(|f| f.id == flock_id))
    }

    fn get_flock_by_slug(&self, slug: &str) -> Result<Option<Flock>> {
        Ok(self.read_flocks()?.into_iter().find(|f| f.slug == slug))
    }

    fn list_flocks(&self) -> Result<Vec<Flock>> {
        let mut flocks = self.read_flocks()?;
        flocks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(flocks)
    }

    fn update_flock(&self, flock: &Flock) -> Result<()> {
        let mut flocks = self.read_flocks()?;
        let slot = flocks
            .iter_mut()
            .find(|f| f.id == flock.id)
            .ok_or_else(|| anyhow!("Flock not found for update: {}", flock.id))?;
        *slot = flock.clone();
        self.write_flocks(&flocks)
    }

    fn delete_flock(&self, flock_id: &str) -> Result<bool> {
        let mut flocks = self.read_flocks()?;
        let Some(index) = flocks.iter().position(|f| f.id == flock_id) else {
            return Ok(false);
        };

        let removed = flocks.remove(index);
        self.write_flocks(&flocks)?;

        let flock_dir = self.connection.flock_directory(&removed.slug);
        if flock_dir.exists() {
            std::fs::remove_dir_all(&flock_dir)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::csv::test_utils::temp_connection;

    fn sample_flock(name: &str, slug: &str) -> Flock {
        let now = Utc::now();
        Flock {
            id: Flock::generate_id(),
            name: name.to_string(),
            slug: slug.to_string(),
            breed: "Leghorn".to_string(),
            flock_type: FlockType::Grower,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            initial_population: 2000,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_store_and_get_flock() {
        let (connection, _temp_dir) = temp_connection();
        let repo = FlockRepository::new(connection);

        let flock = sample_flock("Alpha Flock", "alpha-flock");
        repo.store_flock(&flock).unwrap();

        let loaded = repo.get_flock(&flock.id).unwrap().unwrap();
        assert_eq!(loaded, flock);

        let by_slug = repo.get_flock_by_slug("alpha-flock").unwrap().unwrap();
        assert_eq!(by_slug.id, flock.id);

        assert!(repo.get_flock("flock::missing").unwrap().is_none());
    }

    #[test]
    fn test_list_flocks_ordered_by_name() {
        let (connection, _temp_dir) = temp_connection();
        let repo = FlockRepository::new(connection);

        repo.store_flock(&sample_flock("Zeta Flock", "zeta-flock")).unwrap();
        repo.store_flock(&sample_flock("Alpha Flock", "alpha-flock")).unwrap();

        let flocks = repo.list_flocks().unwrap();
        assert_eq!(flocks.len(), 2);
        assert_eq!(flocks[0].name, "Alpha Flock");
        assert_eq!(flocks[1].name, "Zeta Flock");
    }

    #[test]
    fn test_update_flock() {
        let (connection, _temp_dir) = temp_connection();
        let repo = FlockRepository::new(connection);

        let mut flock = sample_flock("Alpha Flock", "alpha-flock");
        repo.store_flock(&flock).unwrap();

        flock.breed = "Sussex".to_string();
        repo.update_flock(&flock).unwrap();

        let loaded = repo.get_flock(&flock.id).unwrap().unwrap();
        assert_eq!(loaded.breed, "Sussex");
    }

    #[test]
    fn test_delete_flock_removes_directory() {
        let (connection, _temp_dir) = temp_connection();
        let repo = FlockRepository::new(connection.clone());

        let flock = sample_flock("Alpha Flock", "alpha-flock");
        repo.store_flock(&flock).unwrap();
        assert!(connection.flock_directory("alpha-flock").exists());

        assert!(repo.delete_flock(&flock.id).unwrap());
        assert!(repo.get_flock(&flock.id).unwrap().is_none());
        assert!(!connection.flock_directory("alpha-flock").exists());

        assert!(!repo.delete_flock(&flock.id).unwrap());
    }
}
