use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

/// CsvConnection manages the data directory layout and hands out file paths
/// to the repositories. One directory per flock (named by slug), plus the
/// top-level index and attempt-log files.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a connection rooted at `base_directory`, creating it if needed.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a connection in the default data directory,
    /// `~/Documents/FlockLog`.
    pub fn new_default() -> Result<Self> {
        let home_dir = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;

        let data_dir = PathBuf::from(home_dir).join("Documents").join("FlockLog");
        info!("Using data directory: {}", data_dir.display());
        Self::new(data_dir)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the flock index file.
    pub fn flocks_file_path(&self) -> PathBuf {
        self.base_directory.join("flocks.csv")
    }

    /// Path of the sign-in attempt log.
    pub fn login_attempts_file_path(&self) -> PathBuf {
        self.base_directory.join("login_attempts.csv")
    }

    /// Directory holding one flock's files.
    pub fn flock_directory(&self, flock_slug: &str) -> PathBuf {
        self.base_directory.join(flock_slug)
    }

    /// Path of a flock's daily records file.
    pub fn records_file_path(&self, flock_slug: &str) -> PathBuf {
        self.flock_directory(flock_slug).join("records.csv")
    }

    /// Path of a layer flock's egg-production file.
    pub fn laying_file_path(&self, flock_slug: &str) -> PathBuf {
        self.flock_directory(flock_slug).join("laying.csv")
    }

    /// Create a flock's directory if it does not exist yet.
    pub fn ensure_flock_directory(&self, flock_slug: &str) -> Result<PathBuf> {
        let dir = self.flock_directory(flock_slug);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_base_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let base = temp_dir.path().join("data");
        assert!(!base.exists());

        let connection = CsvConnection::new(&base).unwrap();
        assert!(base.exists());
        assert_eq!(connection.base_directory(), base.as_path());
    }

    #[test]
    fn test_paths_are_per_flock() {
        let temp_dir = tempfile::tempdir().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();

        let records = connection.records_file_path("alpha-flock");
        assert!(records.ends_with("alpha-flock/records.csv"));

        let laying = connection.laying_file_path("alpha-flock");
        assert!(laying.ends_with("alpha-flock/laying.csv"));
    }

    #[test]
    fn test_ensure_flock_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();

        let dir = connection.ensure_flock_directory("beta-flock").unwrap();
        assert!(dir.exists());
        // Idempotent
        connection.ensure_flock_directory("beta-flock").unwrap();
    }
}
