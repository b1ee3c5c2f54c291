//! Process configuration.
//!
//! Loaded once at startup from `flocklog.yaml` when present, otherwise
//! defaults apply: a local listen address, the default data directory, the
//! built-in catalogs and the test account.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::domain::catalog::{CatalogEntry, Catalogs};
use crate::backend::domain::session_service::Credential;

/// One configured sign-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialConfig {
    pub username: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// Data directory override; `~/Documents/FlockLog` when unset.
    pub data_dir: Option<PathBuf>,
    pub medications: Vec<CatalogEntry>,
    pub vaccinations: Vec<CatalogEntry>,
    pub users: Vec<CredentialConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let catalogs = Catalogs::default();
        Self {
            listen_addr: "127.0.0.1:3000".to_string(),
            data_dir: None,
            medications: catalogs.medications.entries().to_vec(),
            vaccinations: catalogs.vaccinations.entries().to_vec(),
            users: vec![CredentialConfig {
                username: "test".to_string(),
                password: "test123".to_string(),
                display_name: "Test User".to_string(),
            }],
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The catalogs the record forms select from, loaded once per process.
    pub fn catalogs(&self) -> Catalogs {
        Catalogs::new(self.medications.clone(), self.vaccinations.clone())
    }

    pub fn credentials(&self) -> Vec<Credential> {
        self.users
            .iter()
            .map(|user| Credential {
                username: user.username.clone(),
                password: user.password.clone(),
                display_name: user.display_name.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_carry_catalogs_and_test_account() {
        let config = AppConfig::default();
        assert_eq!(config.listen_addr, "127.0.0.1:3000");
        assert_eq!(config.medications.len(), 2);
        assert_eq!(config.vaccinations.len(), 2);
        assert_eq!(config.users[0].username, "test");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/flocklog.yaml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_partial_yaml_fills_the_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen_addr: \"0.0.0.0:8088\"").unwrap();
        writeln!(file, "medications:").unwrap();
        writeln!(file, "  - identifier: aquazinc").unwrap();
        writeln!(file, "    display_name: AquaZinc").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8088");
        assert_eq!(config.medications.len(), 1);
        assert_eq!(config.medications[0].identifier, "aquazinc");
        // Untouched sections fall back to defaults
        assert_eq!(config.vaccinations.len(), 2);
        assert_eq!(config.users[0].username, "test");
    }
}
