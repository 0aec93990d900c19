use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::from_slice;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use super::timezones::TimezoneTable;

const CONFIG_PATH: &str = "config.json";
pub const SERVER_URL_VAR: &str = "TRIPDECK_SERVER_URL";

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub timezones: TimezoneTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000/api".to_string(),
            request_timeout_secs: 30,
            timezones: TimezoneTable::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Couldn't find a folder to read the configuration from")]
    NoConfigDirectory,
}

/// Read-only access to the configuration
#[derive(Clone, Debug, Default)]
pub struct Repository {
    config: Arc<Config>,
}

impl Repository {
    /// `config.json` in the platform config folder. A missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = data_directory()?.join(CONFIG_PATH);
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config = read(path)?.unwrap_or_default();
        if let Ok(url) = std::env::var(SERVER_URL_VAR) {
            log::debug!("Server url from {SERVER_URL_VAR}: {url}");
            config.server_url = url;
        }
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn timezones(&self) -> &TimezoneTable {
        &self.config.timezones
    }
}

fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    if !path.exists() {
        log::debug!("No configuration at {}", path.display());
        return Ok(None);
    };
    let data = std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let obj: T = from_slice(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(obj))
}

fn data_directory() -> Result<PathBuf, ConfigError> {
    use directories_next::ProjectDirs;
    ProjectDirs::from("com", "tripdeck", "tripdeck")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(ConfigError::NoConfigDirectory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let repository = Repository::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(repository.config().request_timeout_secs, 30);
        assert_eq!(repository.timezones().len(), 8);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_PATH);
        std::fs::write(
            &path,
            r#"{"request_timeout_secs": 5,
                "timezones": [{"id": 1, "name": "Asia/Kolkata", "utc_offset_minutes": 330}]}"#,
        )
        .unwrap();

        let repository = Repository::load_from(&path).unwrap();
        assert_eq!(repository.config().request_timeout_secs, 5);
        assert_eq!(repository.timezones().len(), 1);
        assert_eq!(repository.timezones().offset(1).local_minus_utc(), 330 * 60);
    }

    #[test]
    fn broken_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_PATH);
        std::fs::write(&path, "{ nope").unwrap();

        let err = Repository::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.json"));
    }
}
