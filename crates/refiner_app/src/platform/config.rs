use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use refiner_engine::{AtomicFileWriter, ClientSettings, PersistError, DEFAULT_BASE_URL};
use refiner_logging::refiner_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize config: {0}")]
    Serialize(String),
    #[error("config path {0:?} has no file name")]
    FileName(PathBuf),
    #[error(transparent)]
    Write(#[from] PersistError),
}

/// Settings read from `refiner.ron`. Absent fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    /// `None` leaves requests without an overall deadline.
    pub request_timeout_secs: Option<u64>,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub max_download_mb: u64,
    pub download_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: None,
            max_retries: client.max_retries,
            retry_backoff_ms: client.retry_backoff.as_millis() as u64,
            max_download_mb: client.max_download_bytes / (1024 * 1024),
            download_dir: PathBuf::from("downloads"),
        }
    }
}

impl AppConfig {
    /// Loads `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                refiner_info!("No config at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        refiner_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(dir) = &cli.download_dir {
            self.download_dir = dir.clone();
        }
    }

    /// Writes this configuration as pretty RON, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<PathBuf, ConfigError> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ConfigError::FileName(path.to_path_buf()))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(self, pretty)
            .map_err(|err| ConfigError::Serialize(err.to_string()))?;

        let writer = AtomicFileWriter::new(dir);
        Ok(writer.write(filename, content.as_bytes())?)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            max_retries: self.max_retries,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            max_download_bytes: self.max_download_mb.saturating_mul(1024 * 1024),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("refiner.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("refiner.ron");
        fs::write(
            &path,
            r#"(base_url: "http://backend:9000", max_retries: 2, request_timeout_secs: Some(30))"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "http://backend:9000");
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.request_timeout_secs, Some(30));
        assert_eq!(config.download_dir, PathBuf::from("downloads"));

        let settings = config.client_settings();
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(settings.max_retries, 2);
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("refiner.ron");
        fs::write(&path, "(base_url: ").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn cli_flags_override_file_values() {
        let mut config = AppConfig {
            base_url: "http://from-file".to_string(),
            ..AppConfig::default()
        };
        let cli = Cli::try_parse_from([
            "refiner",
            "--base-url",
            "http://from-cli",
            "--download-dir",
            "saved",
        ])
        .unwrap();

        config.apply_overrides(&cli);
        assert_eq!(config.base_url, "http://from-cli");
        assert_eq!(config.download_dir, PathBuf::from("saved"));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("refiner.ron");
        let config = AppConfig {
            max_retries: 3,
            request_timeout_secs: Some(45),
            ..AppConfig::default()
        };

        let written = config.save(&path).unwrap();
        assert_eq!(written, path);
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }
}
