use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CHUNK_LENGTH_SECONDS, DEFAULT_LANGUAGE, DEFAULT_OVERLAP_SECONDS,
};
use crate::shared::device::Device;
use crate::transcription::domain::failure_policy::FailurePolicy;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persisted transcription defaults. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chunk_length_seconds: f64,
    pub overlap_seconds: f64,
    pub batch_size: usize,
    pub language: Option<String>,
    pub device: Device,
    pub threads: Option<usize>,
    pub retries: usize,
    pub failure_policy: FailurePolicy,
    pub model_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chunk_length_seconds: DEFAULT_CHUNK_LENGTH_SECONDS,
            overlap_seconds: DEFAULT_OVERLAP_SECONDS,
            batch_size: DEFAULT_BATCH_SIZE,
            language: Some(DEFAULT_LANGUAGE.to_string()),
            device: Device::Cpu,
            threads: None,
            retries: 0,
            failure_policy: FailurePolicy::Abort,
            model_path: None,
        }
    }
}

impl Settings {
    /// `$XDG_CONFIG_HOME/Transcribe/settings.json` (platform equivalent elsewhere).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Transcribe").join("settings.json"))
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load from the default location, or defaults if no file exists there.
    pub fn load() -> Result<Self, SettingsError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let write_err = |e| SettingsError::Write {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("settings.json");
        let settings = Settings {
            batch_size: 2,
            device: Device::Gpu,
            failure_policy: FailurePolicy::BestEffort,
            ..Settings::default()
        };

        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{"batch_size": 4, "device": "gpu"}"#).unwrap();

        let loaded = Settings::load_from(&path).unwrap();

        assert_eq!(loaded.batch_size, 4);
        assert_eq!(loaded.device, Device::Gpu);
        assert_eq!(loaded.chunk_length_seconds, DEFAULT_CHUNK_LENGTH_SECONDS);
        assert_eq!(loaded.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Settings::load_from(&tmp.path().join("absent.json")),
            Err(SettingsError::Read { .. })
        ));
    }
}
