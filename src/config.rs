use crate::constants::{
    DEFAULT_BACKOFF_SECONDS, DEFAULT_BATCH_SIZE, DEFAULT_MAX_RPM, DEFAULT_MIN_RPM,
    DEFAULT_RETRIES, DEFAULT_TIMEOUT_SECONDS,
};
use crate::error::{Result, ScannerError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Optional `config.toml` in the working directory. Anything not set there
/// falls back to the built-in defaults; env vars and CLI flags override on
/// top (resolved in `main`).
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Identifiers per API request.
    pub batch_size: usize,
    /// Lower bound of the requests-per-minute band.
    pub min_rpm: u32,
    /// Upper bound of the requests-per-minute band.
    pub max_rpm: u32,
    /// Attempts per batch before the run is aborted.
    pub retries: u32,
    /// Base backoff; the pause before retry N is `N * backoff_seconds`.
    pub backoff_seconds: f64,
    /// Per-request HTTP timeout.
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            min_rpm: DEFAULT_MIN_RPM,
            max_rpm: DEFAULT_MAX_RPM,
            retries: DEFAULT_RETRIES,
            backoff_seconds: DEFAULT_BACKOFF_SECONDS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl Config {
    pub fn load_or_default() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| {
            ScannerError::Config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }
}

impl FetchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(ScannerError::Config("batch size must be at least 1".into()));
        }
        if self.min_rpm == 0 || self.max_rpm == 0 || self.max_rpm < self.min_rpm {
            return Err(ScannerError::Config(format!(
                "invalid RPM band {}..{}: expected 0 < min_rpm <= max_rpm",
                self.min_rpm, self.max_rpm
            )));
        }
        if self.retries == 0 {
            return Err(ScannerError::Config("retry count must be at least 1".into()));
        }
        if !self.backoff_seconds.is_finite() || self.backoff_seconds < 0.0 {
            return Err(ScannerError::Config(
                "backoff seconds must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_the_documented_values() {
        let fetch = FetchConfig::default();
        assert_eq!(fetch.batch_size, 50);
        assert_eq!(fetch.min_rpm, 10);
        assert_eq!(fetch.max_rpm, 15);
        assert_eq!(fetch.retries, 3);
        assert_eq!(fetch.backoff_seconds, 1.5);
        assert!(fetch.validate().is_ok());
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.fetch.batch_size, 50);
    }

    #[test]
    fn partial_config_file_keeps_remaining_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[fetch]\nbatch_size = 25\nmax_rpm = 30\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.fetch.batch_size, 25);
        assert_eq!(config.fetch.max_rpm, 30);
        assert_eq!(config.fetch.min_rpm, 10);
        assert_eq!(config.fetch.retries, 3);
    }

    #[test]
    fn invalid_toml_is_a_hard_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[fetch\nbatch_size = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn validation_rejects_bad_parameters() {
        let mut fetch = FetchConfig {
            batch_size: 0,
            ..FetchConfig::default()
        };
        assert!(fetch.validate().is_err());

        fetch = FetchConfig {
            min_rpm: 0,
            ..FetchConfig::default()
        };
        assert!(fetch.validate().is_err());

        fetch = FetchConfig {
            max_rpm: 0,
            ..FetchConfig::default()
        };
        assert!(fetch.validate().is_err());

        fetch = FetchConfig {
            min_rpm: 20,
            max_rpm: 10,
            ..FetchConfig::default()
        };
        assert!(fetch.validate().is_err());

        fetch = FetchConfig {
            retries: 0,
            ..FetchConfig::default()
        };
        assert!(fetch.validate().is_err());

        fetch = FetchConfig {
            backoff_seconds: -1.0,
            ..FetchConfig::default()
        };
        assert!(fetch.validate().is_err());
    }
}
