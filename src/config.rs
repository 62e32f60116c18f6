//! Runtime configuration.
//!
//! Defaults, then the JSON file named by `INSURANCE_DASH_CONFIG` (if set),
//! then individual environment overrides.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::DashError;

pub const CONFIG_ENV: &str = "INSURANCE_DASH_CONFIG";
pub const DATA_ENV: &str = "INSURANCE_DASH_DATA";
pub const LOG_MODE_ENV: &str = "INSURANCE_DASH_LOG_MODE";
pub const LOG_FILE_ENV: &str = "INSURANCE_DASH_LOG_FILE";
pub const TICK_ENV: &str = "INSURANCE_DASH_TICK_MS";

/// Where log output goes. The full-screen UI owns the terminal, so `Auto`
/// logs to the file when stdout is a TTY and to stdout otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(LogMode::Auto),
            "file" => Some(LogMode::File),
            "stdout" => Some(LogMode::Stdout),
            _ => None,
        }
    }

    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            LogMode::File => true,
            LogMode::Stdout => false,
            LogMode::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_path: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/insurance.csv"),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("insurance_dash.log"),
            tick_rate_ms: 200,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// `DashError::Config` if the config file cannot be read or parsed, or an
    /// override holds an invalid value.
    pub fn load() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an explicit variable lookup.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(path) = lookup(DATA_ENV) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(mode) = lookup(LOG_MODE_ENV) {
            config.log_mode = LogMode::parse(&mode)
                .ok_or_else(|| DashError::Config(format!("{LOG_MODE_ENV}: unknown log mode `{mode}`")))?;
        }
        if let Some(path) = lookup(LOG_FILE_ENV) {
            config.log_file = PathBuf::from(path);
        }
        if let Some(ms) = lookup(TICK_ENV) {
            config.tick_rate_ms = ms
                .trim()
                .parse()
                .map_err(|_| DashError::Config(format!("{TICK_ENV}: `{ms}` is not a number of milliseconds")))?;
        }

        Ok(config)
    }

    pub fn from_file(path: &str) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DashError::Config(format!("cannot read {path}: {e}")))?;
        Self::from_json(&contents).map_err(|e| DashError::Config(format!("{path}: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }
}
