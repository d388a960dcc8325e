use crate::constants::{
    DEFAULT_DATASET_BASE_URL, DEFAULT_FIRST_SEASON_END_YEAR, DEFAULT_HTTP_TIMEOUT_SECONDS,
    DEFAULT_LAST_SEASON_END_YEAR, DEFAULT_LOG_FILE_NAME, DEFAULT_LOOKBACK_HOURS,
    DEFAULT_SHEETS_API_DOMAIN, env_vars,
};
use crate::data_fetcher::models::Dataset;
use crate::error::AppError;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::{
    parse_year_list, validate_http_timeout, validate_log_file_path, validate_url, validate_window,
};

/// Configuration structure for the sync job.
///
/// Everything here is non-secret. Access tokens are read from the
/// environment at run time and never written to the config file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Destination spreadsheet for `players` runs.
    #[serde(default)]
    pub players_spreadsheet_id: Option<String>,
    /// Destination spreadsheet for `teams` runs.
    #[serde(default)]
    pub teams_spreadsheet_id: Option<String>,
    /// How far back from "now" a game may have started to be imported.
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,
    /// Season-end years that may be written at all.
    #[serde(default = "default_allowed_years")]
    pub allowed_season_end_years: Vec<i32>,
    /// Dataset download base URL; the dataset file name is appended.
    #[serde(default = "default_dataset_base_url")]
    pub dataset_base_url: String,
    /// Sheets REST API root. Overridden in tests to point at a mock server.
    #[serde(default = "default_sheets_api_domain")]
    pub sheets_api_domain: String,
    /// HTTP timeout in seconds for both the dataset host and the Sheets API.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Path to the log file. If not specified, logs go to the default location.
    #[serde(default)]
    pub log_file_path: Option<String>,
}

fn default_lookback_hours() -> u32 {
    DEFAULT_LOOKBACK_HOURS
}

fn default_allowed_years() -> Vec<i32> {
    (DEFAULT_FIRST_SEASON_END_YEAR..=DEFAULT_LAST_SEASON_END_YEAR).collect()
}

fn default_dataset_base_url() -> String {
    DEFAULT_DATASET_BASE_URL.to_string()
}

fn default_sheets_api_domain() -> String {
    DEFAULT_SHEETS_API_DOMAIN.to_string()
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            players_spreadsheet_id: None,
            teams_spreadsheet_id: None,
            lookback_hours: default_lookback_hours(),
            allowed_season_end_years: default_allowed_years(),
            dataset_base_url: default_dataset_base_url(),
            sheets_api_domain: default_sheets_api_domain(),
            http_timeout_seconds: default_http_timeout(),
            log_file_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location, then
    /// applies environment overrides and validates the result.
    ///
    /// The config file is optional: a scheduled run is normally configured
    /// purely through the environment.
    ///
    /// # Environment Variables
    /// - `DEST_SPREADSHEET_ID` / `DEST_TEAM_SPREADSHEET_ID` - destination spreadsheets
    /// - `LOOKBACK_HOURS` - lookback window (default: 24)
    /// - `ALLOWED_SEASON_END_YEARS` - `2022-2026` or `2022,2023`
    /// - `NBA_SYNC_DATASET_URL`, `NBA_SYNC_SHEETS_API` - endpoint overrides
    /// - `NBA_SYNC_HTTP_TIMEOUT` - HTTP timeout in seconds
    /// - `NBA_SYNC_LOG_FILE` - log file path
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            Config::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Loads configuration from a specific file without environment overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Applies overrides from a key lookup, normally the process environment.
    ///
    /// Taking the lookup as a closure keeps this testable without touching
    /// the real environment. Empty values are treated as unset.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(id) = get(env_vars::PLAYERS_SPREADSHEET_ID) {
            self.players_spreadsheet_id = Some(id);
        }
        if let Some(id) = get(env_vars::TEAMS_SPREADSHEET_ID) {
            self.teams_spreadsheet_id = Some(id);
        }
        if let Some(hours) = get(env_vars::LOOKBACK_HOURS) {
            self.lookback_hours = hours.parse().map_err(|_| {
                AppError::config_error(format!(
                    "{} must be a whole number of hours (got '{hours}')",
                    env_vars::LOOKBACK_HOURS
                ))
            })?;
        }
        if let Some(years) = get(env_vars::ALLOWED_SEASON_END_YEARS) {
            self.allowed_season_end_years = parse_year_list(&years)?;
        }
        if let Some(url) = get(env_vars::DATASET_URL) {
            self.dataset_base_url = url;
        }
        if let Some(domain) = get(env_vars::SHEETS_API) {
            self.sheets_api_domain = domain;
        }
        if let Some(timeout) = get(env_vars::HTTP_TIMEOUT) {
            self.http_timeout_seconds = timeout.parse().map_err(|_| {
                AppError::config_error(format!(
                    "{} must be a whole number of seconds (got '{timeout}')",
                    env_vars::HTTP_TIMEOUT
                ))
            })?;
        }
        if let Some(log_file_path) = get(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        Ok(())
    }

    /// Validates the configuration settings that do not depend on the dataset
    /// being synced. Spreadsheet ids are checked per run by [`Config::spreadsheet_id`].
    pub fn validate(&self) -> Result<(), AppError> {
        validate_window(self.lookback_hours, &self.allowed_season_end_years)?;
        validate_http_timeout(self.http_timeout_seconds)?;
        validate_url("Dataset base URL", &self.dataset_base_url)?;
        validate_url("Sheets API domain", &self.sheets_api_domain)?;
        validate_log_file_path(&self.log_file_path)
    }

    /// Returns the destination spreadsheet id for a dataset.
    pub fn spreadsheet_id(&self, dataset: Dataset) -> Result<&str, AppError> {
        let (id, env_name) = match dataset {
            Dataset::Players => (&self.players_spreadsheet_id, env_vars::PLAYERS_SPREADSHEET_ID),
            Dataset::Teams => (&self.teams_spreadsheet_id, env_vars::TEAMS_SPREADSHEET_ID),
        };
        id.as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                AppError::config_error(format!(
                    "No destination spreadsheet configured for {} (set {env_name})",
                    dataset.name()
                ))
            })
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Prints the effective configuration to stdout.
    pub fn display(&self) {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let years = self
            .allowed_season_end_years
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{config_path}");
        if !Path::new(&config_path).exists() {
            println!("(not present, using defaults and environment)");
        }
        println!("────────────────────────────────────");
        println!("Players Spreadsheet:");
        println!("{}", self.players_spreadsheet_id.as_deref().unwrap_or("(not set)"));
        println!("Teams Spreadsheet:");
        println!("{}", self.teams_spreadsheet_id.as_deref().unwrap_or("(not set)"));
        println!("────────────────────────────────────");
        println!("Lookback Window:");
        println!("{} hours", self.lookback_hours);
        println!("Allowed Season-End Years:");
        println!("{years}");
        println!("────────────────────────────────────");
        println!("Dataset URL:");
        println!("{}", self.dataset_base_url);
        println!("Sheets API:");
        println!("{}", self.sheets_api_domain);
        println!("HTTP Timeout:");
        println!("{} seconds", self.http_timeout_seconds);
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &self.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/{DEFAULT_LOG_FILE_NAME}");
            println!("(Default location)");
        }
    }
}
