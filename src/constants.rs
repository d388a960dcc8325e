//! Application-wide constants and configuration defaults
//!
//! This module centralizes magic numbers, default endpoints and environment
//! variable names so they are not scattered through the pipeline.

/// Default timeout for HTTP requests in seconds. The player dataset is a few
/// hundred megabytes, so this is deliberately generous.
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 120;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 4;

/// Default lookback window in hours
pub const DEFAULT_LOOKBACK_HOURS: u32 = 24;

/// Upper bound on the lookback window, ten years in hours
pub const MAX_LOOKBACK_HOURS: u32 = 24 * 366 * 10;

/// Default inclusive range of allowed season-end years
pub const DEFAULT_FIRST_SEASON_END_YEAR: i32 = 2022;
pub const DEFAULT_LAST_SEASON_END_YEAR: i32 = 2026;

/// Dataset download endpoint; the file name is appended as the last path segment
pub const DEFAULT_DATASET_BASE_URL: &str =
    "https://www.kaggle.com/api/v1/datasets/download/eoinamoore/historical-nba-data-and-player-box-scores";

/// Google Sheets REST API root
pub const DEFAULT_SHEETS_API_DOMAIN: &str = "https://sheets.googleapis.com";

/// Application directory name under the platform config directory
pub const APP_DIR_NAME: &str = "nba_sheet_sync";

/// Log file name used when no custom path is configured
pub const DEFAULT_LOG_FILE_NAME: &str = "nba_sheet_sync.log";

/// Eastern reference offset applied to timestamps that carry no zone (UTC-5)
pub const EASTERN_OFFSET_SECONDS: i32 = 5 * 3600;

/// Environment variable names
pub mod env_vars {
    /// Destination spreadsheet for the player dataset
    pub const PLAYERS_SPREADSHEET_ID: &str = "DEST_SPREADSHEET_ID";

    /// Destination spreadsheet for the team dataset
    pub const TEAMS_SPREADSHEET_ID: &str = "DEST_TEAM_SPREADSHEET_ID";

    /// Lookback window in hours
    pub const LOOKBACK_HOURS: &str = "LOOKBACK_HOURS";

    /// Allowed season-end years, either `2022-2026` or `2022,2023,2024`
    pub const ALLOWED_SEASON_END_YEARS: &str = "ALLOWED_SEASON_END_YEARS";

    /// Dataset download base URL override
    pub const DATASET_URL: &str = "NBA_SYNC_DATASET_URL";

    /// Sheets API domain override
    pub const SHEETS_API: &str = "NBA_SYNC_SHEETS_API";

    /// HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "NBA_SYNC_HTTP_TIMEOUT";

    /// Log file path override
    pub const LOG_FILE: &str = "NBA_SYNC_LOG_FILE";

    /// OAuth bearer token for the Sheets API. Never persisted.
    pub const GOOGLE_ACCESS_TOKEN: &str = "GOOGLE_ACCESS_TOKEN";

    /// Optional basic-auth credentials for the dataset host. Never persisted.
    pub const KAGGLE_USERNAME: &str = "KAGGLE_USERNAME";
    pub const KAGGLE_KEY: &str = "KAGGLE_KEY";
}
