//! NBA box-score importer library
//!
//! Imports recently played games from the historical NBA box-score dataset
//! into a Google Sheet with one tab per season. A run downloads the dataset,
//! keeps the rows whose game started within the lookback window and whose
//! season is allowed, routes each row to the tab of its season
//! (`players-<season end year>`), and appends only the rows whose key is not
//! in that tab yet. Runs are idempotent.
//!
//! # Examples
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use nba_sheet_sync::data_fetcher::api::{
//!     SheetsClient, create_http_client_with_timeout, fetch_dataset,
//! };
//! use nba_sheet_sync::data_fetcher::models::Dataset;
//! use nba_sheet_sync::error::AppError;
//! use nba_sheet_sync::sync::{SyncSettings, run_sync};
//! use nba_sheet_sync::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
//!     let sheets = SheetsClient::from_env(
//!         client.clone(),
//!         &config.sheets_api_domain,
//!         config.spreadsheet_id(Dataset::Players)?,
//!     )?;
//!
//!     let csv = fetch_dataset(&client, &config.dataset_base_url, Dataset::Players, None).await?;
//!     let settings = SyncSettings::from_config(&config, Dataset::Players);
//!     let report = run_sync(&sheets, csv.as_slice(), &settings, Utc::now()).await?;
//!
//!     println!("Appended {} rows", report.total_appended());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod destination;
pub mod error;
pub mod sync;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::models::{Dataset, RecordKey, StatRecord};
pub use destination::{MemorySheet, SheetStore};
pub use error::{AppError, ErrorKind};
pub use sync::{SyncReport, SyncSettings, run_sync};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
