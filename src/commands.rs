use crate::cli::Args;
use chrono::{DateTime, Utc};
use nba_sheet_sync::config::Config;
use nba_sheet_sync::config::validation::validate_window;
use nba_sheet_sync::data_fetcher::api::{
    DatasetCredentials, SheetsClient, create_http_client_with_timeout, fetch_dataset,
    read_local_dataset,
};
use nba_sheet_sync::error::AppError;
use nba_sheet_sync::sync::{SyncReport, SyncSettings, run_sync};
use tracing::info;

/// Applies command line overrides on top of the loaded configuration.
pub fn apply_cli_overrides(config: &mut Config, args: &Args) -> Result<(), AppError> {
    if let Some(hours) = args.lookback_hours {
        config.lookback_hours = hours;
    }
    if let Some(log_file) = &args.log_file {
        config.log_file_path = Some(log_file.clone());
    }
    validate_window(config.lookback_hours, &config.allowed_season_end_years)
}

/// Parses the `--now` override, defaulting to the current time.
pub fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    match now {
        None => Ok(Utc::now()),
        Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| {
                AppError::datetime_parse_error(format!(
                    "Invalid --now value '{raw}' (expected RFC 3339, e.g. 2025-10-26T12:00:00Z): {e}"
                ))
            }),
    }
}

/// Handles the --list-config command.
pub fn handle_list_config_command(config: &Config) {
    config.display();
}

/// Runs one import for the selected dataset.
///
/// Everything that can be checked locally (spreadsheet id, access token,
/// `--now`) is checked before the dataset is downloaded.
pub async fn handle_sync_command(args: &Args, config: &Config) -> Result<SyncReport, AppError> {
    let dataset = args.dataset;
    let now = resolve_now(args.now.as_deref())?;
    let spreadsheet_id = config.spreadsheet_id(dataset)?;

    let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
    let sheets = SheetsClient::from_env(client.clone(), &config.sheets_api_domain, spreadsheet_id)?;
    info!("Destination spreadsheet: {}", sheets.spreadsheet_id());

    let csv = match &args.input {
        Some(path) => read_local_dataset(path, dataset).await?,
        None => {
            let credentials = DatasetCredentials::from_env();
            if credentials.is_none() {
                info!("No dataset credentials in environment, downloading anonymously");
            }
            fetch_dataset(&client, &config.dataset_base_url, dataset, credentials.as_ref()).await?
        }
    };

    let settings = SyncSettings {
        dry_run: args.dry_run,
        ..SyncSettings::from_config(config, dataset)
    };
    run_sync(&sheets, csv.as_slice(), &settings, now).await
}
