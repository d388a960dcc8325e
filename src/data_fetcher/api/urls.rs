//! URL building utilities for the dataset source and the Sheets API

use crate::error::AppError;
use reqwest::Url;

/// Builds the download URL of a single dataset file.
///
/// # Example
/// ```
/// use nba_sheet_sync::data_fetcher::api::build_dataset_url;
///
/// let url = build_dataset_url("https://data.example.com/download/nba/", "PlayerStatistics.csv");
/// assert_eq!(url, "https://data.example.com/download/nba/PlayerStatistics.csv");
/// ```
pub fn build_dataset_url(base_url: &str, file_name: &str) -> String {
    format!("{}/{file_name}", base_url.trim_end_matches('/'))
}

/// Quotes a tab title for use in an A1 range. Embedded quotes are doubled.
///
/// # Example
/// ```
/// use nba_sheet_sync::data_fetcher::api::a1_range;
///
/// assert_eq!(a1_range("players-2026", "C", "D"), "'players-2026'!C:D");
/// assert_eq!(a1_range("Bob's", "A", "A"), "'Bob''s'!A:A");
/// ```
pub fn a1_range(tab: &str, first_column: &str, last_column: &str) -> String {
    format!("{}!{first_column}:{last_column}", quote_tab(tab))
}

/// Range addressing a single cell, e.g. `'players-2026'!A1`.
pub fn a1_cell(tab: &str, cell: &str) -> String {
    format!("{}!{cell}", quote_tab(tab))
}

fn quote_tab(tab: &str) -> String {
    format!("'{}'", tab.replace('\'', "''"))
}

/// `{domain}/v4/spreadsheets/` followed by `segments`.
///
/// Segments are percent-encoded individually, so a range such as
/// `'players-2026'!C:D` stays one segment.
fn build_sheets_url(api_domain: &str, segments: &[&str]) -> Result<Url, AppError> {
    let mut url = Url::parse(api_domain).map_err(|e| {
        AppError::config_error(format!("Invalid Sheets API domain '{api_domain}': {e}"))
    })?;
    url.path_segments_mut()
        .map_err(|_| {
            AppError::config_error(format!("Sheets API domain '{api_domain}' cannot be a base URL"))
        })?
        .pop_if_empty()
        .extend(["v4", "spreadsheets"])
        .extend(segments);
    Ok(url)
}

/// Spreadsheet metadata endpoint, limited to the tab titles.
///
/// # Example
/// ```
/// use nba_sheet_sync::data_fetcher::api::build_spreadsheet_url;
///
/// let url = build_spreadsheet_url("https://sheets.example.com", "abc").unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://sheets.example.com/v4/spreadsheets/abc?fields=sheets.properties.title"
/// );
/// ```
pub fn build_spreadsheet_url(api_domain: &str, spreadsheet_id: &str) -> Result<Url, AppError> {
    let mut url = build_sheets_url(api_domain, &[spreadsheet_id])?;
    url.query_pairs_mut()
        .append_pair("fields", "sheets.properties.title");
    Ok(url)
}

/// `spreadsheets.batchUpdate` endpoint.
pub fn build_batch_update_url(api_domain: &str, spreadsheet_id: &str) -> Result<Url, AppError> {
    build_sheets_url(api_domain, &[&format!("{spreadsheet_id}:batchUpdate")])
}

/// `spreadsheets.values` endpoint for reading or overwriting a range.
///
/// # Example
/// ```
/// use nba_sheet_sync::data_fetcher::api::build_values_url;
///
/// let url = build_values_url("https://sheets.example.com", "abc", "'players-2026'!C:D").unwrap();
/// assert_eq!(
///     url.path(),
///     "/v4/spreadsheets/abc/values/'players-2026'!C:D"
/// );
/// ```
pub fn build_values_url(
    api_domain: &str,
    spreadsheet_id: &str,
    range: &str,
) -> Result<Url, AppError> {
    build_sheets_url(api_domain, &[spreadsheet_id, "values", range])
}

/// `spreadsheets.values.append` endpoint, inserting new rows as raw values.
pub fn build_append_url(
    api_domain: &str,
    spreadsheet_id: &str,
    range: &str,
) -> Result<Url, AppError> {
    let mut url = build_sheets_url(
        api_domain,
        &[spreadsheet_id, "values", &format!("{range}:append")],
    )?;
    url.query_pairs_mut()
        .append_pair("valueInputOption", "RAW")
        .append_pair("insertDataOption", "INSERT_ROWS");
    Ok(url)
}
