//! Google Sheets v4 REST client implementing [`SheetStore`].

use reqwest::Client;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, instrument};

use crate::constants::env_vars;
use crate::data_fetcher::api::fetch_utils::{fetch_json, send_checked};
use crate::data_fetcher::api::urls::{
    a1_cell, a1_range, build_append_url, build_batch_update_url, build_spreadsheet_url,
    build_values_url,
};
use crate::data_fetcher::models::{
    AppendValuesResponse, BatchUpdateRequest, Dataset, RecordKey, SpreadsheetMeta, ValueRange,
    cell_text, column_letter,
};
use crate::destination::{SheetStore, keys_from_rows};
use crate::error::AppError;

/// Client bound to one destination spreadsheet.
#[derive(Clone)]
pub struct SheetsClient {
    client: Client,
    api_domain: String,
    spreadsheet_id: String,
    access_token: String,
}

impl fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsClient")
            .field("api_domain", &self.api_domain)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .finish_non_exhaustive()
    }
}

impl SheetsClient {
    pub fn new(
        client: Client,
        api_domain: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        SheetsClient {
            client,
            api_domain: api_domain.into(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Builds a client with the bearer token taken from `GOOGLE_ACCESS_TOKEN`.
    ///
    /// # Errors
    /// * `AppError::Config` - the token variable is unset or empty
    pub fn from_env(
        client: Client,
        api_domain: impl Into<String>,
        spreadsheet_id: impl Into<String>,
    ) -> Result<Self, AppError> {
        let token = std::env::var(env_vars::GOOGLE_ACCESS_TOKEN)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                AppError::config_error(format!(
                    "{} is not set; the Sheets API needs an OAuth access token",
                    env_vars::GOOGLE_ACCESS_TOKEN
                ))
            })?;
        Ok(Self::new(client, api_domain, spreadsheet_id, token.trim()))
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Maps a "range cannot be parsed" 400 to a sheet error naming the tab.
    fn tab_error(tab: &str, err: AppError) -> AppError {
        match err {
            AppError::ApiClientError {
                status: 400,
                message,
                ..
            } => AppError::sheet_error(tab, message),
            other => other,
        }
    }
}

impl SheetStore for SheetsClient {
    #[instrument(skip(self), fields(spreadsheet = %self.spreadsheet_id))]
    async fn tab_titles(&self) -> Result<HashSet<String>, AppError> {
        let url = build_spreadsheet_url(&self.api_domain, &self.spreadsheet_id)?;
        let request = self.client.get(url.clone()).bearer_auth(&self.access_token);
        let meta: SpreadsheetMeta = fetch_json(request, url.as_str()).await?;

        let titles: HashSet<String> = meta.sheets.into_iter().map(|s| s.properties.title).collect();
        debug!("Spreadsheet has {} tabs", titles.len());
        Ok(titles)
    }

    #[instrument(skip(self, headers), fields(spreadsheet = %self.spreadsheet_id))]
    async fn create_tab(&self, tab: &str, headers: &[&str]) -> Result<(), AppError> {
        let url = build_batch_update_url(&self.api_domain, &self.spreadsheet_id)?;
        let request = self
            .client
            .post(url.clone())
            .bearer_auth(&self.access_token)
            .json(&BatchUpdateRequest::add_sheet(tab));
        send_checked(request, url.as_str())
            .await
            .map_err(|e| Self::tab_error(tab, e))?;

        let mut url =
            build_values_url(&self.api_domain, &self.spreadsheet_id, &a1_cell(tab, "A1"))?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let header_row = vec![headers.iter().map(|h| h.to_string()).collect()];
        let request = self
            .client
            .put(url.clone())
            .bearer_auth(&self.access_token)
            .json(&ValueRange::from_rows(header_row));
        send_checked(request, url.as_str())
            .await
            .map_err(|e| Self::tab_error(tab, e))?;

        info!("Created new tab: {tab}");
        Ok(())
    }

    #[instrument(skip(self), fields(spreadsheet = %self.spreadsheet_id))]
    async fn read_existing_keys(
        &self,
        tab: &str,
        dataset: Dataset,
    ) -> Result<HashSet<RecordKey>, AppError> {
        let layout = dataset.key_layout();
        let range = a1_range(
            tab,
            &column_letter(layout.first_index()),
            &column_letter(layout.last_index()),
        );
        let mut url = build_values_url(&self.api_domain, &self.spreadsheet_id, &range)?;
        url.query_pairs_mut()
            .append_pair("valueRenderOption", "UNFORMATTED_VALUE");

        let request = self.client.get(url.clone()).bearer_auth(&self.access_token);
        let values: ValueRange = fetch_json(request, url.as_str())
            .await
            .map_err(|e| Self::tab_error(tab, e))?;

        let rows: Vec<Vec<String>> = values
            .values
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        debug!("Read {} rows from {range}", rows.len());
        Ok(keys_from_rows(&rows, dataset, layout.first_index()))
    }

    #[instrument(skip(self, rows), fields(spreadsheet = %self.spreadsheet_id, rows = rows.len()))]
    async fn append_rows(
        &self,
        tab: &str,
        dataset: Dataset,
        rows: Vec<Vec<String>>,
    ) -> Result<usize, AppError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let written = rows.len();
        let last_column = column_letter(dataset.expected_headers().len() - 1);
        let range = a1_range(tab, "A", &last_column);
        let url = build_append_url(&self.api_domain, &self.spreadsheet_id, &range)?;

        let request = self
            .client
            .post(url.clone())
            .bearer_auth(&self.access_token)
            .json(&ValueRange::from_rows(rows));
        let response: AppendValuesResponse = fetch_json(request, url.as_str())
            .await
            .map_err(|e| Self::tab_error(tab, e))?;

        let updated = response
            .updates
            .and_then(|u| u.updated_rows)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(written);
        debug!("Sheets reported {updated} updated rows");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::http_client::create_test_http_client;
    use crate::data_fetcher::models::dataset::PLAYER_HEADERS;
    use serde_json::json;
    use serial_test::serial;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SHEET_ID: &str = "sheet123";

    fn client_for(server: &MockServer) -> SheetsClient {
        SheetsClient::new(create_test_http_client(), server.uri(), SHEET_ID, "token-abc")
    }

    #[tokio::test]
    async fn test_tab_titles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet123"))
            .and(query_param("fields", "sheets.properties.title"))
            .and(header("authorization", "Bearer token-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sheets": [
                    {"properties": {"title": "players-2025"}},
                    {"properties": {"title": "players-2026"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let titles = client_for(&server).tab_titles().await.unwrap();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains("players-2026"));
    }

    #[tokio::test]
    async fn test_create_tab_adds_sheet_and_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sheet123:batchUpdate"))
            .and(body_json(json!({
                "requests": [{"addSheet": {"properties": {"title": "players-2026"}}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v4/spreadsheets/sheet123/values/'players-2026'!A1"))
            .and(query_param("valueInputOption", "RAW"))
            .and(body_json(json!({
                "majorDimension": "ROWS",
                "values": [["personId", "gameId"]]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .create_tab("players-2026", &["personId", "gameId"])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_read_existing_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet123/values/'players-2026'!C:D"))
            .and(query_param("valueRenderOption", "UNFORMATTED_VALUE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "range": "'players-2026'!C1:D4",
                "majorDimension": "ROWS",
                "values": [
                    ["personId", "gameId"],
                    [1629029, 22500001],
                    ["203999"],
                    ["1630162", "0022500002"]
                ]
            })))
            .mount(&server)
            .await;

        let keys = client_for(&server)
            .read_existing_keys("players-2026", Dataset::Players)
            .await
            .unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&RecordKey::new("1629029", "22500001")));
        assert!(keys.contains(&RecordKey::new("1630162", "22500002")));
    }

    #[tokio::test]
    async fn test_read_existing_keys_empty_tab() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet123/values/'2026'!A:E"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"range": "'2026'!A1:E1000", "majorDimension": "ROWS"})),
            )
            .mount(&server)
            .await;

        let keys = client_for(&server)
            .read_existing_keys("2026", Dataset::Teams)
            .await
            .unwrap();
        assert!(keys.is_empty());
    }

    #[tokio::test]
    async fn test_append_rows() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sheet123/values/'players-2026'!A:AI:append"))
            .and(query_param("valueInputOption", "RAW"))
            .and(query_param("insertDataOption", "INSERT_ROWS"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "spreadsheetId": SHEET_ID,
                "updates": {"updatedRange": "'players-2026'!A10:AI11", "updatedRows": 2}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let row: Vec<String> = PLAYER_HEADERS.iter().map(|h| h.to_string()).collect();
        let written = client_for(&server)
            .append_rows("players-2026", Dataset::Players, vec![row.clone(), row])
            .await
            .unwrap();
        assert_eq!(written, 2);
    }

    #[tokio::test]
    async fn test_append_nothing_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let written = client_for(&server)
            .append_rows("players-2026", Dataset::Players, vec![])
            .await
            .unwrap();
        assert_eq!(written, 0);
    }

    #[tokio::test]
    async fn test_unauthorized_is_write_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"code": 401, "message": "Request had invalid authentication credentials."}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).tab_titles().await.unwrap_err();
        assert!(matches!(err, AppError::ApiUnauthorized { status: 401, .. }));
        assert_eq!(err.kind(), crate::error::ErrorKind::Write);
    }

    #[tokio::test]
    async fn test_bad_range_becomes_sheet_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "Unable to parse range: 'players-2031'!C:D"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .read_existing_keys("players-2031", Dataset::Players)
            .await
            .unwrap_err();
        match err {
            AppError::Sheet { tab, message } => {
                assert_eq!(tab, "players-2031");
                assert!(message.contains("Unable to parse range"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_token() {
        let previous = std::env::var(env_vars::GOOGLE_ACCESS_TOKEN).ok();

        unsafe { std::env::remove_var(env_vars::GOOGLE_ACCESS_TOKEN) };
        let err = SheetsClient::from_env(create_test_http_client(), "https://x.test", "id")
            .unwrap_err();
        assert!(err.to_string().contains(env_vars::GOOGLE_ACCESS_TOKEN));

        unsafe { std::env::set_var(env_vars::GOOGLE_ACCESS_TOKEN, " tok ") };
        let client =
            SheetsClient::from_env(create_test_http_client(), "https://x.test", "id").unwrap();
        assert_eq!(client.access_token, "tok");
        assert!(!format!("{client:?}").contains("tok"));

        match previous {
            Some(v) => unsafe { std::env::set_var(env_vars::GOOGLE_ACCESS_TOKEN, v) },
            None => unsafe { std::env::remove_var(env_vars::GOOGLE_ACCESS_TOKEN) },
        }
    }
}
