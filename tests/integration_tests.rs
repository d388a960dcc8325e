//! End-to-end runs against mocked dataset and Sheets endpoints.

use chrono::{DateTime, Utc};
use nba_sheet_sync::data_fetcher::api::{
    SheetsClient, create_http_client_with_timeout, fetch_dataset,
};
use nba_sheet_sync::data_fetcher::models::Dataset;
use nba_sheet_sync::data_fetcher::models::dataset::PLAYER_HEADERS;
use nba_sheet_sync::error::{AppError, ErrorKind};
use nba_sheet_sync::sync::{SyncReport, SyncSettings, run_sync};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHEET_ID: &str = "dest-sheet";

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-10-26T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn settings() -> SyncSettings {
    SyncSettings {
        dataset: Dataset::Players,
        lookback_hours: 24,
        allowed_season_end_years: (2022..=2026).collect(),
        dry_run: false,
    }
}

fn player_line(person_id: &str, game_id: &str, date: &str) -> Vec<String> {
    PLAYER_HEADERS
        .iter()
        .map(|h| match *h {
            "firstName" => "Test".to_string(),
            "lastName" => format!("Player{person_id}"),
            "personId" => person_id.to_string(),
            "gameId" => game_id.to_string(),
            "gameDateTimeEst" => date.to_string(),
            "points" => "12".to_string(),
            _ => "0".to_string(),
        })
        .collect()
}

/// Same rows as [`player_line`] but with the CSV columns in reverse order.
fn reversed_csv(rows: &[Vec<String>]) -> String {
    let mut out = PLAYER_HEADERS.iter().rev().copied().collect::<Vec<_>>().join(",");
    for row in rows {
        out.push('\n');
        out.push_str(&row.iter().rev().cloned().collect::<Vec<_>>().join(","));
    }
    out.push('\n');
    out
}

async fn serve_dataset(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/dl/PlayerStatistics.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn import(
    dataset_server: &MockServer,
    sheets_server: &MockServer,
) -> Result<SyncReport, AppError> {
    let client = create_http_client_with_timeout(30).unwrap();
    let csv = fetch_dataset(
        &client,
        &format!("{}/dl", dataset_server.uri()),
        Dataset::Players,
        None,
    )
    .await?;
    let sheets = SheetsClient::new(client, sheets_server.uri(), SHEET_ID, "test-token");
    run_sync(&sheets, csv.as_slice(), &settings(), now()).await
}

/// Rows sent in the body of the append call, if any.
async fn appended_rows(server: &MockServer) -> Vec<Vec<Value>> {
    let requests = server.received_requests().await.unwrap_or_default();
    requests
        .iter()
        .filter(|r| r.url.path().ends_with(":append"))
        .flat_map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap();
            body["values"].as_array().cloned().unwrap_or_default()
        })
        .map(|row| row.as_array().cloned().unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn test_new_season_tab_is_created_and_only_new_rows_appended() {
    let dataset_server = MockServer::start().await;
    let sheets_server = MockServer::start().await;

    let recent_new = player_line("102", "0022500005", "2025-10-25 20:00:00");
    let recent_known = player_line("101", "0022500005", "2025-10-25 20:00:00");
    let repeated = player_line("102", "0022500005", "2025-10-25 20:00:00");
    let too_old = player_line("103", "0022500001", "2025-10-20 20:00:00");
    serve_dataset(
        &dataset_server,
        reversed_csv(&[recent_new.clone(), recent_known, repeated, too_old]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{SHEET_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheets": [{"properties": {"title": "players-2025"}}]
        })))
        .expect(1)
        .mount(&sheets_server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v4/spreadsheets/{SHEET_ID}:batchUpdate")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&sheets_server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"/values/'players-2026'!A1$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&sheets_server)
        .await;
    // The freshly created tab already has a row for 101 from another writer
    Mock::given(method("GET"))
        .and(path_regex(r"/values/'players-2026'!C:D$"))
        .and(query_param("valueRenderOption", "UNFORMATTED_VALUE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [["personId", "gameId"], [101, 22500005]]
        })))
        .expect(1)
        .mount(&sheets_server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"/values/'players-2026'!A:AI:append$"))
        .and(query_param("valueInputOption", "RAW"))
        .and(query_param("insertDataOption", "INSERT_ROWS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updates": {"updatedRows": 1}
        })))
        .expect(1)
        .mount(&sheets_server)
        .await;

    let report = import(&dataset_server, &sheets_server).await.unwrap();

    assert_eq!(report.total_appended(), 1);
    assert_eq!(report.created_tabs(), vec!["players-2026"]);
    assert_eq!(report.tabs[0].already_present, 1);
    assert_eq!(report.tabs[0].repeated_in_batch, 1);
    assert_eq!(report.filtered.outside_window, 1);

    // Written in header order regardless of the CSV's column order
    let rows = appended_rows(&sheets_server).await;
    let expected: Vec<Value> = recent_new.into_iter().map(Value::String).collect();
    assert_eq!(rows, vec![expected]);
}

#[tokio::test]
async fn test_existing_tab_with_all_keys_appends_nothing() {
    let dataset_server = MockServer::start().await;
    let sheets_server = MockServer::start().await;
    serve_dataset(
        &dataset_server,
        reversed_csv(&[player_line("101", "22500005", "2025-10-25 21:00:00")]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{SHEET_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sheets": [{"properties": {"title": "players-2026"}}]
        })))
        .mount(&sheets_server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"/values/'players-2026'!C:D$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [["personId", "gameId"], ["101", "22500005"]]
        })))
        .mount(&sheets_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&sheets_server)
        .await;

    let report = import(&dataset_server, &sheets_server).await.unwrap();
    assert_eq!(report.total_appended(), 0);
    assert!(report.created_tabs().is_empty());
}

#[tokio::test]
async fn test_rejected_credentials_fail_the_run() {
    let dataset_server = MockServer::start().await;
    let sheets_server = MockServer::start().await;
    serve_dataset(
        &dataset_server,
        reversed_csv(&[player_line("101", "1", "2025-10-25 20:00:00")]),
    )
    .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": 401, "status": "UNAUTHENTICATED"}
        })))
        .mount(&sheets_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&sheets_server)
        .await;

    let err = import(&dataset_server, &sheets_server).await.unwrap_err();
    assert!(matches!(err, AppError::ApiUnauthorized { status: 401, .. }));
    assert_eq!(err.kind(), ErrorKind::Write);
}

#[tokio::test]
async fn test_missing_column_fails_before_any_sheet_call() {
    let dataset_server = MockServer::start().await;
    let sheets_server = MockServer::start().await;

    let headers: Vec<&str> = PLAYER_HEADERS
        .iter()
        .copied()
        .filter(|h| *h != "plusMinusPoints")
        .collect();
    serve_dataset(&dataset_server, format!("{}\n", headers.join(","))).await;

    let err = import(&dataset_server, &sheets_server).await.unwrap_err();
    match &err {
        AppError::MissingColumns { missing } => assert_eq!(missing, &["plusMinusPoints"]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(
        sheets_server
            .received_requests()
            .await
            .unwrap_or_default()
            .is_empty()
    );
}

#[tokio::test]
async fn test_dataset_download_failure_is_a_fetch_error() {
    let dataset_server = MockServer::start().await;
    let sheets_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&dataset_server)
        .await;

    let err = import(&dataset_server, &sheets_server).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Fetch);
    assert!(
        sheets_server
            .received_requests()
            .await
            .unwrap_or_default()
            .is_empty()
    );
}
