//! Shared request execution and response checking for every remote call.
//!
//! No retries: a failed request fails the run and the next scheduled run
//! picks up where this one stopped.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use crate::error::AppError;

/// Longest response body excerpt carried into error messages and logs.
const BODY_PREVIEW_CHARS: usize = 300;

/// Sends a request and turns transport failures and non-2xx statuses into
/// [`AppError`]s.
#[instrument(skip(request))]
pub(crate) async fn send_checked(
    request: RequestBuilder,
    url: &str,
) -> Result<Response, AppError> {
    let response = match request.send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!("Request failed for URL {}: {}", url, e);
            return Err(if e.is_timeout() {
                AppError::network_timeout(url)
            } else if e.is_connect() {
                AppError::network_connection(url, e.to_string())
            } else {
                AppError::ApiFetch(e)
            });
        }
    };

    let status = response.status();
    debug!("Response status: {status}");
    if status.is_success() {
        return Ok(response);
    }

    // Google puts the actual reason in a JSON error body
    let body = response.text().await.unwrap_or_default();
    let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    error!("HTTP {} (URL: {}): {}", status.as_u16(), url, preview);

    Err(map_status_error(status, &preview, url))
}

/// Maps a non-success status to the matching error variant.
pub(crate) fn map_status_error(status: StatusCode, body_preview: &str, url: &str) -> AppError {
    let status_code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown error");
    let message = if body_preview.trim().is_empty() {
        reason.to_string()
    } else {
        format!("{reason}: {}", body_preview.trim())
    };

    match status_code {
        404 => AppError::api_not_found(url),
        401 | 403 => AppError::api_unauthorized(status_code, message, url),
        429 => AppError::api_rate_limit(message, url),
        400..=499 => AppError::api_client_error(status_code, message, url),
        502 | 503 => AppError::api_service_unavailable(status_code, message, url),
        _ => AppError::api_server_error(status_code, message, url),
    }
}

/// Reads a successful response body as JSON.
///
/// An empty body is reported as missing data, a body that is not JSON at all
/// as an unexpected structure, and JSON of the wrong shape as a parse error.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    url: &str,
) -> Result<T, AppError> {
    let text = response.text().await.map_err(|e| {
        error!("Failed to read response text from URL {}: {}", url, e);
        AppError::ApiFetch(e)
    })?;
    parse_json_body(&text, url)
}

pub(crate) fn parse_json_body<T: DeserializeOwned>(text: &str, url: &str) -> Result<T, AppError> {
    serde_json::from_str::<T>(text).map_err(|e| {
        error!("Failed to parse API response: {} (URL: {})", e, url);
        let trimmed = text.trim_start();
        if trimmed.is_empty() {
            AppError::api_no_data("Response body is empty", url)
        } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
            AppError::api_unexpected_structure(
                format!(
                    "Response is not JSON: {}",
                    trimmed.chars().take(BODY_PREVIEW_CHARS).collect::<String>()
                ),
                url,
            )
        } else {
            AppError::ApiParse(e)
        }
    })
}

/// Sends a request and decodes the JSON body of a successful response.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    url: &str,
) -> Result<T, AppError> {
    let response = send_checked(request, url).await?;
    read_json(response, url).await
}
