//! Retrieval of a dataset CSV, either downloaded or from a local file.

use reqwest::Client;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::constants::env_vars;
use crate::data_fetcher::api::fetch_utils::send_checked;
use crate::data_fetcher::api::urls::build_dataset_url;
use crate::data_fetcher::models::Dataset;
use crate::error::AppError;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Basic-auth credentials for the dataset host.
///
/// Only ever read from the environment; never written to the config file.
#[derive(Clone)]
pub struct DatasetCredentials {
    pub username: String,
    pub key: String,
}

impl std::fmt::Debug for DatasetCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetCredentials")
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl DatasetCredentials {
    /// Both `KAGGLE_USERNAME` and `KAGGLE_KEY` set and non-empty.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = lookup(env_vars::KAGGLE_USERNAME).filter(|v| !v.trim().is_empty())?;
        let key = lookup(env_vars::KAGGLE_KEY).filter(|v| !v.trim().is_empty())?;
        Some(DatasetCredentials { username, key })
    }
}

/// Downloads the dataset file and returns the CSV bytes, unpacking a ZIP
/// payload when the host wraps the file in one.
///
/// # Errors
/// * HTTP failures map as for every other request
/// * `AppError::ApiNoData` - the response body is empty
/// * `AppError::Archive` - a ZIP payload is corrupt or lacks the CSV
#[instrument(skip(client, credentials))]
pub async fn fetch_dataset(
    client: &Client,
    base_url: &str,
    dataset: Dataset,
    credentials: Option<&DatasetCredentials>,
) -> Result<Vec<u8>, AppError> {
    let url = build_dataset_url(base_url, dataset.file_name());
    info!("Downloading {} from {url}", dataset.file_name());

    let mut request = client.get(&url);
    if let Some(creds) = credentials {
        request = request.basic_auth(&creds.username, Some(&creds.key));
    }

    let response = send_checked(request, &url).await?;
    let body = response.bytes().await.map_err(AppError::ApiFetch)?;
    if body.is_empty() {
        return Err(AppError::api_no_data("Dataset download is empty", url));
    }
    info!("Downloaded {} bytes", body.len());

    extract_csv(body.to_vec(), dataset.file_name())
}

/// Reads a dataset file from disk. ZIP archives are accepted as well.
pub async fn read_local_dataset(path: &Path, dataset: Dataset) -> Result<Vec<u8>, AppError> {
    info!("Reading {} from {}", dataset.file_name(), path.display());
    let bytes = tokio::fs::read(path).await?;
    extract_csv(bytes, dataset.file_name())
}

/// Returns the bytes unchanged unless they form a ZIP archive, in which case
/// the entry named `file_name` is extracted.
///
/// An archive holding a single CSV under another name is accepted too.
pub fn extract_csv(bytes: Vec<u8>, file_name: &str) -> Result<Vec<u8>, AppError> {
    if !bytes.starts_with(ZIP_MAGIC) {
        return Ok(bytes);
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let entry_name = {
        let names: Vec<&str> = archive.file_names().collect();
        debug!("Archive entries: {:?}", names);

        let suffix = format!("/{file_name}");
        let csv_entries: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| n.to_ascii_lowercase().ends_with(".csv"))
            .collect();

        names
            .iter()
            .copied()
            .find(|n| *n == file_name || n.ends_with(&suffix))
            .or(match csv_entries.as_slice() {
                [only] => Some(*only),
                _ => None,
            })
            .map(str::to_string)
            .ok_or(zip::result::ZipError::FileNotFound)?
    };

    let mut entry = archive.by_name(&entry_name)?;
    let mut csv = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
    entry.read_to_end(&mut csv)?;
    info!("Extracted {entry_name} ({} bytes)", csv.len());
    Ok(csv)
}
