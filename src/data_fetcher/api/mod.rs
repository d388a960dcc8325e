pub mod dataset_api;
mod fetch_utils;
pub mod http_client;
pub mod sheets_api;
pub mod urls;

// Re-export URL utilities
pub use urls::*;
// Re-export HTTP client utilities
pub use http_client::create_http_client_with_timeout;
pub use dataset_api::{DatasetCredentials, extract_csv, fetch_dataset, read_local_dataset};
pub use sheets_api::SheetsClient;
