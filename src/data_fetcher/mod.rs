pub mod api;
pub mod models;
pub mod processors;

pub use api::{DatasetCredentials, SheetsClient, fetch_dataset, read_local_dataset};
pub use models::{Dataset, RecordKey, StatRecord};
