pub mod dataset;
pub mod record;
pub mod sheets;

pub use dataset::{DATE_COLUMN, Dataset, KeyLayout, column_letter};
pub use record::{RecordKey, StatRecord, normalize_id};
pub use sheets::{
    AppendValuesResponse, BatchUpdateRequest, SpreadsheetMeta, ValueRange, cell_text,
};
