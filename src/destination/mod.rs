//! Destination spreadsheet abstraction.
//!
//! The sync pipeline only needs four capabilities from the destination, so
//! they live behind [`SheetStore`]. [`crate::data_fetcher::api::SheetsClient`]
//! talks to Google Sheets; [`MemorySheet`] keeps tabs in memory.

pub mod memory;

pub use memory::{MemorySheet, SheetOperation};

use crate::data_fetcher::models::{Dataset, RecordKey};
use crate::error::AppError;
use std::collections::HashSet;

#[allow(async_fn_in_trait)]
pub trait SheetStore {
    /// Titles of every tab in the spreadsheet.
    async fn tab_titles(&self) -> Result<HashSet<String>, AppError>;

    /// Creates an empty tab and writes `headers` as its first row.
    async fn create_tab(&self, tab: &str, headers: &[&str]) -> Result<(), AppError>;

    /// Keys of the data rows already in `tab`. The header row, rows shorter
    /// than the key columns and rows with an empty key part are ignored.
    async fn read_existing_keys(
        &self,
        tab: &str,
        dataset: Dataset,
    ) -> Result<HashSet<RecordKey>, AppError>;

    /// Appends `rows` after the last data row of `tab` in a single call and
    /// returns how many rows were written.
    async fn append_rows(
        &self,
        tab: &str,
        dataset: Dataset,
        rows: Vec<Vec<String>>,
    ) -> Result<usize, AppError>;
}

/// Extracts keys from rows of a tab, skipping the header row.
///
/// `rows` start at the tab's first row, and `offset` is the index of the
/// first column present in each row (0 when rows start at column A).
pub fn keys_from_rows(
    rows: &[Vec<String>],
    dataset: Dataset,
    offset: usize,
) -> HashSet<RecordKey> {
    let layout = dataset.key_layout();
    let entity = layout.entity_index - offset;
    let game = layout.game_index - offset;

    rows.iter()
        .skip(1)
        .filter_map(|row| {
            let key = RecordKey::new(row.get(entity)?, row.get(game)?);
            (!key.is_incomplete()).then_some(key)
        })
        .collect()
}
