use super::{SheetStore, keys_from_rows};
use crate::data_fetcher::models::{Dataset, RecordKey};
use crate::error::AppError;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A call made against a [`MemorySheet`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetOperation {
    ListTabs,
    CreateTab(String),
    ReadKeys(String),
    Append { tab: String, rows: usize },
}

/// In-memory spreadsheet. Each tab is a list of rows, header included.
#[derive(Debug, Default)]
pub struct MemorySheet {
    tabs: Mutex<BTreeMap<String, Vec<Vec<String>>>>,
    operations: Mutex<Vec<SheetOperation>>,
    fail_appends: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tab with the given header and data rows.
    pub fn with_tab(self, tab: &str, headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        {
            let mut tabs = lock(&self.tabs);
            let all = tabs.entry(tab.to_string()).or_default();
            all.push(headers.iter().map(|h| h.to_string()).collect());
            all.extend(rows);
        }
        self
    }

    /// Rows of a tab, header included.
    pub fn rows(&self, tab: &str) -> Option<Vec<Vec<String>>> {
        lock(&self.tabs).get(tab).cloned()
    }

    /// Data rows of a tab, header excluded.
    pub fn data_rows(&self, tab: &str) -> Vec<Vec<String>> {
        self.rows(tab)
            .map(|rows| rows.into_iter().skip(1).collect())
            .unwrap_or_default()
    }

    pub fn tab_names(&self) -> Vec<String> {
        lock(&self.tabs).keys().cloned().collect()
    }

    pub fn operations(&self) -> Vec<SheetOperation> {
        lock(&self.operations).clone()
    }

    /// Makes every later append fail.
    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    fn log(&self, op: SheetOperation) {
        lock(&self.operations).push(op);
    }

    fn missing_tab(tab: &str) -> AppError {
        AppError::sheet_error(tab, "Unable to parse range: tab does not exist")
    }
}

impl SheetStore for MemorySheet {
    async fn tab_titles(&self) -> Result<HashSet<String>, AppError> {
        self.log(SheetOperation::ListTabs);
        Ok(lock(&self.tabs).keys().cloned().collect())
    }

    async fn create_tab(&self, tab: &str, headers: &[&str]) -> Result<(), AppError> {
        self.log(SheetOperation::CreateTab(tab.to_string()));
        let mut tabs = lock(&self.tabs);
        if tabs.contains_key(tab) {
            return Err(AppError::sheet_error(
                tab,
                format!("A sheet with the name \"{tab}\" already exists"),
            ));
        }
        tabs.insert(
            tab.to_string(),
            vec![headers.iter().map(|h| h.to_string()).collect()],
        );
        Ok(())
    }

    async fn read_existing_keys(
        &self,
        tab: &str,
        dataset: Dataset,
    ) -> Result<HashSet<RecordKey>, AppError> {
        self.log(SheetOperation::ReadKeys(tab.to_string()));
        let tabs = lock(&self.tabs);
        let rows = tabs.get(tab).ok_or_else(|| Self::missing_tab(tab))?;
        Ok(keys_from_rows(rows, dataset, 0))
    }

    async fn append_rows(
        &self,
        tab: &str,
        _dataset: Dataset,
        rows: Vec<Vec<String>>,
    ) -> Result<usize, AppError> {
        self.log(SheetOperation::Append {
            tab: tab.to_string(),
            rows: rows.len(),
        });
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(AppError::sheet_error(tab, "append rejected"));
        }
        let mut tabs = lock(&self.tabs);
        let existing = tabs.get_mut(tab).ok_or_else(|| Self::missing_tab(tab))?;
        let written = rows.len();
        existing.extend(rows);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_append() {
        let sheet = MemorySheet::new();
        sheet
            .create_tab("players-2026", &["firstName", "lastName", "personId", "gameId"])
            .await
            .unwrap();
        let written = sheet
            .append_rows(
                "players-2026",
                Dataset::Players,
                vec![vec!["A".into(), "B".into(), "101".into(), "X1".into()]],
            )
            .await
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(sheet.rows("players-2026").unwrap().len(), 2);
        let keys = sheet
            .read_existing_keys("players-2026", Dataset::Players)
            .await
            .unwrap();
        assert!(keys.contains(&RecordKey::new("101", "X1")));
    }

    #[tokio::test]
    async fn test_duplicate_tab_is_rejected() {
        let sheet = MemorySheet::new().with_tab("2026", &["gameId"], vec![]);
        assert!(sheet.create_tab("2026", &["gameId"]).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_tab_errors() {
        let sheet = MemorySheet::new();
        assert!(
            sheet
                .read_existing_keys("players-2030", Dataset::Players)
                .await
                .is_err()
        );
        assert!(
            sheet
                .append_rows("players-2030", Dataset::Players, vec![])
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_failing_appends_leave_tab_unchanged() {
        let sheet = MemorySheet::new().with_tab("2026", &["gameId"], vec![]);
        sheet.fail_appends(true);
        let result = sheet
            .append_rows("2026", Dataset::Teams, vec![vec!["1".into()]])
            .await;
        assert!(result.is_err());
        assert!(sheet.data_rows("2026").is_empty());
    }
}
