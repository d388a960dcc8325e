//! One import run: read the dataset, select recent rows, route them to
//! season tabs and append the ones the destination does not have yet.

use crate::config::Config;
use crate::data_fetcher::models::{Dataset, StatRecord};
use crate::data_fetcher::processors::{
    DatasetReader, FilterCounts, FilterDecision, LookbackWindow, RowFilter, SkippedRows,
    dedup_with_stats, group_by_tab,
};
use crate::destination::SheetStore;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::io::Read;
use tracing::{debug, info, instrument, warn};

/// Run parameters that are not tied to a particular destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub dataset: Dataset,
    pub lookback_hours: u32,
    pub allowed_season_end_years: Vec<i32>,
    /// Read the destination but never create tabs or append rows
    pub dry_run: bool,
}

impl SyncSettings {
    pub fn from_config(config: &Config, dataset: Dataset) -> Self {
        SyncSettings {
            dataset,
            lookback_hours: config.lookback_hours,
            allowed_season_end_years: config.allowed_season_end_years.clone(),
            dry_run: false,
        }
    }
}

/// What happened to one destination tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabReport {
    pub tab: String,
    /// Tab did not exist before this run
    pub created: bool,
    pub existing_keys: usize,
    pub candidates: usize,
    pub already_present: usize,
    pub repeated_in_batch: usize,
    /// Rows that were new to the tab
    pub new_rows: usize,
    /// Rows actually written (0 in a dry run)
    pub appended: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub dataset: Dataset,
    pub window: LookbackWindow,
    /// Rows parsed into records, before filtering
    pub rows_read: usize,
    pub skipped: SkippedRows,
    pub filtered: FilterCounts,
    /// Tabs touched, in tab name order
    pub tabs: Vec<TabReport>,
    pub dry_run: bool,
}

impl SyncReport {
    pub fn total_appended(&self) -> usize {
        self.tabs.iter().map(|t| t.appended).sum()
    }

    pub fn total_new_rows(&self) -> usize {
        self.tabs.iter().map(|t| t.new_rows).sum()
    }

    pub fn created_tabs(&self) -> Vec<&str> {
        self.tabs
            .iter()
            .filter(|t| t.created)
            .map(|t| t.tab.as_str())
            .collect()
    }
}

/// Selects the candidate rows of a dataset while streaming it.
///
/// Fails before returning anything if the header is missing expected columns.
pub fn select_candidates<R: Read>(
    dataset: Dataset,
    input: R,
    filter: &RowFilter,
) -> Result<(Vec<StatRecord>, usize, SkippedRows, FilterCounts), AppError> {
    let mut reader = DatasetReader::new(dataset, input)?;
    let mut candidates = Vec::new();
    let mut rows_read = 0usize;
    let mut counts = FilterCounts::default();

    for record in reader.by_ref() {
        let record = record?;
        rows_read += 1;
        let decision = filter.classify(&record);
        counts.record(decision);
        if decision == FilterDecision::Keep {
            candidates.push(record);
        }
    }

    Ok((candidates, rows_read, reader.skipped(), counts))
}

/// Runs one import against `store`.
///
/// Writes happen only after the whole input has been read and filtered, so
/// an input error never leaves a partial import behind. Tab writes are
/// independent: if an append fails, tabs handled earlier keep their rows and
/// the error ends the run.
#[instrument(skip(store, input), fields(dataset = %settings.dataset))]
pub async fn run_sync<S, R>(
    store: &S,
    input: R,
    settings: &SyncSettings,
    now: DateTime<Utc>,
) -> Result<SyncReport, AppError>
where
    S: SheetStore,
    R: Read,
{
    let dataset = settings.dataset;
    let window = LookbackWindow::ending_at(now, settings.lookback_hours);
    let filter = RowFilter::new(window, &settings.allowed_season_end_years);
    info!(
        "Cutoff: {} (now {}, lookback {}h)",
        window.start.to_rfc3339(),
        window.end.to_rfc3339(),
        settings.lookback_hours
    );

    let (candidates, rows_read, skipped, filtered) = select_candidates(dataset, input, &filter)?;
    if skipped.total() > 0 {
        warn!(
            "Skipped {} unusable rows ({} bad timestamps, {} missing keys)",
            skipped.total(),
            skipped.bad_timestamp,
            skipped.missing_key
        );
    }
    info!(
        "Rows within last {} hours (allowed seasons): {} of {rows_read}",
        settings.lookback_hours,
        candidates.len()
    );

    let mut report = SyncReport {
        dataset,
        window,
        rows_read,
        skipped,
        filtered,
        tabs: Vec::new(),
        dry_run: settings.dry_run,
    };

    if candidates.is_empty() {
        info!("Nothing new to import.");
        return Ok(report);
    }

    let by_tab = group_by_tab(dataset, candidates);
    let titles = store.tab_titles().await?;

    for (tab, records) in by_tab {
        let tab_report = sync_tab(store, dataset, &tab, records, &titles, settings.dry_run).await?;
        report.tabs.push(tab_report);
    }

    if settings.dry_run {
        info!(
            "Dry run. {} rows would be appended.",
            report.total_new_rows()
        );
    } else {
        info!("Done. Total rows appended: {}", report.total_appended());
    }
    Ok(report)
}

async fn sync_tab<S: SheetStore>(
    store: &S,
    dataset: Dataset,
    tab: &str,
    records: Vec<StatRecord>,
    titles: &HashSet<String>,
    dry_run: bool,
) -> Result<TabReport, AppError> {
    let mut tab_report = TabReport {
        tab: tab.to_string(),
        candidates: records.len(),
        ..TabReport::default()
    };

    let existing = if titles.contains(tab) {
        store.read_existing_keys(tab, dataset).await?
    } else if dry_run {
        info!("  Would create tab: {tab}");
        tab_report.created = true;
        HashSet::new()
    } else {
        store.create_tab(tab, dataset.expected_headers()).await?;
        tab_report.created = true;
        store.read_existing_keys(tab, dataset).await?
    };
    tab_report.existing_keys = existing.len();

    info!(
        "  {tab}: {} existing keys, {} candidate rows",
        existing.len(),
        records.len()
    );

    let outcome = dedup_with_stats(records, &existing);
    tab_report.already_present = outcome.already_present;
    tab_report.repeated_in_batch = outcome.repeated_in_batch;
    tab_report.new_rows = outcome.fresh.len();
    if outcome.repeated_in_batch > 0 {
        debug!(
            "  {tab}: dropped {} repeated keys within the batch",
            outcome.repeated_in_batch
        );
    }

    if outcome.fresh.is_empty() {
        info!("  {tab}: nothing new");
        return Ok(tab_report);
    }
    if dry_run {
        info!("  {tab}: would append {} rows", outcome.fresh.len());
        return Ok(tab_report);
    }

    let rows: Vec<Vec<String>> = outcome.fresh.iter().map(StatRecord::to_row).collect();
    tab_report.appended = store.append_rows(tab, dataset, rows).await?;
    info!("  Appended {} rows to {tab}", tab_report.appended);
    Ok(tab_report)
}
