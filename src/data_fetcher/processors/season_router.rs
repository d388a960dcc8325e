//! Season routing: which tab a game belongs to.
//!
//! An NBA season spans two calendar years and is named by the year it ends
//! in. Games from July onwards belong to the season ending next year.

use crate::data_fetcher::models::{Dataset, StatRecord};
use chrono::Datelike;
use std::collections::BTreeMap;

/// First month of a new season (July)
pub const SEASON_START_MONTH: u32 = 7;

/// Season-end year for a game date.
///
/// Purely month based: July–December map to the next calendar year,
/// January–June to the same year.
pub fn season_end_year<D: Datelike>(date: &D) -> i32 {
    if date.month() >= SEASON_START_MONTH {
        date.year() + 1
    } else {
        date.year()
    }
}

/// Destination tab for a player box-score line played on `date`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use nba_sheet_sync::data_fetcher::processors::route;
///
/// let opening_night = NaiveDate::from_ymd_opt(2025, 10, 25).unwrap();
/// assert_eq!(route(&opening_night), "players-2026");
/// ```
pub fn route<D: Datelike>(date: &D) -> String {
    route_for(Dataset::Players, date)
}

/// Destination tab for a game of the given dataset.
pub fn route_for<D: Datelike>(dataset: Dataset, date: &D) -> String {
    dataset.tab_name(season_end_year(date))
}

/// Buckets records by destination tab, keeping input order inside each tab.
pub fn group_by_tab(
    dataset: Dataset,
    records: Vec<StatRecord>,
) -> BTreeMap<String, Vec<StatRecord>> {
    let mut by_tab: BTreeMap<String, Vec<StatRecord>> = BTreeMap::new();
    for record in records {
        by_tab
            .entry(route_for(dataset, &record.game_time))
            .or_default()
            .push(record);
    }
    by_tab
}
