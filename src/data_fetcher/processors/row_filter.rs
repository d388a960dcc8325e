use crate::data_fetcher::models::StatRecord;
use crate::data_fetcher::processors::season_router::season_end_year;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeSet;

/// Closed time range `[end - lookback, end]` selecting candidate rows.
///
/// Both ends are inclusive: a game that started exactly `lookback` ago is
/// still a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl LookbackWindow {
    /// A lookback reaching past the earliest representable time starts there.
    pub fn ending_at(now: DateTime<Utc>, lookback_hours: u32) -> Self {
        let start = now
            .checked_sub_signed(Duration::hours(i64::from(lookback_hours)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        LookbackWindow { start, end: now }
    }

    pub fn contains<Tz: TimeZone>(&self, t: &DateTime<Tz>) -> bool {
        let t = t.with_timezone(&Utc);
        self.start <= t && t <= self.end
    }
}

/// Why a record was or was not selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Keep,
    /// Season-end year is not in the allowed set
    SeasonNotAllowed,
    OutsideWindow,
}

/// Per-reason counts of rejected records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCounts {
    pub kept: usize,
    pub season_not_allowed: usize,
    pub outside_window: usize,
}

impl FilterCounts {
    pub fn record(&mut self, decision: FilterDecision) {
        match decision {
            FilterDecision::Keep => self.kept += 1,
            FilterDecision::SeasonNotAllowed => self.season_not_allowed += 1,
            FilterDecision::OutsideWindow => self.outside_window += 1,
        }
    }
}

/// Selects candidate rows for one run.
#[derive(Debug, Clone)]
pub struct RowFilter {
    window: LookbackWindow,
    allowed_years: BTreeSet<i32>,
}

impl RowFilter {
    pub fn new(window: LookbackWindow, allowed_season_end_years: &[i32]) -> Self {
        RowFilter {
            window,
            allowed_years: allowed_season_end_years.iter().copied().collect(),
        }
    }

    /// Season eligibility is checked first, so a record from a disallowed
    /// season is rejected for that reason even when it is inside the window.
    pub fn classify(&self, record: &StatRecord) -> FilterDecision {
        if !self
            .allowed_years
            .contains(&season_end_year(&record.game_time))
        {
            FilterDecision::SeasonNotAllowed
        } else if !self.window.contains(&record.game_time) {
            FilterDecision::OutsideWindow
        } else {
            FilterDecision::Keep
        }
    }

    pub fn accepts(&self, record: &StatRecord) -> bool {
        self.classify(record) == FilterDecision::Keep
    }

    /// Keeps the accepted records, in input order.
    pub fn apply<I>(&self, records: I) -> Vec<StatRecord>
    where
        I: IntoIterator<Item = StatRecord>,
    {
        records.into_iter().filter(|r| self.accepts(r)).collect()
    }
}

/// Records whose game started within `lookback_hours` of `now` and whose
/// season-end year is allowed.
pub fn filter_records<I>(
    records: I,
    now: DateTime<Utc>,
    lookback_hours: u32,
    allowed_season_end_years: &[i32],
) -> Vec<StatRecord>
where
    I: IntoIterator<Item = StatRecord>,
{
    RowFilter::new(
        LookbackWindow::ending_at(now, lookback_hours),
        allowed_season_end_years,
    )
    .apply(records)
}
