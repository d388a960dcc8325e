use crate::constants::EASTERN_OFFSET_SECONDS;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

/// Formats without a zone designator. The dataset's timestamps are Eastern
/// even when they end in a literal `Z`, so that suffix is matched as text
/// here before any offset-aware parsing is attempted.
const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %I:%M %p",
];

/// Formats carrying an explicit numeric offset.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%z"];

/// The dataset's Eastern reference offset (UTC-5, no daylight saving).
pub fn eastern_offset() -> FixedOffset {
    FixedOffset::west_opt(EASTERN_OFFSET_SECONDS).expect("UTC-5 is a valid fixed offset")
}

/// Parses a `gameDateTimeEst` cell.
///
/// Accepts the layouts the dataset has used over time. Values without an
/// offset are pinned to UTC-5; values with an offset keep it, so the calendar
/// month used for season routing is the one printed in the cell.
///
/// Returns `None` for empty or unrecognized input.
///
/// # Examples
///
/// ```
/// use nba_sheet_sync::data_fetcher::processors::parse_game_datetime;
/// use chrono::{Datelike, Timelike};
///
/// let dt = parse_game_datetime("2025-10-25 20:00:00").unwrap();
/// assert_eq!((dt.month(), dt.day(), dt.hour()), (10, 25, 20));
/// assert_eq!(dt.offset().utc_minus_local(), 5 * 3600);
/// ```
pub fn parse_game_datetime(raw: &str) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let eastern = eastern_offset();

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return eastern.from_local_datetime(&naive).single();
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| eastern.from_local_datetime(&naive).single())
}
