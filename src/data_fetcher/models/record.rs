use chrono::{DateTime, FixedOffset};
use std::fmt;

/// Natural key of a box-score row within one destination tab.
///
/// For the player dataset this is `(personId, gameId)`, for the team dataset
/// `(teamId, gameId)`. Both parts are stored normalized so that a value read
/// back from the sheet compares equal to the same value parsed from the CSV.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub entity_id: String,
    pub game_id: String,
}

impl RecordKey {
    pub fn new(entity_id: &str, game_id: &str) -> Self {
        RecordKey {
            entity_id: normalize_id(entity_id),
            game_id: normalize_id(game_id),
        }
    }

    /// Either part empty after normalization.
    pub fn is_incomplete(&self) -> bool {
        self.entity_id.is_empty() || self.game_id.is_empty()
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.entity_id, self.game_id)
    }
}

/// Canonical text form of an identifier.
///
/// Identifiers reach us either as CSV text or as sheet cells, where a numeric
/// cell may come back as `1629029`, `1629029.0` or a zero-padded string.
/// Purely numeric values lose leading zeros and an all-zero fraction;
/// anything else is only trimmed.
pub fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim();
    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (trimmed, None),
    };

    let is_integral = !int_part.is_empty()
        && int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.is_none_or(|f| f.bytes().all(|b| b == b'0'));
    if !is_integral {
        return trimmed.to_string();
    }

    let stripped = int_part.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// One parsed dataset row.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRecord {
    pub key: RecordKey,
    /// Game start in the dataset's Eastern reference time
    pub game_time: DateTime<FixedOffset>,
    /// Cell values in the dataset's expected header order
    pub values: Vec<String>,
}

impl StatRecord {
    /// Row as written to the sheet.
    pub fn to_row(&self) -> Vec<String> {
        self.values.clone()
    }
}
