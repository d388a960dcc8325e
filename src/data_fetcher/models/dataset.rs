use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Name of the timestamp column shared by both datasets.
pub const DATE_COLUMN: &str = "gameDateTimeEst";

/// Column order of `PlayerStatistics.csv` as written to the sheet (A..AI).
pub const PLAYER_HEADERS: [&str; 35] = [
    "firstName",
    "lastName",
    "personId",
    "gameId",
    "gameDateTimeEst",
    "playerteamCity",
    "playerteamName",
    "opponentteamCity",
    "opponentteamName",
    "gameType",
    "gameLabel",
    "gameSubLabel",
    "seriesGameNumber",
    "win",
    "home",
    "numMinutes",
    "points",
    "assists",
    "blocks",
    "steals",
    "fieldGoalsAttempted",
    "fieldGoalsMade",
    "fieldGoalsPercentage",
    "threePointersAttempted",
    "threePointersMade",
    "threePointersPercentage",
    "freeThrowsAttempted",
    "freeThrowsMade",
    "freeThrowsPercentage",
    "reboundsDefensive",
    "reboundsOffensive",
    "reboundsTotal",
    "foulsPersonal",
    "turnovers",
    "plusMinusPoints",
];

/// Column order of `TeamStatistics.csv` as written to the sheet (A..AV).
pub const TEAM_HEADERS: [&str; 48] = [
    "gameId",
    "gameDateTimeEst",
    "teamCity",
    "teamName",
    "teamId",
    "opponentTeamCity",
    "opponentTeamName",
    "opponentTeamId",
    "home",
    "win",
    "teamScore",
    "opponentScore",
    "assists",
    "blocks",
    "steals",
    "fieldGoalsAttempted",
    "fieldGoalsMade",
    "fieldGoalsPercentage",
    "threePointersAttempted",
    "threePointersMade",
    "threePointersPercentage",
    "freeThrowsAttempted",
    "freeThrowsMade",
    "freeThrowsPercentage",
    "reboundsDefensive",
    "reboundsOffensive",
    "reboundsTotal",
    "foulsPersonal",
    "turnovers",
    "plusMinusPoints",
    "numMinutes",
    "q1Points",
    "q2Points",
    "q3Points",
    "q4Points",
    "benchPoints",
    "biggestLead",
    "biggestScoringRun",
    "leadChanges",
    "pointsFastBreak",
    "pointsFromTurnovers",
    "pointsInThePaint",
    "pointsSecondChance",
    "timesTied",
    "timeoutsRemaining",
    "seasonWins",
    "seasonLosses",
    "coachId",
];

/// Positions of the two key columns within a dataset's header list, which
/// are also their column positions in the destination sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLayout {
    /// Column holding the entity id (`personId` or `teamId`)
    pub entity_index: usize,
    /// Column holding `gameId`
    pub game_index: usize,
}

impl KeyLayout {
    /// Leftmost key column
    pub fn first_index(&self) -> usize {
        self.entity_index.min(self.game_index)
    }

    /// Rightmost key column
    pub fn last_index(&self) -> usize {
        self.entity_index.max(self.game_index)
    }
}

/// The two box-score datasets this tool knows how to import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// One row per player per game, routed to `players-<YYYY>` tabs
    Players,
    /// One row per team per game, routed to `<YYYY>` tabs
    Teams,
}

impl Dataset {
    pub fn name(self) -> &'static str {
        match self {
            Dataset::Players => "players",
            Dataset::Teams => "teams",
        }
    }

    /// File name of the dataset inside the published snapshot.
    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::Players => "PlayerStatistics.csv",
            Dataset::Teams => "TeamStatistics.csv",
        }
    }

    /// Columns that must be present in the CSV, in the order they are
    /// written to the sheet.
    pub fn expected_headers(self) -> &'static [&'static str] {
        match self {
            Dataset::Players => &PLAYER_HEADERS,
            Dataset::Teams => &TEAM_HEADERS,
        }
    }

    /// Name of the column identifying the row's subject.
    pub fn entity_column(self) -> &'static str {
        match self {
            Dataset::Players => "personId",
            Dataset::Teams => "teamId",
        }
    }

    pub fn key_layout(self) -> KeyLayout {
        match self {
            // personId = C, gameId = D
            Dataset::Players => KeyLayout {
                entity_index: 2,
                game_index: 3,
            },
            // gameId = A, teamId = E
            Dataset::Teams => KeyLayout {
                entity_index: 4,
                game_index: 0,
            },
        }
    }

    /// Destination tab for a season, named by its ending year.
    pub fn tab_name(self, season_end_year: i32) -> String {
        match self {
            Dataset::Players => format!("players-{season_end_year}"),
            Dataset::Teams => season_end_year.to_string(),
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Converts a zero-based column index to its A1 letter (0 → A, 26 → AA).
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
