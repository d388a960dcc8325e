pub mod csv_parsing;
pub mod dedup;
pub mod row_filter;
pub mod season_router;
pub mod time_parsing;

pub use csv_parsing::{DatasetReader, SkippedRows, parse_records};
pub use dedup::{DedupOutcome, dedup, dedup_with_stats};
pub use row_filter::{FilterCounts, FilterDecision, LookbackWindow, RowFilter, filter_records};
pub use season_router::{group_by_tab, route, route_for, season_end_year};
pub use time_parsing::{eastern_offset, parse_game_datetime};
