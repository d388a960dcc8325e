use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use nba_sheet_sync::data_fetcher::models::Dataset;
use std::path::PathBuf;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// NBA box-score importer
///
/// Downloads the historical NBA box-score dataset, keeps the games played
/// within the lookback window, and appends the rows a season tab of the
/// destination Google Sheet does not have yet.
///
/// Meant to run on a schedule. Destination spreadsheet ids and credentials
/// come from the environment:
/// - DEST_SPREADSHEET_ID / DEST_TEAM_SPREADSHEET_ID
/// - GOOGLE_ACCESS_TOKEN (OAuth bearer token for the Sheets API)
/// - KAGGLE_USERNAME / KAGGLE_KEY (optional, dataset download)
#[derive(Parser, Debug)]
#[command(author = "Niko Salonen", version, about, long_about)]
#[command(styles = get_styles())]
pub struct Args {
    /// Which dataset to import
    #[arg(long, value_enum, default_value_t = Dataset::Players, help_heading = "Import")]
    pub dataset: Dataset,

    /// Read the dataset from a local CSV (or ZIP) file instead of downloading it
    #[arg(long, short = 'i', value_name = "PATH", help_heading = "Import")]
    pub input: Option<PathBuf>,

    /// Override the lookback window in hours
    #[arg(long = "lookback-hours", value_name = "HOURS", help_heading = "Import")]
    pub lookback_hours: Option<u32>,

    /// Reference time the lookback window ends at, in RFC 3339
    /// (e.g. 2025-10-26T12:00:00Z). Defaults to the current time.
    /// Useful for backfilling a missed run.
    #[arg(long = "now", value_name = "RFC3339", help_heading = "Import")]
    pub now: Option<String>,

    /// Read the destination and report what would be appended, without
    /// creating tabs or writing rows
    #[arg(long = "dry-run", short = 'n', help_heading = "Import")]
    pub dry_run: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Enable debug-level logging.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["nba_sheet_sync"]);
        assert_eq!(args.dataset, Dataset::Players);
        assert!(args.input.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn test_all_flags() {
        let args = Args::parse_from([
            "nba_sheet_sync",
            "--dataset",
            "teams",
            "--input",
            "TeamStatistics.csv",
            "--lookback-hours",
            "48",
            "--now",
            "2025-10-26T12:00:00Z",
            "--dry-run",
            "--debug",
        ]);
        assert_eq!(args.dataset, Dataset::Teams);
        assert_eq!(args.input, Some(PathBuf::from("TeamStatistics.csv")));
        assert_eq!(args.lookback_hours, Some(48));
        assert_eq!(args.now.as_deref(), Some("2025-10-26T12:00:00Z"));
        assert!(args.dry_run);
        assert!(args.debug);
    }

    #[test]
    fn test_unknown_dataset_is_rejected() {
        assert!(Args::try_parse_from(["nba_sheet_sync", "--dataset", "games"]).is_err());
    }
}
