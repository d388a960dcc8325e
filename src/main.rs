// src/main.rs
mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::Args;
use commands::{apply_cli_overrides, handle_list_config_command, handle_sync_command};
use logging::setup_logging;
use nba_sheet_sync::config::Config;
use nba_sheet_sync::error::AppError;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let mut config = Config::load().await?;
    apply_cli_overrides(&mut config, &args)?;

    if args.list_config {
        handle_list_config_command(&config);
        return Ok(());
    }

    // The guard must be kept alive for the duration of the program
    let (log_file_path, _guard) = setup_logging(&args, &config).await?;
    info!("Logs are being written to: {log_file_path}");

    match handle_sync_command(&args, &config).await {
        Ok(report) => {
            info!(
                dataset = %report.dataset,
                appended = report.total_appended(),
                tabs = report.tabs.len(),
                "Import finished"
            );
            Ok(())
        }
        Err(e) => {
            error!(kind = ?e.kind(), "Import failed: {e}");
            Err(e)
        }
    }
}
