use crate::constants::MAX_LOOKBACK_HOURS;
use crate::error::AppError;
use std::path::Path;

/// Checks that a configured endpoint is an absolute http(s) URL.
pub fn validate_url(name: &str, url: &str) -> Result<(), AppError> {
    if url.is_empty() {
        return Err(AppError::config_error(format!("{name} cannot be empty")));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AppError::config_error(format!(
            "{name} must start with http:// or https:// (got '{url}')"
        )));
    }
    Ok(())
}

/// Validates the scheduling window settings.
///
/// # Validation Rules
/// - Lookback must be at least one hour and at most [`MAX_LOOKBACK_HOURS`]
/// - At least one season-end year must be allowed
pub fn validate_window(lookback_hours: u32, allowed_years: &[i32]) -> Result<(), AppError> {
    if lookback_hours == 0 {
        return Err(AppError::config_error("Lookback hours must be greater than zero"));
    }
    if lookback_hours > MAX_LOOKBACK_HOURS {
        return Err(AppError::config_error(format!(
            "Lookback hours must be at most {MAX_LOOKBACK_HOURS} (got {lookback_hours})"
        )));
    }
    if allowed_years.is_empty() {
        return Err(AppError::config_error(
            "At least one allowed season-end year is required",
        ));
    }
    Ok(())
}

/// Rejects a zero HTTP timeout, which would fail every request immediately.
pub fn validate_http_timeout(seconds: u64) -> Result<(), AppError> {
    if seconds == 0 {
        return Err(AppError::config_error(
            "HTTP timeout must be at least one second",
        ));
    }
    Ok(())
}

/// Validates the log file path if one is configured.
///
/// The parent directory is created when missing so an unusable path is
/// reported at startup instead of when the first log line is written.
pub fn validate_log_file_path(log_file_path: &Option<String>) -> Result<(), AppError> {
    if let Some(log_path) = log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

/// Parses an allowed-years setting.
///
/// Accepts an inclusive range (`2022-2026`), a comma separated list
/// (`2022,2024`), or a mix of both (`2019,2022-2024`). The result is sorted and
/// free of duplicates.
pub fn parse_year_list(value: &str) -> Result<Vec<i32>, AppError> {
    let mut years = Vec::new();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_year(start.trim(), value)?;
                let end = parse_year(end.trim(), value)?;
                if start > end {
                    return Err(AppError::config_error(format!(
                        "Invalid season-end year range '{part}': start is after end"
                    )));
                }
                years.extend(start..=end);
            }
            None => years.push(parse_year(part, value)?),
        }
    }
    years.sort_unstable();
    years.dedup();
    Ok(years)
}

fn parse_year(s: &str, whole: &str) -> Result<i32, AppError> {
    s.parse::<i32>().map_err(|_| {
        AppError::config_error(format!("Invalid season-end year '{s}' in '{whole}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year_range() {
        assert_eq!(
            parse_year_list("2022-2026").unwrap(),
            vec![2022, 2023, 2024, 2025, 2026]
        );
    }

    #[test]
    fn test_parse_year_list_and_mixed() {
        assert_eq!(parse_year_list("2024, 2022").unwrap(), vec![2022, 2024]);
        assert_eq!(
            parse_year_list("2019,2022-2023,2023").unwrap(),
            vec![2019, 2022, 2023]
        );
    }

    #[test]
    fn test_parse_year_list_rejects_garbage() {
        assert!(parse_year_list("twenty").is_err());
        assert!(parse_year_list("2026-2022").is_err());
        assert!(parse_year_list("").unwrap().is_empty());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("Sheets API domain", "https://sheets.googleapis.com").is_ok());
        assert!(validate_url("Sheets API domain", "http://127.0.0.1:9999").is_ok());
        assert!(validate_url("Sheets API domain", "").is_err());
        assert!(validate_url("Sheets API domain", "sheets.googleapis.com").is_err());
    }

    #[test]
    fn test_validate_window() {
        assert!(validate_window(24, &[2026]).is_ok());
        assert!(validate_window(0, &[2026]).is_err());
        assert!(validate_window(24, &[]).is_err());
    }

    #[test]
    fn test_validate_window_caps_lookback() {
        assert!(validate_window(MAX_LOOKBACK_HOURS, &[2026]).is_ok());
        let err = validate_window(MAX_LOOKBACK_HOURS + 1, &[2026]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(validate_window(4_000_000_000, &[2026]).is_err());
    }

    #[test]
    fn test_validate_http_timeout() {
        assert!(validate_http_timeout(1).is_ok());
        assert!(validate_http_timeout(0).is_err());
    }

    #[test]
    fn test_validate_log_file_path_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("nested").join("sync.log");
        let path = Some(log_path.to_string_lossy().to_string());
        assert!(validate_log_file_path(&path).is_ok());
        assert!(dir.path().join("nested").exists());
        assert!(validate_log_file_path(&Some(String::new())).is_err());
        assert!(validate_log_file_path(&None).is_ok());
    }
}
