use thiserror::Error;

/// Coarse classification of a failure, matching the stage of the sync run
/// that produced it. Every kind is fatal to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Dataset source unreachable or payload unusable
    Fetch,
    /// Dataset readable but not in the expected shape
    Parse,
    /// Destination spreadsheet unreachable, auth rejected or tab missing
    Write,
    Config,
    Io,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    ApiFetch(#[from] reqwest::Error),

    #[error("Failed to parse API response: {0}")]
    ApiParse(#[from] serde_json::Error),

    // Specific HTTP status code errors
    #[error("API request not found (404): {url}")]
    ApiNotFound { url: String },

    #[error("API rejected credentials ({status}): {message} (URL: {url})")]
    ApiUnauthorized {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API server error ({status}): {message} (URL: {url})")]
    ApiServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API client error ({status}): {message} (URL: {url})")]
    ApiClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("API rate limit exceeded (429): {message} (URL: {url})")]
    ApiRateLimit { message: String, url: String },

    #[error("API service unavailable ({status}): {message} (URL: {url})")]
    ApiServiceUnavailable {
        status: u16,
        message: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while talking to: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    #[error("API returned unexpected data structure: {message} (URL: {url})")]
    ApiUnexpectedStructure { message: String, url: String },

    #[error("API returned empty or missing data: {message} (URL: {url})")]
    ApiNoData { message: String, url: String },

    // Dataset errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("CSV is missing expected columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Sheet '{tab}' error: {message}")]
    Sheet { tab: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Date/time parsing error: {0}")]
    DateTimeParse(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a date/time parsing error with context
    pub fn datetime_parse_error(msg: impl Into<String>) -> Self {
        Self::DateTimeParse(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create an API not found error
    pub fn api_not_found(url: impl Into<String>) -> Self {
        Self::ApiNotFound { url: url.into() }
    }

    /// Create an authentication/authorization error (401 and 403)
    pub fn api_unauthorized(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiUnauthorized {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API server error (5xx status codes)
    pub fn api_server_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API client error (4xx status codes not covered by a more specific variant)
    pub fn api_client_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API rate limit error
    pub fn api_rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiRateLimit {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an API service unavailable error
    pub fn api_service_unavailable(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServiceUnavailable {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an unexpected data structure error
    pub fn api_unexpected_structure(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiUnexpectedStructure {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a no data error
    pub fn api_no_data(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiNoData {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a missing columns error from the header names that were not found
    pub fn missing_columns<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingColumns {
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a sheet-level error for a specific tab
    pub fn sheet_error(tab: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sheet {
            tab: tab.into(),
            message: message.into(),
        }
    }

    /// Classifies the error by the run stage it belongs to.
    ///
    /// HTTP variants carry no stage of their own, so they are split by URL:
    /// anything addressed to a spreadsheet endpoint is a write failure,
    /// everything else came from the dataset source.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Csv(_)
            | AppError::Archive(_)
            | AppError::MissingColumns { .. }
            | AppError::DateTimeParse(_) => ErrorKind::Parse,
            AppError::Sheet { .. } => ErrorKind::Write,
            AppError::Config(_)
            | AppError::TomlDeserialize(_)
            | AppError::LogSetup(_) => ErrorKind::Config,
            AppError::Io(_) => ErrorKind::Io,
            AppError::ApiFetch(e) => match e.url() {
                Some(url) if is_sheets_url(url.as_str()) => ErrorKind::Write,
                _ => ErrorKind::Fetch,
            },
            AppError::ApiParse(_) => ErrorKind::Write,
            AppError::ApiNotFound { url }
            | AppError::ApiUnauthorized { url, .. }
            | AppError::ApiServerError { url, .. }
            | AppError::ApiClientError { url, .. }
            | AppError::ApiRateLimit { url, .. }
            | AppError::ApiServiceUnavailable { url, .. }
            | AppError::NetworkTimeout { url }
            | AppError::NetworkConnection { url, .. }
            | AppError::ApiUnexpectedStructure { url, .. }
            | AppError::ApiNoData { url, .. } => {
                if is_sheets_url(url) {
                    ErrorKind::Write
                } else {
                    ErrorKind::Fetch
                }
            }
        }
    }
}

fn is_sheets_url(url: &str) -> bool {
    url.contains("/v4/spreadsheets/")
}
