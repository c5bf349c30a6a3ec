use thiserror::Error;

#[derive(Error, Debug)]
pub enum SafeCityError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data file not found: {path}")]
    MissingDataFile { path: String },

    #[error("Data file is empty: {path}")]
    EmptyDataFile { path: String },

    #[error("Crime data unavailable: {path}")]
    CrimeDataRequired { path: String },

    #[error("Malformed data in {source_name}: {message}")]
    MalformedData {
        source_name: String,
        message: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("{url} not ready after {attempts} attempts")]
    ReadinessTimeout { url: String, attempts: u32 },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Data,
    Network,
    Io,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SafeCityError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::ReadinessTimeout { .. } => ErrorCategory::Network,
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::MissingDataFile { .. }
            | Self::EmptyDataFile { .. }
            | Self::CrimeDataRequired { .. }
            | Self::MalformedData { .. } => ErrorCategory::Data,
            Self::IoError(_) => ErrorCategory::Io,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ValidationError { .. } => ErrorCategory::Config,
            Self::ServerError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // The dashboard still runs without a data source.
            Self::MissingDataFile { .. } | Self::EmptyDataFile { .. } => ErrorSeverity::Low,
            Self::HttpError(_) | Self::ReadinessTimeout { .. } => ErrorSeverity::Medium,
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::MalformedData { .. }
            | Self::CrimeDataRequired { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ValidationError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::ServerError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether the dashboard can keep running with the affected source absent.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(
            self,
            Self::MissingDataFile { .. } | Self::EmptyDataFile { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) => "Check that the server is running and reachable",
            Self::ReadinessTimeout { .. } => {
                "Increase --attempts or --interval-ms, or check the server log for startup errors"
            }
            Self::CsvError(_) | Self::MalformedData { .. } => {
                "Check that the crime CSV has BoroughName, MajorText and MinorText columns and numeric month columns"
            }
            Self::SerializationError(_) => "Check that the boundaries file is valid GeoJSON",
            Self::MissingDataFile { .. } => "Place the data files in the data directory or pass --data-dir",
            Self::CrimeDataRequired { .. } => {
                "This command needs the crime CSV; check --data-dir and --crime-file"
            }
            Self::EmptyDataFile { .. } => "Regenerate the data file; it contains no records",
            Self::IoError(_) => "Check file permissions and available disk space",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ValidationError { .. } => "Review the command line flags and configuration file",
            Self::ServerError { .. } => "Check that the listen address is free",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingDataFile { path } => format!("Data file not found: {}", path),
            Self::EmptyDataFile { path } => format!("Data file is empty: {}", path),
            Self::CrimeDataRequired { path } => {
                format!("No crime data could be loaded from {}", path)
            }
            Self::ReadinessTimeout { url, attempts } => {
                format!("Server at {} did not become ready ({} attempts)", url, attempts)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SafeCityError>;
