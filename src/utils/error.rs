use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP request to {url} returned status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unsupported file type: {file_type}")]
    UnsupportedFileType { file_type: String },

    #[error("Missing field '{key}' in record {index}")]
    MissingFieldError { key: String, index: usize },

    #[error("Operation not supported by {storage} storage: {operation}")]
    UnsupportedOperation { storage: String, operation: String },

    #[error("Graph error: {message}")]
    GraphError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Storage,
    Analysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 依嚴重程度決定程式結束碼
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl AnalysisError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalysisError::HttpError(_) | AnalysisError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            AnalysisError::CsvError(_)
            | AnalysisError::SerializationError(_)
            | AnalysisError::UnsupportedFileType { .. }
            | AnalysisError::MissingFieldError { .. } => ErrorCategory::Data,
            AnalysisError::ConfigError { .. }
            | AnalysisError::ConfigValidationError { .. }
            | AnalysisError::InvalidConfigValueError { .. }
            | AnalysisError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AnalysisError::IoError(_)
            | AnalysisError::ZipError(_)
            | AnalysisError::UnsupportedOperation { .. } => ErrorCategory::Storage,
            AnalysisError::GraphError { .. } | AnalysisError::ProcessingError { .. } => {
                ErrorCategory::Analysis
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Analysis => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AnalysisError::HttpError(_) => {
                "Check the network connection and that the dataset base URL is reachable".to_string()
            }
            AnalysisError::HttpStatusError { status, .. } if *status == 404 => {
                "Check that the dataset file names match the files served at the base URL".to_string()
            }
            AnalysisError::HttpStatusError { .. } => {
                "The dataset server returned an error, retry later".to_string()
            }
            AnalysisError::CsvError(_) => {
                "Make sure the CSV file has a header row and consistent columns".to_string()
            }
            AnalysisError::SerializationError(_) => {
                "Make sure the JSON file is an array of objects with the expected fields".to_string()
            }
            AnalysisError::UnsupportedFileType { .. } => {
                "Use 'json' or 'csv' as the dataset file type".to_string()
            }
            AnalysisError::MissingFieldError { key, .. } => {
                format!("Add the '{}' column to the dataset file", key)
            }
            AnalysisError::ConfigError { .. }
            | AnalysisError::ConfigValidationError { .. }
            | AnalysisError::InvalidConfigValueError { .. }
            | AnalysisError::MissingConfigError { .. } => {
                "Review the configuration values and try again".to_string()
            }
            AnalysisError::IoError(_) => {
                "Check that the paths exist and are readable/writable".to_string()
            }
            AnalysisError::ZipError(_) => {
                "Check free disk space or disable compression".to_string()
            }
            AnalysisError::UnsupportedOperation { .. } => {
                "Write results to a local output directory".to_string()
            }
            AnalysisError::GraphError { .. } => {
                "Check that the graph snapshot was produced by this tool".to_string()
            }
            AnalysisError::ProcessingError { .. } => {
                "Inspect the dataset for inconsistent records".to_string()
            }
        }
    }

    /// 本機檔案不存在或 HTTP 404
    pub fn is_not_found(&self) -> bool {
        match self {
            AnalysisError::IoError(e) => e.kind() == std::io::ErrorKind::NotFound,
            AnalysisError::HttpStatusError { status, .. } => *status == 404,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not fetch the dataset: {}", self),
            ErrorCategory::Data => format!("The dataset could not be parsed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Storage => format!("Could not read or write files: {}", self),
            ErrorCategory::Analysis => format!("Analysis failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_data_error() {
        let err = AnalysisError::MissingFieldError {
            key: "Recipe ID".to_string(),
            index: 3,
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("Recipe ID"));
        assert!(err.recovery_suggestion().contains("Recipe ID"));
    }

    #[test]
    fn test_exit_codes() {
        let io = AnalysisError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(io.severity().exit_code(), 3);

        let status = AnalysisError::HttpStatusError {
            url: "http://localhost/x.json".to_string(),
            status: 500,
        };
        assert_eq!(status.severity().exit_code(), 2);
        assert!(status.user_friendly_message().starts_with("Could not fetch"));
    }
}
