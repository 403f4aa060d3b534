use thiserror::Error;

#[derive(Error, Debug)]
pub enum GymError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ('{value}'): {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}

impl GymError {
    pub fn validation(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        GymError::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, GymError::ValidationError { .. })
    }

    /// Short message suitable for printing to the person at the terminal.
    pub fn user_friendly_message(&self) -> String {
        match self {
            GymError::ValidationError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            GymError::ConfigError { message } => format!("Configuration problem: {}", message),
            GymError::IoError(e) => format!("Could not access the data files: {}", e),
            GymError::CsvError(e) => format!("Could not write tabular data: {}", e),
            GymError::SerializationError(e) => format!("Could not write enrollment data: {}", e),
            GymError::StorageError { message } => format!("Storage failure: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GymError::ValidationError { .. } => "Check the input values and try again",
            GymError::ConfigError { .. } => "Review the TOML configuration file",
            GymError::IoError(_) | GymError::StorageError { .. } => {
                "Make sure the data directory exists and is writable"
            }
            GymError::CsvError(_) | GymError::SerializationError(_) => {
                "Inspect the data files for manual edits"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, GymError>;
