use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Tracking number input is empty")]
    EmptyInput,

    #[error("Invalid tracking number format: {number}")]
    InvalidFormat { number: String },

    #[error("Tracking number already exists: {number}")]
    Duplicate { number: String },

    #[error("No tracking number at index {index}")]
    IndexNotFound { index: i64 },

    #[error("Caller '{caller}' is not allowed to perform '{action}'")]
    Unauthorized { caller: String, action: String },

    #[error("Unknown action: {action}")]
    UnknownAction { action: String },

    #[error("Invalid order id: '{value}'")]
    InvalidOrderId { value: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}

pub type Result<T> = std::result::Result<T, TrackingError>;

/// 回傳給呼叫端的錯誤種類 (序列化為 snake_case)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmptyInput,
    InvalidFormat,
    Duplicate,
    IndexNotFound,
    Unauthorized,
    UnknownAction,
    InvalidRequest,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Authorization,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TrackingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TrackingError::EmptyInput => ErrorKind::EmptyInput,
            TrackingError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            TrackingError::Duplicate { .. } => ErrorKind::Duplicate,
            TrackingError::IndexNotFound { .. } => ErrorKind::IndexNotFound,
            TrackingError::Unauthorized { .. } => ErrorKind::Unauthorized,
            TrackingError::UnknownAction { .. } => ErrorKind::UnknownAction,
            TrackingError::InvalidOrderId { .. } | TrackingError::InvalidRequest { .. } => {
                ErrorKind::InvalidRequest
            }
            TrackingError::IoError(_)
            | TrackingError::SerializationError(_)
            | TrackingError::CsvError(_)
            | TrackingError::ConfigError { .. }
            | TrackingError::InvalidConfigValueError { .. }
            | TrackingError::StorageError { .. } => ErrorKind::Internal,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TrackingError::EmptyInput
            | TrackingError::InvalidFormat { .. }
            | TrackingError::Duplicate { .. }
            | TrackingError::IndexNotFound { .. }
            | TrackingError::UnknownAction { .. }
            | TrackingError::InvalidOrderId { .. }
            | TrackingError::InvalidRequest { .. }
            | TrackingError::CsvError(_) => ErrorCategory::Input,
            TrackingError::Unauthorized { .. } => ErrorCategory::Authorization,
            TrackingError::ConfigError { .. } | TrackingError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            TrackingError::IoError(_)
            | TrackingError::SerializationError(_)
            | TrackingError::StorageError { .. } => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者可自行修正的輸入錯誤
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Authorization => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Message shown to the person operating the order screen.
    pub fn user_friendly_message(&self) -> String {
        match self {
            TrackingError::EmptyInput => "Please enter a tracking number.".to_string(),
            TrackingError::InvalidFormat { .. } => {
                "Invalid tracking number format. Use 20 to 22 letters or digits.".to_string()
            }
            TrackingError::Duplicate { .. } => {
                "This tracking number is already attached to the order.".to_string()
            }
            TrackingError::IndexNotFound { .. } => "Tracking number not found.".to_string(),
            TrackingError::Unauthorized { .. } => {
                "You do not have permission to do that.".to_string()
            }
            TrackingError::UnknownAction { action } => format!("Unknown action '{}'.", action),
            TrackingError::InvalidOrderId { .. } => "Invalid order.".to_string(),
            TrackingError::InvalidRequest { message } => format!("Bad request: {}", message),
            TrackingError::ConfigError { .. } | TrackingError::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
            TrackingError::IoError(_)
            | TrackingError::SerializationError(_)
            | TrackingError::CsvError(_)
            | TrackingError::StorageError { .. } => {
                "The order could not be read or saved.".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TrackingError::EmptyInput => "Enter at least one tracking number",
            TrackingError::InvalidFormat { .. } => {
                "Check the number for typos; spaces and hyphens are ignored"
            }
            TrackingError::Duplicate { .. } => "No action needed, the number is already saved",
            TrackingError::IndexNotFound { .. } => "Reload the tracking list and try again",
            TrackingError::Unauthorized { .. } => "Ask a store administrator for access",
            TrackingError::UnknownAction { .. } | TrackingError::InvalidRequest { .. } => {
                "Check the request payload against the documented actions"
            }
            TrackingError::InvalidOrderId { .. } => "Use the id of an existing order",
            TrackingError::ConfigError { .. } | TrackingError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and restart"
            }
            TrackingError::CsvError(_) => "Try a different output format",
            TrackingError::IoError(_)
            | TrackingError::SerializationError(_)
            | TrackingError::StorageError { .. } => {
                "Check that the order store file exists, is valid JSON and is writable"
            }
        }
    }
}

impl From<toml::de::Error> for TrackingError {
    fn from(e: toml::de::Error) -> Self {
        TrackingError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        }
    }
}
