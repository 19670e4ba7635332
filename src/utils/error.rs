use crate::utils::validation::FieldError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {} field error(s)", .errors.len())]
    ValidationError { errors: Vec<FieldError> },

    #[error("Username already taken: {username}")]
    DuplicateUsername { username: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Notification failed: {message}")]
    NotificationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Storage,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        SiteError::ValidationError { errors }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::ConfigError { .. } | SiteError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            SiteError::ValidationError { .. } | SiteError::DuplicateUsername { .. } => {
                ErrorCategory::Validation
            }
            SiteError::StorageError { .. } => ErrorCategory::Storage,
            SiteError::HttpClientError(_) | SiteError::NotificationError { .. } => {
                ErrorCategory::Network
            }
            SiteError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML config file and command line flags, then restart the server"
            }
            ErrorCategory::Validation => "Correct the highlighted fields and submit again",
            ErrorCategory::Storage => "Restart the server; in-memory records will be reset",
            ErrorCategory::Network => {
                "Verify the mail relay endpoint is reachable and the API key is valid"
            }
            ErrorCategory::System => "Check file permissions and available system resources",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteError::ValidationError { errors } => {
                let details: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.path, e.message))
                    .collect();
                format!("Validation failed ({})", details.join("; "))
            }
            SiteError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            SiteError::ConfigError { message } => format!("Configuration problem: {}", message),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_low_severity() {
        let err = SiteError::validation(vec![FieldError::new("phone", "Please enter a valid phone number")]);
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.to_string(), "Validation failed: 1 field error(s)");
        assert_eq!(
            err.user_friendly_message(),
            "Validation failed (phone: Please enter a valid phone number)"
        );
    }

    #[test]
    fn test_storage_error_is_server_fault() {
        let err = SiteError::StorageError {
            message: "collection unavailable".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_config_error_message() {
        let err = SiteError::InvalidConfigValueError {
            field: "server.bind".to_string(),
            value: "nowhere".to_string(),
            reason: "Invalid socket address".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(
            err.user_friendly_message(),
            "Invalid setting 'server.bind': Invalid socket address"
        );
    }
}
