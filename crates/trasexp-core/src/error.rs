//! Error types for trasexp-core
//!
//! Error codes, severities and detailed messages shared by the client
//! and the local server.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No signed-in user
    NotAuthenticated,
    /// Account not found
    AccountNotFound,
    /// Transaction not found
    TransactionNotFound,
    /// Input failed validation
    ValidationError,
    /// Session could not be read or written
    SessionError,
    /// IO error
    IoError,
    /// Configuration error
    ConfigError,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotAuthenticated => write!(f, "NOT_AUTHENTICATED"),
            ErrorCode::AccountNotFound => write!(f, "ACCOUNT_NOT_FOUND"),
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::SessionError => write!(f, "SESSION_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    /// Operation rejected, user can retry
    Warning,
    /// Operation failed
    Error,
    /// Client cannot continue
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Per-field validation messages, keyed by the camelCase field name
pub type FieldErrors = BTreeMap<String, String>;

/// Main error type for trasexp-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Account not found: {id}")]
    AccountNotFound { id: String },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid fields: {}", .fields.keys().cloned().collect::<Vec<_>>().join(", "))]
    InvalidFields { fields: FieldErrors },

    #[error("Session error: {message}")]
    SessionError { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotAuthenticated => ErrorCode::NotAuthenticated,
            CoreError::AccountNotFound { .. } => ErrorCode::AccountNotFound,
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::ValidationError { .. } | CoreError::InvalidFields { .. } => {
                ErrorCode::ValidationError
            }
            CoreError::SessionError { .. } => ErrorCode::SessionError,
            CoreError::IoError { .. } => ErrorCode::IoError,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotAuthenticated => ErrorSeverity::Warning,
            CoreError::AccountNotFound { .. } => ErrorSeverity::Info,
            CoreError::TransactionNotFound { .. } => ErrorSeverity::Info,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::InvalidFields { .. } => ErrorSeverity::Warning,
            CoreError::SessionError { .. } => ErrorSeverity::Error,
            CoreError::IoError { .. } => ErrorSeverity::Error,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::NotAuthenticated => {
                details.with_suggestion("Sign in through /api/auth/login first.".to_string())
            }
            CoreError::AccountNotFound { .. } => details
                .with_suggestion("Use the /api/accounts endpoint to list all accounts.".to_string()),
            CoreError::TransactionNotFound { .. } => details.with_suggestion(
                "Use the /api/transactions endpoint to list all transactions.".to_string(),
            ),
            CoreError::ValidationError { message } => {
                details.with_detail(serde_json::json!({ "validation_message": message }))
            }
            CoreError::InvalidFields { fields } => {
                details.with_detail(serde_json::json!({ "fields": fields }))
            }
            CoreError::SessionError { .. } => details.with_suggestion(
                "Check that the session file directory exists and is writable.".to_string(),
            ),
            _ => details,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(error: io::Error) -> Self {
        CoreError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<trasexp_config::ConfigError> for CoreError {
    fn from(error: trasexp_config::ConfigError) -> Self {
        CoreError::ConfigError {
            message: error.to_string(),
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// User ID (if signed in)
    pub user_id: Option<String>,
    /// Operation being performed
    pub operation: String,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            user_id: None,
            operation: operation.into(),
        }
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Info | ErrorSeverity::Warning => log::warn!(
                target: "trasexp::error",
                "[{}] {} - Operation: {} - User: {:?}",
                error.code(),
                error,
                context.operation,
                context.user_id
            ),
            ErrorSeverity::Error | ErrorSeverity::Critical => log::error!(
                target: "trasexp::error",
                "[{}] {} - Operation: {} - User: {:?}",
                error.code(),
                error.to_details(),
                context.operation,
                context.user_id
            ),
        }
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "trasexp::error",
            "WARNING: {} - Operation: {} - User: {:?}",
            message,
            context.operation,
            context.user_id
        );
    }
}
