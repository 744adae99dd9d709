//! Error types for trasexp-client

use thiserror::Error;
use trasexp_core::CoreError;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

#[derive(Error, Debug)]
pub enum ClientError {
    /// No response from the backend (connection refused, timeout, DNS)
    #[error("Network error. Please check your connection.")]
    Network { detail: String },

    /// The backend rejected the credentials; the session has been cleared
    #[error("Session expired. Please sign in again.")]
    Unauthorized { message: String },

    #[error("Access forbidden: {message}")]
    Forbidden { message: String },

    #[error("Resource not found: {message}")]
    NotFound { message: String },

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Invalid response from backend: {message}")]
    InvalidResponse { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl ClientError {
    /// Map a non-success status and its body to an error
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_message(body)
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        match status {
            401 => ClientError::Unauthorized { message },
            403 => ClientError::Forbidden { message },
            404 => ClientError::NotFound { message },
            _ => ClientError::Status { status, message },
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network { .. })
    }

    /// HTTP status the backend answered with, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { .. } => Some(401),
            ClientError::Forbidden { .. } => Some(403),
            ClientError::NotFound { .. } => Some(404),
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pull a human message out of an error body: `message`, then `error`,
/// then the raw text
fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = json.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return Some(text.to_string());
                }
            }
        }
        if let Some(text) = json.as_str() {
            return Some(text.to_string());
        }
    }
    Some(body.to_string())
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ClientError::InvalidResponse {
                message: error.to_string(),
            }
        } else {
            ClientError::Network {
                detail: error.to_string(),
            }
        }
    }
}

impl From<CoreError> for ClientError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::NotAuthenticated => ClientError::NotAuthenticated,
            other => ClientError::InvalidRequest {
                message: other.to_string(),
            },
        }
    }
}

/// Result type with ClientError
pub type ClientResult<T> = Result<T, ClientError>;
