//! Error types for trasexp-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use trasexp_client::ClientError;
use trasexp_core::{CoreError, FieldErrors};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Form fields that failed validation, keyed by field name
    #[error("Please fix the highlighted fields")]
    Validation { fields: FieldErrors },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    /// The backend could not be reached
    #[error("Network error. Please check your connection.")]
    Offline { detail: String },

    /// The backend answered with an error
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Internal server error")]
    InternalError { message: String },
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub offline: bool,
}

impl ApiError {
    pub fn not_signed_in() -> Self {
        ApiError::Unauthorized {
            message: "Not signed in".to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    /// An error for a map of field errors, or `None` when it is empty
    pub fn from_fields(fields: FieldErrors) -> Option<Self> {
        if fields.is_empty() {
            None
        } else {
            Some(ApiError::Validation { fields })
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::Offline { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Backend { status, .. } => match StatusCode::from_u16(*status) {
                Ok(code) if code.is_client_error() => code,
                _ => StatusCode::BAD_GATEWAY,
            },
            ApiError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized { .. } => "UNAUTHORIZED",
            ApiError::Forbidden { .. } => "FORBIDDEN",
            ApiError::Offline { .. } => "NETWORK_ERROR",
            ApiError::Backend { .. } => "BACKEND_ERROR",
            ApiError::InternalError { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let details = match self {
            ApiError::Validation { fields } => Some(serde_json::json!({ "fields": fields })),
            _ => None,
        };
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
            details,
            offline: matches!(self, ApiError::Offline { .. }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Offline { detail } => log::warn!("Backend unreachable: {}", detail),
            ApiError::InternalError { message } => log::error!("Internal error: {}", message),
            ApiError::Backend { status, message } if *status >= 500 => {
                log::error!("Backend failed with {}: {}", status, message)
            }
            _ => log::debug!("Request failed with {}: {}", status, self),
        }
        (status, Json(self.to_body())).into_response()
    }
}

impl From<ClientError> for ApiError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Network { detail } => ApiError::Offline { detail },
            ClientError::Unauthorized { message } => ApiError::Unauthorized { message },
            ClientError::NotAuthenticated => ApiError::not_signed_in(),
            ClientError::Forbidden { message } => ApiError::Forbidden { message },
            ClientError::NotFound { message } => ApiError::NotFound { resource: message },
            ClientError::Status { status, message } => ApiError::Backend { status, message },
            ClientError::InvalidResponse { message } => ApiError::Backend { status: 502, message },
            ClientError::InvalidRequest { message } => ApiError::InternalError { message },
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::NotAuthenticated => ApiError::not_signed_in(),
            CoreError::AccountNotFound { id } => ApiError::NotFound {
                resource: format!("account {}", id),
            },
            CoreError::TransactionNotFound { id } => ApiError::NotFound {
                resource: format!("transaction {}", id),
            },
            CoreError::ValidationError { message } => ApiError::BadRequest { message },
            CoreError::InvalidFields { fields } => ApiError::Validation { fields },
            other => ApiError::InternalError {
                message: other.to_string(),
            },
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
