//! Session Error Types
//!
//! This module provides session-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Session-specific result type alias
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-specific error variants
#[derive(Debug, Error)]
pub enum SessionError {
    /// Auth backend adapter failed (network / provider)
    #[error("Auth provider request failed: {0}")]
    Adapter(#[from] reqwest::Error),

    /// Adapter returned a payload we could not interpret
    #[error("Auth provider returned an invalid response: {0}")]
    AdapterPayload(String),

    /// Required external credential or key is missing
    #[error("Missing configuration: {0}")]
    Configuration(String),

    /// A sign-in or sign-out operation is already running
    #[error("Another sign-in or sign-out operation is in flight")]
    OperationInFlight,

    /// Session not found or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Store was torn down before the operation completed
    #[error("Session store is no longer live")]
    StoreClosed,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SessionError::Adapter(_) | SessionError::AdapterPayload(_) => StatusCode::BAD_GATEWAY,
            SessionError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            SessionError::OperationInFlight => StatusCode::CONFLICT,
            SessionError::SessionInvalid => StatusCode::UNAUTHORIZED,
            SessionError::StoreClosed | SessionError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Adapter(_) | SessionError::AdapterPayload(_) => ErrorKind::BadGateway,
            SessionError::Configuration(_) => ErrorKind::ServiceUnavailable,
            SessionError::OperationInFlight => ErrorKind::Conflict,
            SessionError::SessionInvalid => ErrorKind::Unauthorized,
            SessionError::StoreClosed | SessionError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            SessionError::Adapter(e) => {
                tracing::error!(error = %e, "Auth provider transport error");
            }
            SessionError::AdapterPayload(msg) => {
                tracing::error!(message = %msg, "Auth provider payload error");
            }
            SessionError::Configuration(msg) => {
                tracing::warn!(message = %msg, "Missing configuration");
            }
            SessionError::Internal(msg) => {
                tracing::error!(message = %msg, "Session internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Session error");
            }
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for SessionError {
    fn from(err: AppError) -> Self {
        SessionError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            SessionError::SessionInvalid.kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(SessionError::OperationInFlight.kind(), ErrorKind::Conflict);
        assert_eq!(
            SessionError::Configuration("STREAM_API_KEY".into()).kind(),
            ErrorKind::ServiceUnavailable
        );
        assert_eq!(
            SessionError::AdapterPayload("no user id".into()).kind(),
            ErrorKind::BadGateway
        );
    }

    #[test]
    fn test_status_codes_match_kinds() {
        let errors = [
            SessionError::SessionInvalid,
            SessionError::OperationInFlight,
            SessionError::Internal("x".into()),
        ];
        for err in errors {
            assert_eq!(err.status_code().as_u16(), err.kind().status_code());
        }
    }
}
