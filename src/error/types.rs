//! Error types for the API layer

use super::codes::ErrorCode;
use http::StatusCode;
use thiserror::Error;

/// Application error with a structured code and a client-facing message.
///
/// Serialized to clients as `{ "error": "<message>" }`; the code only
/// decides the HTTP status.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.http_status(), axum::Json(body)).into_response()
    }
}

/// Service-layer error bridging the DB layer and the API layer.
///
/// - `Db`: infrastructure errors; logged server-side and mapped to a
///   generic 500 so no store error text reaches the client
/// - `App`: business-rule errors that pass through with their own code
#[derive(Debug)]
pub enum ServiceError {
    Db(sqlx::Error),
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl axum::response::IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::ProductNotFound);
        assert_eq!(err.code, ErrorCode::ProductNotFound);
        assert_eq!(err.message, "Product not found");
    }

    #[test]
    fn test_app_error_with_message() {
        let err = AppError::with_message(ErrorCode::InsufficientStock, "Available: 5, Requested: 10");
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Available: 5, Requested: 10");
    }

    #[test]
    fn test_response_status() {
        let resp = AppError::new(ErrorCode::NotAuthenticated).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = AppError::validation("bad input").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_service_error_passthrough() {
        let err: ServiceError = AppError::new(ErrorCode::InsufficientStock).into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_service_error_db_is_suppressed() {
        let err: ServiceError = sqlx::Error::RowNotFound.into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::DatabaseError);
        assert_eq!(app.message, "Internal server error");
    }
}
