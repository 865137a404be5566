//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code.
    ///
    /// Uniqueness conflicts map to 400, matching the behavior of the
    /// store-error re-mapping in the route handlers; the reservation-code
    /// collision is the one retryable conflict and answers 409.
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound
            | Self::ProductNotFound
            | Self::CategoryNotFound
            | Self::CustomerNotFound
            | Self::EmployeeNotFound
            | Self::ReservationNotFound
            | Self::ReservationNotCancellable => StatusCode::NOT_FOUND,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::InactivePrincipal
            | Self::AccountDisabled
            | Self::InvalidApiKey => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::WrongRole | Self::AdminRequired => StatusCode::FORBIDDEN,

            // 409 Conflict (retryable with a fresh code)
            Self::CodeConflict => StatusCode::CONFLICT,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation, business rules, uniqueness)
            Self::ValidationFailed
            | Self::AlreadyExists
            | Self::CustomerExists
            | Self::EmployeeExists
            | Self::ReservationEmpty
            | Self::InsufficientStock
            | Self::ProductUnavailable
            | Self::InvalidStatusTransition => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::ProductNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        // Non-cancellable answers 404, not 403, so a customer probing a
        // foreign reservation learns nothing about its existence.
        assert_eq!(
            ErrorCode::ReservationNotCancellable.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_unauthorized_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::InvalidCredentials.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::InactivePrincipal.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::InvalidApiKey.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_forbidden_status() {
        assert_eq!(ErrorCode::WrongRole.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ErrorCode::AdminRequired.http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InsufficientStock.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ProductUnavailable.http_status(),
            StatusCode::BAD_REQUEST
        );
        // Store uniqueness violations are surfaced as 400, not 409
        assert_eq!(
            ErrorCode::AlreadyExists.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::CustomerExists.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_conflict_and_internal_status() {
        assert_eq!(ErrorCode::CodeConflict.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
