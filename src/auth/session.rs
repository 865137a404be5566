//! Session token issue/verify
//!
//! Signed JWTs carrying the principal id and a role tag. Expiry policy is
//! split by role: POS shifts get short employee sessions, the online
//! reservation channel gets long consumer sessions.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

const EMPLOYEE_SESSION_HOURS: i64 = 8;
const CUSTOMER_SESSION_DAYS: i64 = 30;

/// Role tag carried in the token payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalRole {
    Employee,
    Customer,
}

/// JWT claims for session authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Principal id: employee_id for employees, app_user user_id for customers
    pub sub: i64,
    /// Role tag checked against the endpoint's required role
    pub role: PrincipalRole,
    /// Customer id (customer tokens only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    /// Admin flag (employee tokens only)
    #[serde(default)]
    pub is_admin: bool,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
}

fn issue(
    sub: i64,
    role: PrincipalRole,
    customer_id: Option<i64>,
    is_admin: bool,
    ttl: chrono::Duration,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = SessionClaims {
        sub,
        role,
        customer_id,
        is_admin,
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Create a session token for an employee (8 hour expiry)
pub fn issue_employee_token(
    employee_id: i64,
    is_admin: bool,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue(
        employee_id,
        PrincipalRole::Employee,
        None,
        is_admin,
        chrono::Duration::hours(EMPLOYEE_SESSION_HOURS),
        secret,
    )
}

/// Create a session token for a customer app user (30 day expiry)
pub fn issue_customer_token(
    user_id: i64,
    customer_id: i64,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue(
        user_id,
        PrincipalRole::Customer,
        Some(customer_id),
        false,
        chrono::Duration::days(CUSTOMER_SESSION_DAYS),
        secret,
    )
}

/// Verify signature and expiry; no partial trust on failure.
pub fn verify_token(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("token validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::new(ErrorCode::TokenExpired)
            }
            _ => AppError::new(ErrorCode::TokenInvalid),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_employee_roundtrip() {
        let token = issue_employee_token(42, true, SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, PrincipalRole::Employee);
        assert!(claims.is_admin);
        assert_eq!(claims.customer_id, None);
    }

    #[test]
    fn test_customer_roundtrip() {
        let token = issue_customer_token(7, 3, SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, PrincipalRole::Customer);
        assert_eq!(claims.customer_id, Some(3));
        assert!(!claims.is_admin);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_employee_token(1, false, SECRET).unwrap();
        let err = verify_token(&token, "other-secret").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_garbage_rejected() {
        let err = verify_token("not.a.jwt", SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_expired_rejected() {
        // Past the default 60s validation leeway
        let token = issue(
            1,
            PrincipalRole::Employee,
            None,
            false,
            chrono::Duration::seconds(-120),
            SECRET,
        )
        .unwrap();
        let err = verify_token(&token, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }

    #[test]
    fn test_expiry_policy_split_by_role() {
        let employee = issue_employee_token(1, false, SECRET).unwrap();
        let customer = issue_customer_token(1, 1, SECRET).unwrap();
        let e = verify_token(&employee, SECRET).unwrap();
        let c = verify_token(&customer, SECRET).unwrap();
        assert_eq!(e.exp - e.iat, (EMPLOYEE_SESSION_HOURS * 3600) as usize);
        assert_eq!(c.exp - c.iat, (CUSTOMER_SESSION_DAYS * 86400) as usize);
    }
}
