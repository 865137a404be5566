//! Access guards: resolve credentials to principals and attach them to
//! the request context.
//!
//! Checks run in order: token present and syntactically valid, then role
//! tag against the endpoint's required role, then principal existence and
//! active flag against the store. The resolved record goes into request
//! extensions for downstream handlers.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::session::{self, PrincipalRole};
use crate::db;
use crate::error::{AppError, ErrorCode};
use crate::models::customer::Customer;
use crate::models::employee::Employee;
use crate::state::AppState;

/// Application identity resolved from a static API key
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct ApiKeyIdentity {
    pub key_id: i64,
    pub app_name: String,
    pub permissions: Option<String>,
}

/// Extract the bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated))?;
    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::new(ErrorCode::TokenInvalid))
}

async fn resolve_employee(state: &AppState, claims: &session::SessionClaims) -> Result<Employee, AppError> {
    db::employees::find_active(&state.pool, claims.sub)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::InactivePrincipal, "Invalid token or inactive employee.")
        })
}

async fn resolve_customer(state: &AppState, claims: &session::SessionClaims) -> Result<Customer, AppError> {
    db::customers::find_active_by_user_id(&state.pool, claims.sub)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::InactivePrincipal, "Invalid token or inactive customer.")
        })
}

/// Require an employee session token.
pub async fn employee_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let claims = session::verify_token(token, &state.jwt_secret)?;

    if claims.role != PrincipalRole::Employee {
        return Err(AppError::with_message(
            ErrorCode::WrongRole,
            "Access denied. Employee access required.",
        ));
    }

    let employee = resolve_employee(&state, &claims).await?;
    request.extensions_mut().insert(employee);

    Ok(next.run(request).await)
}

/// Require a customer session token.
pub async fn customer_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let claims = session::verify_token(token, &state.jwt_secret)?;

    if claims.role != PrincipalRole::Customer {
        return Err(AppError::with_message(
            ErrorCode::WrongRole,
            "Access denied. Customer access required.",
        ));
    }

    let customer = resolve_customer(&state, &claims).await?;
    request.extensions_mut().insert(customer);

    Ok(next.run(request).await)
}

/// Require the resolved employee to be an administrator.
///
/// Layered inside [`employee_auth`], which has already attached the
/// principal.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let is_admin = request
        .extensions()
        .get::<Employee>()
        .is_some_and(|e| e.is_admin);
    if !is_admin {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(next.run(request).await)
}

/// Authenticate whichever session token is presented, if any.
///
/// The reservation surface accepts employees, customers, and anonymous
/// callers; a token that is present but bad still fails the request.
pub async fn optional_principal(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.headers().get("Authorization").is_some() {
        let token = bearer_token(request.headers())?;
        let claims = session::verify_token(token, &state.jwt_secret)?;
        match claims.role {
            PrincipalRole::Employee => {
                let employee = resolve_employee(&state, &claims).await?;
                request.extensions_mut().insert(employee);
            }
            PrincipalRole::Customer => {
                let customer = resolve_customer(&state, &claims).await?;
                request.extensions_mut().insert(customer);
            }
        }
    }
    Ok(next.run(request).await)
}

/// Require a static API key (service-to-service credential path).
///
/// Resolves the key to an application identity and records last-used
/// time as a side effect. No expiry on this path.
pub async fn api_key_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = request
        .headers()
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::with_message(ErrorCode::NotAuthenticated, "API key required."))?;

    let identity = db::api_keys::authenticate(&state.pool, key)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidApiKey))?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_missing() {
        let headers = HeaderMap::new();
        let err = bearer_token(&headers).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[test]
    fn test_bearer_token_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Token abc"));
        let err = bearer_token(&headers).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_bearer_token_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }
}
