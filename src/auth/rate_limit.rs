//! Per-IP rate limiting for the credential endpoints

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

const LOGIN_LIMIT: u32 = 5;
const REGISTER_LIMIT: u32 = 3;
const WINDOW_SECS: u64 = 60;

struct Window {
    hits: u32,
    started: Instant,
}

/// Fixed-window counter keyed by `(route, client ip)`.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<(&'static str, String), Window>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Count a hit and report whether the request is still allowed.
    async fn allow(&self, route: &'static str, ip: String, max_hits: u32) -> bool {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();
        let window = windows.entry((route, ip)).or_insert(Window {
            hits: 0,
            started: now,
        });

        if now.duration_since(window.started).as_secs() >= WINDOW_SECS {
            window.hits = 0;
            window.started = now;
        }

        window.hits += 1;
        window.hits <= max_hits
    }

    /// Drop windows that have been idle for 5 minutes.
    pub async fn cleanup(&self) {
        let cutoff = std::time::Duration::from_secs(300);
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        windows.retain(|_, w| now.duration_since(w.started) < cutoff);
    }
}

/// Client IP: first X-Forwarded-For entry when present, peer address otherwise.
fn client_ip(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_owned();
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

fn too_many_requests() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        axum::Json(serde_json::json!({"error": "Too many requests, try again later"})),
    )
        .into_response()
}

pub async fn login_rate_limit(
    State(state): State<crate::state::AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let ip = client_ip(&request);
    if !state.rate_limiter.allow("login", ip, LOGIN_LIMIT).await {
        return Err(too_many_requests());
    }
    Ok(next.run(request).await)
}

pub async fn register_rate_limit(
    State(state): State<crate::state::AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let ip = client_ip(&request);
    if !state.rate_limiter.allow("register", ip, REGISTER_LIMIT).await {
        return Err(too_many_requests());
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_enforced_per_route_and_ip() {
        let limiter = RateLimiter::new();
        for _ in 0..LOGIN_LIMIT {
            assert!(limiter.allow("login", "1.2.3.4".into(), LOGIN_LIMIT).await);
        }
        assert!(!limiter.allow("login", "1.2.3.4".into(), LOGIN_LIMIT).await);
        // Other IPs and routes are unaffected
        assert!(limiter.allow("login", "5.6.7.8".into(), LOGIN_LIMIT).await);
        assert!(limiter.allow("register", "1.2.3.4".into(), REGISTER_LIMIT).await);
    }
}
