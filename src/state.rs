//! Application state

use sqlx::PgPool;

use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT secret for session tokens
    pub jwt_secret: String,
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
    /// Rate limiter for login/registration routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            allowed_origins: config.allowed_origins.clone(),
            rate_limiter: RateLimiter::new(),
        })
    }
}
