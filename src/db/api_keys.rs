//! API-key credential path (service-to-service)

use sqlx::PgPool;

use crate::auth::guard::ApiKeyIdentity;
use crate::error::ServiceResult;

/// Resolve a static key to an application identity.
///
/// Records last-used time as a side effect on success.
pub async fn authenticate(pool: &PgPool, api_key: &str) -> ServiceResult<Option<ApiKeyIdentity>> {
    let row: Option<(i64, String, Option<String>)> = sqlx::query_as(
        "SELECT key_id, app_name, permissions FROM api_keys \
         WHERE api_key = $1 AND is_active = TRUE",
    )
    .bind(api_key)
    .fetch_optional(pool)
    .await?;

    let Some((key_id, app_name, permissions)) = row else {
        return Ok(None);
    };

    sqlx::query("UPDATE api_keys SET last_used_at = NOW() WHERE key_id = $1")
        .bind(key_id)
        .execute(pool)
        .await?;

    Ok(Some(ApiKeyIdentity {
        key_id,
        app_name,
        permissions,
    }))
}
