//! Service-to-service endpoints (API-key authenticated)

use axum::{Extension, Json, extract::State};

use crate::auth::guard::ApiKeyIdentity;
use crate::db;
use crate::error::AppError;
use crate::models::product::ProductSummary;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/service/catalog
///
/// Full active catalog export for external systems.
pub async fn catalog(
    State(state): State<AppState>,
    Extension(identity): Extension<ApiKeyIdentity>,
) -> ApiResult<Vec<ProductSummary>> {
    tracing::debug!(app = %identity.app_name, "catalog export");
    let products = db::products::export_catalog(&state.pool)
        .await
        .map_err(AppError::from)?;
    Ok(Json(products))
}
