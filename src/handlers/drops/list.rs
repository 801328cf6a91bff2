use axum::{
    extract::{Extension, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::super::resolve_tenant;
use crate::auth::Identity;
use crate::config;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub tenant_id: Option<String>,
    pub limit: Option<u32>,
}

/// GET /api/drops/list - management listing: newest drops plus derived
/// publishing stats.
pub async fn drop_list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let tenant_id = resolve_tenant(query.tenant_id)?;

    let api = &config::config().api;
    let limit = query
        .limit
        .unwrap_or(api.default_list_limit)
        .min(api.max_list_limit);

    let listing = state.drops.list(&tenant_id, limit, &identity).await?;

    Ok(Json(json!({
        "drops": listing.drops,
        "stats": listing.stats,
        "total": listing.stats.total_drops,
    })))
}
