use axum::{
    extract::{Extension, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::super::resolve_tenant;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
    pub tenant_id: Option<String>,
}

/// DELETE /api/drops - delete a drop by id.
pub async fn drop_delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Value>, ApiError> {
    let drop_id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Drop ID is required"))?;
    let tenant_id = resolve_tenant(query.tenant_id)?;

    state.drops.delete(&drop_id, &tenant_id, &identity).await?;

    Ok(Json(json!({ "message": "Drop deleted successfully" })))
}
