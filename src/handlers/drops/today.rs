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
pub struct TodayQuery {
    pub tenant_id: Option<String>,
}

/// GET /api/drops/today - today's drop for a member.
/// `{"drop": null}` means nothing has been published yet today.
pub async fn drop_today(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<TodayQuery>,
) -> Result<Json<Value>, ApiError> {
    let tenant_id = resolve_tenant(query.tenant_id)?;
    let drop = state.drops.get_today(&tenant_id, &identity).await?;

    Ok(Json(json!({ "drop": drop })))
}
