use axum::{
    extract::{Extension, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::resolve_tenant;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckAccessQuery {
    pub tenant_id: Option<String>,
}

/// GET /api/access/check - paid-content flag for the paywall gate.
/// `false` is a normal answer that sends the member to the upgrade flow.
pub async fn check_access(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<CheckAccessQuery>,
) -> Result<Json<Value>, ApiError> {
    let tenant_id = resolve_tenant(query.tenant_id)?;
    let has_access = state.drops.check_access(&tenant_id, &identity).await?;

    Ok(Json(json!({ "has_access": has_access })))
}
