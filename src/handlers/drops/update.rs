use axum::{
    extract::{Extension, State},
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use super::super::resolve_tenant;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::DropFields;

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: Option<String>,
    pub tenant_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub resource_link: Option<String>,
    /// Optional explicit date; the stored date is kept when absent.
    pub date: Option<NaiveDate>,
}

/// PUT /api/drops - overwrite an existing drop by id.
pub async fn drop_update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<UpdateRequest>,
) -> Result<Json<Value>, ApiError> {
    let drop_id = body
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Drop ID is required"))?;
    let tenant_id = resolve_tenant(body.tenant_id)?;
    let fields = DropFields::new(body.title, body.content, body.video_url, body.resource_link);

    let drop = state
        .drops
        .update(&drop_id, &tenant_id, fields, body.date, &identity)
        .await?;

    Ok(Json(json!({ "drop": drop, "message": "Drop updated successfully" })))
}
