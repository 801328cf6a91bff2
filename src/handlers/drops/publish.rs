use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;

use super::super::resolve_tenant;
use crate::auth::Identity;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::DropFields;

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub tenant_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub resource_link: Option<String>,
}

/// POST /api/drops - publish today's drop for a tenant.
/// 201 when a new record is created, 200 when today's is overwritten.
pub async fn drop_publish(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<PublishRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tenant_id = resolve_tenant(body.tenant_id)?;
    let fields = DropFields::new(body.title, body.content, body.video_url, body.resource_link);

    let outcome = state.drops.publish(&tenant_id, fields, &identity).await?;

    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "Drop created successfully")
    } else {
        (StatusCode::OK, "Drop updated successfully")
    };

    Ok((status, Json(json!({ "drop": outcome.drop, "message": message }))))
}
