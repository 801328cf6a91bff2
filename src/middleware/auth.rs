use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{verify_identity_token, Identity, JwtError};
use crate::error::ApiError;

/// Identity middleware that verifies the bearer token and injects the
/// resolved [`Identity`] into the request extensions. Everything under
/// /api/* runs behind this.
pub async fn identity_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let claims = verify_identity_token(&token).map_err(|e| match e {
        JwtError::InvalidSecret => {
            tracing::error!("identity token secret not configured");
            ApiError::internal_server_error("Configuration error")
        }
        other => ApiError::unauthorized(other.to_string()),
    })?;

    let identity = Identity::from(claims);
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Extract the token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty identity token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
