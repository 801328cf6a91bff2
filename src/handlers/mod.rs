pub mod access;
pub mod drops;

use crate::config;
use crate::error::ApiError;

/// Resolve the target tenant from an explicit request parameter, falling
/// back to the configured default tenant (legacy single-tenant mode).
/// Access checks downstream are identical for both paths.
pub fn resolve_tenant(param: Option<String>) -> Result<String, ApiError> {
    if let Some(tenant_id) = param.filter(|t| !t.is_empty()) {
        return Ok(tenant_id);
    }
    if let Some(tenant_id) = &config::config().tenancy.default_tenant {
        return Ok(tenant_id.clone());
    }
    Err(ApiError::bad_request(
        "Tenant ID is required; provide tenant_id or set DEFAULT_TENANT_ID",
    ))
}
