pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpAccessResolver;

/// Tenant access level as reported by the authorization service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Admin,
    Member,
    NoAccess,
}

/// Result of a tenant-scoped access check. `has_access` gates reads of
/// paid content; `level` gates management operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TenantAccess {
    pub has_access: bool,
    #[serde(rename = "access_level")]
    pub level: AccessLevel,
}

impl TenantAccess {
    pub fn is_admin(&self) -> bool {
        self.has_access && self.level == AccessLevel::Admin
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("access check failed: {0}")]
    CheckFailed(String),
}

/// Seam over the external authorization service. The service object takes
/// this as an injected dependency so tests can substitute a fake.
#[async_trait]
pub trait AccessResolver: Send + Sync {
    /// Resolve the caller's access to one tenant. Fails only when the
    /// backend is unreachable; "no access" is a normal answer.
    async fn tenant_access(&self, user_id: &str, tenant_id: &str)
        -> Result<TenantAccess, AccessError>;
}
