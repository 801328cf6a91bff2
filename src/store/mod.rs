pub mod http;
pub mod model;

use async_trait::async_trait;
use chrono::NaiveDate;

pub use http::HttpDropStore;
pub use model::{DropFields, DropRecord};

/// One page of drops plus the total count of matching records in the
/// store (not just the page length).
#[derive(Debug, Clone)]
pub struct DropPage {
    pub drops: Vec<DropRecord>,
    pub total: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unreachable: {0}")]
    Unavailable(String),
    #[error("store request failed ({status}): {message}")]
    Backend { status: u16, message: String },
    #[error("malformed store response: {0}")]
    Decode(String),
}

/// Seam over the external document database. Every operation is scoped
/// by tenant or addresses a single document; the store guarantees
/// per-document atomicity and nothing more.
#[async_trait]
pub trait DropStore: Send + Sync {
    /// Look up the drop for one (tenant, date) key.
    async fn find_by_date(
        &self,
        tenant_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DropRecord>, StoreError>;

    /// Most-recent drops for a tenant, ordered by date descending.
    async fn list(&self, tenant_id: &str, limit: u32) -> Result<DropPage, StoreError>;

    async fn create(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        fields: &DropFields,
    ) -> Result<DropRecord, StoreError>;

    /// Full overwrite of a document. `tenant_id` and `date` are always
    /// rewritten so a drop can never drift away from its tenant.
    async fn update(
        &self,
        drop_id: &str,
        tenant_id: &str,
        date: NaiveDate,
        fields: &DropFields,
    ) -> Result<DropRecord, StoreError>;

    async fn delete(&self, drop_id: &str) -> Result<(), StoreError>;

    /// Fetch by document id; `StoreError::NotFound` if absent.
    async fn get_by_id(&self, drop_id: &str) -> Result<DropRecord, StoreError>;

    /// Liveness probe used by the /health endpoint.
    async fn health(&self) -> Result<(), StoreError>;
}
