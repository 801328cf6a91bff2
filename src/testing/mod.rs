//! Test doubles for the two external collaborators. Used by the unit
//! tests in this crate and by the integration tests under tests/.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::access::{AccessError, AccessLevel, AccessResolver, TenantAccess};
use crate::store::{DropFields, DropPage, DropRecord, DropStore, StoreError};

/// In-memory stand-in for the document database.
pub struct MemoryDropStore {
    records: Mutex<Vec<DropRecord>>,
}

impl MemoryDropStore {
    pub fn new() -> Self {
        Self { records: Mutex::new(Vec::new()) }
    }

    /// Insert a record directly, bypassing the service. Lets tests shape
    /// history (past dates) without going through publish.
    pub fn seed(&self, tenant_id: &str, date: NaiveDate, fields: DropFields) -> DropRecord {
        let now = Utc::now();
        let record = DropRecord {
            id: format!("doc_{}", Uuid::new_v4().simple()),
            tenant_id: tenant_id.to_string(),
            date,
            title: fields.title,
            content: fields.content,
            video_url: fields.video_url,
            resource_link: fields.resource_link,
            created_at: now,
            updated_at: now,
        };
        self.records.lock().unwrap().push(record.clone());
        record
    }

    /// Number of records for one (tenant, date) key. The service must
    /// keep this at zero or one.
    pub fn count_for(&self, tenant_id: &str, date: NaiveDate) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.tenant_id == tenant_id && r.date == date)
            .count()
    }

    pub fn snapshot(&self) -> Vec<DropRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl Default for MemoryDropStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DropStore for MemoryDropStore {
    async fn find_by_date(
        &self,
        tenant_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DropRecord>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .find(|r| r.tenant_id == tenant_id && r.date == date)
            .cloned())
    }

    async fn list(&self, tenant_id: &str, limit: u32) -> Result<DropPage, StoreError> {
        let records = self.records.lock().unwrap();
        let mut drops: Vec<DropRecord> = records
            .iter()
            .filter(|r| r.tenant_id == tenant_id)
            .cloned()
            .collect();
        let total = drops.len() as u64;
        drops.sort_by(|a, b| b.date.cmp(&a.date));
        drops.truncate(limit as usize);
        Ok(DropPage { drops, total })
    }

    async fn create(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        fields: &DropFields,
    ) -> Result<DropRecord, StoreError> {
        Ok(self.seed(tenant_id, date, fields.clone()))
    }

    async fn update(
        &self,
        drop_id: &str,
        tenant_id: &str,
        date: NaiveDate,
        fields: &DropFields,
    ) -> Result<DropRecord, StoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == drop_id)
            .ok_or(StoreError::NotFound)?;

        record.tenant_id = tenant_id.to_string();
        record.date = date;
        record.title = fields.title.clone();
        record.content = fields.content.clone();
        record.video_url = fields.video_url.clone();
        record.resource_link = fields.resource_link.clone();
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, drop_id: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != drop_id);
        if records.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn get_by_id(&self, drop_id: &str) -> Result<DropRecord, StoreError> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .find(|r| r.id == drop_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Access resolver answering from a fixed table of (user, tenant) grants.
/// Unlisted pairs resolve to no access.
pub struct StaticAccess {
    grants: Mutex<HashMap<(String, String), TenantAccess>>,
    fail: bool,
}

impl StaticAccess {
    pub fn new() -> Self {
        Self { grants: Mutex::new(HashMap::new()), fail: false }
    }

    /// Resolver whose backend is "unreachable"; every check fails.
    pub fn unreachable() -> Self {
        Self { grants: Mutex::new(HashMap::new()), fail: true }
    }

    pub fn grant(self, user_id: &str, tenant_id: &str, level: AccessLevel) -> Self {
        let access = TenantAccess { has_access: level != AccessLevel::NoAccess, level };
        self.grants
            .lock()
            .unwrap()
            .insert((user_id.to_string(), tenant_id.to_string()), access);
        self
    }

    /// Paid-content flag without management rights, or an explicit
    /// `has_access=false` member (lapsed subscription).
    pub fn grant_access_flag(self, user_id: &str, tenant_id: &str, has_access: bool) -> Self {
        let access = TenantAccess { has_access, level: AccessLevel::Member };
        self.grants
            .lock()
            .unwrap()
            .insert((user_id.to_string(), tenant_id.to_string()), access);
        self
    }
}

impl Default for StaticAccess {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccessResolver for StaticAccess {
    async fn tenant_access(
        &self,
        user_id: &str,
        tenant_id: &str,
    ) -> Result<TenantAccess, AccessError> {
        if self.fail {
            return Err(AccessError::CheckFailed("access backend unreachable".into()));
        }
        let grants = self.grants.lock().unwrap();
        Ok(grants
            .get(&(user_id.to_string(), tenant_id.to_string()))
            .copied()
            .unwrap_or(TenantAccess { has_access: false, level: AccessLevel::NoAccess }))
    }
}
