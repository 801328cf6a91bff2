use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::access::{AccessError, AccessResolver};
use crate::auth::Identity;
use crate::store::{DropFields, DropRecord, DropStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum DropError {
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("drop not found")]
    NotFound,
    #[error("drop belongs to another tenant")]
    CrossTenant,
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for DropError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => DropError::NotFound,
            other => DropError::Store(other),
        }
    }
}

/// Result of a publish: the stored drop plus whether a new record was
/// created (201) or today's record was overwritten (200).
#[derive(Debug)]
pub struct PublishOutcome {
    pub drop: DropRecord,
    pub created: bool,
}

/// Aggregate counts derived from the listed page; nothing is stored.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DropStats {
    pub total_drops: u64,
    pub this_month: usize,
    pub this_week: usize,
}

#[derive(Debug)]
pub struct DropListing {
    pub drops: Vec<DropRecord>,
    pub stats: DropStats,
}

/// The core service: enforces the one-drop-per-tenant-per-day invariant
/// and the tenant-scoped authorization gate in front of every store
/// operation. Collaborators are injected so tests can substitute fakes.
pub struct DropService {
    access: Arc<dyn AccessResolver>,
    store: Arc<dyn DropStore>,
}

impl DropService {
    pub fn new(access: Arc<dyn AccessResolver>, store: Arc<dyn DropStore>) -> Self {
        Self { access, store }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Every mutating operation requires admin on the target tenant.
    async fn require_admin(&self, tenant_id: &str, identity: &Identity) -> Result<(), DropError> {
        let access = self.access.tenant_access(&identity.user_id, tenant_id).await?;
        if !access.is_admin() {
            tracing::warn!(
                "denied admin operation: user={} tenant={} level={:?}",
                identity.user_id,
                tenant_id,
                access.level
            );
            return Err(DropError::Forbidden("Admin access required"));
        }
        Ok(())
    }

    fn require_content(fields: &DropFields) -> Result<(), DropError> {
        if fields.content.trim().is_empty() {
            return Err(DropError::InvalidInput("Content is required"));
        }
        Ok(())
    }

    /// Publish today's drop for a tenant: overwrite the existing record
    /// for (tenant, today) if one exists, otherwise create it. Repeated
    /// publishes on the same day never produce a second record from this
    /// path; last write wins, no merge. The find-then-write pair is not
    /// atomic against a concurrent publish for the same key (the store
    /// only guarantees per-document atomicity).
    pub async fn publish(
        &self,
        tenant_id: &str,
        fields: DropFields,
        identity: &Identity,
    ) -> Result<PublishOutcome, DropError> {
        self.require_admin(tenant_id, identity).await?;
        Self::require_content(&fields)?;

        let today = Self::today();

        match self.store.find_by_date(tenant_id, today).await? {
            Some(existing) => {
                // Overwrite in place, preserving the (tenant, date) key
                let drop = self
                    .store
                    .update(&existing.id, tenant_id, existing.date, &fields)
                    .await?;
                tracing::info!("drop overwritten: tenant={} date={}", tenant_id, today);
                Ok(PublishOutcome { drop, created: false })
            }
            None => {
                let drop = self.store.create(tenant_id, today, &fields).await?;
                tracing::info!("drop published: tenant={} date={}", tenant_id, today);
                Ok(PublishOutcome { drop, created: true })
            }
        }
    }

    /// Today's drop for a member. `None` means nothing has been published
    /// yet today; that is a normal outcome, not an error.
    pub async fn get_today(
        &self,
        tenant_id: &str,
        identity: &Identity,
    ) -> Result<Option<DropRecord>, DropError> {
        let access = self.access.tenant_access(&identity.user_id, tenant_id).await?;
        if !access.has_access {
            return Err(DropError::Forbidden("Access denied"));
        }

        Ok(self.store.find_by_date(tenant_id, Self::today()).await?)
    }

    /// Most-recent drops plus derived stats, for the management view.
    pub async fn list(
        &self,
        tenant_id: &str,
        limit: u32,
        identity: &Identity,
    ) -> Result<DropListing, DropError> {
        self.require_admin(tenant_id, identity).await?;

        let page = self.store.list(tenant_id, limit).await?;
        let stats = compute_stats(&page.drops, page.total, Self::today());

        Ok(DropListing { drops: page.drops, stats })
    }

    /// Overwrite an existing drop by id. The drop must belong to the
    /// caller's tenant; a mismatch is rejected before any write so id
    /// guessing across tenants cannot mutate anything.
    pub async fn update(
        &self,
        drop_id: &str,
        tenant_id: &str,
        fields: DropFields,
        date_override: Option<NaiveDate>,
        identity: &Identity,
    ) -> Result<DropRecord, DropError> {
        self.require_admin(tenant_id, identity).await?;
        Self::require_content(&fields)?;

        let existing = self.store.get_by_id(drop_id).await?;
        if existing.tenant_id != tenant_id {
            tracing::warn!(
                "cross-tenant update rejected: drop={} owner={} caller={}",
                drop_id,
                existing.tenant_id,
                tenant_id
            );
            return Err(DropError::CrossTenant);
        }

        let date = date_override.unwrap_or(existing.date);
        Ok(self.store.update(drop_id, tenant_id, date, &fields).await?)
    }

    /// Delete a drop by id, with the same ownership check as update.
    pub async fn delete(
        &self,
        drop_id: &str,
        tenant_id: &str,
        identity: &Identity,
    ) -> Result<(), DropError> {
        self.require_admin(tenant_id, identity).await?;

        let existing = self.store.get_by_id(drop_id).await?;
        if existing.tenant_id != tenant_id {
            tracing::warn!(
                "cross-tenant delete rejected: drop={} owner={} caller={}",
                drop_id,
                existing.tenant_id,
                tenant_id
            );
            return Err(DropError::CrossTenant);
        }

        self.store.delete(drop_id).await?;
        tracing::info!("drop deleted: tenant={} id={}", tenant_id, drop_id);
        Ok(())
    }

    /// Raw paid-content flag for the paywall gate. A `false` answer is a
    /// normal response here, not an authorization failure.
    pub async fn check_access(
        &self,
        tenant_id: &str,
        identity: &Identity,
    ) -> Result<bool, DropError> {
        let access = self.access.tenant_access(&identity.user_id, tenant_id).await?;
        Ok(access.has_access)
    }
}

/// Derive the aggregate counts over a fetched page. The month window
/// starts on the 1st; the week window starts on Sunday.
fn compute_stats(drops: &[DropRecord], total: u64, today: NaiveDate) -> DropStats {
    let first_of_month = today.with_day(1).unwrap_or(today);
    let start_of_week = today - Duration::days(today.weekday().num_days_from_sunday() as i64);

    DropStats {
        total_drops: total,
        this_month: drops.iter().filter(|d| d.date >= first_of_month).count(),
        this_week: drops.iter().filter(|d| d.date >= start_of_week).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessLevel;
    use crate::testing::{MemoryDropStore, StaticAccess};

    const TENANT_A: &str = "biz_A";
    const TENANT_B: &str = "biz_B";

    fn admin() -> Identity {
        Identity { user_id: "user_admin".to_string() }
    }

    fn member() -> Identity {
        Identity { user_id: "user_member".to_string() }
    }

    fn fields(content: &str) -> DropFields {
        DropFields { content: content.to_string(), ..Default::default() }
    }

    /// Admin on A, member on A, plus an admin on B for cross-tenant cases.
    fn service_with_store() -> (DropService, Arc<MemoryDropStore>) {
        let access = StaticAccess::new()
            .grant("user_admin", TENANT_A, AccessLevel::Admin)
            .grant("user_member", TENANT_A, AccessLevel::Member)
            .grant("user_admin_b", TENANT_B, AccessLevel::Admin);
        let store = Arc::new(MemoryDropStore::new());
        let service = DropService::new(Arc::new(access), store.clone());
        (service, store)
    }

    #[tokio::test]
    async fn publish_creates_then_overwrites_single_record() {
        let (service, store) = service_with_store();
        let today = Utc::now().date_naive();

        let first = service
            .publish(TENANT_A, fields("hello"), &admin())
            .await
            .unwrap();
        assert!(first.created);
        assert_eq!(first.drop.date, today);
        assert_eq!(first.drop.title, "");

        let second = service
            .publish(
                TENANT_A,
                DropFields {
                    title: "Hi".to_string(),
                    content: "world".to_string(),
                    ..Default::default()
                },
                &admin(),
            )
            .await
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.drop.id, first.drop.id);

        // Idempotent-overwrite law: one record, last write wins
        assert_eq!(store.count_for(TENANT_A, today), 1);
        let current = service.get_today(TENANT_A, &admin()).await.unwrap().unwrap();
        assert_eq!(current.content, "world");
        assert_eq!(current.title, "Hi");
    }

    #[tokio::test]
    async fn publish_rejects_blank_content_and_leaves_store_unchanged() {
        let (service, store) = service_with_store();
        service.publish(TENANT_A, fields("keep me"), &admin()).await.unwrap();

        for bad in ["", "   "] {
            let err = service.publish(TENANT_A, fields(bad), &admin()).await.unwrap_err();
            assert!(matches!(err, DropError::InvalidInput(_)));
        }

        let today = Utc::now().date_naive();
        assert_eq!(store.count_for(TENANT_A, today), 1);
        let current = service.get_today(TENANT_A, &admin()).await.unwrap().unwrap();
        assert_eq!(current.content, "keep me");
    }

    #[tokio::test]
    async fn member_cannot_publish() {
        let (service, store) = service_with_store();
        let err = service.publish(TENANT_A, fields("x"), &member()).await.unwrap_err();
        assert!(matches!(err, DropError::Forbidden(_)));
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn get_today_distinguishes_no_access_from_nothing_published() {
        let (service, _store) = service_with_store();

        // Member with access, nothing published yet: null, not an error
        assert!(service.get_today(TENANT_A, &member()).await.unwrap().is_none());

        // Unknown user: forbidden
        let stranger = Identity { user_id: "user_stranger".to_string() };
        let err = service.get_today(TENANT_A, &stranger).await.unwrap_err();
        assert!(matches!(err, DropError::Forbidden(_)));

        // Lapsed member: has_access=false even though the tenant knows them
        let access = StaticAccess::new().grant_access_flag("user_lapsed", TENANT_A, false);
        let service = DropService::new(Arc::new(access), Arc::new(MemoryDropStore::new()));
        let lapsed = Identity { user_id: "user_lapsed".to_string() };
        let err = service.get_today(TENANT_A, &lapsed).await.unwrap_err();
        assert!(matches!(err, DropError::Forbidden(_)));
    }

    #[tokio::test]
    async fn member_with_access_can_read_todays_drop() {
        let (service, _store) = service_with_store();
        service.publish(TENANT_A, fields("hello"), &admin()).await.unwrap();

        let drop = service.get_today(TENANT_A, &member()).await.unwrap().unwrap();
        assert_eq!(drop.content, "hello");
    }

    #[tokio::test]
    async fn update_rejects_cross_tenant_ids_without_mutating() {
        let (service, store) = service_with_store();
        let theirs = store.seed(TENANT_B, Utc::now().date_naive(), fields("theirs"));

        // Admin of A holds a valid admin grant, just not on B's drop
        let err = service
            .update(&theirs.id, TENANT_A, fields("stolen"), None, &admin())
            .await
            .unwrap_err();
        assert!(matches!(err, DropError::CrossTenant));

        let untouched = store.snapshot().into_iter().find(|r| r.id == theirs.id).unwrap();
        assert_eq!(untouched.content, "theirs");
        assert_eq!(untouched.tenant_id, TENANT_B);
    }

    #[tokio::test]
    async fn delete_rejects_cross_tenant_ids() {
        let (service, store) = service_with_store();
        let theirs = store.seed(TENANT_B, Utc::now().date_naive(), fields("theirs"));

        let err = service.delete(&theirs.id, TENANT_A, &admin()).await.unwrap_err();
        assert!(matches!(err, DropError::CrossTenant));
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn update_preserves_date_unless_overridden() {
        let (service, store) = service_with_store();
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let seeded = store.seed(TENANT_A, date, fields("old"));

        let updated = service
            .update(&seeded.id, TENANT_A, fields("new"), None, &admin())
            .await
            .unwrap();
        assert_eq!(updated.date, date);
        assert_eq!(updated.content, "new");

        let moved = service
            .update(
                &seeded.id,
                TENANT_A,
                fields("moved"),
                NaiveDate::from_ymd_opt(2026, 1, 16),
                &admin(),
            )
            .await
            .unwrap();
        assert_eq!(moved.date, NaiveDate::from_ymd_opt(2026, 1, 16).unwrap());
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_drop_are_not_found() {
        let (service, _store) = service_with_store();

        let err = service
            .update("doc_missing", TENANT_A, fields("x"), None, &admin())
            .await
            .unwrap_err();
        assert!(matches!(err, DropError::NotFound));

        let err = service.delete("doc_missing", TENANT_A, &admin()).await.unwrap_err();
        assert!(matches!(err, DropError::NotFound));
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let (service, store) = service_with_store();
        let outcome = service.publish(TENANT_A, fields("bye"), &admin()).await.unwrap();

        service.delete(&outcome.drop.id, TENANT_A, &admin()).await.unwrap();
        assert!(store.snapshot().is_empty());
        assert!(service.get_today(TENANT_A, &admin()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_requires_admin_and_orders_newest_first() {
        let (service, store) = service_with_store();
        let today = Utc::now().date_naive();
        store.seed(TENANT_A, today - Duration::days(2), fields("a"));
        store.seed(TENANT_A, today, fields("b"));
        store.seed(TENANT_A, today - Duration::days(1), fields("c"));
        // Another tenant's drops never leak into the listing
        store.seed(TENANT_B, today, fields("other"));

        let err = service.list(TENANT_A, 10, &member()).await.unwrap_err();
        assert!(matches!(err, DropError::Forbidden(_)));

        let listing = service.list(TENANT_A, 10, &admin()).await.unwrap();
        assert_eq!(listing.drops.len(), 3);
        assert_eq!(listing.stats.total_drops, 3);
        let dates: Vec<NaiveDate> = listing.drops.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![today, today - Duration::days(1), today - Duration::days(2)]);
    }

    #[tokio::test]
    async fn list_total_counts_beyond_the_page() {
        let (service, store) = service_with_store();
        let today = Utc::now().date_naive();
        for i in 0..5 {
            store.seed(TENANT_A, today - Duration::days(i), fields("x"));
        }

        let listing = service.list(TENANT_A, 2, &admin()).await.unwrap();
        assert_eq!(listing.drops.len(), 2);
        assert_eq!(listing.stats.total_drops, 5);
    }

    #[tokio::test]
    async fn access_backend_outage_surfaces_as_upstream_failure() {
        let store = Arc::new(MemoryDropStore::new());
        let service = DropService::new(Arc::new(StaticAccess::unreachable()), store);

        let err = service.get_today(TENANT_A, &admin()).await.unwrap_err();
        assert!(matches!(err, DropError::Access(_)));
    }

    #[tokio::test]
    async fn check_access_reports_the_flag_without_failing() {
        let (service, _store) = service_with_store();
        assert!(service.check_access(TENANT_A, &member()).await.unwrap());

        let stranger = Identity { user_id: "user_stranger".to_string() };
        assert!(!service.check_access(TENANT_A, &stranger).await.unwrap());
    }

    #[test]
    fn stats_windows_start_on_the_first_and_on_sunday() {
        // Fixed vantage point: Friday 2026-08-07; that week's Sunday is 08-02
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let drop = |y, m, d| DropRecord {
            id: "doc".to_string(),
            tenant_id: TENANT_A.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            title: String::new(),
            content: "x".to_string(),
            video_url: String::new(),
            resource_link: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let drops = vec![
            drop(2026, 8, 6),  // this week (Thu)
            drop(2026, 8, 4),  // this week (Tue)
            drop(2026, 8, 2),  // this week (Sun boundary)
            drop(2026, 8, 1),  // this month, last week
            drop(2026, 7, 28), // previous month
        ];

        let stats = compute_stats(&drops, 12, today);
        assert_eq!(stats.total_drops, 12);
        assert_eq!(stats.this_month, 4);
        assert_eq!(stats.this_week, 3);
    }

    #[test]
    fn stats_week_window_on_a_sunday_counts_only_that_day() {
        // 2026-08-02 is itself a Sunday, so the window is one day old
        let today = NaiveDate::from_ymd_opt(2026, 8, 2).unwrap();
        let mk = |d: NaiveDate| DropRecord {
            id: "doc".to_string(),
            tenant_id: TENANT_A.to_string(),
            date: d,
            title: String::new(),
            content: "x".to_string(),
            video_url: String::new(),
            resource_link: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let drops = vec![mk(today), mk(today - Duration::days(1))];
        let stats = compute_stats(&drops, 2, today);
        assert_eq!(stats.this_week, 1);
    }
}
