use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single day's published content for one tenant. At most one record
/// exists per (tenant_id, date); the store assigns id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropRecord {
    pub id: String,
    pub tenant_id: String,
    /// Day granularity, serialized as YYYY-MM-DD. No timezone is stored.
    pub date: NaiveDate,
    #[serde(default)]
    pub title: String,
    pub content: String,
    /// Expected to be an embeddable-player URL; not validated server-side.
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub resource_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable fields of a drop. Optional inputs are normalized to empty
/// strings before they reach the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DropFields {
    pub title: String,
    pub content: String,
    pub video_url: String,
    pub resource_link: String,
}

impl DropFields {
    pub fn new(
        title: Option<String>,
        content: Option<String>,
        video_url: Option<String>,
        resource_link: Option<String>,
    ) -> Self {
        Self {
            title: title.unwrap_or_default(),
            content: content.unwrap_or_default(),
            video_url: video_url.unwrap_or_default(),
            resource_link: resource_link.unwrap_or_default(),
        }
    }
}
