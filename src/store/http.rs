use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use super::model::{DropFields, DropRecord};
use super::{DropPage, DropStore, StoreError};
use crate::config::StoreConfig;

/// Client for the external document database holding drop records.
///
/// Speaks the store's JSON REST surface: documents live in named
/// collections, list queries filter and order via query parameters, and
/// the store assigns ids and timestamps on write.
pub struct HttpDropStore {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    collection: String,
}

/// List responses carry the page plus the total match count.
#[derive(Debug, Deserialize)]
struct DocumentPage {
    total: u64,
    documents: Vec<DropRecord>,
}

/// Write payload: the full document body minus store-managed fields.
#[derive(Debug, Serialize)]
struct DocumentData<'a> {
    tenant_id: &'a str,
    date: NaiveDate,
    #[serde(flatten)]
    fields: &'a DropFields,
}

impl HttpDropStore {
    pub fn from_config(config: &StoreConfig) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| anyhow::anyhow!("invalid store endpoint '{}': {}", config.endpoint, e))?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key: config.api_key.clone(),
            collection: config.collection.clone(),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Unavailable("store endpoint cannot be a base URL".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn documents_url(&self) -> Result<Url, StoreError> {
        self.url(&["collections", &self.collection, "documents"])
    }

    fn document_url(&self, drop_id: &str) -> Result<Url, StoreError> {
        self.url(&["collections", &self.collection, "documents", drop_id])
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend { status: status.as_u16(), message });
        }

        Ok(response)
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StoreError> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DropStore for HttpDropStore {
    async fn find_by_date(
        &self,
        tenant_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DropRecord>, StoreError> {
        let url = self.documents_url()?;
        let date = date.to_string();
        let page: DocumentPage = self
            .send_json(self.http.get(url).query(&[
                ("tenant_id", tenant_id),
                ("date", date.as_str()),
                ("limit", "1"),
            ]))
            .await?;

        Ok(page.documents.into_iter().next())
    }

    async fn list(&self, tenant_id: &str, limit: u32) -> Result<DropPage, StoreError> {
        let url = self.documents_url()?;
        let limit = limit.to_string();
        let page: DocumentPage = self
            .send_json(self.http.get(url).query(&[
                ("tenant_id", tenant_id),
                ("order", "-date"),
                ("limit", limit.as_str()),
            ]))
            .await?;

        Ok(DropPage { drops: page.documents, total: page.total })
    }

    async fn create(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        fields: &DropFields,
    ) -> Result<DropRecord, StoreError> {
        let url = self.documents_url()?;
        let body = DocumentData { tenant_id, date, fields };
        self.send_json(self.http.post(url).json(&body)).await
    }

    async fn update(
        &self,
        drop_id: &str,
        tenant_id: &str,
        date: NaiveDate,
        fields: &DropFields,
    ) -> Result<DropRecord, StoreError> {
        let url = self.document_url(drop_id)?;
        let body = DocumentData { tenant_id, date, fields };
        self.send_json(self.http.patch(url).json(&body)).await
    }

    async fn delete(&self, drop_id: &str) -> Result<(), StoreError> {
        let url = self.document_url(drop_id)?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    async fn get_by_id(&self, drop_id: &str) -> Result<DropRecord, StoreError> {
        let url = self.document_url(drop_id)?;
        self.send_json(self.http.get(url)).await
    }

    async fn health(&self) -> Result<(), StoreError> {
        let url = self.url(&["health"])?;
        self.send(self.http.get(url)).await?;
        Ok(())
    }
}
