use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use super::{AccessError, AccessResolver, TenantAccess};
use crate::config::AccessConfig;

/// Client for the external authorization service.
///
/// Constructed once at process start from configuration and shared behind
/// an Arc; connections are stateless so there is no teardown.
pub struct HttpAccessResolver {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl HttpAccessResolver {
    pub fn from_config(config: &AccessConfig) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| anyhow::anyhow!("invalid access service endpoint '{}': {}", config.endpoint, e))?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    fn access_url(&self, tenant_id: &str, user_id: &str) -> Result<Url, AccessError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| AccessError::CheckFailed("access endpoint cannot be a base URL".into()))?
            .pop_if_empty()
            .extend(["access", tenant_id, user_id]);
        Ok(url)
    }
}

#[async_trait]
impl AccessResolver for HttpAccessResolver {
    async fn tenant_access(
        &self,
        user_id: &str,
        tenant_id: &str,
    ) -> Result<TenantAccess, AccessError> {
        let url = self.access_url(tenant_id, user_id)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AccessError::CheckFailed(format!("request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AccessError::CheckFailed(format!(
                "access service answered {} for tenant {}",
                status, tenant_id
            )));
        }

        let access = response
            .json::<TenantAccess>()
            .await
            .map_err(|e| AccessError::CheckFailed(format!("malformed access response: {}", e)))?;

        tracing::debug!(
            "access check: user={} tenant={} has_access={} level={:?}",
            user_id,
            tenant_id,
            access.has_access,
            access.level
        );

        Ok(access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessConfig;

    #[test]
    fn access_url_is_tenant_scoped() {
        let resolver = HttpAccessResolver::from_config(&AccessConfig {
            endpoint: "http://localhost:8081/v1".to_string(),
            api_key: "k".to_string(),
        })
        .unwrap();

        let url = resolver.access_url("biz_A", "user_1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8081/v1/access/biz_A/user_1");
    }

    #[test]
    fn invalid_endpoint_is_rejected_at_construction() {
        let result = HttpAccessResolver::from_config(&AccessConfig {
            endpoint: "not a url".to_string(),
            api_key: String::new(),
        });
        assert!(result.is_err());
    }
}
