use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub store: StoreConfig,
    pub access: AccessConfig,
    pub tenancy: TenancyConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub default_list_limit: u32,
    pub max_list_limit: u32,
}

/// Connection settings for the external document database holding drop records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub endpoint: String,
    pub api_key: String,
    pub collection: String,
}

/// Connection settings for the external authorization service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenancyConfig {
    /// Legacy single-tenant mode: requests that omit tenant_id fall back to
    /// this tenant. Multi-tenant deployments leave it unset.
    pub default_tenant: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("API_DEFAULT_LIST_LIMIT") {
            self.api.default_list_limit = v.parse().unwrap_or(self.api.default_list_limit);
        }
        if let Ok(v) = env::var("API_MAX_LIST_LIMIT") {
            self.api.max_list_limit = v.parse().unwrap_or(self.api.max_list_limit);
        }

        // Store overrides
        if let Ok(v) = env::var("STORE_ENDPOINT") {
            self.store.endpoint = v;
        }
        if let Ok(v) = env::var("STORE_API_KEY") {
            self.store.api_key = v;
        }
        if let Ok(v) = env::var("STORE_COLLECTION") {
            self.store.collection = v;
        }

        // Access service overrides
        if let Ok(v) = env::var("ACCESS_ENDPOINT") {
            self.access.endpoint = v;
        }
        if let Ok(v) = env::var("ACCESS_API_KEY") {
            self.access.api_key = v;
        }

        // Tenancy overrides
        if let Ok(v) = env::var("DEFAULT_TENANT_ID") {
            if v.is_empty() {
                self.tenancy.default_tenant = None;
            } else {
                self.tenancy.default_tenant = Some(v);
            }
        }

        // Security overrides
        if let Ok(v) = env::var("IDENTITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                default_list_limit: 10,
                max_list_limit: 1000,
            },
            store: StoreConfig {
                endpoint: "http://localhost:8080/v1".to_string(),
                api_key: String::new(),
                collection: "daily_drops".to_string(),
            },
            access: AccessConfig {
                endpoint: "http://localhost:8081/v1".to_string(),
                api_key: String::new(),
            },
            tenancy: TenancyConfig { default_tenant: None },
            security: SecurityConfig {
                jwt_secret: "dev-secret".to_string(),
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                default_list_limit: 10,
                max_list_limit: 500,
            },
            store: StoreConfig {
                endpoint: String::new(),
                api_key: String::new(),
                collection: "daily_drops".to_string(),
            },
            access: AccessConfig {
                endpoint: String::new(),
                api_key: String::new(),
            },
            tenancy: TenancyConfig { default_tenant: None },
            security: SecurityConfig {
                jwt_secret: String::new(),
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                default_list_limit: 10,
                max_list_limit: 100,
            },
            store: StoreConfig {
                endpoint: String::new(),
                api_key: String::new(),
                collection: "daily_drops".to_string(),
            },
            access: AccessConfig {
                endpoint: String::new(),
                api_key: String::new(),
            },
            tenancy: TenancyConfig { default_tenant: None },
            security: SecurityConfig {
                jwt_secret: String::new(),
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
