use serde::{Deserialize, Serialize};

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    /// Route shown when the guard redirects an anonymous visitor
    pub login_route: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
            login_route: "/login".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub login_encoding: LoginEncoding,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            login_encoding: LoginEncoding::Form,
        }
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash
    pub fn normalized_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// How login credentials are sent. The reference backend reads an
/// OAuth2 password form; some deployments accept JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginEncoding {
    Form,
    Json,
}

impl LoginEncoding {
    pub fn all() -> &'static [LoginEncoding] {
        &[LoginEncoding::Form, LoginEncoding::Json]
    }

    pub fn label(&self) -> &str {
        match self {
            LoginEncoding::Form => "Form (x-www-form-urlencoded)",
            LoginEncoding::Json => "JSON",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// localStorage when available, memory otherwise
    Auto,
    Memory,
    LocalStorage,
    SessionStorage,
}

/// Storage key of the persisted session record
pub const SESSION_STORAGE_KEY: &str = "taskflow:session";
/// Storage key of the persisted client config
pub const CONFIG_STORAGE_KEY: &str = "taskflow:config";
/// Keys written by the two-key layout, migrated on restore
pub const LEGACY_TOKEN_KEY: &str = "auth_token";
pub const LEGACY_USER_KEY: &str = "user_data";
