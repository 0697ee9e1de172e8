//! `localStorage` / `sessionStorage` backend.
//!
//! Web storage holds strings, so values must be UTF-8 (the session and
//! config records are JSON). Writes are visible to other tabs of the same
//! origin, which is what lets the session store notice a login or logout
//! elsewhere.

use async_trait::async_trait;
use wasm_bindgen::JsValue;

use taskflow_core::ports::StoragePort;
use taskflow_types::{Result, TaskflowError};

pub struct WebStorage {
    storage: web_sys::Storage,
    name: &'static str,
}

fn js_err(e: JsValue) -> TaskflowError {
    TaskflowError::Storage(format!("{:?}", e))
}

impl WebStorage {
    /// Persistent across reloads and shared by every tab.
    pub fn local() -> Result<Self> {
        let storage = window()?
            .local_storage()
            .map_err(js_err)?
            .ok_or_else(|| TaskflowError::Storage("localStorage not available".to_string()))?;
        Ok(Self { storage, name: "localStorage" })
    }

    /// Scoped to this tab.
    pub fn session() -> Result<Self> {
        let storage = window()?
            .session_storage()
            .map_err(js_err)?
            .ok_or_else(|| TaskflowError::Storage("sessionStorage not available".to_string()))?;
        Ok(Self { storage, name: "sessionStorage" })
    }
}

fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| TaskflowError::Storage("No window object".to_string()))
}

#[async_trait(?Send)]
impl StoragePort for WebStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.storage.get_item(key).map_err(js_err)?;
        Ok(value.map(String::into_bytes))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(value)
            .map_err(|e| TaskflowError::Storage(format!("{} is not UTF-8: {}", key, e)))?;
        // Quota errors surface here
        self.storage.set_item(key, text).map_err(js_err)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_err)
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let len = self.storage.length().map_err(js_err)?;
        let mut keys = Vec::new();
        for i in 0..len {
            if let Some(key) = self.storage.key(i).map_err(js_err)? {
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }
        Ok(keys)
    }

    fn backend_name(&self) -> &str {
        self.name
    }
}
