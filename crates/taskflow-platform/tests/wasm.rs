//! WASM-target tests for taskflow-platform (Node.js runtime).
//!
//! Tests MemoryStorage and backend selection under wasm32-unknown-unknown
//! via `wasm-pack test --node`. Node has no `window`, so web storage is
//! expected to be unavailable here.

use wasm_bindgen_test::*;

use taskflow_platform::storage::{open_storage, MemoryStorage, WebStorage};
use taskflow_core::ports::StoragePort;
use taskflow_types::config::StorageBackendType;

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_storage_get_missing() {
    let storage = MemoryStorage::new();
    assert!(storage.get("taskflow:session").await.unwrap().is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_overwrite() {
    let storage = MemoryStorage::new();
    storage.set("taskflow:session", b"v1").await.unwrap();
    storage.set("taskflow:session", b"v2").await.unwrap();
    let result = storage.get("taskflow:session").await.unwrap();
    assert_eq!(result, Some(b"v2".to_vec()));
}

#[wasm_bindgen_test]
async fn memory_storage_delete_is_idempotent() {
    let storage = MemoryStorage::new();
    storage.set("auth_token", b"tok").await.unwrap();
    storage.delete("auth_token").await.unwrap();
    storage.delete("auth_token").await.unwrap();
    assert!(!storage.exists("auth_token").await.unwrap());
}

#[wasm_bindgen_test]
async fn memory_storage_list_keys() {
    let storage = MemoryStorage::new();
    storage.set("taskflow:session", b"1").await.unwrap();
    storage.set("taskflow:config", b"2").await.unwrap();
    storage.set("auth_token", b"3").await.unwrap();

    let mut keys = storage.list_keys("taskflow:").await.unwrap();
    keys.sort();
    assert_eq!(keys, vec!["taskflow:config", "taskflow:session"]);
}

// ─── Backend selection ───────────────────────────────────

#[wasm_bindgen_test]
fn web_storage_needs_window() {
    assert!(WebStorage::local().is_err());
    assert!(WebStorage::session().is_err());
}

#[wasm_bindgen_test]
fn explicit_memory_backend() {
    let storage = open_storage(&StorageBackendType::Memory);
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn auto_falls_back_to_memory() {
    for backend in [
        StorageBackendType::Auto,
        StorageBackendType::LocalStorage,
        StorageBackendType::SessionStorage,
    ] {
        let storage = open_storage(&backend);
        assert_eq!(storage.backend_name(), "memory");
        storage.set("k", b"v").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), Some(b"v".to_vec()));
    }
}
