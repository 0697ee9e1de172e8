//! Pick the storage backend named by the config.
//!
//! `Auto` prefers localStorage (persistent, shared across tabs). Any
//! backend that cannot be opened falls back to memory.

use std::rc::Rc;
use taskflow_core::ports::StoragePort;
use taskflow_types::config::StorageBackendType;
use super::{MemoryStorage, WebStorage};

/// Returns a trait object so callers are backend-agnostic.
pub fn open_storage(backend: &StorageBackendType) -> Rc<dyn StoragePort> {
    let opened = match backend {
        StorageBackendType::Memory => return memory(),
        StorageBackendType::Auto | StorageBackendType::LocalStorage => WebStorage::local(),
        StorageBackendType::SessionStorage => WebStorage::session(),
    };

    match opened {
        Ok(storage) => {
            log::info!("Storage backend: {}", storage.backend_name());
            Rc::new(storage)
        }
        Err(e) => {
            log::warn!("{:?} unavailable ({}), falling back to memory", backend, e);
            memory()
        }
    }
}

fn memory() -> Rc<dyn StoragePort> {
    log::info!("Storage backend: memory");
    Rc::new(MemoryStorage::new())
}
