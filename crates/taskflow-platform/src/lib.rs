//! Browser adapters for the `taskflow-core` ports.

pub mod http;
pub mod storage;

pub use http::FetchHttp;
pub use storage::{open_storage, MemoryStorage, WebStorage};
