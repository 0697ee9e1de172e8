pub mod memory;
pub mod web;
pub mod auto;

pub use memory::MemoryStorage;
pub use web::WebStorage;
pub use auto::open_storage;
