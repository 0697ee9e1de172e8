pub mod user;
pub mod task;
pub mod chat;
pub mod event;
pub mod config;
pub mod error;
pub mod session;
pub mod validation;
mod de;

#[cfg(test)]
mod tests;

pub use error::{ErrorPayload, TaskflowError};
pub type Result<T> = std::result::Result<T, TaskflowError>;
