use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum TaskflowError {
    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(String),

    /// The backend rejected the bearer token (HTTP 401)
    #[error("{message}")]
    Unauthorized { message: String },

    /// Any other non-2xx response
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// A 2xx response whose body did not match the expected shape
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Rejected client-side before any request was made
    #[error("{message}")]
    Validation { field: String, message: String },

    /// An authenticated call was attempted without a session
    #[error("Not signed in")]
    Unauthenticated,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("{0}")]
    Other(String),
}

/// The uniform `{message, status, details?}` error shape shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<Value>,
}

impl TaskflowError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TaskflowError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP-ish status code. Network failures report 0.
    pub fn status(&self) -> u16 {
        match self {
            TaskflowError::Network(_) => 0,
            TaskflowError::Unauthorized { .. } | TaskflowError::Unauthenticated => 401,
            TaskflowError::Http { status, .. } => *status,
            TaskflowError::Validation { .. } => 400,
            _ => 500,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TaskflowError::Unauthorized { .. })
    }

    pub fn payload(&self) -> ErrorPayload {
        let details = match self {
            TaskflowError::Http { details, .. } => details.clone(),
            TaskflowError::Validation { field, .. } => Some(Value::String(field.clone())),
            _ => None,
        };
        ErrorPayload {
            message: self.to_string(),
            status: self.status(),
            details,
        }
    }
}

impl From<serde_json::Error> for TaskflowError {
    fn from(e: serde_json::Error) -> Self {
        TaskflowError::Serialization(e.to_string())
    }
}
