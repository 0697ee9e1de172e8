use serde::{Deserialize, Serialize};
use crate::user::User;

/// A signed-in session: bearer token plus the user it belongs to.
/// Persisted as one record so the two halves can never diverge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

/// Who is signed in, as far as the client knows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    /// Stored session not read yet (first load)
    #[default]
    Unknown,
    Unauthenticated,
    Authenticated(Session),
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(s) => Some(s),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&crate::user::User> {
        self.session().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, AuthState::Unknown)
    }
}
