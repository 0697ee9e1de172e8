//! Access guard for protected views.

use taskflow_types::session::AuthState;

/// Why a signed-in user was turned away
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    Role {
        required: Vec<String>,
        actual: Option<String>,
    },
    Permissions { missing: Vec<String> },
}

/// What a protected view should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Session not resolved yet; show a neutral placeholder
    Loading,
    RedirectToLogin { redirect_to: String },
    Denied(Denial),
    Granted,
}

#[derive(Debug, Clone)]
pub struct Guard {
    /// Any one of these roles is enough
    required_roles: Vec<String>,
    /// Every one of these is needed
    required_permissions: Vec<String>,
    redirect_to: String,
}

impl Guard {
    /// A guard that only needs a signed-in user.
    pub fn authenticated() -> Self {
        Self {
            required_roles: Vec::new(),
            required_permissions: Vec::new(),
            redirect_to: "/login".to_string(),
        }
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn redirect_to(mut self, route: impl Into<String>) -> Self {
        self.redirect_to = route.into();
        self
    }

    pub fn evaluate(&self, state: &AuthState) -> Access {
        let user = match state {
            AuthState::Unknown => return Access::Loading,
            AuthState::Unauthenticated => {
                return Access::RedirectToLogin {
                    redirect_to: self.redirect_to.clone(),
                }
            }
            AuthState::Authenticated(session) => &session.user,
        };

        if !self.required_roles.is_empty() {
            let has_role = user
                .role
                .as_ref()
                .is_some_and(|r| self.required_roles.contains(r));
            if !has_role {
                return Access::Denied(Denial::Role {
                    required: self.required_roles.clone(),
                    actual: user.role.clone(),
                });
            }
        }

        let missing: Vec<String> = self
            .required_permissions
            .iter()
            .filter(|p| !user.has_permission(p))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Access::Denied(Denial::Permissions { missing });
        }

        Access::Granted
    }
}

impl Default for Guard {
    fn default() -> Self {
        Self::authenticated()
    }
}
