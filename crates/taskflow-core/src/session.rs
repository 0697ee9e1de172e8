//! Session store: the single answer to "who is signed in".
//!
//! Storage is the source of truth. The in-memory [`AuthState`] is a cache
//! that is re-read from storage before every authenticated call, so a
//! login or logout in another tab is picked up on the next request.
//! Each request works from its own owned [`Session`] snapshot.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use taskflow_types::{
    Result, TaskflowError,
    config::{LEGACY_TOKEN_KEY, LEGACY_USER_KEY, SESSION_STORAGE_KEY},
    event::AppEvent,
    session::{AuthState, Session},
    user::{AuthResponse, Credentials, Registration, User},
    validation::{validate_credentials, validate_registration},
};

use crate::api::ApiClient;
use crate::event_bus::EventBus;
use crate::ports::StoragePort;
use crate::token;

pub struct SessionStore {
    api: Rc<ApiClient>,
    storage: Rc<dyn StoragePort>,
    event_bus: EventBus,
    state: RefCell<AuthState>,
}

impl SessionStore {
    pub fn new(api: Rc<ApiClient>, storage: Rc<dyn StoragePort>, event_bus: EventBus) -> Self {
        Self {
            api,
            storage,
            event_bus,
            state: RefCell::new(AuthState::Unknown),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Local and synchronous; trusts the cached session.
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.state.borrow().session().cloned()
    }

    fn set_state(&self, state: AuthState) {
        *self.state.borrow_mut() = state.clone();
        self.event_bus.emit(AppEvent::SessionChanged { state });
    }

    // ─── Lifecycle ───────────────────────────────────────────

    /// Resolve the first-load `Unknown` state from storage. Always leaves
    /// the store resolved; unreadable storage counts as signed out.
    pub async fn restore(&self) -> AuthState {
        let stored = match self.read_record().await {
            Ok(Some(session)) => Ok(Some(session)),
            Ok(None) => self.migrate_legacy().await,
            Err(e) => Err(e),
        };
        let stored = stored.unwrap_or_else(|e| {
            log::warn!("Could not read stored session: {}", e);
            None
        });

        let state = match stored {
            Some(session) if token::is_expired(&session.token) => {
                log::info!("Stored token for {} has expired", session.user.username);
                if let Err(e) = self.storage.delete(SESSION_STORAGE_KEY).await {
                    log::warn!("Failed to delete expired session: {}", e);
                }
                AuthState::Unauthenticated
            }
            Some(session) => {
                log::info!("Session restored for {}", session.user.username);
                AuthState::Authenticated(session)
            }
            None => AuthState::Unauthenticated,
        };

        self.set_state(state.clone());
        state
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        validate_credentials(credentials)?;
        let resp = self.api.login(credentials).await?;
        let session = session_from(resp)?;
        self.save_auth(session.clone()).await?;
        log::info!("Signed in as {}", session.user.username);
        Ok(session)
    }

    pub async fn register(&self, registration: &Registration) -> Result<Session> {
        validate_registration(registration)?;
        let resp = self.api.register(registration).await?;
        let session = session_from(resp)?;
        self.save_auth(session.clone()).await?;
        log::info!("Registered and signed in as {}", session.user.username);
        Ok(session)
    }

    /// Always ends `Unauthenticated`, whatever the prior state and even
    /// when a storage delete fails (the first failure is returned).
    pub async fn logout(&self) -> Result<()> {
        let mut first_err = None;
        for key in [SESSION_STORAGE_KEY, LEGACY_TOKEN_KEY, LEGACY_USER_KEY] {
            if let Err(e) = self.storage.delete(key).await {
                log::warn!("Failed to delete {}: {}", key, e);
                first_err.get_or_insert(e);
            }
        }
        self.set_state(AuthState::Unauthenticated);
        log::info!("Signed out");
        first_err.map_or(Ok(()), Err)
    }

    /// Re-validate the session against the backend and refresh the
    /// cached user snapshot.
    pub async fn current_user(&self) -> Result<User> {
        let session = self.require_session().await?;
        let result = self.api.current_user(&session.token).await;
        let user = self.settle(&session, result).await?;

        let still_current = self
            .current_session()
            .is_some_and(|s| s.token == session.token);
        if still_current && user != session.user {
            self.save_auth(Session::new(session.token, user.clone())).await?;
        }
        Ok(user)
    }

    /// Persist a session as one record, then publish it.
    pub async fn save_auth(&self, session: Session) -> Result<()> {
        let json = serde_json::to_vec(&session)?;
        self.storage.set(SESSION_STORAGE_KEY, &json).await?;
        self.set_state(AuthState::Authenticated(session));
        Ok(())
    }

    // ─── Per-request helpers ─────────────────────────────────

    /// Snapshot for one authenticated request. Fails with
    /// `Unauthenticated` (and no request should be made) when signed out.
    pub async fn require_session(&self) -> Result<Session> {
        self.sync_from_storage().await;
        self.current_session().ok_or(TaskflowError::Unauthenticated)
    }

    /// Run one authenticated call: snapshot, call, settle.
    pub async fn authorized<T, F, Fut>(&self, call: F) -> Result<T>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let snapshot = self.require_session().await?;
        let result = call(snapshot.clone()).await;
        self.settle(&snapshot, result).await
    }

    /// Observe the result of a call made with `snapshot`. A 401 signs the
    /// session out, once: later 401s for the same token are no-ops.
    pub async fn settle<T>(&self, snapshot: &Session, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_unauthorized() {
                self.expire(snapshot).await;
            }
        }
        result
    }

    async fn expire(&self, snapshot: &Session) {
        let is_current = self
            .current_session()
            .is_some_and(|s| s.token == snapshot.token);
        if !is_current {
            return;
        }

        // Another tab may have stored a fresh session meanwhile.
        match self.read_record().await {
            Ok(Some(stored)) if stored.token != snapshot.token => {
                self.set_state(AuthState::Authenticated(stored));
                return;
            }
            Ok(_) => {}
            Err(e) => log::warn!("Could not read stored session: {}", e),
        }

        log::info!("Backend rejected the session for {}; signing out", snapshot.user.username);
        if let Err(e) = self.storage.delete(SESSION_STORAGE_KEY).await {
            log::warn!("Failed to delete stored session: {}", e);
        }
        self.set_state(AuthState::Unauthenticated);
    }

    async fn sync_from_storage(&self) {
        let stored = match self.read_record().await {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("Could not read stored session, using cache: {}", e);
                return;
            }
        };
        if stored == self.current_session() && self.state.borrow().is_resolved() {
            return;
        }
        match stored {
            Some(session) => self.set_state(AuthState::Authenticated(session)),
            None => self.set_state(AuthState::Unauthenticated),
        }
    }

    // ─── Storage record ──────────────────────────────────────

    async fn read_record(&self) -> Result<Option<Session>> {
        let Some(bytes) = self.storage.get(SESSION_STORAGE_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_slice::<Session>(&bytes) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                log::warn!("Discarding unreadable session record: {}", e);
                self.storage.delete(SESSION_STORAGE_KEY).await?;
                Ok(None)
            }
        }
    }

    /// Fold the old two-key layout into the single record. Half a legacy
    /// session is dropped.
    async fn migrate_legacy(&self) -> Result<Option<Session>> {
        let token = self.storage.get(LEGACY_TOKEN_KEY).await?;
        let user = self.storage.get(LEGACY_USER_KEY).await?;
        if token.is_none() && user.is_none() {
            return Ok(None);
        }

        let token = token.and_then(|t| String::from_utf8(t).ok()).filter(|t| !t.is_empty());
        let user = user.and_then(|u| serde_json::from_slice::<User>(&u).ok());
        self.storage.delete(LEGACY_TOKEN_KEY).await?;
        self.storage.delete(LEGACY_USER_KEY).await?;

        match (token, user) {
            (Some(token), Some(user)) => {
                let session = Session::new(token, user);
                let json = serde_json::to_vec(&session)?;
                self.storage.set(SESSION_STORAGE_KEY, &json).await?;
                log::info!("Migrated legacy session for {}", session.user.username);
                Ok(Some(session))
            }
            _ => {
                log::warn!("Dropped incomplete legacy session");
                Ok(None)
            }
        }
    }
}

fn session_from(resp: AuthResponse) -> Result<Session> {
    if resp.token.trim().is_empty() {
        return Err(TaskflowError::Decode("auth response carried an empty token".to_string()));
    }
    Ok(Session::new(resp.token, resp.user))
}
