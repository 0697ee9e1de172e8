//! WASM-target tests for taskflow-core.
//!
//! Runs the event bus, error normalisation, guard and session flows
//! under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use taskflow_core::api::{error_from_response, ApiClient};
use taskflow_core::event_bus::EventBus;
use taskflow_core::guard::{Access, Guard};
use taskflow_core::ports::*;
use taskflow_core::session::SessionStore;
use taskflow_core::tasks::TaskBoard;
use taskflow_core::token;
use taskflow_types::config::{ApiConfig, SESSION_STORAGE_KEY};
use taskflow_types::event::AppEvent;
use taskflow_types::session::AuthState;
use taskflow_types::task::TaskFilter;
use taskflow_types::user::Credentials;
use taskflow_types::{Result, TaskflowError};

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// ─── Mocks ───────────────────────────────────────────────

/// Answers login with a fixed session and every task call with `tasks_status`.
struct ScriptedHttp {
    tasks_status: u16,
    calls: RefCell<usize>,
}

#[async_trait(?Send)]
impl HttpPort for ScriptedHttp {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse> {
        *self.calls.borrow_mut() += 1;
        let body = if req.url.ends_with("/api/auth/login") {
            r#"{"token":"tok","user":{"id":1,"email":"a@b.co","username":"ada"}}"#.to_string()
        } else if self.tasks_status == 200 {
            r#"[{"id":1,"title":"Milk","status":"pending"}]"#.to_string()
        } else {
            r#"{"detail":"Could not validate credentials"}"#.to_string()
        };
        let status = if req.url.ends_with("/api/auth/login") { 200 } else { self.tasks_status };
        Ok(HttpResponse { status, body })
    }
}

struct MapStorage(RefCell<HashMap<String, Vec<u8>>>);

#[async_trait(?Send)]
impl StoragePort for MapStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.0.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.0.borrow_mut().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.0.borrow_mut().remove(key);
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self.0.borrow().keys().filter(|k| k.starts_with(prefix)).cloned().collect())
    }

    fn backend_name(&self) -> &str {
        "map"
    }
}

fn wire(tasks_status: u16) -> (Rc<ScriptedHttp>, Rc<MapStorage>, EventBus, Rc<SessionStore>, TaskBoard) {
    let http = Rc::new(ScriptedHttp { tasks_status, calls: RefCell::new(0) });
    let storage = Rc::new(MapStorage(RefCell::new(HashMap::new())));
    let bus = EventBus::new();
    let http_port: Rc<dyn HttpPort> = http.clone();
    let storage_port: Rc<dyn StoragePort> = storage.clone();
    let api = Rc::new(ApiClient::new(http_port, ApiConfig::default()));
    let session = Rc::new(SessionStore::new(api.clone(), storage_port, bus.clone()));
    let board = TaskBoard::new(api, session.clone(), bus.clone());
    (http, storage, bus, session, board)
}

// ─── Sync Tests ──────────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(AppEvent::TasksLoading { filter: TaskFilter::All });
    assert!(bus.has_pending());
    assert_eq!(bus.drain().len(), 1);
    assert!(!bus.has_pending());
}

#[wasm_bindgen_test]
fn error_normalisation() {
    let err = error_from_response(&HttpResponse {
        status: 400,
        body: r#"{"detail":"Username already registered"}"#.to_string(),
    });
    assert_eq!(err.status(), 400);
    assert_eq!(err.to_string(), "Username already registered");
}

#[wasm_bindgen_test]
fn guard_states() {
    let guard = Guard::default();
    assert_eq!(guard.evaluate(&AuthState::Unknown), Access::Loading);
    assert!(matches!(
        guard.evaluate(&AuthState::Unauthenticated),
        Access::RedirectToLogin { .. }
    ));
}

#[wasm_bindgen_test]
fn opaque_token_not_expired() {
    assert!(!token::is_expired("tok"));
}

// ─── Async Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
async fn login_then_fetch() {
    let (_http, storage, _bus, session, board) = wire(200);
    session.login(&Credentials::new("ada", "pw")).await.unwrap();
    assert!(session.is_authenticated());
    assert!(storage.0.borrow().contains_key(SESSION_STORAGE_KEY));

    board.fetch_tasks().await.unwrap();
    assert_eq!(board.state().tasks.len(), 1);
}

#[wasm_bindgen_test]
async fn unauthorized_signs_out_once() {
    let (http, storage, bus, session, board) = wire(401);
    session.login(&Credentials::new("ada", "pw")).await.unwrap();
    bus.drain();

    let err = board.fetch_tasks().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!storage.0.borrow().contains_key(SESSION_STORAGE_KEY));

    let err = board.fetch_tasks().await.unwrap_err();
    assert!(matches!(err, TaskflowError::Unauthenticated));
    assert_eq!(*http.calls.borrow(), 2);

    let sign_outs = bus
        .drain()
        .into_iter()
        .filter(|e| matches!(e, AppEvent::SessionChanged { state: AuthState::Unauthenticated }))
        .count();
    assert_eq!(sign_outs, 1);
}
