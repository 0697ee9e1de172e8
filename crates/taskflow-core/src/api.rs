//! Typed client for the TaskFlow backend.
//!
//! Builds requests, attaches the caller's bearer token and turns every
//! failure into a [`TaskflowError`]. It holds no session of its own and
//! never reacts to a 401 beyond reporting `Unauthorized`; that decision
//! belongs to the session store.

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use taskflow_types::{
    Result, TaskflowError,
    chat::{ChatReply, ChatRequest, ConversationHistory, ConversationSummary},
    config::{ApiConfig, LoginEncoding},
    task::{NewTask, Task, TaskFilter, TaskPatch},
    user::{AuthResponse, Credentials, Registration, User},
};

use crate::ports::{HttpMethod, HttpPort, HttpRequest, HttpResponse};

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Encoded request body
enum Body {
    Empty,
    Json(String),
    Form(String),
}

pub struct ApiClient {
    http: Rc<dyn HttpPort>,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(http: Rc<dyn HttpPort>, config: ApiConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.normalized_base(), path)
    }

    /// Send one request and map transport and status failures.
    /// The returned response is always 2xx.
    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        token: Option<&str>,
        body: Body,
    ) -> Result<HttpResponse> {
        let url = self.url(path);
        let mut headers = Vec::new();
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        let body = match body {
            Body::Empty => None,
            Body::Json(s) => {
                headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
                Some(s)
            }
            Body::Form(s) => {
                headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
                Some(s)
            }
        };

        log::debug!("{} {}", method.as_str(), url);
        let response = self
            .http
            .send(HttpRequest { method, url: url.clone(), headers, body })
            .await
            .map_err(|e| {
                log::warn!("{} {} failed: {}", method.as_str(), url, e);
                match e {
                    TaskflowError::Network(_) => e,
                    other => TaskflowError::Network(other.to_string()),
                }
            })?;

        if response.is_success() {
            return Ok(response);
        }

        let err = error_from_response(&response);
        log::warn!("{} {} -> {}: {}", method.as_str(), url, response.status, err);
        Err(err)
    }

    fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Body> {
        Ok(Body::Json(serde_json::to_string(body)?))
    }

    // ─── Generic verbs ───────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T> {
        let resp = self.execute(HttpMethod::Get, path, token, Body::Empty).await?;
        decode(&resp)
    }

    pub async fn post<T, B>(&self, path: &str, token: Option<&str>, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self
            .execute(HttpMethod::Post, path, token, Self::json_body(body)?)
            .await?;
        decode(&resp)
    }

    pub async fn put<T, B>(&self, path: &str, token: Option<&str>, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self
            .execute(HttpMethod::Put, path, token, Self::json_body(body)?)
            .await?;
        decode(&resp)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T> {
        let resp = self.execute(HttpMethod::Delete, path, token, Body::Empty).await?;
        decode(&resp)
    }

    // ─── Auth ────────────────────────────────────────────────

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let body = match self.config.login_encoding {
            LoginEncoding::Form => Body::Form(form_encode(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])),
            LoginEncoding::Json => Self::json_body(credentials)?,
        };
        let resp = self
            .execute(HttpMethod::Post, "/api/auth/login", None, body)
            .await?;
        decode(&resp)
    }

    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        self.post("/api/auth/register", None, registration).await
    }

    pub async fn current_user(&self, token: &str) -> Result<User> {
        self.get("/api/auth/me", Some(token)).await
    }

    // ─── Tasks ───────────────────────────────────────────────

    /// Tasks matching `filter`, in backend order.
    pub async fn get_tasks(&self, token: &str, filter: TaskFilter) -> Result<Vec<Task>> {
        let path = match filter.query_value() {
            Some(status) => format!("/api/tasks?status={}", urlencoding::encode(status)),
            None => "/api/tasks".to_string(),
        };
        let mut tasks: Vec<Task> = self.get(&path, Some(token)).await?;
        // The backend already filters; this keeps the contract when it doesn't.
        tasks.retain(|t| filter.matches(t));
        Ok(tasks)
    }

    pub async fn create_task(&self, token: &str, task: &NewTask) -> Result<Task> {
        self.post("/api/tasks", Some(token), task).await
    }

    pub async fn update_task(&self, token: &str, id: i64, patch: &TaskPatch) -> Result<Task> {
        self.put(&format!("/api/tasks/{}", id), Some(token), patch).await
    }

    pub async fn delete_task(&self, token: &str, id: i64) -> Result<()> {
        self.execute(
            HttpMethod::Delete,
            &format!("/api/tasks/{}", id),
            Some(token),
            Body::Empty,
        )
        .await?;
        Ok(())
    }

    // ─── Chat ────────────────────────────────────────────────

    pub async fn send_chat(&self, token: &str, user_id: &str, req: &ChatRequest) -> Result<ChatReply> {
        let path = format!("/api/{}/chat", urlencoding::encode(user_id));
        self.post(&path, Some(token), req).await
    }

    pub async fn conversations(&self, token: &str, user_id: &str) -> Result<Vec<ConversationSummary>> {
        let path = format!("/api/{}/conversations", urlencoding::encode(user_id));
        self.get(&path, Some(token)).await
    }

    pub async fn conversation(
        &self,
        token: &str,
        user_id: &str,
        conversation_id: &str,
    ) -> Result<ConversationHistory> {
        let path = format!(
            "/api/{}/conversations/{}",
            urlencoding::encode(user_id),
            urlencoding::encode(conversation_id)
        );
        self.get(&path, Some(token)).await
    }
}

// ─── Response helpers ────────────────────────────────────────

/// Parse a 2xx body. An empty body reads as JSON `null`.
fn decode<T: DeserializeOwned>(resp: &HttpResponse) -> Result<T> {
    let text = if resp.body.trim().is_empty() { "null" } else { resp.body.as_str() };
    serde_json::from_str(text).map_err(|e| TaskflowError::Decode(e.to_string()))
}

fn form_encode(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Normalise a non-2xx response. Understands `{"error": {"message",
/// "details"}}` envelopes and FastAPI's `{"detail": ...}`.
pub fn error_from_response(resp: &HttpResponse) -> TaskflowError {
    let body: Option<Value> = serde_json::from_str(&resp.body).ok();
    let message = body
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| format!("Error {}", resp.status));
    let details = body.as_ref().and_then(error_details);

    if resp.status == 401 {
        TaskflowError::Unauthorized { message }
    } else {
        TaskflowError::Http {
            status: resp.status,
            message,
            details,
        }
    }
}

fn error_message(body: &Value) -> Option<String> {
    body.pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| body.get("detail").and_then(Value::as_str))
        .or_else(|| body.get("message").and_then(Value::as_str))
        .map(String::from)
}

fn error_details(body: &Value) -> Option<Value> {
    if let Some(details) = body.pointer("/error/details").filter(|v| !v.is_null()) {
        return Some(details.clone());
    }
    body.get("detail")
        .filter(|v| !v.is_null() && !v.is_string())
        .cloned()
}
