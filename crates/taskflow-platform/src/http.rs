//! `HttpPort` over the browser's `fetch()`, via gloo-net.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};

use taskflow_core::ports::{HttpMethod, HttpPort, HttpRequest, HttpResponse};
use taskflow_types::{Result, TaskflowError};

/// Stateless: every call is one `fetch()`. No timeout, no retry.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchHttp;

impl FetchHttp {
    pub fn new() -> Self {
        Self
    }
}

fn builder(method: HttpMethod, url: &str) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
        HttpMethod::Put => Request::put(url),
        HttpMethod::Delete => Request::delete(url),
    }
}

#[async_trait(?Send)]
impl HttpPort for FetchHttp {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse> {
        let mut builder = builder(req.method, &req.url);
        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| TaskflowError::Network(e.to_string()))?;

        // Rejects only when no response arrived (offline, CORS, DNS)
        let response = request
            .send()
            .await
            .map_err(|e| TaskflowError::Network(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            log::warn!("Could not read response body ({}): {}", status, e);
            TaskflowError::Network(format!("Could not read response body: {}", e))
        })?;

        Ok(HttpResponse { status, body })
    }
}
