//! HTTP transport types and the executor seam.
//!
//! # Design
//! `HttpRequest` and `HttpResponse` describe a round-trip as plain data. The
//! client builds the request and classifies the response without touching
//! the network; only a `Transport` performs I/O. Every client owns its
//! transport, so tests substitute a stub instead of patching a process-wide
//! HTTP client.
//!
//! The remote API only accepts form-encoded POSTs, so there is no method
//! field: every request is a POST.

use std::time::Duration;

use crate::error::ApiError;

/// Upper bound on a whole round-trip, connect through body read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A form-encoded POST described as plain data.
///
/// Built by `Client::build_post`. `body` is already URL-encoded and includes
/// the authentication fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport`, then passed to `Client::check_response`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A 200 response carrying `body`.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

/// Executes one HTTP request.
///
/// Implementations must return non-2xx responses as `Ok` data; only failures
/// to complete the round-trip are `Err`, and those should be
/// `ApiError::Transport`.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        // Status codes are classified by the client, so ureq must not turn
        // 4xx/5xx into errors.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .send(request.body.as_bytes())
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_response_has_status_200() {
        let response = HttpResponse::ok("[]");
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "[]");
        assert!(response.headers.is_empty());
    }

    #[test]
    fn closed_port_is_a_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let request = HttpRequest {
            url: format!("http://127.0.0.1:{port}/api/newsletter/lists/get.json"),
            headers: Vec::new(),
            body: String::new(),
        };
        let err = UreqTransport::with_timeout(Duration::from_secs(1))
            .execute(request)
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
