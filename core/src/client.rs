//! Credentials, construction and the shared POST pipeline.
//!
//! # Design
//! `Client` owns its credentials, a base URL and a `Transport`. Credentials
//! are read-only after construction, so a client can be shared across
//! threads whenever its transport can.
//!
//! Every operation funnels through `post`, which is split the same way the
//! resource operations are consumed by tests: `build_post` turns a path and
//! form fields into an authenticated `HttpRequest`, the transport executes
//! it, and `check_response` classifies the `HttpResponse`. Classification
//! order is: transport failure, then a non-empty `error` field in the body,
//! then any status other than 200.

use std::fmt;

use log::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::Envelope;

pub const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com/api";
pub const USER_AGENT: &str = concat!("sendbit/", env!("CARGO_PKG_VERSION"), ";rust");
pub const USERNAME_ENV: &str = "SENDGRID_USER";
pub const PASSWORD_ENV: &str = "SENDGRID_PASS";

/// Account credentials sent as `api_user` / `api_key` on every request.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Validating constructor: both parts must be non-empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, ApiError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(ApiError::MissingUsername);
        }
        if password.is_empty() {
            return Err(ApiError::MissingPassword);
        }
        Ok(Self { username, password })
    }

    /// Read `SENDGRID_USER` and `SENDGRID_PASS`. Unset variables count as
    /// empty.
    pub fn from_env() -> Result<Self, ApiError> {
        let username = std::env::var(USERNAME_ENV).unwrap_or_default();
        let password = std::env::var(PASSWORD_ENV).unwrap_or_default();
        Self::new(username, password)
    }

    fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Blocking client for the newsletter list API.
#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    credentials: Credentials,
    base_url: String,
    transport: T,
}

impl Client<UreqTransport> {
    /// Build a client over the default transport, rejecting empty credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, ApiError> {
        let credentials = Credentials::new(username, password)?;
        Ok(Self::with_transport(credentials, UreqTransport::new()))
    }

    /// Build a client from `SENDGRID_USER` / `SENDGRID_PASS`.
    pub fn from_env() -> Result<Self, ApiError> {
        let credentials = Credentials::from_env()?;
        Ok(Self::with_transport(credentials, UreqTransport::new()))
    }
}

impl<T: Transport> Client<T> {
    /// Build a client over any transport. Credentials are not validated here;
    /// every request checks them before any I/O.
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            transport,
        }
    }

    /// Point the client at another API root, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the authenticated form POST for `path`.
    ///
    /// Fails with `InvalidCredentials` when either credential is empty.
    pub fn build_post(&self, path: &str, fields: &[(&str, &str)]) -> Result<HttpRequest, ApiError> {
        if !self.credentials.is_complete() {
            return Err(ApiError::InvalidCredentials);
        }

        let mut form: Vec<(&str, &str)> = fields.to_vec();
        form.push(("api_user", self.credentials.username.as_str()));
        form.push(("api_key", self.credentials.password.as_str()));
        let body = serde_urlencoded::to_string(&form)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;

        let path = path.trim_start_matches('/').trim_end_matches('/');
        Ok(HttpRequest {
            url: format!("{}/{path}", self.base_url),
            headers: vec![
                (
                    "content-type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                ),
                ("user-agent".to_string(), USER_AGENT.to_string()),
            ],
            body,
        })
    }

    /// Classify a response, returning its body on success.
    pub fn check_response(&self, response: HttpResponse) -> Result<String, ApiError> {
        if let Some(envelope) = envelope_of(&response.body) {
            if let Some(error) = envelope.error.filter(|e| !e.is_empty()) {
                warn!("api error (status {}): {error}", response.status);
                return Err(ApiError::Api(error));
            }
            if let Some(message) = envelope.message {
                debug!("api message: {message}");
            }
        }
        if response.status != 200 {
            warn!("unexpected status {}", response.status);
            return Err(ApiError::Status(response.status));
        }
        Ok(response.body)
    }

    pub(crate) fn post(&self, path: &str, fields: &[(&str, &str)]) -> Result<String, ApiError> {
        let request = self.build_post(path, fields)?;
        debug!("POST {}", request.url);
        let response = self.transport.execute(request)?;
        debug!("response status {}", response.status);
        self.check_response(response)
    }
}

/// The `{error, message}` envelope, if `body` is a JSON object. Arrays and
/// scalars never count as an envelope.
fn envelope_of(body: &str) -> Option<Envelope> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value @ serde_json::Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

/// Decode a successful body into `T`.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
