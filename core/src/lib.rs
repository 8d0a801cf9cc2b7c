//! Blocking client for the SendGrid newsletter list API.
//!
//! # Overview
//! Typed calls for recipient lists and their subscribers, translated into
//! authenticated form-encoded POSTs and back from JSON responses.
//!
//! # Design
//! - `Client` owns its `Credentials` and a `Transport`; the default transport
//!   is a `ureq` agent with a 5 second timeout. Tests inject a stub.
//! - Request building (`build_post`) and response classification
//!   (`check_response`) are pure, so the I/O boundary stays explicit.
//! - Each operation issues at most one request. There are no retries, no
//!   caching and no shared mutable state.
//! - Every operation error is wrapped as
//!   `sendbit: client.<operation> error: <cause>`.

pub mod client;
pub mod error;
pub mod http;
pub mod list;
pub mod recipient;
pub mod types;

pub use client::{Client, Credentials, DEFAULT_BASE_URL, PASSWORD_ENV, USERNAME_ENV, USER_AGENT};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse, Transport, UreqTransport, DEFAULT_TIMEOUT};
pub use types::{List, Recipient};
