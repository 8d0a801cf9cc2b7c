//! Error types for the SendGrid newsletter client.
//!
//! # Design
//! The remote service reports failures in three different places: the HTTP
//! status, an `error` field inside an otherwise successful JSON body, and an
//! affected-row count of zero. Each gets its own variant so callers can match
//! on the cause. Every public operation wraps whatever went wrong in
//! `Operation`, which carries the operation name for the rendered message and
//! keeps the underlying error reachable through `source()`.

use std::fmt;

/// Errors returned by `Client` constructors and operations.
#[derive(Debug)]
pub enum ApiError {
    /// A client was constructed with an empty username.
    MissingUsername,

    /// A client was constructed with an empty password.
    MissingPassword,

    /// Credentials were empty when a request was about to be sent. No network
    /// call is made in this case.
    InvalidCredentials,

    /// A required argument was empty or absent.
    Validation(String),

    /// The HTTP round-trip itself failed (DNS, connect, timeout, TLS...).
    Transport(String),

    /// The response body carried a non-empty `error` field.
    Api(String),

    /// The server answered with a status other than 200.
    Status(u16),

    /// The request payload could not be serialized.
    SerializationError(String),

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The service accepted the add request but inserted nothing.
    NotAdded,

    /// The service accepted the delete request but removed nothing.
    NotRemoved,

    /// Any of the above, tagged with the client operation that produced it.
    Operation {
        operation: &'static str,
        source: Box<ApiError>,
    },
}

impl ApiError {
    pub(crate) fn validation(msg: &str) -> Self {
        ApiError::Validation(msg.to_string())
    }

    /// Tag `self` with the name of the client operation it came from.
    pub(crate) fn during(self, operation: &'static str) -> Self {
        ApiError::Operation {
            operation,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any `Operation` wrappers.
    pub fn inner(&self) -> &ApiError {
        match self {
            ApiError::Operation { source, .. } => source.inner(),
            other => other,
        }
    }

    /// Name of the operation that failed, if the error has been tagged.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            ApiError::Operation { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingUsername => {
                write!(f, "sendbit: Username argument cannot be empty.")
            }
            ApiError::MissingPassword => {
                write!(f, "sendbit: Password argument cannot be empty.")
            }
            ApiError::InvalidCredentials => {
                write!(f, "The client credentials are missing or invalid.")
            }
            ApiError::Validation(msg) | ApiError::Transport(msg) | ApiError::Api(msg) => {
                write!(f, "{msg}")
            }
            ApiError::Status(status) => write!(f, "The response status code is {status}"),
            ApiError::SerializationError(msg) => write!(f, "serialization failed: {msg}"),
            ApiError::DeserializationError(msg) => write!(f, "deserialization failed: {msg}"),
            ApiError::NotAdded => write!(f, "The recipient is not added."),
            ApiError::NotRemoved => write!(f, "The recipient is not removed."),
            ApiError::Operation { operation, source } => {
                write!(f, "sendbit: client.{operation} error: {source}")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Operation { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn operation_prefix_wraps_underlying_message() {
        let err = ApiError::Api("Invalid key".to_string()).during("create_list");
        assert_eq!(err.to_string(), "sendbit: client.create_list error: Invalid key");
        assert_eq!(err.operation(), Some("create_list"));
    }

    #[test]
    fn inner_skips_operation_wrappers() {
        let err = ApiError::Status(500).during("lists");
        assert!(matches!(err.inner(), ApiError::Status(500)));
        assert!(err.source().is_some());
    }

    #[test]
    fn unwrapped_errors_have_no_operation() {
        let err = ApiError::NotAdded;
        assert!(err.operation().is_none());
        assert!(err.source().is_none());
        assert!(matches!(err.inner(), ApiError::NotAdded));
    }

    #[test]
    fn construction_errors_render_namespace() {
        assert_eq!(
            ApiError::MissingUsername.to_string(),
            "sendbit: Username argument cannot be empty."
        );
        assert_eq!(
            ApiError::MissingPassword.to_string(),
            "sendbit: Password argument cannot be empty."
        );
    }

    #[test]
    fn status_error_mentions_code() {
        assert_eq!(ApiError::Status(401).to_string(), "The response status code is 401");
    }
}
