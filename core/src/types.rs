//! Domain DTOs for the newsletter API.
//!
//! # Design
//! Nothing here is persisted: every value is rebuilt from a response body and
//! the remote service stays the source of truth. The mock-server crate
//! defines its own copies of the wire shapes; integration tests catch drift.

use serde::{Deserialize, Serialize};

/// A named recipient list. The name is what every API call keys on; `id` is
/// informational.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct List {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "list")]
    pub name: String,
}

/// A subscriber on a list, identified by email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipient {
    #[serde(default)]
    pub name: String,
    pub email: String,
}

impl Recipient {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// The `{error, message}` shape any response may carry. Only used to decide
/// whether a call failed.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Inserted {
    pub inserted: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Removed {
    pub removed: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Count {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_reads_name_from_list_field() {
        let list: List = serde_json::from_str(r#"{"id":7,"list":"weekly"}"#).unwrap();
        assert_eq!(list, List { id: 7, name: "weekly".to_string() });
    }

    #[test]
    fn list_id_defaults_when_absent() {
        let list: List = serde_json::from_str(r#"{"list":"weekly"}"#).unwrap();
        assert_eq!(list.id, 0);
    }

    #[test]
    fn recipient_serializes_name_and_email() {
        let json = serde_json::to_value(Recipient::new("John Smith", "j.smith@example.com")).unwrap();
        assert_eq!(json["name"], "John Smith");
        assert_eq!(json["email"], "j.smith@example.com");
    }

    #[test]
    fn envelope_tolerates_missing_fields() {
        let envelope: Envelope = serde_json::from_str(r#"{"inserted":1}"#).unwrap();
        assert!(envelope.error.is_none());
        assert!(envelope.message.is_none());
    }
}
