//! Recipient list operations.

use crate::client::{decode, Client};
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::List;

const ADD_LIST: &str = "newsletter/lists/add.json";
const DELETE_LIST: &str = "newsletter/lists/delete.json";
const GET_LISTS: &str = "newsletter/lists/get.json";

const EMPTY_LIST_NAME: &str = "The list name cannot be empty.";

impl<T: Transport> Client<T> {
    /// Create a new recipient list.
    pub fn create_list(&self, name: &str) -> Result<(), ApiError> {
        self.post_list_name(ADD_LIST, name)
            .map(drop)
            .map_err(|e| e.during("create_list"))
    }

    /// Remove a recipient list from the account.
    pub fn delete_list(&self, name: &str) -> Result<(), ApiError> {
        self.post_list_name(DELETE_LIST, name)
            .map(drop)
            .map_err(|e| e.during("delete_list"))
    }

    /// Look up a single list by name.
    ///
    /// Returns `Ok(None)` unless the service answers with exactly one record:
    /// no match and an ambiguous match are reported the same way.
    pub fn list(&self, name: &str) -> Result<Option<List>, ApiError> {
        let find = || -> Result<Option<List>, ApiError> {
            let body = self.post_list_name(GET_LISTS, name)?;
            let mut lists = decode_lists(&body)?;
            Ok(if lists.len() == 1 { lists.pop() } else { None })
        };
        find().map_err(|e| e.during("list"))
    }

    /// All recipient lists on the account.
    pub fn lists(&self) -> Result<Vec<List>, ApiError> {
        self.post(GET_LISTS, &[])
            .and_then(|body| decode_lists(&body))
            .map_err(|e| e.during("lists"))
    }

    fn post_list_name(&self, path: &str, name: &str) -> Result<String, ApiError> {
        if name.is_empty() {
            return Err(ApiError::validation(EMPTY_LIST_NAME));
        }
        self.post(path, &[("list", name)])
    }
}

/// An empty body decodes as no lists.
fn decode_lists(body: &str) -> Result<Vec<List>, ApiError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    decode(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_body_is_no_lists() {
        assert!(decode_lists("  ").unwrap().is_empty());
    }

    #[test]
    fn lists_body_decodes_in_order() {
        let lists = decode_lists(r#"[{"id":1,"list":"a"},{"id":2,"list":"b"}]"#).unwrap();
        let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn malformed_body_is_deserialization_error() {
        let err = decode_lists("{not json").unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
