//! Recipient operations on a single list.
//!
//! # Design
//! Mutating calls report success through an affected-row count
//! (`inserted` / `removed`), not the HTTP status: a 200 with a zero count
//! means the service ignored the request, e.g. a duplicate add.

use crate::client::{decode, Client};
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{Count, Inserted, Recipient, Removed};

const ADD_RECIPIENT: &str = "newsletter/lists/email/add.json";
const DELETE_RECIPIENT: &str = "newsletter/lists/email/delete.json";
const GET_RECIPIENTS: &str = "newsletter/lists/email/get.json";
const COUNT_RECIPIENTS: &str = "newsletter/lists/email/count.json";

const EMPTY_LIST: &str = "The list is empty.";

fn require_list(list: &str) -> Result<(), ApiError> {
    if list.is_empty() {
        return Err(ApiError::validation(EMPTY_LIST));
    }
    Ok(())
}

impl<T: Transport> Client<T> {
    /// Subscribe `recipient` to `list`.
    ///
    /// `None` or a recipient without an email is rejected before any request.
    pub fn add_recipient(&self, list: &str, recipient: Option<&Recipient>) -> Result<(), ApiError> {
        let add = || -> Result<(), ApiError> {
            require_list(list)?;
            let recipient = recipient
                .filter(|r| !r.email.is_empty())
                .ok_or_else(|| ApiError::validation("The recipeint is nil or has invalid email."))?;
            let data = serde_json::to_string(recipient)
                .map_err(|e| ApiError::SerializationError(e.to_string()))?;

            let body = self.post(ADD_RECIPIENT, &[("list", list), ("data", data.as_str())])?;
            let stats: Inserted = decode(&body)?;
            if stats.inserted == 0 {
                return Err(ApiError::NotAdded);
            }
            Ok(())
        };
        add().map_err(|e| e.during("add_recipient"))
    }

    /// Unsubscribe `email` from `list`.
    pub fn delete_recipient(&self, list: &str, email: &str) -> Result<(), ApiError> {
        let remove = || -> Result<(), ApiError> {
            require_list(list)?;
            if email.is_empty() {
                return Err(ApiError::validation("The recipeint email is empty."));
            }

            let body = self.post(DELETE_RECIPIENT, &[("list", list), ("email[]", email)])?;
            let stats: Removed = decode(&body)?;
            if stats.removed == 0 {
                return Err(ApiError::NotRemoved);
            }
            Ok(())
        };
        remove().map_err(|e| e.during("delete_recipient"))
    }

    /// Fetch one subscriber of `list` by email. `Ok(None)` when absent.
    pub fn recipient(&self, list: &str, email: &str) -> Result<Option<Recipient>, ApiError> {
        let find = || -> Result<Option<Recipient>, ApiError> {
            require_list(list)?;
            if email.is_empty() {
                return Err(ApiError::validation("The email is empty."));
            }

            let body = self.post(GET_RECIPIENTS, &[("list", list), ("email", email)])?;
            let recipients: Vec<Recipient> = decode(&body)?;
            Ok(recipients.into_iter().next())
        };
        find().map_err(|e| e.during("recipient"))
    }

    /// Every subscriber of `list`.
    pub fn recipients(&self, list: &str) -> Result<Vec<Recipient>, ApiError> {
        let fetch = || -> Result<Vec<Recipient>, ApiError> {
            require_list(list)?;
            let body = self.post(GET_RECIPIENTS, &[("list", list)])?;
            decode(&body)
        };
        fetch().map_err(|e| e.during("recipients"))
    }

    /// Number of subscribers on `list`.
    pub fn recipient_count(&self, list: &str) -> Result<u64, ApiError> {
        let count = || -> Result<u64, ApiError> {
            require_list(list)?;
            let body = self.post(COUNT_RECIPIENTS, &[("list", list)])?;
            let stats: Count = decode(&body)?;
            Ok(stats.count)
        };
        count().map_err(|e| e.during("recipient_count"))
    }
}
