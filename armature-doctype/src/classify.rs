//! Response classification.
//!
//! Rules, in order:
//!
//! 1. a failed exchange while fetching a document means the document is
//!    absent,
//! 2. an explicit absence marker (`exists: false`, `found: false` or, on
//!    delete, `result: "not_found"`) in a reply means the document is
//!    absent,
//! 3. anything else is passed through.

use crate::{
    error::{DocTypeError, Result},
    transport::Response,
};
use serde_json::Value;

/// Coordinates of the document a request targeted.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    /// Index name.
    pub index: &'a str,
    /// Type name.
    pub type_name: &'a str,
    /// Document id.
    pub id: &'a str,
}

impl Target<'_> {
    /// Build the not-found error for this document.
    pub fn not_found(&self) -> DocTypeError {
        DocTypeError::NotFound {
            index: self.index.to_string(),
            type_name: self.type_name.to_string(),
            id: self.id.to_string(),
        }
    }
}

/// Classify the outcome of a fetch-by-id.
///
/// Every transport failure, including a non-success status, is reported
/// as [`DocTypeError::NotFound`].
pub fn classify_fetch(outcome: Result<Response>, target: Target<'_>) -> Result<Response> {
    let response = match outcome {
        Ok(response) if response.is_ok() => response,
        _ => return Err(target.not_found()),
    };

    if response.flag("exists") == Some(false) || response.flag("found") == Some(false) {
        return Err(target.not_found());
    }

    Ok(response)
}

/// Classify the reply to a delete-by-id.
///
/// `found: false` or `result: "not_found"` wins over the status code;
/// other failures surface as [`DocTypeError::Response`].
pub fn classify_delete(response: Response, target: Target<'_>) -> Result<Response> {
    let missing = response.flag("found") == Some(false)
        || response.get("result").and_then(Value::as_str) == Some("not_found");
    if missing {
        return Err(target.not_found());
    }

    response.error_for_status()
}
