//! Request path and verb construction.

use crate::transport::Method;

/// Percent-encode a document id for use as a path segment.
pub fn encode_id(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Build `{type}/{sub_path}`.
///
/// An empty `sub_path` yields the type root, `{type}/`.
pub fn type_path(type_name: &str, sub_path: &str) -> String {
    format!("{}/{}", type_name, sub_path)
}

/// Build the path of a single document, encoding its id.
pub fn document_path(type_name: &str, id: &str) -> String {
    type_path(type_name, &encode_id(id))
}

/// Prefix a type-relative path with the index name.
pub fn index_path(index: &str, path: &str) -> String {
    format!("{}/{}", index, path)
}

/// Verb used to create a document.
///
/// Without an id the server assigns one (`POST`); with an id the document
/// is created or replaced in place (`PUT`).
pub fn create_method(id: &str) -> Method {
    if id.is_empty() {
        Method::Post
    } else {
        Method::Put
    }
}
