//! Bulk request lines and bulk response decoding.

use crate::{
    document::Document,
    error::{DocTypeError, Result},
    transport::Response,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Document options copied into a bulk action's metadata line.
pub const BULK_META_OPTIONS: &[&str] = &["version", "version_type", "routing", "parent"];

/// Build the two NDJSON lines indexing `doc`.
///
/// The document must carry its index and type; the id is omitted when
/// empty so the server assigns one.
pub fn index_lines(doc: &Document) -> Result<[Value; 2]> {
    let index = doc
        .index
        .as_deref()
        .ok_or_else(|| DocTypeError::Validation("Bulk document has no index".to_string()))?;
    let type_name = doc
        .type_name
        .as_deref()
        .ok_or_else(|| DocTypeError::Validation("Bulk document has no type".to_string()))?;

    let mut meta = Map::new();
    meta.insert("_index".to_string(), json!(index));
    meta.insert("_type".to_string(), json!(type_name));
    if doc.has_id() {
        meta.insert("_id".to_string(), json!(doc.id));
    }
    for name in BULK_META_OPTIONS {
        if let Some(value) = doc.options.get(*name) {
            meta.insert(name.to_string(), value.clone());
        }
    }

    Ok([json!({ "index": meta }), doc.data.clone()])
}

/// Build the NDJSON line deleting one document.
pub fn delete_line(index: &str, type_name: &str, id: &str) -> Value {
    json!({ "delete": { "_index": index, "_type": type_name, "_id": id } })
}

/// Aggregated bulk response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkResponseSet {
    /// Time taken in milliseconds.
    #[serde(default)]
    pub took: u64,
    /// Whether any item failed.
    #[serde(default)]
    pub errors: bool,
    /// Individual item results, in request order.
    #[serde(default)]
    pub items: Vec<BulkItem>,
}

impl BulkResponseSet {
    /// Decode a bulk reply.
    pub fn from_response(response: Response) -> Result<Self> {
        let response = response.error_for_status()?;
        Ok(serde_json::from_value(response.into_body())?)
    }

    /// Check that every item succeeded.
    pub fn is_ok(&self) -> bool {
        !self.errors && self.items.iter().all(|item| item.status().is_success())
    }

    /// Items that failed.
    pub fn failed_items(&self) -> impl Iterator<Item = &BulkItem> {
        self.items.iter().filter(|item| !item.status().is_success())
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the set has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of one bulk action, keyed by action name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkItem {
    /// Index result.
    Index(BulkItemStatus),
    /// Create result.
    Create(BulkItemStatus),
    /// Update result.
    Update(BulkItemStatus),
    /// Delete result.
    Delete(BulkItemStatus),
}

impl BulkItem {
    /// Status of the action.
    pub fn status(&self) -> &BulkItemStatus {
        match self {
            BulkItem::Index(s) | BulkItem::Create(s) | BulkItem::Update(s) | BulkItem::Delete(s) => s,
        }
    }

    /// Action name.
    pub fn action(&self) -> &'static str {
        match self {
            BulkItem::Index(_) => "index",
            BulkItem::Create(_) => "create",
            BulkItem::Update(_) => "update",
            BulkItem::Delete(_) => "delete",
        }
    }
}

/// Status of a bulk item operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkItemStatus {
    /// Index name.
    #[serde(rename = "_index")]
    pub index: String,
    /// Type name.
    #[serde(rename = "_type", default)]
    pub type_name: Option<String>,
    /// Document ID.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// Document version.
    #[serde(rename = "_version", default)]
    pub version: Option<i64>,
    /// Result keyword (`created`, `updated`, `deleted`, ...).
    #[serde(default)]
    pub result: Option<String>,
    /// HTTP status code.
    pub status: u16,
    /// Error details, either a string or an object with a `reason`.
    #[serde(default)]
    pub error: Option<Value>,
}

impl BulkItemStatus {
    /// Check if the operation was successful.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }

    /// Error reason, if the operation failed.
    pub fn error_reason(&self) -> Option<String> {
        self.error.as_ref().map(|error| match error {
            Value::String(reason) => reason.clone(),
            other => other
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        })
    }
}
