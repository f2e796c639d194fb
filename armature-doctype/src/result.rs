//! Search results.

use crate::{
    document::Document,
    error::Result,
    query::SearchQuery,
    transport::Response,
};
use serde_json::{Map, Value};

/// A search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Document ID.
    pub id: String,
    /// Index name.
    pub index: String,
    /// Type name.
    pub type_name: Option<String>,
    /// Relevance score.
    pub score: Option<f64>,
    /// Document version.
    pub version: Option<i64>,
    /// Stored source, empty object when not returned.
    pub source: Value,
    /// Highlighted fragments.
    pub highlight: Option<Value>,
}

impl SearchHit {
    fn from_json(hit: &Value) -> Self {
        Self {
            id: hit["_id"].as_str().unwrap_or_default().to_string(),
            index: hit["_index"].as_str().unwrap_or_default().to_string(),
            type_name: hit["_type"].as_str().map(str::to_string),
            score: hit["_score"].as_f64(),
            version: hit["_version"].as_i64(),
            source: hit
                .get("_source")
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
            highlight: hit.get("highlight").cloned(),
        }
    }

    /// Convert the hit into a document.
    pub fn into_document(self) -> Document {
        let mut doc = Document::new(self.id, self.source).with_index(self.index);
        doc.type_name = self.type_name;
        doc.version = self.version;
        doc
    }
}

/// Decoded search response paired with the query that produced it.
#[derive(Debug, Clone)]
pub struct ResultSet {
    /// Total matching documents.
    pub total: u64,
    /// Maximum score.
    pub max_score: Option<f64>,
    /// Time taken in milliseconds.
    pub took_ms: u64,
    /// Whether the search timed out on some shards.
    pub timed_out: bool,
    /// Matching documents.
    pub hits: Vec<SearchHit>,
    /// Aggregation results.
    pub aggregations: Option<Value>,
    query: SearchQuery,
    response: Response,
}

impl ResultSet {
    /// Decode a search reply.
    pub fn from_response(response: Response, query: SearchQuery) -> Result<Self> {
        let response = response.error_for_status()?;
        let body = response.body();

        let hits = body["hits"]["hits"]
            .as_array()
            .map(|hits| hits.iter().map(SearchHit::from_json).collect())
            .unwrap_or_default();

        // Older servers report a bare number, newer ones `{"value": n}`.
        let total = match &body["hits"]["total"] {
            Value::Object(total) => total.get("value").and_then(Value::as_u64).unwrap_or(0),
            other => other.as_u64().unwrap_or(0),
        };

        Ok(Self {
            total,
            max_score: body["hits"]["max_score"].as_f64(),
            took_ms: body["took"].as_u64().unwrap_or(0),
            timed_out: body["timed_out"].as_bool().unwrap_or(false),
            hits,
            aggregations: body
                .get("aggregations")
                .or_else(|| body.get("aggs"))
                .cloned(),
            query,
            response,
        })
    }

    /// Query that produced the results.
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Raw response.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Number of hits returned (not the total).
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Check if no hits were returned.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Convert every hit into a document.
    pub fn documents(&self) -> Vec<Document> {
        self.hits.iter().cloned().map(SearchHit::into_document).collect()
    }
}
