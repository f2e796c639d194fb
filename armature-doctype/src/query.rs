//! Query clauses and search request bodies.
//!
//! Operations that take a query accept anything convertible into a
//! [`SearchQuery`]:
//!
//! - `()` or [`SearchQuery::default`] matches every document,
//! - a `&str`/`String` becomes a `query_string` query,
//! - a [`Query`] clause is wrapped in `{"query": ...}`,
//! - a raw [`Value`] is used as the complete request body.

use serde_json::{json, Map, Value};

/// A single query clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Match all documents.
    MatchAll,
    /// Full-text match on one field.
    Match {
        /// Field to search.
        field: String,
        /// Text to match.
        text: String,
    },
    /// Exact value on one field.
    Term {
        /// Field name.
        field: String,
        /// Exact value.
        value: Value,
    },
    /// Any of several exact values on one field.
    Terms {
        /// Field name.
        field: String,
        /// Accepted values.
        values: Vec<Value>,
    },
    /// Lucene query string.
    QueryString(String),
    /// Documents with the given ids.
    Ids(Vec<String>),
    /// Boolean combination of clauses.
    Bool(BoolQuery),
    /// Raw JSON clause.
    Raw(Value),
}

impl Query {
    /// Create a match query.
    pub fn matching(field: impl Into<String>, text: impl Into<String>) -> Self {
        Query::Match {
            field: field.into(),
            text: text.into(),
        }
    }

    /// Create a term query.
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a terms query.
    pub fn terms(field: impl Into<String>, values: Vec<Value>) -> Self {
        Query::Terms {
            field: field.into(),
            values,
        }
    }

    /// Create a query string query.
    pub fn query_string(query: impl Into<String>) -> Self {
        Query::QueryString(query.into())
    }

    /// Create an ids query.
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Query::Ids(ids.into_iter().map(Into::into).collect())
    }

    /// Convert the clause to JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Query::MatchAll => json!({ "match_all": {} }),
            Query::Match { field, text } => json!({ "match": { field.as_str(): { "query": text } } }),
            Query::Term { field, value } => json!({ "term": { field.as_str(): value } }),
            Query::Terms { field, values } => json!({ "terms": { field.as_str(): values } }),
            Query::QueryString(q) => json!({ "query_string": { "query": q } }),
            Query::Ids(ids) => json!({ "ids": { "values": ids } }),
            Query::Bool(b) => b.to_json(),
            Query::Raw(v) => v.clone(),
        }
    }
}

/// Bool query for combining clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    /// Must match (AND).
    pub must: Vec<Query>,
    /// Should match (OR).
    pub should: Vec<Query>,
    /// Must not match (NOT).
    pub must_not: Vec<Query>,
    /// Filter (non-scoring).
    pub filter: Vec<Query>,
}

impl BoolQuery {
    /// Create an empty bool query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a must clause.
    pub fn must(mut self, query: Query) -> Self {
        self.must.push(query);
        self
    }

    /// Add a should clause.
    pub fn should(mut self, query: Query) -> Self {
        self.should.push(query);
        self
    }

    /// Add a must_not clause.
    pub fn must_not(mut self, query: Query) -> Self {
        self.must_not.push(query);
        self
    }

    /// Add a filter clause.
    pub fn filter(mut self, query: Query) -> Self {
        self.filter.push(query);
        self
    }

    fn to_json(&self) -> Value {
        let mut clauses = Map::new();

        for (name, queries) in [
            ("must", &self.must),
            ("should", &self.should),
            ("must_not", &self.must_not),
            ("filter", &self.filter),
        ] {
            if !queries.is_empty() {
                clauses.insert(
                    name.to_string(),
                    Value::Array(queries.iter().map(Query::to_json).collect()),
                );
            }
        }

        json!({ "bool": clauses })
    }
}

impl From<BoolQuery> for Query {
    fn from(query: BoolQuery) -> Self {
        Query::Bool(query)
    }
}

/// Complete search request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    query: Option<Query>,
    from: Option<u64>,
    size: Option<u64>,
    sort: Vec<Value>,
    source: Option<Value>,
    raw: Option<Value>,
}

impl SearchQuery {
    /// Create a body matching every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a raw request body verbatim.
    ///
    /// Pagination and sorting set on the builder are merged on top of it.
    pub fn raw(body: Value) -> Self {
        Self {
            raw: Some(body),
            ..Self::default()
        }
    }

    /// Set the query clause.
    pub fn query(mut self, query: impl Into<Query>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set pagination offset.
    pub fn from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    /// Set result size limit.
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Add a sort clause, e.g. `json!({"created": "desc"})`.
    pub fn sort(mut self, sort: Value) -> Self {
        self.sort.push(sort);
        self
    }

    /// Set `_source` filtering.
    pub fn source(mut self, source: Value) -> Self {
        self.source = Some(source);
        self
    }

    /// Get the query clause, if one was set.
    pub fn clause(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    /// Build the JSON clause only, as used by count and delete-by-query.
    pub fn query_json(&self) -> Value {
        match (&self.query, &self.raw) {
            (Some(query), _) => query.to_json(),
            (None, Some(raw)) => raw
                .get("query")
                .cloned()
                .unwrap_or_else(|| Query::MatchAll.to_json()),
            (None, None) => Query::MatchAll.to_json(),
        }
    }

    /// Build the request body.
    pub fn to_json(&self) -> Value {
        let mut body = match &self.raw {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };

        if self.query.is_some() || !body.contains_key("query") {
            body.insert("query".to_string(), self.query_json());
        }
        if let Some(from) = self.from {
            body.insert("from".to_string(), json!(from));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }
        if !self.sort.is_empty() {
            body.insert("sort".to_string(), Value::Array(self.sort.clone()));
        }
        if let Some(source) = &self.source {
            body.insert("_source".to_string(), source.clone());
        }

        Value::Object(body)
    }
}

impl From<()> for SearchQuery {
    fn from(_: ()) -> Self {
        SearchQuery::new()
    }
}

impl From<Query> for SearchQuery {
    fn from(query: Query) -> Self {
        SearchQuery::new().query(query)
    }
}

impl From<BoolQuery> for SearchQuery {
    fn from(query: BoolQuery) -> Self {
        SearchQuery::new().query(query)
    }
}

impl From<&str> for SearchQuery {
    fn from(query: &str) -> Self {
        SearchQuery::new().query(Query::query_string(query))
    }
}

impl From<String> for SearchQuery {
    fn from(query: String) -> Self {
        SearchQuery::new().query(Query::query_string(query))
    }
}

impl From<Value> for SearchQuery {
    fn from(body: Value) -> Self {
        SearchQuery::raw(body)
    }
}

impl From<&SearchQuery> for SearchQuery {
    fn from(query: &SearchQuery) -> Self {
        query.clone()
    }
}
