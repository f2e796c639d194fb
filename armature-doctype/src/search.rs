//! Search builder.

use crate::{
    client::Client,
    error::Result,
    options::Options,
    query::SearchQuery,
    result::ResultSet,
    transport::{Method, Request},
};
use serde_json::{json, Value};
use tracing::debug;

/// Search builder scoped to a set of indices and types.
///
/// Building is free of side effects; only [`Search::execute`] and
/// [`Search::count`] send requests.
#[derive(Clone, Debug)]
pub struct Search {
    client: Client,
    indices: Vec<String>,
    types: Vec<String>,
    query: SearchQuery,
    params: Options,
}

impl Search {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            indices: Vec::new(),
            types: Vec::new(),
            query: SearchQuery::new(),
            params: Options::new(),
        }
    }

    /// Add an index to search.
    pub fn add_index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index.into());
        self
    }

    /// Add a type to search.
    pub fn add_type(mut self, type_name: impl Into<String>) -> Self {
        self.types.push(type_name.into());
        self
    }

    /// Set the query.
    pub fn query(mut self, query: impl Into<SearchQuery>) -> Self {
        self.query = query.into();
        self
    }

    /// Apply search options.
    ///
    /// `limit`/`size` and `from` go into the body; every other option is
    /// sent as a query-string parameter (`routing`, `search_type`, ...).
    pub fn options(mut self, options: &Options) -> Self {
        for (name, value) in options {
            match (name.as_str(), value.as_u64()) {
                ("limit" | "size", Some(size)) => self.query = self.query.size(size),
                ("from", Some(from)) => self.query = self.query.from(from),
                _ => {
                    self.params.insert(name.clone(), value.clone());
                }
            }
        }
        self
    }

    /// Set one query-string parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Indices searched.
    pub fn indices(&self) -> &[String] {
        &self.indices
    }

    /// Types searched.
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Query sent.
    pub fn search_query(&self) -> &SearchQuery {
        &self.query
    }

    /// Query-string parameters sent.
    pub fn params(&self) -> &Options {
        &self.params
    }

    /// Path of an endpoint (`_search`, `_count`) under the scoped indices and types.
    pub fn path(&self, endpoint: &str) -> String {
        let mut path = String::new();
        if !self.indices.is_empty() {
            path.push_str(&self.indices.join(","));
            path.push('/');
        } else if !self.types.is_empty() {
            path.push_str("_all/");
        }
        if !self.types.is_empty() {
            path.push_str(&self.types.join(","));
            path.push('/');
        }
        path.push_str(endpoint);
        path
    }

    /// Execute the search.
    pub async fn execute(self) -> Result<ResultSet> {
        let path = self.path("_search");
        debug!(path = %path, "Searching");

        let request = Request::new(Method::Post, path)
            .with_query(self.params)
            .with_json(self.query.to_json());

        let response = self.client.send(request).await?;
        ResultSet::from_response(response, self.query)
    }

    /// Count matching documents.
    pub async fn count(self) -> Result<u64> {
        let path = self.path("_count");
        debug!(path = %path, "Counting");

        let request = Request::new(Method::Post, path)
            .with_query(self.params)
            .with_json(json!({ "query": self.query.query_json() }));

        let response = self.client.request(request).await?;
        Ok(response.get("count").and_then(Value::as_u64).unwrap_or(0))
    }
}
