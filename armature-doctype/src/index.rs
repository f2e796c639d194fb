//! Index handle.

use crate::{
    bulk::{delete_line, index_lines, BulkResponseSet},
    client::Client,
    doc_type::Type,
    document::{Document, UpdateTarget},
    error::Result,
    options::{filter_options, Operation},
    path::{encode_id, index_path},
    search::Search,
    transport::{Method, Request, Response},
};
use serde_json::Value;
use tracing::{debug, info};

/// Handle on one index.
///
/// Holds no state beyond its name; cloning shares the client.
#[derive(Clone, Debug)]
pub struct Index {
    client: Client,
    name: String,
}

impl Index {
    pub(crate) fn new(client: Client, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    /// Index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get a handle on a type in this index.
    pub fn get_type(&self, name: impl Into<String>) -> Type {
        Type::new(self.clone(), name)
    }

    /// Get a handle on a type whose objects are of type `T`.
    pub fn get_typed<T>(&self, name: impl Into<String>) -> Type<T> {
        Type::new(self.clone(), name)
    }

    /// Send a request relative to this index, whatever its status.
    pub async fn send(&self, mut request: Request) -> Result<Response> {
        request.path = index_path(&self.name, &request.path);
        self.client.send(request).await
    }

    /// Send a request relative to this index, failing on a non-success status.
    pub async fn request(&self, request: Request) -> Result<Response> {
        self.send(request).await?.error_for_status()
    }

    /// Update a document by id with a partial document or a script.
    pub async fn update_document(
        &self,
        id: &str,
        target: &UpdateTarget,
        type_name: &str,
    ) -> Result<Response> {
        debug!(index = %self.name, type_name, id, "Updating document");

        let path = format!("{}/{}/_update", type_name, encode_id(id));
        let request = Request::new(Method::Post, path)
            .with_query(filter_options(target.options(), Operation::Update))
            .with_json(target.to_update_body());

        self.request(request).await
    }

    /// Index a batch of documents in one bulk request.
    ///
    /// Documents without an index are written to this one. Per-item
    /// failures are reported in the returned set, not as an error.
    pub async fn add_documents(&self, docs: &[Document]) -> Result<BulkResponseSet> {
        if docs.is_empty() {
            return Ok(BulkResponseSet::default());
        }

        debug!(index = %self.name, count = docs.len(), "Bulk indexing documents");

        let mut lines = Vec::with_capacity(docs.len() * 2);
        for doc in docs {
            if doc.index.is_some() {
                lines.extend(index_lines(doc)?);
            } else {
                lines.extend(index_lines(&doc.clone().with_index(self.name.as_str()))?);
            }
        }

        let response = self
            .client
            .send(Request::new(Method::Post, "_bulk").with_lines(lines))
            .await?;
        BulkResponseSet::from_response(response)
    }

    /// Delete a batch of documents of one type in one bulk request.
    pub async fn delete_ids<S: AsRef<str>>(
        &self,
        ids: &[S],
        type_name: &str,
    ) -> Result<BulkResponseSet> {
        if ids.is_empty() {
            return Ok(BulkResponseSet::default());
        }

        debug!(index = %self.name, type_name, count = ids.len(), "Bulk deleting documents");

        let lines = ids
            .iter()
            .map(|id| delete_line(&self.name, type_name, id.as_ref()))
            .collect();

        let response = self
            .client
            .send(Request::new(Method::Post, "_bulk").with_lines(lines))
            .await?;
        BulkResponseSet::from_response(response)
    }

    /// Create a search scoped to this index.
    pub fn search(&self) -> Search {
        Search::new(self.client.clone()).add_index(self.name.as_str())
    }

    /// Create the index with optional settings and mappings.
    pub async fn create(&self, body: Option<Value>) -> Result<Response> {
        info!(index = %self.name, "Creating index");

        let mut request = Request::new(Method::Put, "");
        if let Some(body) = body {
            request = request.with_json(body);
        }
        self.request(request).await
    }

    /// Delete the index.
    pub async fn delete(&self) -> Result<Response> {
        info!(index = %self.name, "Deleting index");
        self.request(Request::new(Method::Delete, "")).await
    }

    /// Check if the index exists.
    pub async fn exists(&self) -> Result<bool> {
        let response = self.send(Request::new(Method::Get, "")).await?;
        match response.status() {
            404 => Ok(false),
            _ => response.error_for_status().map(|_| true),
        }
    }

    /// Refresh the index to make recent changes searchable.
    pub async fn refresh(&self) -> Result<Response> {
        debug!(index = %self.name, "Refreshing index");
        self.request(Request::new(Method::Post, "_refresh")).await
    }
}
