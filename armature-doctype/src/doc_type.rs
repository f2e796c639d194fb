//! Document type handle and the document lifecycle.

use crate::{
    bulk::BulkResponseSet,
    classify::{classify_delete, classify_fetch, Target},
    document::{Document, UpdateTarget},
    error::{DocTypeError, Result},
    index::Index,
    mapping::Mapping,
    options::{filter_options, Operation, Options},
    path::{create_method, document_path, type_path},
    query::SearchQuery,
    result::ResultSet,
    search::Search,
    serializer::Serializer,
    transport::{Method, Request, Response},
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// A named document collection inside an index.
///
/// The name is fixed at construction. `T` is the domain object type
/// accepted by [`Type::add_object`] and [`Type::add_objects`] once a
/// [`Serializer`] is configured.
///
/// No method mutates the type, so a handle can be shared between tasks.
pub struct Type<T = Value> {
    name: String,
    index: Index,
    serializer: Option<Arc<dyn Serializer<T>>>,
    auto_populate: bool,
}

impl<T> Clone for Type<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            index: self.index.clone(),
            serializer: self.serializer.clone(),
            auto_populate: self.auto_populate,
        }
    }
}

impl<T> std::fmt::Debug for Type<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.name)
            .field("index", &self.index.name())
            .field("serializer", &self.serializer.is_some())
            .field("auto_populate", &self.auto_populate)
            .finish()
    }
}

impl<T> Type<T> {
    /// Create a type handle.
    ///
    /// The auto-populate default is copied from the client configuration.
    pub fn new(index: Index, name: impl Into<String>) -> Self {
        let auto_populate = index.client().config().auto_populate;
        Self {
            name: name.into(),
            index,
            serializer: None,
            auto_populate,
        }
    }

    /// Configure the serializer used by `add_object` and `add_objects`.
    pub fn with_serializer<S>(mut self, serializer: S) -> Self
    where
        S: Serializer<T> + 'static,
    {
        self.serializer = Some(Arc::new(serializer));
        self
    }

    /// Override the auto-populate default inherited from the client.
    pub fn with_auto_populate(mut self, enabled: bool) -> Self {
        self.auto_populate = enabled;
        self
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning index.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Check whether a serializer is configured.
    pub fn has_serializer(&self) -> bool {
        self.serializer.is_some()
    }

    /// Whether ids are auto-populated for every document added through this type.
    pub fn auto_populate(&self) -> bool {
        self.auto_populate
    }

    fn target<'a>(&'a self, id: &'a str) -> Target<'a> {
        Target {
            index: self.index.name(),
            type_name: &self.name,
            id,
        }
    }

    fn serializer(&self) -> Result<&Arc<dyn Serializer<T>>> {
        self.serializer.as_ref().ok_or_else(|| {
            DocTypeError::Configuration(format!("No serializer defined for type {}", self.name))
        })
    }

    fn stamp(&self, doc: &mut Document) {
        doc.type_name = Some(self.name.clone());
        doc.index = Some(self.index.name().to_string());
    }

    // =========================================================================
    // Document Lifecycle
    // =========================================================================

    /// Index a document.
    ///
    /// Uses `PUT {type}/{id}` when the document has an id and
    /// `POST {type}/` otherwise. On success the document is mutated in
    /// place: its id is set from the reply when it had none and
    /// auto-population is enabled on the document or the type, and its
    /// version is set whenever the reply carries one. Nothing else is
    /// changed.
    pub async fn add(&self, doc: &mut Document) -> Result<Response> {
        let path = document_path(&self.name, &doc.id);
        let method = create_method(&doc.id);

        debug!(index = %self.index.name(), type_name = %self.name, id = %doc.id, %method, "Adding document");

        let request = Request::new(method, path)
            .with_query(filter_options(&doc.options, Operation::Add))
            .with_json(doc.data.clone());

        let response = self.index.request(request).await?;

        self.stamp(doc);
        if !doc.has_id() && (doc.auto_populate == Some(true) || self.auto_populate) {
            if let Some(id) = response.id() {
                doc.id = id.to_string();
            }
        }
        if let Some(version) = response.version() {
            doc.version = Some(version);
        }

        Ok(response)
    }

    /// Serialize an object and index it.
    ///
    /// `template` carries id and options; a fresh document is used when
    /// none is given. Returns the populated document with the reply.
    pub async fn add_object(
        &self,
        object: &T,
        template: Option<Document>,
    ) -> Result<(Document, Response)> {
        let data = self.serializer()?.serialize(object)?;

        let mut doc = template.unwrap_or_default();
        doc.data = data;

        let response = self.add(&mut doc).await?;
        Ok((doc, response))
    }

    /// Update a stored document with a partial document or a script.
    ///
    /// Fails with [`DocTypeError::Validation`] before any request when the
    /// target has no id.
    pub async fn update(&self, target: impl Into<UpdateTarget>) -> Result<Response> {
        let target = target.into();
        if target.id().is_empty() {
            return Err(DocTypeError::Validation(
                "Document or Script id is not set".to_string(),
            ));
        }

        self.index
            .update_document(target.id(), &target, &self.name)
            .await
    }

    /// Fetch a document by id.
    ///
    /// Any failure of the exchange is reported as
    /// [`DocTypeError::NotFound`], as is an `exists: false` reply.
    pub async fn get_document(&self, id: &str, options: &Options) -> Result<Document> {
        debug!(index = %self.index.name(), type_name = %self.name, id, "Fetching document");

        let request = Request::new(Method::Get, document_path(&self.name, id))
            .with_query(options.clone());

        let outcome = self.index.send(request).await;
        let response = classify_fetch(outcome, self.target(id))?;

        let data = response
            .get("_source")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        let mut doc = Document::new(response.id().unwrap_or(id), data);
        doc.version = response.version();
        self.stamp(&mut doc);

        Ok(doc)
    }

    /// Create a document bound to this type without sending anything.
    pub fn create_document(&self, id: impl Into<String>, data: Value) -> Document {
        let mut doc = Document::new(id, data);
        self.stamp(&mut doc);
        doc
    }

    /// Delete a document by id.
    ///
    /// Fails with [`DocTypeError::InvalidArgument`] when the id is empty
    /// or blank, and with [`DocTypeError::NotFound`] when the reply says
    /// `found: false`.
    pub async fn delete_by_id(&self, id: &str, options: &Options) -> Result<Response> {
        if id.trim().is_empty() {
            return Err(DocTypeError::InvalidArgument(
                "Document id must not be empty".to_string(),
            ));
        }

        debug!(index = %self.index.name(), type_name = %self.name, id, "Deleting document");

        let request = Request::new(Method::Delete, document_path(&self.name, id))
            .with_query(filter_options(options, Operation::Delete));

        let response = self.index.send(request).await?;
        classify_delete(response, self.target(id))
    }

    /// Delete a document using its id and options.
    pub async fn delete_document(&self, doc: &Document) -> Result<Response> {
        let options = filter_options(&doc.options, Operation::Delete);
        self.delete_by_id(&doc.id, &options).await
    }

    /// Delete several documents of this type in one bulk request.
    pub async fn delete_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<BulkResponseSet> {
        self.index.delete_ids(ids, &self.name).await
    }

    /// Delete every document of this type matching a query.
    pub async fn delete_by_query(&self, query: impl Into<SearchQuery>) -> Result<Response> {
        self.delete_by_query_with(query, &Options::new()).await
    }

    /// Delete by query with query-string options.
    pub async fn delete_by_query_with(
        &self,
        query: impl Into<SearchQuery>,
        options: &Options,
    ) -> Result<Response> {
        let query = query.into();

        info!(index = %self.index.name(), type_name = %self.name, "Deleting documents by query");

        let request = Request::new(Method::Delete, type_path(&self.name, "_query"))
            .with_query(options.clone())
            .with_json(serde_json::json!({ "query": query.query_json() }));

        self.index.request(request).await
    }

    /// Delete the type with its mapping and every document.
    pub async fn delete(&self) -> Result<Response> {
        info!(index = %self.index.name(), type_name = %self.name, "Deleting type");

        self.index
            .request(Request::new(Method::Delete, type_path(&self.name, "")))
            .await
    }

    /// Check if the type has a mapping on the server.
    pub async fn exists(&self) -> Result<bool> {
        let request = Request::new(Method::Get, type_path(&self.name, "_mapping"));
        let response = self.index.send(request).await?;

        match response.status() {
            404 => Ok(false),
            _ => {
                let response = response.error_for_status()?;
                Ok(response
                    .body()
                    .as_object()
                    .is_some_and(|mapping| !mapping.is_empty()))
            }
        }
    }

    /// Refresh the owning index.
    pub async fn refresh(&self) -> Result<Response> {
        self.index.refresh().await
    }

    // =========================================================================
    // Bulk Operations
    // =========================================================================

    /// Index several documents in one bulk request.
    ///
    /// Every document is stamped with this type's name first, replacing any
    /// previous type. Per-item failures are reported in the returned set.
    pub async fn add_documents(&self, docs: &mut [Document]) -> Result<BulkResponseSet> {
        for doc in docs.iter_mut() {
            doc.type_name = Some(self.name.clone());
        }

        self.index.add_documents(docs).await
    }

    /// Serialize several objects and index them in one bulk request.
    pub async fn add_objects(&self, objects: &[T]) -> Result<BulkResponseSet> {
        let serializer = self.serializer()?;

        let mut docs = objects
            .iter()
            .map(|object| Ok(self.create_document("", serializer.serialize(object)?)))
            .collect::<Result<Vec<_>>>()?;

        self.add_documents(&mut docs).await
    }

    // =========================================================================
    // Search and Mapping
    // =========================================================================

    /// Build a search scoped to this index and type.
    pub fn create_search(&self, query: impl Into<SearchQuery>, options: &Options) -> Search {
        self.index
            .client()
            .search()
            .add_index(self.index.name())
            .add_type(self.name.as_str())
            .query(query)
            .options(options)
    }

    /// Search this type.
    pub async fn search(
        &self,
        query: impl Into<SearchQuery>,
        options: &Options,
    ) -> Result<ResultSet> {
        self.create_search(query, options).execute().await
    }

    /// Count documents of this type matching a query.
    pub async fn count(&self, query: impl Into<SearchQuery>) -> Result<u64> {
        self.create_search(query, &Options::new()).count().await
    }

    /// Find documents similar to `doc`.
    ///
    /// `params` are sent as query-string parameters and `query` as the
    /// body. The document id is not checked; an empty id produces the
    /// path `{type}//_mlt`.
    pub async fn more_like_this(
        &self,
        doc: &Document,
        params: &Options,
        query: impl Into<SearchQuery>,
    ) -> Result<ResultSet> {
        let query = query.into();
        let path = format!("{}/_mlt", document_path(&self.name, &doc.id));

        debug!(index = %self.index.name(), type_name = %self.name, id = %doc.id, "More like this");

        let request = Request::new(Method::Get, path)
            .with_query(params.clone())
            .with_json(query.to_json());

        let response = self.index.send(request).await?;
        ResultSet::from_response(response, query)
    }

    /// Set the mapping of this type.
    pub async fn set_mapping(&self, mapping: impl Into<Mapping>) -> Result<Response> {
        let mapping = mapping.into().with_type(self.name.as_str());

        info!(index = %self.index.name(), type_name = %self.name, "Setting mapping");

        let request = Request::new(Method::Put, type_path(&self.name, "_mapping"))
            .with_json(mapping.to_json());

        self.index.request(request).await
    }

    /// Get the mapping of this type as returned by the server.
    pub async fn get_mapping(&self) -> Result<Value> {
        let request = Request::new(Method::Get, type_path(&self.name, "_mapping"));
        Ok(self.index.request(request).await?.into_body())
    }
}
