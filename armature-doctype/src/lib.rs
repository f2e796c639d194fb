//! Document types for the Armature framework.
//!
//! A [`Type`] is a named document collection inside an index. It turns
//! document operations into requests and replies into documents or
//! classified errors:
//!
//! - Index, fetch, update (partial or scripted) and delete documents
//! - Bulk indexing and deletion through the owning [`Index`]
//! - Searches, counts and more-like-this scoped to the type
//! - Mapping management
//!
//! # Example
//!
//! ```rust,no_run
//! use armature_doctype::{Client, Options, OpenSearchConfig};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OpenSearchConfig::new("http://localhost:9200").with_auto_populate(true);
//!     let client = Client::new(config)?;
//!     let users = client.index("users").get_type("user");
//!
//!     // Index a document; the server assigns the id
//!     let mut doc = users.create_document("", json!({ "name": "hans" }));
//!     users.add(&mut doc).await?;
//!
//!     // Fetch it back
//!     let stored = users.get_document(&doc.id, &Options::new()).await?;
//!     assert_eq!(stored.get("name"), Some(&json!("hans")));
//!
//!     // Search
//!     let results = users.search("name:hans", &Options::new()).await?;
//!     println!("{} matches", results.total);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bulk;
mod classify;
mod client;
mod config;
mod doc_type;
mod document;
mod error;
mod index;
mod mapping;
mod options;
mod path;
mod query;
mod result;
mod search;
mod serializer;
mod transport;

pub use bulk::{BulkItem, BulkItemStatus, BulkResponseSet};
pub use client::Client;
pub use config::OpenSearchConfig;
pub use doc_type::Type;
pub use document::{Document, Script, UpdateTarget};
pub use error::{DocTypeError, Result};
pub use index::Index;
pub use mapping::{FieldType, Mapping, MappingField};
pub use options::{
    filter_options, Operation, Options, ADD_OPTIONS, DELETE_OPTIONS, UPDATE_OPTIONS,
};
pub use path::{create_method, encode_id, type_path};
pub use query::{BoolQuery, Query, SearchQuery};
pub use result::{ResultSet, SearchHit};
pub use search::Search;
pub use serializer::{SerdeSerializer, Serializer};
pub use transport::{Body, Method, OpenSearchTransport, Request, Response, Transport};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        Client, DocTypeError, Document, Index, OpenSearchConfig, Options, Query, Result,
        Script, SearchQuery, Type,
    };
}
