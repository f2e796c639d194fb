//! Cluster client.

use crate::{
    config::OpenSearchConfig,
    error::Result,
    index::Index,
    search::Search,
    transport::{OpenSearchTransport, Request, Response, Transport},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Entry point owning the transport and configuration.
///
/// Cloning is cheap; every clone shares the same transport.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    config: Arc<OpenSearchConfig>,
}

impl Client {
    /// Create a client backed by the OpenSearch transport.
    pub fn new(config: OpenSearchConfig) -> Result<Self> {
        let transport = OpenSearchTransport::new(&config)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Create a client over any transport.
    pub fn with_transport(transport: Arc<dyn Transport>, config: OpenSearchConfig) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenSearchConfig {
        &self.config
    }

    /// Get a handle on an index.
    pub fn index(&self, name: impl Into<String>) -> Index {
        Index::new(self.clone(), name)
    }

    /// Create a search over the whole cluster.
    pub fn search(&self) -> Search {
        Search::new(self.clone())
    }

    /// Send a request and return the reply whatever its status.
    pub async fn send(&self, request: Request) -> Result<Response> {
        debug!(method = %request.method, path = %request.path, "Dispatching request");

        let result = self.transport.perform(request).await;
        if let Err(e) = &result {
            warn!(error = %e, "Request failed");
        }
        result
    }

    /// Send a request and turn a non-success status into an error.
    pub async fn request(&self, request: Request) -> Result<Response> {
        self.send(request).await?.error_for_status()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("urls", &self.config.urls)
            .finish()
    }
}
