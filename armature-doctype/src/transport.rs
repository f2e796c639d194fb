//! Request/response transport.
//!
//! Everything above this module speaks in [`Request`] and [`Response`];
//! [`Transport`] implementations own connections, TLS and deadlines.

use crate::{
    config::OpenSearchConfig,
    error::{DocTypeError, Result},
    options::Options,
};
use async_trait::async_trait;
use opensearch::{
    http::{
        headers::HeaderMap,
        request::{JsonBody, NdBody},
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    OpenSearch,
};
use serde_json::Value;
use tracing::{debug, info};

/// HTTP verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read.
    Get,
    /// Create with a server-assigned id, or run an action.
    Post,
    /// Create or replace at a known path.
    Put,
    /// Remove.
    Delete,
}

impl Method {
    /// Verb name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Single JSON document.
    Json(Value),
    /// Newline-delimited JSON, one value per line.
    Lines(Vec<Value>),
}

/// Outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Verb.
    pub method: Method,
    /// Path relative to the cluster root, without a leading slash.
    pub path: String,
    /// Query-string parameters.
    pub query: Options,
    /// Optional body.
    pub body: Option<Body>,
}

impl Request {
    /// Create a request without query or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Options::new(),
            body: None,
        }
    }

    /// Set query-string parameters.
    pub fn with_query(mut self, query: Options) -> Self {
        self.query = query;
        self
    }

    /// Set a JSON body.
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    /// Set a newline-delimited JSON body.
    pub fn with_lines(mut self, lines: Vec<Value>) -> Self {
        self.body = Some(Body::Lines(lines));
        self
    }

    /// Get the JSON body, if any.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            Some(Body::Json(v)) => Some(v),
            _ => None,
        }
    }

    /// Render query parameters as strings.
    ///
    /// Strings are sent unquoted; every other value uses its JSON text.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect()
    }
}

/// Raw server reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    body: Value,
}

impl Response {
    /// Create a response.
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Get the status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Check if the response was successful (2xx).
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the decoded body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Consume the response and return the body.
    pub fn into_body(self) -> Value {
        self.body
    }

    /// Get a top-level body field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Get a top-level boolean flag such as `found` or `exists`.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Document id returned by the server.
    pub fn id(&self) -> Option<&str> {
        self.get("_id").and_then(Value::as_str)
    }

    /// Document version returned by the server.
    pub fn version(&self) -> Option<i64> {
        self.get("_version").and_then(Value::as_i64)
    }

    /// Error reason reported by the server.
    pub fn error_reason(&self) -> String {
        match self.body.get("error") {
            Some(Value::String(reason)) => reason.clone(),
            Some(error) => error
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string(),
            None => "Unknown error".to_string(),
        }
    }

    /// Turn a non-success status into an error.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(DocTypeError::Response {
                status: self.status,
                reason: self.error_reason(),
            })
        }
    }
}

/// Sends requests to the cluster.
///
/// Implementations never inspect the status code; classification happens
/// in the layers above. An `Err` means no reply was obtained.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request.
    async fn perform(&self, request: Request) -> Result<Response>;
}

/// Transport backed by the `opensearch` crate.
pub struct OpenSearchTransport {
    client: OpenSearch,
    urls: Vec<String>,
}

impl OpenSearchTransport {
    /// Build a transport from configuration.
    pub fn new(config: &OpenSearchConfig) -> Result<Self> {
        info!(urls = ?config.urls, "Initializing OpenSearch transport");

        let url = config
            .urls
            .first()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| DocTypeError::Configuration("No URLs provided".to_string()))?;

        let url = opensearch::http::Url::parse(url)
            .map_err(|e| DocTypeError::Configuration(format!("Invalid URL: {}", e)))?;

        let conn_pool = SingleNodeConnectionPool::new(url);
        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(config.request_timeout)
            .disable_proxy();

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.auth(opensearch::auth::Credentials::Basic(
                user.clone(),
                pass.clone(),
            ));
        }

        let transport = builder
            .build()
            .map_err(|e| DocTypeError::Transport(e.to_string()))?;

        Ok(Self {
            client: OpenSearch::new(transport),
            urls: config.urls.clone(),
        })
    }

    /// Get the underlying OpenSearch client.
    pub fn inner(&self) -> &OpenSearch {
        &self.client
    }
}

#[async_trait]
impl Transport for OpenSearchTransport {
    async fn perform(&self, request: Request) -> Result<Response> {
        let method = match request.method {
            Method::Get => opensearch::http::Method::Get,
            Method::Post => opensearch::http::Method::Post,
            Method::Put => opensearch::http::Method::Put,
            Method::Delete => opensearch::http::Method::Delete,
        };
        let path = format!("/{}", request.path);
        let query = request.query_pairs();

        debug!(method = %request.method, path = %path, "Sending request");

        let response = match request.body {
            Some(Body::Json(body)) => {
                self.client
                    .send(
                        method,
                        &path,
                        HeaderMap::new(),
                        Some(&query),
                        Some(JsonBody::new(body)),
                        None,
                    )
                    .await?
            }
            Some(Body::Lines(lines)) => {
                self.client
                    .send(
                        method,
                        &path,
                        HeaderMap::new(),
                        Some(&query),
                        Some(ndjson_body(lines)),
                        None,
                    )
                    .await?
            }
            None => {
                self.client
                    .send(
                        method,
                        &path,
                        HeaderMap::new(),
                        Some(&query),
                        None::<JsonBody<Value>>,
                        None,
                    )
                    .await?
            }
        };

        let status = response.status_code().as_u16();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        debug!(status, "Received response");

        Ok(Response::new(status, body))
    }
}

/// Wrap bulk lines as a newline-delimited JSON body.
fn ndjson_body(lines: Vec<Value>) -> NdBody<JsonBody<Value>> {
    NdBody::new(lines.into_iter().map(JsonBody::new).collect())
}

impl std::fmt::Debug for OpenSearchTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSearchTransport")
            .field("urls", &self.urls)
            .finish()
    }
}
