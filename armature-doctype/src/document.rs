//! Documents, update scripts and the update target they share.

use crate::options::Options;
use serde_json::{json, Map, Value};

/// A document stored in a type.
///
/// `add` mutates `id` (when auto-populating) and `version` in place; no
/// other field is touched by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document ID, empty until assigned.
    pub id: String,
    /// Payload.
    pub data: Value,
    /// Version reported by the server.
    pub version: Option<i64>,
    /// Per-call options.
    pub options: Options,
    /// Type the document belongs to.
    pub type_name: Option<String>,
    /// Index the document belongs to.
    pub index: Option<String>,
    /// Assign the server-generated id after add, even when the type does not.
    pub auto_populate: Option<bool>,
    /// Document to insert when an update finds nothing.
    pub upsert: Option<Value>,
    /// Use the payload itself as the upsert document.
    pub doc_as_upsert: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            id: String::new(),
            data: Value::Object(Map::new()),
            version: None,
            options: Options::new(),
            type_name: None,
            index: None,
            auto_populate: None,
            upsert: None,
            doc_as_upsert: false,
        }
    }
}

impl Document {
    /// Create a document.
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
            ..Self::default()
        }
    }

    /// Create a document without an id.
    pub fn from_data(data: Value) -> Self {
        Self::new("", data)
    }

    /// Check whether an id has been assigned.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Set the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    /// Set one per-call option.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Set the type name.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Set the index name.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Enable id auto-population for this document.
    pub fn with_auto_populate(mut self, enabled: bool) -> Self {
        self.auto_populate = Some(enabled);
        self
    }

    /// Set the upsert document used by updates.
    pub fn with_upsert(mut self, upsert: Value) -> Self {
        self.upsert = Some(upsert);
        self
    }

    /// Use the payload as upsert document.
    pub fn with_doc_as_upsert(mut self, enabled: bool) -> Self {
        self.doc_as_upsert = enabled;
        self
    }

    /// Set a payload field, turning a non-object payload into an object.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        if !self.data.is_object() {
            self.data = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.data {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Get a payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Check for a payload field.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a payload field.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.as_object_mut().and_then(|map| map.remove(key))
    }

    /// Body of a partial update with this document.
    pub fn to_update_body(&self) -> Value {
        let mut body = json!({ "doc": self.data });
        if let Some(upsert) = &self.upsert {
            body["upsert"] = upsert.clone();
        }
        if self.doc_as_upsert {
            body["doc_as_upsert"] = json!(true);
        }
        body
    }
}

/// A scripted update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    /// Target document id.
    pub id: String,
    /// Script source.
    pub source: String,
    /// Script language.
    pub lang: Option<String>,
    /// Script parameters.
    pub params: Map<String, Value>,
    /// Per-call options.
    pub options: Options,
    /// Document to insert when the target does not exist.
    pub upsert: Option<Value>,
}

impl Script {
    /// Create a script.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Set the target document id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the script language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Add a script parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Set one per-call option.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Set the upsert document.
    pub fn with_upsert(mut self, upsert: Value) -> Self {
        self.upsert = Some(upsert);
        self
    }

    /// Body of a scripted update.
    pub fn to_update_body(&self) -> Value {
        let mut script = json!({ "source": self.source });
        if let Some(lang) = &self.lang {
            script["lang"] = json!(lang);
        }
        if !self.params.is_empty() {
            script["params"] = Value::Object(self.params.clone());
        }

        let mut body = json!({ "script": script });
        if let Some(upsert) = &self.upsert {
            body["upsert"] = upsert.clone();
        }
        body
    }
}

/// Something that can update a stored document by id.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateTarget {
    /// Partial document update.
    Document(Document),
    /// Scripted update.
    Script(Script),
}

impl UpdateTarget {
    /// Id of the document to update.
    pub fn id(&self) -> &str {
        match self {
            UpdateTarget::Document(doc) => &doc.id,
            UpdateTarget::Script(script) => &script.id,
        }
    }

    /// Per-call options.
    pub fn options(&self) -> &Options {
        match self {
            UpdateTarget::Document(doc) => &doc.options,
            UpdateTarget::Script(script) => &script.options,
        }
    }

    /// Update request body.
    pub fn to_update_body(&self) -> Value {
        match self {
            UpdateTarget::Document(doc) => doc.to_update_body(),
            UpdateTarget::Script(script) => script.to_update_body(),
        }
    }
}

impl From<Document> for UpdateTarget {
    fn from(doc: Document) -> Self {
        UpdateTarget::Document(doc)
    }
}

impl From<Script> for UpdateTarget {
    fn from(script: Script) -> Self {
        UpdateTarget::Script(script)
    }
}
