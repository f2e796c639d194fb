//! Type mappings.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Mapping of one type.
///
/// Built with the field helpers or normalised from raw JSON. A raw object
/// is read as the `properties` map unless it already has a `properties`
/// key, in which case it is read as a complete mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    type_name: Option<String>,
    properties: Map<String, Value>,
    params: Map<String, Value>,
}

impl Mapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the mapping to a type name.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Type the mapping is bound to.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, field: MappingField) -> Self {
        self.properties.insert(name.into(), field.to_json());
        self
    }

    /// Add a field from raw JSON.
    pub fn property(mut self, name: impl Into<String>, definition: Value) -> Self {
        self.properties.insert(name.into(), definition);
        self
    }

    /// Field definitions.
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Set dynamic mapping (`true`, `false` or `"strict"`).
    pub fn dynamic(self, dynamic: impl Into<Value>) -> Self {
        self.param("dynamic", dynamic)
    }

    /// Enable or disable `_source` storage.
    pub fn source_enabled(self, enabled: bool) -> Self {
        self.param("_source", json!({ "enabled": enabled }))
    }

    /// Set a top-level mapping parameter such as `_routing` or `_parent`.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Mapping body without the type wrapper.
    pub fn to_inner_json(&self) -> Value {
        let mut mapping = self.params.clone();
        mapping.insert(
            "properties".to_string(),
            Value::Object(self.properties.clone()),
        );
        Value::Object(mapping)
    }

    /// Mapping body, wrapped in `{type: ...}` when bound to a type.
    pub fn to_json(&self) -> Value {
        match &self.type_name {
            Some(name) => json!({ name.as_str(): self.to_inner_json() }),
            None => self.to_inner_json(),
        }
    }
}

impl From<Value> for Mapping {
    fn from(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Mapping::new();
        };

        match map.remove("properties") {
            Some(Value::Object(properties)) => Mapping {
                type_name: None,
                properties,
                params: map,
            },
            Some(_) | None => Mapping {
                type_name: None,
                properties: map,
                params: Map::new(),
            },
        }
    }
}

/// Field mapping definition.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingField {
    /// Field type.
    pub field_type: FieldType,
    /// Analyzer.
    pub analyzer: Option<String>,
    /// Whether to index the field.
    pub index: Option<bool>,
    /// Whether to store the field.
    pub store: Option<bool>,
    /// Nested properties (for object/nested types).
    pub properties: Option<Map<String, Value>>,
}

impl MappingField {
    /// Create a field of the given type.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            analyzer: None,
            index: None,
            store: None,
            properties: None,
        }
    }

    /// Create a text field.
    pub fn text() -> Self {
        Self::new(FieldType::Text)
    }

    /// Create a keyword field.
    pub fn keyword() -> Self {
        Self::new(FieldType::Keyword)
    }

    /// Create a long field.
    pub fn long() -> Self {
        Self::new(FieldType::Long)
    }

    /// Create a date field.
    pub fn date() -> Self {
        Self::new(FieldType::Date)
    }

    /// Set analyzer.
    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// Set whether the field is indexed.
    pub fn indexed(mut self, index: bool) -> Self {
        self.index = Some(index);
        self
    }

    /// Set whether the field is stored.
    pub fn stored(mut self, store: bool) -> Self {
        self.store = Some(store);
        self
    }

    /// Add nested property.
    pub fn property(mut self, name: impl Into<String>, field: MappingField) -> Self {
        self.properties
            .get_or_insert_with(Map::new)
            .insert(name.into(), field.to_json());
        self
    }

    fn to_json(&self) -> Value {
        let mut field = Map::new();
        field.insert("type".to_string(), json!(self.field_type.as_str()));

        if let Some(analyzer) = &self.analyzer {
            field.insert("analyzer".to_string(), json!(analyzer));
        }
        if let Some(index) = self.index {
            field.insert("index".to_string(), json!(index));
        }
        if let Some(store) = self.store {
            field.insert("store".to_string(), json!(store));
        }
        if let Some(properties) = &self.properties {
            field.insert("properties".to_string(), Value::Object(properties.clone()));
        }

        Value::Object(field)
    }
}

/// Field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Full-text searchable field.
    Text,
    /// Exact match keyword field.
    Keyword,
    /// 64-bit integer.
    Long,
    /// 32-bit integer.
    Integer,
    /// Double precision float.
    Double,
    /// Single precision float.
    Float,
    /// Boolean.
    Boolean,
    /// Date.
    Date,
    /// Binary data.
    Binary,
    /// IP address.
    Ip,
    /// Geo point.
    GeoPoint,
    /// Nested object.
    Nested,
    /// Object.
    Object,
}

impl FieldType {
    /// Name used in mapping JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Keyword => "keyword",
            FieldType::Long => "long",
            FieldType::Integer => "integer",
            FieldType::Double => "double",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Binary => "binary",
            FieldType::Ip => "ip",
            FieldType::GeoPoint => "geo_point",
            FieldType::Nested => "nested",
            FieldType::Object => "object",
        }
    }
}
