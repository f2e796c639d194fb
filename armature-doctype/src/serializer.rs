//! Conversion of domain objects into document payloads.

use crate::error::Result;
use serde::Serialize;
use serde_json::Value;

/// Converts a domain object into document payload data.
///
/// Closures of the form `Fn(&T) -> Result<Value>` implement this trait.
pub trait Serializer<T>: Send + Sync {
    /// Convert `object` into a payload.
    fn serialize(&self, object: &T) -> Result<Value>;
}

impl<T, F> Serializer<T> for F
where
    F: Fn(&T) -> Result<Value> + Send + Sync,
{
    fn serialize(&self, object: &T) -> Result<Value> {
        self(object)
    }
}

/// Serializer using the object's `serde::Serialize` implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeSerializer;

impl<T: Serialize> Serializer<T> for SerdeSerializer {
    fn serialize(&self, object: &T) -> Result<Value> {
        Ok(serde_json::to_value(object)?)
    }
}
