//! Per-call options and the whitelists each operation accepts.

use serde_json::Value;
use std::collections::BTreeMap;

/// Per-call options, sent to the server as query-string parameters.
pub type Options = BTreeMap<String, Value>;

/// Options recognised when adding a document.
pub const ADD_OPTIONS: &[&str] = &[
    "version",
    "version_type",
    "routing",
    "percolate",
    "parent",
    "ttl",
    "timestamp",
    "op_type",
    "consistency",
    "replication",
    "refresh",
    "timeout",
];

/// Options recognised when deleting a document.
pub const DELETE_OPTIONS: &[&str] = &[
    "version",
    "version_type",
    "routing",
    "parent",
    "replication",
    "consistency",
    "refresh",
    "timeout",
];

/// Options recognised when updating a document.
pub const UPDATE_OPTIONS: &[&str] = &[
    "version",
    "version_type",
    "routing",
    "parent",
    "timeout",
    "consistency",
    "replication",
    "refresh",
    "retry_on_conflict",
    "fields",
];

/// Operation whose whitelist applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Index a document.
    Add,
    /// Delete a document.
    Delete,
    /// Update a document by id.
    Update,
}

impl Operation {
    /// Option names this operation forwards.
    pub fn allowed(self) -> &'static [&'static str] {
        match self {
            Operation::Add => ADD_OPTIONS,
            Operation::Delete => DELETE_OPTIONS,
            Operation::Update => UPDATE_OPTIONS,
        }
    }

    /// Check whether an option name is forwarded.
    pub fn accepts(self, name: &str) -> bool {
        self.allowed().contains(&name)
    }
}

/// Keep only the options the operation recognises.
///
/// Values are passed through untouched; unknown keys are dropped.
pub fn filter_options(options: &Options, operation: Operation) -> Options {
    options
        .iter()
        .filter(|(name, _)| operation.accepts(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
