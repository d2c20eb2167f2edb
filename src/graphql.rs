//! Wire types for the query protocol.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// The request envelope posted to the backend.
///
/// The backend expects all three keys to be present, with `operationName`
/// explicitly null and `variables` an empty object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Always null: the protocol does not use named operations.
    pub operation_name: Option<String>,

    /// Always empty: the compiled query text carries no variables.
    pub variables: Map<String, Value>,

    /// The compiled query text.
    pub query: String,
}

impl Request {
    pub fn new(query: String) -> Self {
        Self {
            operation_name: None,
            variables: Map::new(),
            query,
        }
    }
}

/// The response envelope: either a decoded `data` payload or a backend-reported
/// error list.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Response {
    /// The decoded success payload, mapping root type name to a raw value.
    #[serde(default)]
    pub data: Option<Map<String, Value>>,

    /// Backend-reported errors. Non-empty means the query failed.
    #[serde(default)]
    pub errors: Vec<Error>,
}

/// One backend-reported error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Error {
    /// The error message.
    pub message: String,

    /// The locations of the error in the query text, when reported.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,

    /// Any additional keys the backend attached.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// An error location within the query text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}
