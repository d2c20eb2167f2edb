//! Error types for schema compilation and query execution.

use displaydoc::Display;
use thiserror::Error;

/// Errors raised while compiling schema declaration text.
///
/// Any of these aborts the whole load: no partial registry is ever built.
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// invalid field declaration in type '{type_name}': '{line}'
    FieldSyntax {
        /// Name of the block the malformed line appeared in.
        type_name: String,

        /// The offending line, as written in the source.
        line: String,
    },
}

/// Errors raised by a single query session.
///
/// These abort only the `execute` call that produced them; the registry and any
/// previously hydrated data stay valid.
#[derive(Error, Display, Debug)]
#[non_exhaustive]
pub enum QueryError {
    /// type '{0}' is not registered in the schema
    UnknownType(String),

    /// field '{field}' is not declared on type '{type_name}'
    UnknownField {
        /// The type the probe was reading.
        type_name: String,

        /// The undeclared field name.
        field: String,
    },

    /// field '{field}' on type '{type_name}' is model-typed and needs a sub-selection
    ScalarAccessOnModel { type_name: String, field: String },

    /// field '{field}' on type '{type_name}' is a scalar and has no sub-fields
    ModelAccessOnScalar { type_name: String, field: String },

    /// backend reported an error: {0}
    Execution(String),

    /// transport failed: {0}
    Transport(#[from] TransportError),

    /// response shape disagrees with the schema: {0}
    Hydration(String),

    /// mutations are not supported
    MutationsUnsupported,
}

/// Network or envelope failures while talking to the backend.
///
/// Not retried; these propagate immediately to the caller.
#[derive(Error, Display, Debug)]
#[non_exhaustive]
pub enum TransportError {
    /// HTTP fetch failed: {0}
    Http(#[from] reqwest::Error),

    /// response was malformed: {reason}
    MalformedResponse {
        /// The reason the response could not be decoded.
        reason: String,
    },
}
