//! Error types for schema resolution and document assembly.
//!
//! Two classes of failure exist:
//!
//! - **Fatal** errors describe a defect in the caller's type model (a trait object in a field,
//!   a tuple, a struct used as a query parameter). They abort the whole generation call and are
//!   expected to be fixed at the call site during development.
//! - **Recoverable** errors are returned to the caller of the registration API without
//!   affecting registry state beyond the failed entry.
//!
//! Use [`SchemaError::is_fatal`] to tell them apart.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = SchemaError> = std::result::Result<T, E>;

/// Failure raised while resolving types into schemas or assembling a document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A behavior-bearing interface (trait object) cannot be described structurally.
    #[error("non-empty interface is not supported: {type_name}")]
    UnsupportedInterface {
        /// Fully-qualified name of the offending type
        type_name: String,
    },

    /// The type's kind has no Swagger representation (tuples, 128-bit integers, ...).
    #[error("type {type_name} is not supported: unsupported kind `{kind}`")]
    UnsupportedKind {
        /// Kind label of the offending type
        kind: &'static str,
        /// Fully-qualified name of the offending type
        type_name: String,
    },

    /// Parameter resolution was invoked on something that is not a struct.
    #[error("parameter source must be a struct, got {type_name}")]
    InvalidParameterSource {
        /// Fully-qualified name of the offending type
        type_name: String,
    },

    /// A parameter field resolved to a shape parameters cannot express.
    #[error("unsupported parameter shape for field `{field}` of {owner}: {reason}")]
    InvalidParameterShape {
        /// Name of the parameter struct
        owner: String,
        /// Rust field name
        field: String,
        /// What is wrong with the resolved shape
        reason: String,
    },

    /// A type's self-provided definition reported failure.
    #[error("custom definition for {type_name} failed")]
    CustomDefinition {
        /// Fully-qualified name of the type providing the definition
        type_name: String,
        /// Error reported by the type
        #[source]
        source: anyhow::Error,
    },

    /// A type's self-provided parameter list reported failure.
    #[error("custom parameters for {type_name} failed")]
    CustomParameters {
        /// Fully-qualified name of the type providing the parameters
        type_name: String,
        /// Error reported by the type
        #[source]
        source: anyhow::Error,
    },

    /// The path item registration used a method Swagger 2.0 path items cannot hold.
    #[error("HTTP method {method} cannot be registered on path {path}")]
    UnsupportedMethod {
        /// Method as given by the caller
        method: String,
        /// Normalized path template
        path: String,
    },

    /// A drain worker terminated abnormally.
    #[error("resolution worker for {type_name} panicked: {message}")]
    WorkerPanicked {
        /// Type the worker was resolving
        type_name: String,
        /// Panic payload rendered as text
        message: String,
    },

    /// Encoding the document failed.
    #[error("failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SchemaError {
    /// Whether this error signals a defect in the caller's type model.
    ///
    /// Fatal errors abort generation; partial registry state afterwards is unusable and the
    /// generator should be reset before retrying.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SchemaError::UnsupportedInterface { .. }
                | SchemaError::UnsupportedKind { .. }
                | SchemaError::InvalidParameterShape { .. }
                | SchemaError::WorkerPanicked { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let fatal = SchemaError::UnsupportedKind {
            kind: "tuple",
            type_name: "(i32, i32)".to_string(),
        };
        assert!(fatal.is_fatal());

        let recoverable = SchemaError::InvalidParameterSource {
            type_name: "i64".to_string(),
        };
        assert!(!recoverable.is_fatal());

        let custom = SchemaError::CustomDefinition {
            type_name: "NullDate".to_string(),
            source: anyhow::anyhow!("boom"),
        };
        assert!(!custom.is_fatal());
        assert_eq!(custom.to_string(), "custom definition for NullDate failed");
    }

    #[test]
    fn test_display_includes_context() {
        let err = SchemaError::InvalidParameterShape {
            owner: "ListRequest".to_string(),
            field: "filter".to_string(),
            reason: "nested object".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported parameter shape for field `filter` of ListRequest: nested object"
        );
    }
}
