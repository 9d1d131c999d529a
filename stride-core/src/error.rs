// stride-core/src/error.rs
// Error types for the parsing boundaries of the classification engine

use std::result;
use thiserror::Error;

/// Errors raised while turning caller input into engine values.
///
/// Classification itself never fails; these only surface when a caller hands
/// over something that is not a component record or not a catalog at all.
#[derive(Error, Debug)]
pub enum StrideError {
    /// Input is not a component record (e.g. a JSON array or a bare string)
    #[error("Invalid component record: {0}")]
    InvalidComponent(String),

    /// Catalog content could not be loaded or is inconsistent
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {context} - {source}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for convenience
pub type Result<T> = result::Result<T, StrideError>;

impl From<serde_json::Error> for StrideError {
    fn from(err: serde_json::Error) -> Self {
        StrideError::Serialization {
            context: "JSON processing".to_string(),
            source: err,
        }
    }
}
