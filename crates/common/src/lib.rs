//! Common types and utilities for the Model Proto Generator
//!
//! This crate contains the model registry data structures, the method and
//! message specifications attached to models, and the error types shared
//! by the parser, generator, and CLI components.

mod model;
mod ordered_map;

pub use model::{
    AppDescriptor, FieldDescriptor, MessageFields, MessageRef, MessageSpec, MethodSpec,
    ModelDescriptor, ModelRegistry, DEFAULT_PK,
};
pub use ordered_map::OrderedMap;

use thiserror::Error;

/// Errors that can occur during proto generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Unknown scope: {0}")]
    UnknownScope(String),

    #[error("Field '{field}' referenced by message '{message}' does not exist on model '{model}'")]
    UnknownField {
        model: String,
        message: String,
        field: String,
    },

    #[error("Invalid {kind} identifier: '{name}'")]
    InvalidIdentifier { kind: &'static str, name: String },

    #[error("Duplicate message definition: {0}")]
    DuplicateMessage(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_message() {
        let err = GeneratorError::UnknownField {
            model: "Book".to_string(),
            message: "BookSummary".to_string(),
            field: "isbn".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Field 'isbn' referenced by message 'BookSummary' does not exist on model 'Book'"
        );
    }

    #[test]
    fn test_unknown_scope_message() {
        let err = GeneratorError::UnknownScope("library.Author".to_string());
        assert_eq!(err.to_string(), "Unknown scope: library.Author");
    }
}
