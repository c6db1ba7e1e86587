use fakerepo::{ContextError, DbContext};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while building or finalizing a fake repository.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TestError {
    /// Context passed to a finalizer does not name a known database context.
    #[error(transparent)]
    InvalidContext(#[from] ContextError),

    /// Accessor was unwrapped as the repository of a different context.
    #[error("Accessor for {found} context cannot be used as {expected} repository")]
    AccessorMismatch {
        expected: DbContext,
        found: DbContext,
    },

    /// Override names a property the model does not expose.
    #[error("Property `{property}` does not exist on {model}")]
    PropertyNotFound {
        model: &'static str,
        property: String,
    },

    /// Override value type differs from the property's declared type.
    #[error("Property `{property}` on {model} is {expected}, got {actual}")]
    TypeMismatch {
        model: &'static str,
        property: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Setter table registers the same property name twice.
    #[error("Property `{property}` is registered more than once for {model}")]
    DuplicateProperty {
        model: &'static str,
        property: &'static str,
    },

    /// Record type refers back to a type still under construction.
    ///
    /// Raised only when circular references are not ignored. Build the repository with
    /// `ignore_circular_references` set to omit the back-reference instead.
    #[error("Circular reference detected: {path}")]
    CircularReference { path: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
