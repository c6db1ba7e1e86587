use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContextError {
    /// Context id does not name one of the known database contexts.
    #[error("Invalid context value {0}. Must be 0-2.")]
    UnknownId(i64),

    /// Context name does not name one of the known database contexts.
    #[error("Invalid context name \"{0}\". Must be one of primary, audit, analytics.")]
    UnknownName(String),
}
