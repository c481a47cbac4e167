use canopy_text::TextError;
use thiserror::Error;

/// Errors raised by positional queries on a syntax tree.
///
/// Structural absence, such as a missing child or sibling, is never an error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The caller passed a malformed argument, e.g. a reversed range.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error(transparent)]
    Text(#[from] TextError),
}

impl TreeError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }
}

/// Result type for tree queries.
pub type TreeResult<T> = Result<T, TreeError>;
