//! Error types for tabula-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the cell store
#[derive(Debug, Error)]
pub enum Error {
    /// Cell key is not a column letter followed by a 1-based row number
    #[error("Malformed cell key: {0}")]
    MalformedKey(String),

    /// Lookup of an address with no stored value
    #[error("No value stored at cell {0}")]
    MissingCell(String),
}
