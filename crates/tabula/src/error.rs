//! Error type for sheet operations

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by sheet operations
///
/// Both sides stay transparent so callers can match the underlying kind
/// (malformed key, type mismatch, cyclic reference, ...) directly.
#[derive(Debug, Error)]
pub enum Error {
    /// Store-level error (malformed key, missing cell)
    #[error(transparent)]
    Cell(#[from] tabula_core::Error),

    /// Formula parse or evaluation error
    #[error(transparent)]
    Formula(#[from] tabula_formula::FormulaError),
}
