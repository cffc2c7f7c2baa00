//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Character the tokenizer cannot start or continue a token with
    #[error("Unexpected token in formula: '{0}'")]
    UnexpectedToken(char),

    /// Cell reference token that is not letters followed by digits
    #[error("Malformed cell key: {0}")]
    MalformedCellKey(String),

    /// Symbol stream that does not fold into a single expression tree
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    /// Operator applied to operand kinds outside the coercion table
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Division with a zero denominator
    #[error("Division by zero")]
    DivisionByZero,

    /// A chain of cell references that revisits a cell
    #[error("Cyclic reference through cell {0}")]
    CyclicReference(String),

    /// Error from the cell store during reference resolution
    #[error(transparent)]
    Cell(#[from] tabula_core::Error),
}
