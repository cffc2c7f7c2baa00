//! Prelude module - common imports for tabula users
//!
//! ```rust
//! use tabula::prelude::*;
//! ```

pub use crate::{
    evaluate,
    parse_formula,
    BinaryOperator,
    CellAddress,
    CellResolver,
    CellValue,
    // Error types
    Error,
    Expr,
    Formula,
    FormulaError,
    Result,
    // The store
    Sheet,
};
