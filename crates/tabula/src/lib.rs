//! # tabula
//!
//! An in-memory tabular cell store. A cell holds text, an integer, a
//! float, or a formula referencing other cells; reading a formula cell
//! recomputes its value from the current contents of the cells it names,
//! transitively through chains of references.
//!
//! ## Example
//!
//! ```rust
//! use tabula::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell("A1", "3").unwrap();
//! sheet.set_cell("A2", "2").unwrap();
//! sheet.set_cell("A3", "=A1+A2*A2").unwrap();
//!
//! assert_eq!(sheet.get_cell("A3").unwrap(), CellValue::Int(7));
//!
//! // Formulas track their dependencies on every read
//! sheet.set_cell("A1", "10").unwrap();
//! assert_eq!(sheet.get_cell("A3").unwrap(), CellValue::Int(14));
//! ```

pub mod error;
pub mod prelude;
pub mod sheet;

pub use error::{Error, Result};
pub use sheet::Sheet;

// Re-export core types
pub use tabula_core::CellAddress;

// Re-export formula engine types
pub use tabula_formula::{
    evaluate, parse_formula, BinaryOperator, CellResolver, CellValue, Evaluator, Expr, Formula,
    FormulaError,
};
