//! # tabula-core
//!
//! Core types for the tabula cell store.
//!
//! This crate provides:
//! - [`CellAddress`] - Cell key parsing and display
//! - [`Error`] - Store-level errors (malformed keys, missing cells)
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::CellAddress;
//!
//! let addr = CellAddress::parse("C12").unwrap();
//! assert_eq!(addr.row, 11);
//! assert_eq!(addr.col, 'C');
//! assert_eq!(addr.to_string(), "C12");
//! ```

pub mod address;
pub mod error;

pub use address::CellAddress;
pub use error::{Error, Result};
