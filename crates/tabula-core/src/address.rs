//! Cell address parsing and display

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "C12")
///
/// Keys are a single uppercase column letter followed by a 1-based row
/// number. Rows are stored 0-based internally and rendered 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column letter (A-Z)
    pub col: char,
}

impl CellAddress {
    /// Create a new cell address from a 0-based row index and column letter
    pub fn new(row: u32, col: char) -> Self {
        Self { row, col }
    }

    /// Parse a cell key in `<letter><digits>` notation
    ///
    /// # Examples
    /// ```
    /// use tabula_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!(addr.row, 0);
    /// assert_eq!(addr.col, 'A');
    ///
    /// assert!(CellAddress::parse("b3").is_err());
    /// assert!(CellAddress::parse("23").is_err());
    /// assert!(CellAddress::parse("A0").is_err());
    /// ```
    pub fn parse(key: &str) -> Result<Self> {
        if key.len() < 2 {
            return Err(Error::MalformedKey(format!(
                "'{}' is shorter than two characters",
                key
            )));
        }

        let mut chars = key.chars();
        let col = chars.next().ok_or_else(|| {
            Error::MalformedKey(format!("'{}' has no column letter", key))
        })?;
        if !col.is_ascii_uppercase() {
            return Err(Error::MalformedKey(format!(
                "expected an uppercase column letter A-Z in '{}'",
                key
            )));
        }

        let row: i64 = chars.as_str().parse().map_err(|_| {
            Error::MalformedKey(format!("expected an integer row number in '{}'", key))
        })?;

        // Rows are 1-based externally; 0-based internally
        if row <= 0 {
            return Err(Error::MalformedKey(format!(
                "row number must be >= 1 in '{}'",
                key
            )));
        }
        let row = u32::try_from(row - 1)
            .map_err(|_| Error::MalformedKey(format!("row number out of range in '{}'", key)))?;

        Ok(Self { row, col })
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col, self.row + 1)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
