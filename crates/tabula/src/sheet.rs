//! Row-indexed sparse cell store
//!
//! Rows grow on demand; each row is a sparse map from column letter to
//! stored value. The sheet is the host side of the formula engine: it
//! classifies raw input on write and supplies the cell-lookup capability
//! on read.

use crate::error::Result;
use ahash::AHashMap;
use std::cmp::Ordering;
use tabula_core::{CellAddress, Error as CellError};
use tabula_formula::{parse_formula, CellResolver, CellValue, FormulaError, FormulaResult};

/// In-memory sheet: a growable ordered sequence of sparse rows
#[derive(Debug, Default)]
pub struct Sheet {
    rows: Vec<AHashMap<char, CellValue>>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently allocated
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Grow the row list so the 0-based `row` index is addressable
    pub fn ensure_capacity(&mut self, row: usize) {
        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, AHashMap::new);
        }
    }

    /// Store a raw input string at `key`
    ///
    /// The trimmed input is classified in order: integer, float, formula
    /// (leading `=`), literal text. Formulas are parsed eagerly, so a
    /// syntax error anywhere in the formula fails the write. Text keeps
    /// its surrounding whitespace.
    pub fn set_cell(&mut self, key: &str, raw: &str) -> Result<()> {
        let addr = CellAddress::parse(key)?;
        let trimmed = raw.trim();

        let value = if let Ok(n) = trimmed.parse::<i64>() {
            CellValue::Int(n)
        } else if let Ok(x) = trimmed.parse::<f64>() {
            CellValue::Float(x)
        } else if trimmed.starts_with('=') {
            CellValue::Formula(parse_formula(trimmed)?)
        } else {
            CellValue::Text(raw.to_string())
        };

        log::debug!("set {} from raw input ({} bytes)", addr, raw.len());
        self.ensure_capacity(addr.row as usize);
        self.rows[addr.row as usize].insert(addr.col, value);
        Ok(())
    }

    /// Computed value at `key`
    ///
    /// Scalars return as stored; a formula cell recomputes from the
    /// current contents of the cells it references, every time.
    pub fn get_cell(&self, key: &str) -> Result<CellValue> {
        match self.stored(key)? {
            CellValue::Formula(formula) => Ok(formula.compute(self)?),
            value => Ok(value.clone()),
        }
    }

    /// Raw stored value at `key`, without computing formulas
    pub fn stored(&self, key: &str) -> Result<&CellValue> {
        let addr = CellAddress::parse(key)?;
        self.value_at(&addr)
            .ok_or_else(|| CellError::MissingCell(addr.to_string()).into())
    }

    /// Stably reorder rows by their value in column `col`
    ///
    /// Rows holding a value in `col` move to the front, ordered by that
    /// value (numbers numerically, then text lexicographically; formulas
    /// by their computed value). Rows lacking one keep their relative
    /// order at the back, also when `reverse` flips the sorted ordering.
    pub fn sort_by_column(&mut self, col: char, reverse: bool) -> Result<()> {
        if !col.is_ascii_uppercase() {
            return Err(CellError::MalformedKey(format!(
                "expected an uppercase column letter A-Z, got '{}'",
                col
            ))
            .into());
        }

        let keys: Vec<Option<SortKey>> =
            (0..self.rows.len()).map(|row| self.sort_key(row, col)).collect();

        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by(|&a, &b| match (&keys[a], &keys[b]) {
            (Some(x), Some(y)) => {
                let ordering = x.compare(y);
                if reverse {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        log::debug!("sort by column {} over {} rows", col, self.rows.len());
        let mut old = std::mem::take(&mut self.rows);
        self.rows = order
            .into_iter()
            .map(|row| std::mem::take(&mut old[row]))
            .collect();
        Ok(())
    }

    fn value_at(&self, addr: &CellAddress) -> Option<&CellValue> {
        self.rows
            .get(addr.row as usize)
            .and_then(|row| row.get(&addr.col))
    }

    /// Sort key for one row, or None when the row lacks a usable value
    fn sort_key(&self, row: usize, col: char) -> Option<SortKey> {
        let computed = match self.rows[row].get(&col)? {
            CellValue::Formula(formula) => match formula.compute(self) {
                Ok(value) => value,
                Err(err) => {
                    log::debug!("row {} column {} failed to compute: {}", row, col, err);
                    return None;
                }
            },
            value => value.clone(),
        };
        match computed {
            CellValue::Int(n) => Some(SortKey::Number(n as f64)),
            CellValue::Float(x) => Some(SortKey::Number(x)),
            CellValue::Text(s) => Some(SortKey::Text(s)),
            CellValue::Formula(_) => None,
        }
    }
}

impl CellResolver for Sheet {
    fn resolve(&self, key: &str) -> FormulaResult<CellValue> {
        let addr = CellAddress::parse(key).map_err(FormulaError::from)?;
        self.value_at(&addr)
            .cloned()
            .ok_or_else(|| FormulaError::Cell(CellError::MissingCell(addr.to_string())))
    }
}

/// Ordering key for [`Sheet::sort_by_column`]: numbers sort before text
#[derive(Debug)]
enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
        }
    }
}
