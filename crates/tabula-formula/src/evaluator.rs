//! Formula evaluator
//!
//! Walks expression trees bottom-up, resolving cell-reference leaves
//! through a [`CellResolver`] supplied by the host store. Nothing is
//! memoized: every compute re-reads the cells it depends on.

use crate::ast::{Expr, Formula};
use crate::error::{FormulaError, FormulaResult};
use crate::value::CellValue;
use ahash::AHashSet;
use tabula_core::CellAddress;

/// Cell-lookup capability consumed by the evaluator
///
/// `resolve` returns the raw stored value for a key. The evaluator drives
/// recursion into any formula it receives, so implementations must hand
/// back formulas unevaluated.
pub trait CellResolver {
    /// Raw stored value for `key`
    fn resolve(&self, key: &str) -> FormulaResult<CellValue>;
}

/// Evaluate `formula` against `cells`
pub fn evaluate(formula: &Formula, cells: &dyn CellResolver) -> FormulaResult<CellValue> {
    formula.compute(cells)
}

/// Tree-walking evaluator with in-flight cycle detection
///
/// Tracks the cell keys currently being expanded; revisiting one fails
/// fast with [`FormulaError::CyclicReference`] instead of recursing until
/// the stack overflows.
pub struct Evaluator<'a> {
    cells: &'a dyn CellResolver,
    visiting: AHashSet<String>,
}

impl<'a> Evaluator<'a> {
    pub fn new(cells: &'a dyn CellResolver) -> Self {
        Self {
            cells,
            visiting: AHashSet::new(),
        }
    }

    /// Compute a formula's value, applying its outer negation flag
    pub fn compute(&mut self, formula: &Formula) -> FormulaResult<CellValue> {
        let value = self.eval(formula.expr())?;
        if formula.is_negated() {
            value.negate()
        } else {
            Ok(value)
        }
    }

    fn eval(&mut self, expr: &Expr) -> FormulaResult<CellValue> {
        match expr {
            Expr::Int(n) => Ok(CellValue::Int(*n)),
            Expr::Float(x) => Ok(CellValue::Float(*x)),
            Expr::CellRef(key) => self.resolve_ref(key),
            Expr::Negate(inner) => self.eval(inner)?.negate(),
            Expr::BinaryOp { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                left.apply(*op, &right)
            }
        }
    }

    fn resolve_ref(&mut self, key: &str) -> FormulaResult<CellValue> {
        // Track keys in canonical form so "A01" and "A1" count as one cell;
        // an unparseable key passes through for the resolver to report
        let canonical = match CellAddress::parse(key) {
            Ok(addr) => addr.to_string(),
            Err(_) => key.to_string(),
        };
        if !self.visiting.insert(canonical.clone()) {
            return Err(FormulaError::CyclicReference(canonical));
        }
        log::trace!("resolving cell {}", canonical);

        let result = match self.cells.resolve(key) {
            Ok(CellValue::Formula(formula)) => self.compute(&formula),
            other => other,
        };

        self.visiting.remove(&canonical);
        result
    }
}
