//! Formula expression tree types

use crate::error::FormulaResult;
use crate::evaluator::{CellResolver, Evaluator};
use crate::value::CellValue;
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    /// The operator's source character
    pub fn symbol(&self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }

    /// Map an arithmetic character to its operator
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(BinaryOperator::Add),
            '-' => Some(BinaryOperator::Subtract),
            '*' => Some(BinaryOperator::Multiply),
            '/' => Some(BinaryOperator::Divide),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Formula expression tree
///
/// Built once at parse time and immutable afterwards. Every node is owned
/// by exactly one parent; nothing is shared or cyclic.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Whole-number literal
    Int(i64),
    /// Floating-point literal
    Float(f64),
    /// Reference to another cell, resolved lazily at evaluation time
    CellRef(String),
    /// Unary negation of a sub-expression
    Negate(Box<Expr>),
    /// Binary operation over two sub-expressions
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// A parsed formula: an owned expression tree plus an outer negation flag
///
/// The flag mirrors a minus applied to the whole formula and is applied to
/// the final computed value; negation written inside the formula text
/// becomes [`Expr::Negate`] nodes instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expr: Expr,
    negated: bool,
}

impl Formula {
    /// Wrap an expression tree in a non-negated formula
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            negated: false,
        }
    }

    /// Wrap an expression tree, negating the computed result
    pub fn negated(expr: Expr) -> Self {
        Self {
            expr,
            negated: true,
        }
    }

    /// Root of the owned expression tree
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Whether the computed value is negated before being returned
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Compute the formula's current value against `cells`
    ///
    /// Re-walks the whole tree on every call; nothing is cached, so the
    /// result tracks the current contents of referenced cells.
    pub fn compute(&self, cells: &dyn CellResolver) -> FormulaResult<CellValue> {
        Evaluator::new(cells).compute(self)
    }
}
