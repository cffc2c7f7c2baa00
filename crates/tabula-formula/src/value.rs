//! Cell value model and coercion rules

use crate::ast::{BinaryOperator, Formula};
use crate::error::{FormulaError, FormulaResult};
use std::fmt;

/// The value stored in, or computed from, a cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Whole number
    Int(i64),
    /// Floating-point number
    Float(f64),
    /// Text
    Text(String),
    /// Parsed formula, recomputed on every read
    Formula(Formula),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if the value is a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula(_))
    }

    /// Try to get the value as a number (Int or Float)
    ///
    /// Text is never treated as a number, even when it looks like one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(n) => Some(*n as f64),
            CellValue::Float(x) => Some(*x),
            CellValue::Text(_) | CellValue::Formula(_) => None,
        }
    }

    /// Apply a binary operator to two computed values
    ///
    /// Consults the coercion table: text concatenates under `+` only;
    /// numerics promote to Float when either side is Float; division is
    /// always a floating quotient. Everything else is a type mismatch.
    pub fn apply(&self, op: BinaryOperator, other: &CellValue) -> FormulaResult<CellValue> {
        use BinaryOperator::{Add, Divide, Multiply, Subtract};
        use CellValue::{Float, Int, Text};

        match (op, self, other) {
            (Add, Text(a), Text(b)) => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Ok(Text(joined))
            }
            (Divide, left, right) => match (left.as_number(), right.as_number()) {
                // Two integers still divide to a floating quotient
                (Some(a), Some(b)) => {
                    if b == 0.0 {
                        Err(FormulaError::DivisionByZero)
                    } else {
                        Ok(Float(a / b))
                    }
                }
                _ => Err(self.mismatch(op, other)),
            },
            // Integer arithmetic stays integral; overflow promotes to Float
            (Add, Int(a), Int(b)) => Ok(a
                .checked_add(*b)
                .map(Int)
                .unwrap_or(Float(*a as f64 + *b as f64))),
            (Subtract, Int(a), Int(b)) => Ok(a
                .checked_sub(*b)
                .map(Int)
                .unwrap_or(Float(*a as f64 - *b as f64))),
            (Multiply, Int(a), Int(b)) => Ok(a
                .checked_mul(*b)
                .map(Int)
                .unwrap_or(Float(*a as f64 * *b as f64))),
            (Add, left, right) => Self::promote(left, right, op, |a, b| a + b),
            (Subtract, left, right) => Self::promote(left, right, op, |a, b| a - b),
            (Multiply, left, right) => Self::promote(left, right, op, |a, b| a * b),
        }
    }

    /// Arithmetic negation; text cannot be negated
    pub fn negate(&self) -> FormulaResult<CellValue> {
        match self {
            CellValue::Int(n) => Ok(n
                .checked_neg()
                .map(CellValue::Int)
                .unwrap_or(CellValue::Float(-(*n as f64)))),
            CellValue::Float(x) => Ok(CellValue::Float(-x)),
            other => Err(FormulaError::TypeMismatch(format!(
                "cannot negate {}",
                other.repr()
            ))),
        }
    }

    fn promote(
        left: &CellValue,
        right: &CellValue,
        op: BinaryOperator,
        combine: impl Fn(f64, f64) -> f64,
    ) -> FormulaResult<CellValue> {
        match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => Ok(CellValue::Float(combine(a, b))),
            _ => Err(left.mismatch(op, right)),
        }
    }

    fn mismatch(&self, op: BinaryOperator, other: &CellValue) -> FormulaError {
        FormulaError::TypeMismatch(format!(
            "cannot apply '{}' to {} and {}",
            op,
            self.repr(),
            other.repr()
        ))
    }

    /// Operand description used in error messages
    fn repr(&self) -> String {
        match self {
            CellValue::Int(n) => format!("integer {}", n),
            CellValue::Float(x) => format!("float {}", x),
            CellValue::Text(s) => format!("text {:?}", s),
            CellValue::Formula(_) => "a formula".to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(n) => write!(f, "{}", n),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Formula(_) => write!(f, "<formula>"),
        }
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Float(x)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BinaryOperator::{Add, Divide, Multiply, Subtract};

    #[test]
    fn test_integer_arithmetic_stays_integral() {
        let three = CellValue::Int(3);
        let two = CellValue::Int(2);

        assert_eq!(three.apply(Add, &two).unwrap(), CellValue::Int(5));
        assert_eq!(three.apply(Subtract, &two).unwrap(), CellValue::Int(1));
        assert_eq!(three.apply(Multiply, &two).unwrap(), CellValue::Int(6));
    }

    #[test]
    fn test_division_is_always_floating() {
        let three = CellValue::Int(3);
        assert_eq!(three.apply(Divide, &three).unwrap(), CellValue::Float(1.0));

        let ten = CellValue::Int(10);
        let four = CellValue::Int(4);
        assert_eq!(ten.apply(Divide, &four).unwrap(), CellValue::Float(2.5));
    }

    #[test]
    fn test_division_by_zero() {
        let one = CellValue::Int(1);
        let zero = CellValue::Int(0);
        assert!(matches!(
            one.apply(Divide, &zero),
            Err(FormulaError::DivisionByZero)
        ));

        let zero_f = CellValue::Float(0.0);
        assert!(matches!(
            one.apply(Divide, &zero_f),
            Err(FormulaError::DivisionByZero)
        ));
    }

    #[test]
    fn test_mixed_numerics_promote_to_float() {
        let a = CellValue::Float(3.4);
        let b = CellValue::Int(2);

        assert_eq!(a.apply(Add, &b).unwrap(), CellValue::Float(5.4));
        assert_eq!(b.apply(Add, &a).unwrap(), CellValue::Float(5.4));
        assert_eq!(a.apply(Multiply, &b).unwrap(), CellValue::Float(6.8));
    }

    #[test]
    fn test_text_concatenation() {
        let a = CellValue::text("a");
        let aa = a.apply(Add, &a).unwrap();
        assert_eq!(aa, CellValue::text("aa"));

        let aaa = aa.apply(Add, &a).unwrap();
        assert_eq!(aaa, CellValue::text("aaa"));
    }

    #[test]
    fn test_text_rejects_other_operators() {
        let a = CellValue::text("a");
        for op in [Subtract, Multiply, Divide] {
            assert!(matches!(
                a.apply(op, &a),
                Err(FormulaError::TypeMismatch(_))
            ));
        }
    }

    #[test]
    fn test_text_and_numeric_never_mix() {
        let n = CellValue::Int(3);
        let s = CellValue::text("a");
        for op in [Add, Subtract, Multiply, Divide] {
            assert!(matches!(
                n.apply(op, &s),
                Err(FormulaError::TypeMismatch(_))
            ));
            assert!(matches!(
                s.apply(op, &n),
                Err(FormulaError::TypeMismatch(_))
            ));
        }
    }

    #[test]
    fn test_numeric_text_is_still_text() {
        // "3" the text never coerces to 3 the number
        let n = CellValue::Int(3);
        let s = CellValue::text("3");
        assert!(matches!(
            n.apply(Add, &s),
            Err(FormulaError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_negate() {
        assert_eq!(CellValue::Int(3).negate().unwrap(), CellValue::Int(-3));
        assert_eq!(
            CellValue::Float(2.5).negate().unwrap(),
            CellValue::Float(-2.5)
        );
        assert!(matches!(
            CellValue::text("a").negate(),
            Err(FormulaError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_overflow_promotes_to_float() {
        let max = CellValue::Int(i64::MAX);
        let one = CellValue::Int(1);
        assert_eq!(
            max.apply(Add, &one).unwrap(),
            CellValue::Float(i64::MAX as f64 + 1.0)
        );
        assert_eq!(
            CellValue::Int(i64::MIN).negate().unwrap(),
            CellValue::Float(-(i64::MIN as f64))
        );
    }

    #[test]
    fn test_conversions() {
        assert_eq!(CellValue::from(42), CellValue::Int(42));
        assert_eq!(CellValue::from(3.14), CellValue::Float(3.14));
        assert_eq!(CellValue::from("hello"), CellValue::text("hello"));
    }
}
