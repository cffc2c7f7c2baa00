//! Formula parser
//!
//! Parsing runs in two phases: a single left-to-right scan flattens the
//! text after the leading `=` into a symbol stream of operands and
//! operator characters, then two reduction passes fold the stream into a
//! binary expression tree (`*`/`/` binding tighter than `+`/`-`).

use crate::ast::{BinaryOperator, Expr, Formula};
use crate::error::{FormulaError, FormulaResult};

/// Parse a formula string into a [`Formula`]
///
/// The input must begin with `=` after trimming surrounding whitespace.
/// Parenthesized groups are parsed eagerly, so a syntax error anywhere in
/// the text fails the whole parse.
///
/// # Example
/// ```rust
/// use tabula_formula::parse_formula;
///
/// let formula = parse_formula("=A1+A2*A2").unwrap();
/// let same = parse_formula("= A1 + A2 * A2").unwrap();
/// assert_eq!(formula, same);
/// ```
pub fn parse_formula(text: &str) -> FormulaResult<Formula> {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix('=').ok_or_else(|| {
        FormulaError::MalformedExpression("formula must start with '='".into())
    })?;

    let symbols = FormulaParser::new(body).scan_symbols()?;
    Ok(Formula::new(fold_symbols(symbols)?))
}

/// One entry in the flattened symbol stream
#[derive(Debug)]
enum Symbol {
    Operand(Expr),
    Op(BinaryOperator),
}

/// Tokenizing scanner over the text following the leading `=`
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Flatten the input into operands and operator symbols
    fn scan_symbols(&mut self) -> FormulaResult<Vec<Symbol>> {
        let mut symbols = Vec::new();
        let mut negate_pending = false;

        while let Some(c) = self.peek_char() {
            if c == ' ' {
                self.advance();
                continue;
            }

            if c == '(' {
                let negate = std::mem::take(&mut negate_pending);
                let group = self.parse_group()?;
                symbols.push(Symbol::Operand(negate_expr(group, negate)));
                continue;
            }

            if let Some(op) = BinaryOperator::from_char(c) {
                // A minus (or plus) where a binary operator cannot appear
                // marks the next operand as negated
                if matches!(c, '-' | '+') && self.at_operand_position() && !negate_pending {
                    negate_pending = true;
                } else {
                    symbols.push(Symbol::Op(op));
                }
                self.advance();
                continue;
            }

            if c.is_ascii_uppercase() {
                let negate = std::mem::take(&mut negate_pending);
                let key = self.scan_cell_key()?;
                symbols.push(Symbol::Operand(negate_expr(Expr::CellRef(key), negate)));
                continue;
            }

            if c.is_ascii_digit() {
                let negate = std::mem::take(&mut negate_pending);
                let literal = self.scan_number(negate)?;
                symbols.push(Symbol::Operand(literal));
                continue;
            }

            return Err(FormulaError::UnexpectedToken(c));
        }

        Ok(symbols)
    }

    /// Parse a parenthesized group as a fresh sub-formula
    ///
    /// The matching closer is found by explicit depth tracking, so groups
    /// nest arbitrarily deep.
    fn parse_group(&mut self) -> FormulaResult<Expr> {
        let start = self.pos + 1;
        let mut depth = 1usize;
        let mut close = None;
        for (offset, c) in self.input[start..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(start + offset);
                        break;
                    }
                }
                _ => {}
            }
        }
        let close = close.ok_or_else(|| {
            FormulaError::MalformedExpression("unbalanced parentheses".into())
        })?;

        let symbols = FormulaParser::new(&self.input[start..close]).scan_symbols()?;
        self.pos = close + 1;
        fold_symbols(symbols)
    }

    /// Scan a cell reference: letters then digits, up to a token boundary
    fn scan_cell_key(&mut self) -> FormulaResult<String> {
        let start = self.pos;
        self.advance_while(|c| c.is_ascii_uppercase());

        let digits_start = self.pos;
        self.advance_while(|c| c.is_ascii_digit());
        if self.pos == digits_start {
            return Err(FormulaError::MalformedCellKey(format!(
                "expected at least one digit after '{}'",
                &self.input[start..self.pos]
            )));
        }

        if let Some(c) = self.offending_boundary() {
            return Err(FormulaError::MalformedCellKey(format!(
                "unexpected character '{}' after '{}'",
                c,
                &self.input[start..self.pos]
            )));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    /// Scan a numeric literal: digits with an optional fractional part
    ///
    /// Yields an [`Expr::Int`] when no decimal point appears, otherwise an
    /// [`Expr::Float`]; `negate` folds into the literal's sign.
    fn scan_number(&mut self, negate: bool) -> FormulaResult<Expr> {
        let start = self.pos;
        self.advance_while(|c| c.is_ascii_digit());

        let mut is_float = false;
        if self.peek_char() == Some('.') {
            self.advance();
            let fraction_start = self.pos;
            self.advance_while(|c| c.is_ascii_digit());
            if self.pos == fraction_start {
                return Err(match self.peek_char() {
                    Some(c) => FormulaError::UnexpectedToken(c),
                    None => FormulaError::MalformedExpression(
                        "expected digits after decimal point".into(),
                    ),
                });
            }
            is_float = true;
        }

        if let Some(c) = self.offending_boundary() {
            return Err(FormulaError::UnexpectedToken(c));
        }

        let text = &self.input[start..self.pos];
        if is_float {
            let value: f64 = text.parse().map_err(|_| {
                FormulaError::MalformedExpression(format!("invalid numeric literal '{}'", text))
            })?;
            Ok(Expr::Float(if negate { -value } else { value }))
        } else if let Ok(value) = text.parse::<i64>() {
            Ok(Expr::Int(if negate { -value } else { value }))
        } else {
            // Literals wider than i64 fall back to floating point
            let value: f64 = text.parse().map_err(|_| {
                FormulaError::MalformedExpression(format!("invalid numeric literal '{}'", text))
            })?;
            Ok(Expr::Float(if negate { -value } else { value }))
        }
    }

    /// The character after the current token when it is not a valid
    /// boundary (end of input, `)`, an arithmetic character, or a space)
    fn offending_boundary(&self) -> Option<char> {
        match self.peek_char() {
            None | Some(')') | Some(' ') => None,
            Some(c) if BinaryOperator::from_char(c).is_some() => None,
            Some(c) => Some(c),
        }
    }

    /// Whether the current position can only hold an operand
    ///
    /// True at the start of the formula and directly after an arithmetic
    /// character; spaces in between defeat the check, matching the raw
    /// preceding-character rule.
    fn at_operand_position(&self) -> bool {
        match self.input[..self.pos].chars().next_back() {
            None => true,
            Some(c) => BinaryOperator::from_char(c).is_some(),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn advance_while(&mut self, keep: impl Fn(char) -> bool) {
        while self.peek_char().map_or(false, &keep) {
            self.advance();
        }
    }
}

fn negate_expr(expr: Expr, negate: bool) -> Expr {
    if negate {
        Expr::Negate(Box::new(expr))
    } else {
        expr
    }
}

/// Fold a flat symbol stream into a single expression tree
///
/// Two sequential reduction passes: `*`/`/` first, then `+`/`-`. Each pass
/// reduces left-to-right, so operator chains associate to the left.
fn fold_symbols(symbols: Vec<Symbol>) -> FormulaResult<Expr> {
    let symbols = reduce_ops(
        symbols,
        &[BinaryOperator::Multiply, BinaryOperator::Divide],
    )?;
    let mut symbols = reduce_ops(symbols, &[BinaryOperator::Add, BinaryOperator::Subtract])?;

    if symbols.len() != 1 {
        return Err(FormulaError::MalformedExpression(format!(
            "expected a single expression, found {} symbols",
            symbols.len()
        )));
    }
    match symbols.pop() {
        Some(Symbol::Operand(expr)) => Ok(expr),
        _ => Err(FormulaError::MalformedExpression(
            "expression reduces to a bare operator".into(),
        )),
    }
}

/// One reduction pass: combine every operator in `ops` with the operands
/// on either side of it
fn reduce_ops(symbols: Vec<Symbol>, ops: &[BinaryOperator]) -> FormulaResult<Vec<Symbol>> {
    let mut reduced: Vec<Symbol> = Vec::with_capacity(symbols.len());
    let mut rest = symbols.into_iter();

    while let Some(symbol) = rest.next() {
        match symbol {
            Symbol::Op(op) if ops.contains(&op) => {
                let left = match reduced.pop() {
                    Some(Symbol::Operand(expr)) => expr,
                    Some(Symbol::Op(other)) => {
                        return Err(FormulaError::MalformedExpression(format!(
                            "operator '{}' cannot be an operand of '{}'",
                            other, op
                        )))
                    }
                    None => {
                        return Err(FormulaError::MalformedExpression(format!(
                            "operator '{}' is missing a left operand",
                            op
                        )))
                    }
                };
                let right = match rest.next() {
                    Some(Symbol::Operand(expr)) => expr,
                    Some(Symbol::Op(other)) => {
                        return Err(FormulaError::MalformedExpression(format!(
                            "operator '{}' cannot be an operand of '{}'",
                            other, op
                        )))
                    }
                    None => {
                        return Err(FormulaError::MalformedExpression(format!(
                            "operator '{}' is missing a right operand",
                            op
                        )))
                    }
                };
                reduced.push(Symbol::Operand(Expr::BinaryOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                }));
            }
            other => reduced.push(other),
        }
    }

    Ok(reduced)
}
