//! Tests for formula evaluation through the sheet store

use tabula::prelude::*;

fn demo_sheet() -> Sheet {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "3").unwrap();
    sheet.set_cell("A2", "2").unwrap();
    sheet.set_cell("A3", "a").unwrap();
    sheet
}

#[test]
fn test_arithmetic_through_references() {
    let mut sheet = demo_sheet();
    sheet.set_cell("A4", "=A1+A2").unwrap();
    sheet.set_cell("A8", "=A1-A2").unwrap();
    sheet.set_cell("A9", "=A1*A2").unwrap();
    sheet.set_cell("A10", "=A1/A1").unwrap();

    assert_eq!(sheet.get_cell("A1").unwrap(), CellValue::Int(3));
    assert_eq!(sheet.get_cell("A4").unwrap(), CellValue::Int(5));
    assert_eq!(sheet.get_cell("A8").unwrap(), CellValue::Int(1));
    assert_eq!(sheet.get_cell("A9").unwrap(), CellValue::Int(6));
    // Integer division still produces a floating quotient
    assert_eq!(sheet.get_cell("A10").unwrap(), CellValue::Float(1.0));
}

#[test]
fn test_precedence_and_grouping() {
    let mut sheet = demo_sheet();
    sheet.set_cell("A11", "=A1+A2*A2").unwrap();
    sheet.set_cell("A12", "=(A1+A2)*A2").unwrap();

    // Multiplication binds tighter; parentheses override
    assert_eq!(sheet.get_cell("A11").unwrap(), CellValue::Int(7));
    assert_eq!(sheet.get_cell("A12").unwrap(), CellValue::Int(10));
}

#[test]
fn test_text_concatenation_chains() {
    let mut sheet = demo_sheet();
    sheet.set_cell("A6", "=A3+A3").unwrap();
    sheet.set_cell("A7", "=A6+A3").unwrap();

    assert_eq!(sheet.get_cell("A6").unwrap(), CellValue::text("aa"));
    assert_eq!(sheet.get_cell("A7").unwrap(), CellValue::text("aaa"));
}

#[test]
fn test_mixed_types_fail_at_read_time() {
    let mut sheet = demo_sheet();
    // Parsing succeeds at write time; the mismatch only shows on read
    sheet.set_cell("A5", "=A1+A3").unwrap();
    assert!(matches!(
        sheet.get_cell("A5"),
        Err(Error::Formula(FormulaError::TypeMismatch(_)))
    ));
}

#[test]
fn test_negation() {
    let mut sheet = demo_sheet();
    sheet.set_cell("A12", "=(A1+A2)*A2").unwrap();

    sheet.set_cell("A14", "=-A1").unwrap();
    assert_eq!(sheet.get_cell("A14").unwrap(), CellValue::Int(-3));

    sheet.set_cell("A13", "=-A12").unwrap();
    assert_eq!(sheet.get_cell("A13").unwrap(), CellValue::Int(-10));

    sheet.set_cell("A13", "=-(A12+A12)").unwrap();
    assert_eq!(sheet.get_cell("A13").unwrap(), CellValue::Int(-20));

    sheet.set_cell("A13", "=-A12+A12").unwrap();
    assert_eq!(sheet.get_cell("A13").unwrap(), CellValue::Int(0));

    sheet.set_cell("A13", "=-(A12)+A12").unwrap();
    assert_eq!(sheet.get_cell("A13").unwrap(), CellValue::Int(0));
}

#[test]
fn test_negating_text_fails() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A12", "a").unwrap();
    sheet.set_cell("A13", "=-A12").unwrap();
    assert!(matches!(
        sheet.get_cell("A13"),
        Err(Error::Formula(FormulaError::TypeMismatch(_)))
    ));
}

#[test]
fn test_whitespace_tolerance() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "2").unwrap();

    sheet.set_cell("A2", " =A1").unwrap();
    assert_eq!(sheet.get_cell("A2").unwrap(), CellValue::Int(2));

    sheet.set_cell("A2", "= A1").unwrap();
    assert_eq!(sheet.get_cell("A2").unwrap(), CellValue::Int(2));

    sheet.set_cell("A2", " =A1 +A1").unwrap();
    assert_eq!(sheet.get_cell("A2").unwrap(), CellValue::Int(4));

    sheet.set_cell("A2", "=A1 + A1").unwrap();
    assert_eq!(sheet.get_cell("A2").unwrap(), CellValue::Int(4));
}

#[test]
fn test_float_promotion() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "3.4").unwrap();
    assert_eq!(sheet.get_cell("A1").unwrap(), CellValue::Float(3.4));

    sheet.set_cell("A2", "2.3").unwrap();
    sheet.set_cell("A3", "=A1+A2").unwrap();
    assert_eq!(sheet.get_cell("A3").unwrap(), CellValue::Float(3.4 + 2.3));

    // Int literals promote when the other side is a float
    sheet.set_cell("A3", "=A1+2").unwrap();
    assert_eq!(sheet.get_cell("A3").unwrap(), CellValue::Float(3.4 + 2.0));

    sheet.set_cell("A3", "=A1+2.3").unwrap();
    assert_eq!(sheet.get_cell("A3").unwrap(), CellValue::Float(3.4 + 2.3));
}

#[test]
fn test_formula_chains_recompute_on_read() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "1").unwrap();
    sheet.set_cell("A2", "=A1+1").unwrap();
    sheet.set_cell("A3", "=A2+1").unwrap();
    sheet.set_cell("A4", "=A3+1").unwrap();
    assert_eq!(sheet.get_cell("A4").unwrap(), CellValue::Int(4));

    // No caching: a rewrite at the chain's root shows on the next read
    sheet.set_cell("A1", "10").unwrap();
    assert_eq!(sheet.get_cell("A4").unwrap(), CellValue::Int(13));
}

#[test]
fn test_reparse_computes_identically() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "3").unwrap();
    sheet.set_cell("A2", "2").unwrap();

    sheet.set_cell("A4", "=(A1+A2)*A2").unwrap();
    let first = sheet.get_cell("A4").unwrap();
    sheet.set_cell("A4", "=(A1+A2)*A2").unwrap();
    assert_eq!(sheet.get_cell("A4").unwrap(), first);
}

#[test]
fn test_division_by_zero() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "1").unwrap();
    sheet.set_cell("A2", "0").unwrap();
    sheet.set_cell("A3", "=A1/A2").unwrap();
    assert!(matches!(
        sheet.get_cell("A3"),
        Err(Error::Formula(FormulaError::DivisionByZero))
    ));
}

#[test]
fn test_cyclic_references_fail_fast() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "=A2").unwrap();
    sheet.set_cell("A2", "=A1").unwrap();
    assert!(matches!(
        sheet.get_cell("A1"),
        Err(Error::Formula(FormulaError::CyclicReference(_)))
    ));

    // Breaking the cycle makes the chain readable again
    sheet.set_cell("A2", "1").unwrap();
    assert_eq!(sheet.get_cell("A1").unwrap(), CellValue::Int(1));
}

#[test]
fn test_self_reference_fails_fast() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "=A1+1").unwrap();
    assert!(matches!(
        sheet.get_cell("A1"),
        Err(Error::Formula(FormulaError::CyclicReference(_)))
    ));
}

#[test]
fn test_missing_reference_surfaces_on_read() {
    let mut sheet = Sheet::new();
    sheet.set_cell("A1", "=Z99").unwrap();
    assert!(matches!(
        sheet.get_cell("A1"),
        Err(Error::Formula(FormulaError::Cell(_)))
    ));
}

#[test]
fn test_nested_groups_parse_eagerly() {
    let mut sheet = Sheet::new();
    // A syntax error inside a nested group fails the write, not the read
    assert!(matches!(
        sheet.set_cell("A1", "=(A2+)*2"),
        Err(Error::Formula(FormulaError::MalformedExpression(_)))
    ));
    assert!(sheet.set_cell("A1", "=((2+3)*(4+1))/5").is_ok());
    assert_eq!(sheet.get_cell("A1").unwrap(), CellValue::Float(5.0));
}
