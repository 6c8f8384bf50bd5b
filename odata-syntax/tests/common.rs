#![allow(dead_code)]
//! Shared helpers for `odata-syntax` integration tests.

use odata_syntax::*;

/// Resolves `name`, `age`, `city` and `status` in the `people` scope only.
pub fn people(scope: &str, field: &str) -> Option<String> {
    if scope != "people" {
        return None;
    }
    let physical = match field {
        "name" => "person.full_name",
        "age" => "person.age",
        "city" => "address.city",
        "status" => "status.keyword",
        _ => return None,
    };
    Some(physical.to_string())
}

pub fn parse_ok(input: &str) -> Expr {
    parse_filter(input, "people", &people).unwrap().expr
}

pub fn parse_lenient(input: &str) -> Expr {
    parse_filter_with(input, "people", &people, ParseMode::Lenient)
        .unwrap()
        .expr
}

pub fn parse_err(input: &str) -> ParseError {
    parse_filter(input, "people", &people).unwrap_err()
}

pub fn as_and(expr: &Expr) -> &Vec<Expr> {
    match expr {
        Expr::And(parts) => parts,
        other => panic!("expected And, got: {other:?}"),
    }
}

pub fn as_or(expr: &Expr) -> &Vec<Expr> {
    match expr {
        Expr::Or(parts) => parts,
        other => panic!("expected Or, got: {other:?}"),
    }
}

pub fn as_comparison(expr: &Expr) -> &Comparison {
    match expr {
        Expr::Comparison(c) => c,
        other => panic!("expected Comparison, got: {other:?}"),
    }
}

pub fn comparison_is(expr: &Expr, field: &str, op: CompareOp, value: Literal) {
    let c = as_comparison(expr);
    assert_eq!(c.field, field);
    assert_eq!(c.op, op);
    assert_eq!(c.value, value);
}

pub fn string_value_is(expr: &Expr, expected: &str) {
    match &as_comparison(expr).value {
        Literal::String(s) => assert_eq!(s, expected),
        other => panic!("expected String literal, got: {other:?}"),
    }
}

pub fn number_value_is(expr: &Expr, expected: f64) {
    match &as_comparison(expr).value {
        Literal::Number(n) => assert_eq!(*n, expected),
        other => panic!("expected Number literal, got: {other:?}"),
    }
}

/// Field names of every comparison, left to right.
pub fn fields(expr: &Expr) -> Vec<String> {
    match expr {
        Expr::Comparison(c) => vec![c.field.clone()],
        Expr::And(parts) | Expr::Or(parts) => parts.iter().flat_map(fields).collect(),
    }
}
