#![allow(dead_code)]

use seriesql::ast::SelectStatement;
use seriesql::{Expr, Parser, Query, Statement};

pub fn parse_query(input: &str) -> Query {
    Parser::new(input)
        .parse_query()
        .unwrap_or_else(|e| panic!("failed to parse: {input}\nerror: {e}"))
}

pub fn parse(input: &str) -> Statement {
    Parser::new(input)
        .parse_statement()
        .unwrap_or_else(|e| panic!("failed to parse: {input}\nerror: {e}"))
}

/// Parses a statement expected to fail and returns the rendered
/// diagnostic.
pub fn parse_err(input: &str) -> String {
    Parser::new(input)
        .parse_statement()
        .expect_err(&format!("expected parse error for: {input}"))
        .to_string()
}

pub fn parse_select(input: &str) -> SelectStatement {
    match parse(input) {
        Statement::Select(s) => s,
        other => panic!("expected SELECT, got {other:?}"),
    }
}

pub fn parse_expr(input: &str) -> Expr {
    Parser::new(input)
        .parse_expr()
        .unwrap_or_else(|e| panic!("failed to parse expr: {input}\nerror: {e}"))
}

pub fn parse_expr_err(input: &str) -> String {
    Parser::new(input)
        .parse_expr()
        .expect_err(&format!("expected expr parse error for: {input}"))
        .to_string()
}

/// Verifies that rendering reaches a fixed point: the statement's
/// `to_string()` re-parses to the same string.
pub fn round_trip(input: &str) {
    let first = parse(input).to_string();
    let second = parse(&first).to_string();
    assert_eq!(
        first, second,
        "round-trip failed.\n  input:  {input}\n  first:  {first}\n  second: {second}"
    );
}
