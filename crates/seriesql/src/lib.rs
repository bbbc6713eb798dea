//! # seriesql
//!
//! A lexer, recursive-descent parser, and abstract syntax tree for a
//! SQL-flavored time-series query language.
//!
//! The language covers data retrieval (`SELECT` with joins and merges,
//! filters, grouping by time buckets and tags, ordering, limits and
//! offsets), administrative statements (databases, retention policies,
//! continuous queries, users), schema introspection (`SHOW …`), and
//! access control (`GRANT`/`REVOKE`). The parser turns query text into
//! a typed tree of statements and expressions; executing that tree is
//! the caller's concern.
//!
//! ## Parsing a query
//!
//! ```rust
//! use seriesql::{Parser, Statement};
//!
//! let mut parser = Parser::new(
//!     "SELECT value FROM cpu WHERE host = 'server01' GROUP BY 10m LIMIT 20",
//! );
//! let query = parser.parse_query().unwrap();
//! assert_eq!(query.statements.len(), 1);
//!
//! let Statement::Select(select) = &query.statements[0] else {
//!     panic!("expected a SELECT statement");
//! };
//! assert!(select.condition.is_some());
//! assert_eq!(select.limit, 20);
//! ```
//!
//! ## Parsing a standalone expression
//!
//! ```rust
//! use seriesql::{BinaryOp, Expr, Parser};
//!
//! let expr = Parser::new("value + 3 < 30").parse_expr().unwrap();
//! assert!(matches!(expr, Expr::Binary { op: BinaryOp::Lt, .. }));
//! ```
//!
//! ## Diagnostics
//!
//! Parse failures carry a message and the 1-based position of the
//! offending token; the message text is stable and names the expected
//! alternatives:
//!
//! ```rust
//! use seriesql::Parser;
//!
//! let err = Parser::new("SELECT field1 FROM myseries LIMIT 0")
//!     .parse_statement()
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "LIMIT must be > 0 at line 1, char 35");
//! ```
//!
//! ## Rendering
//!
//! Every AST node implements `Display` and renders canonical query
//! text; re-parsing the rendered text reaches a fixed point.
//!
//! ```rust
//! use seriesql::Parser;
//!
//! let stmt = Parser::new("select *  from  cpu").parse_statement().unwrap();
//! assert_eq!(stmt.to_string(), "SELECT * FROM cpu");
//! ```

pub mod ast;
mod duration;
pub mod lexer;
pub mod parser;
mod quote;

pub use ast::{
    BinaryOp, Dimension, Expr, Field, FunctionCall, Literal, Measurement, Privilege, Query,
    SelectStatement, SortField, Source, Statement, Target, TimeDimensionError,
};
pub use duration::{format_duration, parse_duration, DurationError};
pub use lexer::{Keyword, Pos, Scanner, Token, TokenKind};
pub use parser::{ParseError, Parser};
pub use quote::{quote_ident, quote_string};
