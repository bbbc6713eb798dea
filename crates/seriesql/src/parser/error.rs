//! Parser error type and diagnostic templates.
//!
//! Every diagnostic the parser can emit is built here, so the exact
//! message strings consumers match on live in one place.

use thiserror::Error;

use crate::lexer::{Pos, Token};

/// A parse failure: a human-readable message and the position of the
/// offending token's first character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {pos}")]
pub struct ParseError {
    /// The diagnostic message.
    pub message: String,
    /// Where the offending token starts.
    pub pos: Pos,
}

impl ParseError {
    /// Creates a parse error from a message and position.
    #[must_use]
    pub fn new(message: impl Into<String>, pos: Pos) -> Self {
        Self {
            message: message.into(),
            pos,
        }
    }

    /// Builds the `found <tok>, expected <tok1>, <tok2>, …` diagnostic.
    #[must_use]
    pub fn expected(found: &Token, expected: &[&str]) -> Self {
        Self::new(
            format!("found {found}, expected {}", expected.join(", ")),
            found.pos,
        )
    }

    /// `fractional parts not allowed in LIMIT` (and `OFFSET`).
    #[must_use]
    pub fn fractional_not_allowed(clause: &str, pos: Pos) -> Self {
        Self::new(format!("fractional parts not allowed in {clause}"), pos)
    }

    /// `LIMIT must be > 0` (and `OFFSET`).
    #[must_use]
    pub fn must_be_positive(clause: &str, pos: Pos) -> Self {
        Self::new(format!("{clause} must be > 0"), pos)
    }

    /// `unable to parse number`.
    #[must_use]
    pub fn unable_to_parse_number(pos: Pos) -> Self {
        Self::new("unable to parse number", pos)
    }

    /// `unable to parse date`.
    #[must_use]
    pub fn unable_to_parse_date(pos: Pos) -> Self {
        Self::new("unable to parse date", pos)
    }

    /// `unable to parse datetime`.
    #[must_use]
    pub fn unable_to_parse_datetime(pos: Pos) -> Self {
        Self::new("unable to parse datetime", pos)
    }

    /// `number must be an integer`.
    #[must_use]
    pub fn number_must_be_integer(pos: Pos) -> Self {
        Self::new("number must be an integer", pos)
    }

    /// `invalid value <n>: must be 1 <= n <= 2147483647`.
    #[must_use]
    pub fn invalid_replication(lit: &str, pos: Pos) -> Self {
        Self::new(
            format!("invalid value {lit}: must be 1 <= n <= 2147483647"),
            pos,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    #[test]
    fn test_display_appends_position() {
        let err = ParseError::new("unable to parse number", Pos::new(0, 7));
        assert_eq!(err.to_string(), "unable to parse number at line 1, char 8");
    }

    #[test]
    fn test_expected_joins_list() {
        let tok = Token::new(TokenKind::Eof, String::new(), Pos::new(0, 7));
        let err = ParseError::expected(&tok, &["identifier", "string", "number", "bool"]);
        assert_eq!(
            err.to_string(),
            "found EOF, expected identifier, string, number, bool at line 1, char 8"
        );
    }

    #[test]
    fn test_expected_uses_token_literal() {
        let tok = Token::new(TokenKind::Ident, String::from("blah"), Pos::new(0, 0));
        let err = ParseError::expected(&tok, &["SELECT"]);
        assert_eq!(err.to_string(), "found blah, expected SELECT at line 1, char 1");
    }
}
