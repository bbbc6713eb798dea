//! Token types for the query-language lexer.

use core::fmt;

use super::Pos;

/// Reserved keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    All,
    Alter,
    And,
    As,
    Asc,
    Begin,
    By,
    Continuous,
    Create,
    Database,
    Databases,
    Default,
    Delete,
    Desc,
    Drop,
    Duration,
    End,
    Exists,
    Explain,
    False,
    Field,
    From,
    Grant,
    Group,
    If,
    In,
    Inner,
    Insert,
    Into,
    Join,
    Key,
    Keys,
    Limit,
    Measurement,
    Measurements,
    Merge,
    Offset,
    On,
    Or,
    Order,
    Password,
    Policies,
    Policy,
    Privileges,
    Queries,
    Query,
    Read,
    Replication,
    Retention,
    Revoke,
    Select,
    Series,
    Show,
    Tag,
    To,
    True,
    User,
    Users,
    Values,
    Where,
    With,
    Write,
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Some(Self::All),
            "ALTER" => Some(Self::Alter),
            "AND" => Some(Self::And),
            "AS" => Some(Self::As),
            "ASC" => Some(Self::Asc),
            "BEGIN" => Some(Self::Begin),
            "BY" => Some(Self::By),
            "CONTINUOUS" => Some(Self::Continuous),
            "CREATE" => Some(Self::Create),
            "DATABASE" => Some(Self::Database),
            "DATABASES" => Some(Self::Databases),
            "DEFAULT" => Some(Self::Default),
            "DELETE" => Some(Self::Delete),
            "DESC" => Some(Self::Desc),
            "DROP" => Some(Self::Drop),
            "DURATION" => Some(Self::Duration),
            "END" => Some(Self::End),
            "EXISTS" => Some(Self::Exists),
            "EXPLAIN" => Some(Self::Explain),
            "FALSE" => Some(Self::False),
            "FIELD" => Some(Self::Field),
            "FROM" => Some(Self::From),
            "GRANT" => Some(Self::Grant),
            "GROUP" => Some(Self::Group),
            "IF" => Some(Self::If),
            "IN" => Some(Self::In),
            "INNER" => Some(Self::Inner),
            "INSERT" => Some(Self::Insert),
            "INTO" => Some(Self::Into),
            "JOIN" => Some(Self::Join),
            "KEY" => Some(Self::Key),
            "KEYS" => Some(Self::Keys),
            "LIMIT" => Some(Self::Limit),
            "MEASUREMENT" => Some(Self::Measurement),
            "MEASUREMENTS" => Some(Self::Measurements),
            "MERGE" => Some(Self::Merge),
            "OFFSET" => Some(Self::Offset),
            "ON" => Some(Self::On),
            "OR" => Some(Self::Or),
            "ORDER" => Some(Self::Order),
            "PASSWORD" => Some(Self::Password),
            "POLICIES" => Some(Self::Policies),
            "POLICY" => Some(Self::Policy),
            "PRIVILEGES" => Some(Self::Privileges),
            "QUERIES" => Some(Self::Queries),
            "QUERY" => Some(Self::Query),
            "READ" => Some(Self::Read),
            "REPLICATION" => Some(Self::Replication),
            "RETENTION" => Some(Self::Retention),
            "REVOKE" => Some(Self::Revoke),
            "SELECT" => Some(Self::Select),
            "SERIES" => Some(Self::Series),
            "SHOW" => Some(Self::Show),
            "TAG" => Some(Self::Tag),
            "TO" => Some(Self::To),
            "TRUE" => Some(Self::True),
            "USER" => Some(Self::User),
            "USERS" => Some(Self::Users),
            "VALUES" => Some(Self::Values),
            "WHERE" => Some(Self::Where),
            "WITH" => Some(Self::With),
            "WRITE" => Some(Self::Write),
            _ => None,
        }
    }

    /// Returns the canonical (uppercase) spelling of the keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Alter => "ALTER",
            Self::And => "AND",
            Self::As => "AS",
            Self::Asc => "ASC",
            Self::Begin => "BEGIN",
            Self::By => "BY",
            Self::Continuous => "CONTINUOUS",
            Self::Create => "CREATE",
            Self::Database => "DATABASE",
            Self::Databases => "DATABASES",
            Self::Default => "DEFAULT",
            Self::Delete => "DELETE",
            Self::Desc => "DESC",
            Self::Drop => "DROP",
            Self::Duration => "DURATION",
            Self::End => "END",
            Self::Exists => "EXISTS",
            Self::Explain => "EXPLAIN",
            Self::False => "FALSE",
            Self::Field => "FIELD",
            Self::From => "FROM",
            Self::Grant => "GRANT",
            Self::Group => "GROUP",
            Self::If => "IF",
            Self::In => "IN",
            Self::Inner => "INNER",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Join => "JOIN",
            Self::Key => "KEY",
            Self::Keys => "KEYS",
            Self::Limit => "LIMIT",
            Self::Measurement => "MEASUREMENT",
            Self::Measurements => "MEASUREMENTS",
            Self::Merge => "MERGE",
            Self::Offset => "OFFSET",
            Self::On => "ON",
            Self::Or => "OR",
            Self::Order => "ORDER",
            Self::Password => "PASSWORD",
            Self::Policies => "POLICIES",
            Self::Policy => "POLICY",
            Self::Privileges => "PRIVILEGES",
            Self::Queries => "QUERIES",
            Self::Query => "QUERY",
            Self::Read => "READ",
            Self::Replication => "REPLICATION",
            Self::Retention => "RETENTION",
            Self::Revoke => "REVOKE",
            Self::Select => "SELECT",
            Self::Series => "SERIES",
            Self::Show => "SHOW",
            Self::Tag => "TAG",
            Self::To => "TO",
            Self::True => "TRUE",
            Self::User => "USER",
            Self::Users => "USERS",
            Self::Values => "VALUES",
            Self::Where => "WHERE",
            Self::With => "WITH",
            Self::Write => "WRITE",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of token.
///
/// The literal text lives on [`Token::lit`], preserved verbatim: keyword
/// casing is kept, quoted identifiers retain their surrounding double
/// quotes, and string literals have their quotes stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A scanner failure; the token literal carries the message.
    Illegal,
    /// End of input.
    Eof,
    /// A run of whitespace.
    Ws,
    /// A `--` line comment.
    Comment,

    /// Bare or double-quoted identifier.
    Ident,
    /// Single-quoted string literal.
    Str,
    /// Numeric literal.
    Number,
    /// Unit-suffixed duration literal (e.g. `10h`).
    DurationVal,

    /// A reserved keyword.
    Keyword(Keyword),

    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// =
    Eq,
    /// !=
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,

    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
}

impl TokenKind {
    /// Returns true for whitespace and comment tokens.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Ws | Self::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Illegal => "ILLEGAL",
            Self::Eof => "EOF",
            Self::Ws => "WS",
            Self::Comment => "COMMENT",
            Self::Ident => "IDENT",
            Self::Str => "STRING",
            Self::Number => "NUMBER",
            Self::DurationVal => "DURATION",
            Self::Keyword(kw) => kw.as_str(),
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Dot => ".",
        };
        f.write_str(s)
    }
}

/// A token with its verbatim literal text and source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The literal text as scanned.
    pub lit: String,
    /// The position of the token's first character.
    pub pos: Pos,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, lit: String, pos: Pos) -> Self {
        Self { kind, lit, pos }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }
}

/// Renders the token the way diagnostics name it: the verbatim literal
/// for identifiers and literals, the canonical spelling otherwise.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Ident
            | TokenKind::Str
            | TokenKind::Number
            | TokenKind::DurationVal
            | TokenKind::Illegal => f.write_str(&self.lit),
            _ => write!(f, "{}", self.kind),
        }
    }
}
