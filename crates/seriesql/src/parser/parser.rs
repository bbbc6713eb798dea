//! Parser implementation.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use super::error::ParseError;
use super::pratt::{infix_binding_power, token_to_binary_op};
use crate::ast::{
    AlterRetentionPolicyStatement, CreateContinuousQueryStatement, CreateDatabaseStatement,
    CreateRetentionPolicyStatement, CreateUserStatement, DeleteStatement, Dimension,
    DropContinuousQueryStatement, DropDatabaseStatement, DropRetentionPolicyStatement,
    DropSeriesStatement, DropUserStatement, Expr, Field, GrantStatement, Join, Literal,
    Measurement, Merge, Privilege, Query, RevokeStatement, SelectStatement,
    ShowContinuousQueriesStatement, ShowDatabasesStatement, ShowFieldKeysStatement,
    ShowMeasurementsStatement, ShowRetentionPoliciesStatement, ShowSeriesStatement,
    ShowTagKeysStatement, ShowTagValuesStatement, ShowUsersStatement, SortField, Source,
    Statement, Target,
};
use crate::duration::parse_duration;
use crate::lexer::{Keyword, Scanner, Token, TokenKind};

/// A string literal is retried as a datetime when it has at least one
/// character past the date part, and as a date when it is exactly the
/// date part.
static DATETIME_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}.+").expect("valid datetime shape pattern"));
static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date shape pattern"));

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The option clauses shared by the `SHOW …` listing statements.
struct ListClauses {
    source: Option<Source>,
    condition: Option<Expr>,
    sort_fields: Vec<SortField>,
    limit: u64,
    offset: u64,
}

/// A recursive-descent parser for the query language.
///
/// A parser owns its scanner state; construct one instance per
/// concurrent caller.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser over the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            scanner: Scanner::new(input),
        }
    }

    /// Parses the input as a `;`-separated list of statements.
    ///
    /// Empty statements are skipped, so empty input yields a query with
    /// zero statements rather than an error.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered; no recovery is
    /// attempted.
    pub fn parse_query(&mut self) -> Result<Query, ParseError> {
        let mut statements = Vec::new();
        loop {
            let tok = self.scan()?;
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon => {}
                _ => {
                    self.unscan(tok);
                    statements.push(self.parse_statement()?);
                }
            }
        }
        Ok(Query { statements })
    }

    /// Parses exactly one statement.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the unexpected token and the
    /// acceptable ones, positioned at the offending token.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::Keyword(Keyword::Select) => Ok(Statement::Select(self.parse_select()?)),
            TokenKind::Keyword(Keyword::Delete) => Ok(Statement::Delete(self.parse_delete()?)),
            TokenKind::Keyword(Keyword::Show) => self.parse_show(),
            TokenKind::Keyword(Keyword::Drop) => self.parse_drop(),
            TokenKind::Keyword(Keyword::Create) => self.parse_create(),
            TokenKind::Keyword(Keyword::Alter) => self.parse_alter(),
            TokenKind::Keyword(Keyword::Grant) => Ok(Statement::Grant(self.parse_grant()?)),
            TokenKind::Keyword(Keyword::Revoke) => Ok(Statement::Revoke(self.parse_revoke()?)),
            _ => Err(ParseError::expected(&tok, &["SELECT"])),
        }
    }

    /// Parses exactly one expression.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed expressions, including
    /// string literals that look like dates but do not parse as one.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    // --- statements ---

    /// Parses a `SELECT` statement, the leading keyword already
    /// consumed.
    fn parse_select(&mut self) -> Result<SelectStatement, ParseError> {
        let fields = self.parse_fields()?;

        let target = if self.consume_keyword(Keyword::Into)? {
            Some(Target {
                measurement: self.parse_measurement_name()?,
            })
        } else {
            None
        };

        self.expect_keyword(Keyword::From)?;
        let source = self.parse_source()?;

        let condition = self.parse_condition()?;
        let dimensions = self.parse_dimensions()?;
        let sort_fields = self.parse_sort_fields()?;
        let limit = self.parse_row_bound(Keyword::Limit)?;
        let offset = self.parse_row_bound(Keyword::Offset)?;

        Ok(SelectStatement {
            fields,
            target,
            source,
            condition,
            dimensions,
            sort_fields,
            limit,
            offset,
        })
    }

    fn parse_delete(&mut self) -> Result<DeleteStatement, ParseError> {
        self.expect_keyword(Keyword::From)?;
        let source = self.parse_source()?;
        let condition = self.parse_condition()?;
        Ok(DeleteStatement { source, condition })
    }

    fn parse_show(&mut self) -> Result<Statement, ParseError> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::Keyword(Keyword::Continuous) => {
                self.expect_keyword(Keyword::Queries)?;
                Ok(Statement::ShowContinuousQueries(
                    ShowContinuousQueriesStatement,
                ))
            }
            TokenKind::Keyword(Keyword::Databases) => {
                let clauses = self.parse_list_clauses()?;
                Ok(Statement::ShowDatabases(ShowDatabasesStatement {
                    source: clauses.source,
                    condition: clauses.condition,
                    sort_fields: clauses.sort_fields,
                    limit: clauses.limit,
                    offset: clauses.offset,
                }))
            }
            TokenKind::Keyword(Keyword::Field) => {
                self.expect_keyword(Keyword::Keys)?;
                let clauses = self.parse_list_clauses()?;
                Ok(Statement::ShowFieldKeys(ShowFieldKeysStatement {
                    source: clauses.source,
                    condition: clauses.condition,
                    sort_fields: clauses.sort_fields,
                    limit: clauses.limit,
                    offset: clauses.offset,
                }))
            }
            TokenKind::Keyword(Keyword::Measurements) => {
                let clauses = self.parse_list_clauses()?;
                Ok(Statement::ShowMeasurements(ShowMeasurementsStatement {
                    source: clauses.source,
                    condition: clauses.condition,
                    sort_fields: clauses.sort_fields,
                    limit: clauses.limit,
                    offset: clauses.offset,
                }))
            }
            TokenKind::Keyword(Keyword::Retention) => {
                self.expect_keyword(Keyword::Policies)?;
                let database = self.expect_ident()?.lit;
                Ok(Statement::ShowRetentionPolicies(
                    ShowRetentionPoliciesStatement { database },
                ))
            }
            TokenKind::Keyword(Keyword::Series) => {
                let clauses = self.parse_list_clauses()?;
                Ok(Statement::ShowSeries(ShowSeriesStatement {
                    source: clauses.source,
                    condition: clauses.condition,
                    sort_fields: clauses.sort_fields,
                    limit: clauses.limit,
                    offset: clauses.offset,
                }))
            }
            TokenKind::Keyword(Keyword::Tag) => {
                let tok = self.scan()?;
                match tok.kind {
                    TokenKind::Keyword(Keyword::Keys) => {
                        let clauses = self.parse_list_clauses()?;
                        Ok(Statement::ShowTagKeys(ShowTagKeysStatement {
                            source: clauses.source,
                            condition: clauses.condition,
                            sort_fields: clauses.sort_fields,
                            limit: clauses.limit,
                            offset: clauses.offset,
                        }))
                    }
                    TokenKind::Keyword(Keyword::Values) => self.parse_show_tag_values(),
                    _ => Err(ParseError::expected(&tok, &["KEYS", "VALUES"])),
                }
            }
            TokenKind::Keyword(Keyword::Users) => Ok(Statement::ShowUsers(ShowUsersStatement)),
            _ => Err(ParseError::expected(
                &tok,
                &[
                    "CONTINUOUS",
                    "DATABASES",
                    "FIELD",
                    "MEASUREMENTS",
                    "RETENTION",
                    "SERIES",
                    "TAG",
                    "USERS",
                ],
            )),
        }
    }

    fn parse_show_tag_values(&mut self) -> Result<Statement, ParseError> {
        let source = if self.consume_keyword(Keyword::From)? {
            Some(self.parse_source()?)
        } else {
            None
        };

        let tag_keys = if self.consume_keyword(Keyword::With)? {
            self.expect_keyword(Keyword::Key)?;
            let tok = self.scan()?;
            match tok.kind {
                TokenKind::Eq => vec![self.expect_ident()?.lit],
                TokenKind::Keyword(Keyword::In) => {
                    self.expect_token(TokenKind::LeftParen, "(")?;
                    let mut keys = vec![self.expect_ident()?.lit];
                    while self.consume_token(TokenKind::Comma)? {
                        keys.push(self.expect_ident()?.lit);
                    }
                    self.expect_token(TokenKind::RightParen, ")")?;
                    keys
                }
                _ => return Err(ParseError::expected(&tok, &["=", "IN"])),
            }
        } else {
            Vec::new()
        };

        let condition = self.parse_condition()?;
        let sort_fields = self.parse_sort_fields()?;
        let limit = self.parse_row_bound(Keyword::Limit)?;
        let offset = self.parse_row_bound(Keyword::Offset)?;

        Ok(Statement::ShowTagValues(ShowTagValuesStatement {
            source,
            tag_keys,
            condition,
            sort_fields,
            limit,
            offset,
        }))
    }

    fn parse_drop(&mut self) -> Result<Statement, ParseError> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::Keyword(Keyword::Series) => {
                let name = self.expect_ident()?.lit;
                Ok(Statement::DropSeries(DropSeriesStatement { name }))
            }
            TokenKind::Keyword(Keyword::Continuous) => {
                self.expect_keyword(Keyword::Query)?;
                let name = self.expect_ident()?.lit;
                Ok(Statement::DropContinuousQuery(DropContinuousQueryStatement {
                    name,
                }))
            }
            TokenKind::Keyword(Keyword::Database) => {
                let name = self.expect_ident()?.lit;
                Ok(Statement::DropDatabase(DropDatabaseStatement { name }))
            }
            TokenKind::Keyword(Keyword::Retention) => {
                self.expect_keyword(Keyword::Policy)?;
                let name = self.expect_ident()?.lit;
                self.expect_keyword(Keyword::On)?;
                let database = self.expect_ident()?.lit;
                Ok(Statement::DropRetentionPolicy(DropRetentionPolicyStatement {
                    name,
                    database,
                }))
            }
            TokenKind::Keyword(Keyword::User) => {
                let name = self.expect_ident()?.lit;
                Ok(Statement::DropUser(DropUserStatement { name }))
            }
            _ => Err(ParseError::expected(&tok, &["SERIES", "CONTINUOUS"])),
        }
    }

    fn parse_create(&mut self) -> Result<Statement, ParseError> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::Keyword(Keyword::Continuous) => {
                self.expect_keyword(Keyword::Query)?;
                let name = self.expect_ident()?.lit;
                self.expect_keyword(Keyword::On)?;
                let database = self.expect_ident()?.lit;
                self.expect_keyword(Keyword::Begin)?;
                self.expect_keyword(Keyword::Select)?;
                let source = self.parse_select()?;
                self.expect_keyword(Keyword::End)?;
                Ok(Statement::CreateContinuousQuery(
                    CreateContinuousQueryStatement {
                        name,
                        database,
                        source,
                    },
                ))
            }
            TokenKind::Keyword(Keyword::Database) => {
                let name = self.expect_ident()?.lit;
                Ok(Statement::CreateDatabase(CreateDatabaseStatement { name }))
            }
            TokenKind::Keyword(Keyword::User) => {
                let name = self.expect_ident()?.lit;
                self.expect_keyword(Keyword::With)?;
                self.expect_keyword(Keyword::Password)?;
                let password = self.expect_string()?.lit;

                let privilege = if self.consume_keyword(Keyword::With)? {
                    self.expect_keyword(Keyword::All)?;
                    self.expect_keyword(Keyword::Privileges)?;
                    Some(Privilege::All)
                } else {
                    None
                };

                Ok(Statement::CreateUser(CreateUserStatement {
                    name,
                    password,
                    privilege,
                }))
            }
            TokenKind::Keyword(Keyword::Retention) => {
                self.expect_keyword(Keyword::Policy)?;
                let name = self.expect_ident()?.lit;
                self.expect_keyword(Keyword::On)?;
                let database = self.expect_ident()?.lit;
                self.expect_keyword(Keyword::Duration)?;
                let duration = self.parse_duration_value()?;
                self.expect_keyword(Keyword::Replication)?;
                let replication = self.parse_replication()?;
                let default = self.consume_keyword(Keyword::Default)?;

                Ok(Statement::CreateRetentionPolicy(
                    CreateRetentionPolicyStatement {
                        name,
                        database,
                        duration,
                        replication,
                        default,
                    },
                ))
            }
            _ => Err(ParseError::expected(
                &tok,
                &["CONTINUOUS", "DATABASE", "USER", "RETENTION"],
            )),
        }
    }

    /// Parses `ALTER RETENTION POLICY`, accepting its options in any
    /// order but requiring at least one.
    fn parse_alter(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Retention)?;
        self.expect_keyword(Keyword::Policy)?;
        let name = self.expect_ident()?.lit;
        self.expect_keyword(Keyword::On)?;
        let database = self.expect_ident()?.lit;

        let mut duration = None;
        let mut replication = None;
        let mut default = false;
        let mut seen = 0usize;
        loop {
            let tok = self.scan()?;
            match tok.kind {
                TokenKind::Keyword(Keyword::Duration) => {
                    duration = Some(self.parse_duration_value()?);
                }
                TokenKind::Keyword(Keyword::Replication) => {
                    replication = Some(self.parse_replication()?);
                }
                TokenKind::Keyword(Keyword::Default) => default = true,
                _ => {
                    if seen == 0 {
                        return Err(ParseError::expected(
                            &tok,
                            &["DURATION", "RETENTION", "DEFAULT"],
                        ));
                    }
                    self.unscan(tok);
                    break;
                }
            }
            seen += 1;
        }

        Ok(Statement::AlterRetentionPolicy(
            AlterRetentionPolicyStatement {
                name,
                database,
                duration,
                replication,
                default,
            },
        ))
    }

    fn parse_grant(&mut self) -> Result<GrantStatement, ParseError> {
        let privilege = self.parse_privilege()?;
        let on = self.parse_privilege_scope(privilege)?;
        self.expect_keyword(Keyword::To)?;
        let user = self.expect_ident()?.lit;
        Ok(GrantStatement {
            privilege,
            on,
            user,
        })
    }

    fn parse_revoke(&mut self) -> Result<RevokeStatement, ParseError> {
        let privilege = self.parse_privilege()?;
        let on = self.parse_privilege_scope(privilege)?;
        self.expect_keyword(Keyword::From)?;
        let user = self.expect_ident()?.lit;
        Ok(RevokeStatement {
            privilege,
            on,
            user,
        })
    }

    fn parse_privilege(&mut self) -> Result<Privilege, ParseError> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::Keyword(Keyword::Read) => Ok(Privilege::Read),
            TokenKind::Keyword(Keyword::Write) => Ok(Privilege::Write),
            TokenKind::Keyword(Keyword::All) => {
                self.consume_keyword(Keyword::Privileges)?;
                Ok(Privilege::All)
            }
            _ => Err(ParseError::expected(
                &tok,
                &["READ", "WRITE", "ALL [PRIVILEGES]"],
            )),
        }
    }

    /// Parses the optional `ON <database>` scope. Only `ALL` may omit
    /// it: without a database that privilege is cluster-wide.
    fn parse_privilege_scope(
        &mut self,
        privilege: Privilege,
    ) -> Result<Option<String>, ParseError> {
        let tok = self.scan()?;
        if tok.kind == TokenKind::Keyword(Keyword::On) {
            return Ok(Some(self.expect_ident()?.lit));
        }
        if privilege != Privilege::All {
            return Err(ParseError::expected(&tok, &["ON"]));
        }
        self.unscan(tok);
        Ok(None)
    }

    // --- clauses ---

    /// Parses the projected fields. A lone `*` is the wildcard field.
    fn parse_fields(&mut self) -> Result<Vec<Field>, ParseError> {
        let tok = self.scan()?;
        if tok.kind == TokenKind::Star {
            return Ok(vec![Field {
                expr: Expr::Wildcard,
                alias: None,
            }]);
        }
        self.unscan(tok);

        let mut fields = Vec::new();
        loop {
            let expr = self.parse_expr_bp(0)?;
            let alias = if self.consume_keyword(Keyword::As)? {
                Some(self.expect_ident()?.lit)
            } else {
                None
            };
            fields.push(Field { expr, alias });
            if !self.consume_token(TokenKind::Comma)? {
                break;
            }
        }
        Ok(fields)
    }

    /// Parses a `FROM` source: a measurement, `join(…)`, or `merge(…)`.
    /// A trailing `JOIN <measurement>` is absorbed into the source's
    /// measurement list, skipping names already present.
    fn parse_source(&mut self) -> Result<Source, ParseError> {
        let tok = self.scan()?;
        let mut source = match tok.kind {
            TokenKind::Keyword(Keyword::Join) => Source::Join(Join {
                measurements: self.parse_measurement_list()?,
            }),
            TokenKind::Keyword(Keyword::Merge) => Source::Merge(Merge {
                measurements: self.parse_measurement_list()?,
            }),
            TokenKind::Ident => {
                self.unscan(tok);
                Source::Measurement(Measurement {
                    name: self.parse_measurement_name()?,
                })
            }
            _ => return Err(ParseError::expected(&tok, &["identifier"])),
        };

        loop {
            let tok = self.scan()?;
            if tok.kind != TokenKind::Keyword(Keyword::Join) {
                self.unscan(tok);
                break;
            }
            let measurement = Measurement {
                name: self.parse_measurement_name()?,
            };
            source = absorb_join(source, measurement);
        }

        Ok(source)
    }

    /// Parses the parenthesized measurement list of `join(…)` and
    /// `merge(…)`.
    fn parse_measurement_list(&mut self) -> Result<Vec<Measurement>, ParseError> {
        self.expect_token(TokenKind::LeftParen, "(")?;
        let mut measurements = Vec::new();
        loop {
            measurements.push(Measurement {
                name: self.parse_measurement_name()?,
            });
            if !self.consume_token(TokenKind::Comma)? {
                break;
            }
        }
        self.expect_token(TokenKind::RightParen, ")")?;
        Ok(measurements)
    }

    /// Parses a measurement name: identifier segments joined by dots,
    /// each kept verbatim (quotes included for quoted segments).
    fn parse_measurement_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_ident()?.lit;
        while self.consume_token(TokenKind::Dot)? {
            name.push('.');
            name.push_str(&self.expect_ident()?.lit);
        }
        Ok(name)
    }

    /// Parses the optional `WHERE` condition.
    fn parse_condition(&mut self) -> Result<Option<Expr>, ParseError> {
        if self.consume_keyword(Keyword::Where)? {
            Ok(Some(self.parse_expr_bp(0)?))
        } else {
            Ok(None)
        }
    }

    /// Parses the optional `GROUP BY` dimension list.
    fn parse_dimensions(&mut self) -> Result<Vec<Dimension>, ParseError> {
        if !self.consume_keyword(Keyword::Group)? {
            return Ok(Vec::new());
        }
        self.expect_keyword(Keyword::By)?;

        let mut dimensions = Vec::new();
        loop {
            dimensions.push(Dimension {
                expr: self.parse_expr_bp(0)?,
            });
            if !self.consume_token(TokenKind::Comma)? {
                break;
            }
        }
        Ok(dimensions)
    }

    /// Parses the optional `ORDER BY` sort field list.
    fn parse_sort_fields(&mut self) -> Result<Vec<SortField>, ParseError> {
        if !self.consume_keyword(Keyword::Order)? {
            return Ok(Vec::new());
        }
        self.expect_keyword(Keyword::By)?;

        let mut fields = Vec::new();
        loop {
            let tok = self.scan()?;
            let field = match tok.kind {
                TokenKind::Keyword(Keyword::Asc) => SortField {
                    name: None,
                    ascending: true,
                },
                TokenKind::Keyword(Keyword::Desc) => SortField {
                    name: None,
                    ascending: false,
                },
                TokenKind::Ident => {
                    let name = tok.lit;
                    let ascending = if self.consume_keyword(Keyword::Desc)? {
                        false
                    } else {
                        self.consume_keyword(Keyword::Asc)?;
                        true
                    };
                    SortField {
                        name: Some(name),
                        ascending,
                    }
                }
                _ => {
                    return Err(ParseError::expected(
                        &tok,
                        &["identifier", "ASC", "or DESC"],
                    ));
                }
            };
            fields.push(field);
            if !self.consume_token(TokenKind::Comma)? {
                break;
            }
        }
        Ok(fields)
    }

    /// Parses an optional `LIMIT`/`OFFSET` clause. The bound must be a
    /// strictly positive integer; absence is 0.
    fn parse_row_bound(&mut self, clause: Keyword) -> Result<u64, ParseError> {
        if !self.consume_keyword(clause)? {
            return Ok(0);
        }
        let tok = self.scan()?;
        if tok.kind != TokenKind::Number {
            return Err(ParseError::expected(&tok, &["number"]));
        }
        if tok.lit.contains('.') {
            return Err(ParseError::fractional_not_allowed(clause.as_str(), tok.pos));
        }
        let n: u64 = tok
            .lit
            .parse()
            .map_err(|_| ParseError::unable_to_parse_number(tok.pos))?;
        if n == 0 {
            return Err(ParseError::must_be_positive(clause.as_str(), tok.pos));
        }
        Ok(n)
    }

    fn parse_list_clauses(&mut self) -> Result<ListClauses, ParseError> {
        let source = if self.consume_keyword(Keyword::From)? {
            Some(self.parse_source()?)
        } else {
            None
        };
        Ok(ListClauses {
            source,
            condition: self.parse_condition()?,
            sort_fields: self.parse_sort_fields()?,
            limit: self.parse_row_bound(Keyword::Limit)?,
            offset: self.parse_row_bound(Keyword::Offset)?,
        })
    }

    /// Parses a duration literal value.
    fn parse_duration_value(&mut self) -> Result<std::time::Duration, ParseError> {
        let tok = self.scan()?;
        if tok.kind != TokenKind::DurationVal {
            return Err(ParseError::expected(&tok, &["duration"]));
        }
        parse_duration(&tok.lit).map_err(|_| ParseError::expected(&tok, &["duration"]))
    }

    /// Parses a replication factor: an integer in `1..=2147483647`.
    fn parse_replication(&mut self) -> Result<u32, ParseError> {
        let tok = self.scan()?;
        if tok.kind != TokenKind::Number {
            return Err(ParseError::expected(&tok, &["number"]));
        }
        if tok.lit.contains('.') {
            return Err(ParseError::number_must_be_integer(tok.pos));
        }
        let n: i64 = tok
            .lit
            .parse()
            .map_err(|_| ParseError::invalid_replication(&tok.lit, tok.pos))?;
        if !(1..=i64::from(i32::MAX)).contains(&n) {
            return Err(ParseError::invalid_replication(&tok.lit, tok.pos));
        }
        u32::try_from(n).map_err(|_| ParseError::invalid_replication(&tok.lit, tok.pos))
    }

    // --- expressions ---

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_primary()?;

        loop {
            let tok = self.scan()?;
            let Some((l_bp, r_bp)) = infix_binding_power(&tok.kind) else {
                self.unscan(tok);
                break;
            };
            if l_bp < min_bp {
                self.unscan(tok);
                break;
            }
            let Some(op) = token_to_binary_op(&tok.kind) else {
                self.unscan(tok);
                break;
            };

            let rhs = self.parse_expr_bp(r_bp)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.scan()?;
        match tok.kind {
            TokenKind::Number => {
                let value: f64 = tok
                    .lit
                    .parse()
                    .map_err(|_| ParseError::unable_to_parse_number(tok.pos))?;
                Ok(Expr::Literal(Literal::Number(value)))
            }
            TokenKind::Str => reinterpret_string(tok),
            TokenKind::DurationVal => {
                let d = parse_duration(&tok.lit)
                    .map_err(|_| ParseError::expected(&tok, &["duration"]))?;
                Ok(Expr::Literal(Literal::Duration(d)))
            }
            TokenKind::Keyword(Keyword::True) => Ok(Expr::Literal(Literal::Boolean(true))),
            TokenKind::Keyword(Keyword::False) => Ok(Expr::Literal(Literal::Boolean(false))),
            TokenKind::Ident => {
                let peek = self.scan()?;
                if peek.kind == TokenKind::LeftParen {
                    self.parse_call(tok.lit)
                } else {
                    self.unscan(peek);
                    Ok(Expr::VarRef { name: tok.lit })
                }
            }
            TokenKind::LeftParen => {
                let inner = self.parse_expr_bp(0)?;
                self.expect_token(TokenKind::RightParen, ")")?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            _ => Err(ParseError::expected(
                &tok,
                &["identifier", "string", "number", "bool"],
            )),
        }
    }

    /// Parses a call's argument list, the opening paren already
    /// consumed.
    fn parse_call(&mut self, name: String) -> Result<Expr, ParseError> {
        let mut args = Vec::new();
        let tok = self.scan()?;
        if tok.kind != TokenKind::RightParen {
            self.unscan(tok);
            loop {
                args.push(self.parse_expr_bp(0)?);
                let tok = self.scan()?;
                match tok.kind {
                    TokenKind::Comma => {}
                    TokenKind::RightParen => break,
                    _ => return Err(ParseError::expected(&tok, &[",", ")"])),
                }
            }
        }
        Ok(Expr::call(name, args))
    }

    // --- token plumbing ---

    /// Returns the next significant token, surfacing scanner failures
    /// as parse errors at the token's position.
    fn scan(&mut self) -> Result<Token, ParseError> {
        let tok = self.scanner.next_token();
        if tok.kind == TokenKind::Illegal {
            return Err(ParseError::new(tok.lit, tok.pos));
        }
        Ok(tok)
    }

    fn unscan(&mut self, tok: Token) {
        self.scanner.push_back(tok);
    }

    /// Consumes the next token if it is the given keyword.
    fn consume_keyword(&mut self, kw: Keyword) -> Result<bool, ParseError> {
        let tok = self.scan()?;
        if tok.kind == TokenKind::Keyword(kw) {
            Ok(true)
        } else {
            self.unscan(tok);
            Ok(false)
        }
    }

    /// Consumes the next token if it has the given kind.
    fn consume_token(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        let tok = self.scan()?;
        if tok.kind == kind {
            Ok(true)
        } else {
            self.unscan(tok);
            Ok(false)
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<Token, ParseError> {
        let tok = self.scan()?;
        if tok.kind == TokenKind::Keyword(kw) {
            Ok(tok)
        } else {
            Err(ParseError::expected(&tok, &[kw.as_str()]))
        }
    }

    fn expect_token(&mut self, kind: TokenKind, name: &str) -> Result<Token, ParseError> {
        let tok = self.scan()?;
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(ParseError::expected(&tok, &[name]))
        }
    }

    fn expect_ident(&mut self) -> Result<Token, ParseError> {
        let tok = self.scan()?;
        if tok.kind == TokenKind::Ident {
            Ok(tok)
        } else {
            Err(ParseError::expected(&tok, &["identifier"]))
        }
    }

    fn expect_string(&mut self) -> Result<Token, ParseError> {
        let tok = self.scan()?;
        if tok.kind == TokenKind::Str {
            Ok(tok)
        } else {
            Err(ParseError::expected(&tok, &["string"]))
        }
    }
}

/// Folds a trailing `JOIN <measurement>` into the current source,
/// skipping measurements already present by name.
fn absorb_join(source: Source, measurement: Measurement) -> Source {
    match source {
        Source::Measurement(first) => {
            let mut measurements = vec![first];
            if measurements[0].name != measurement.name {
                measurements.push(measurement);
            }
            Source::Join(Join { measurements })
        }
        Source::Join(mut join) => {
            if !join
                .measurements
                .iter()
                .any(|m| m.name == measurement.name)
            {
                join.measurements.push(measurement);
            }
            Source::Join(join)
        }
        Source::Merge(mut merge) => {
            if !merge
                .measurements
                .iter()
                .any(|m| m.name == measurement.name)
            {
                merge.measurements.push(measurement);
            }
            Source::Merge(merge)
        }
    }
}

/// Reinterprets a string literal token as a time literal when it has a
/// date or datetime shape; anything else stays a plain string.
fn reinterpret_string(tok: Token) -> Result<Expr, ParseError> {
    if DATETIME_SHAPE.is_match(&tok.lit) {
        let dt = NaiveDateTime::parse_from_str(&tok.lit, DATETIME_FORMAT)
            .map_err(|_| ParseError::unable_to_parse_datetime(tok.pos))?;
        return Ok(Expr::Literal(Literal::Time(dt.and_utc())));
    }
    if DATE_SHAPE.is_match(&tok.lit) {
        let date = NaiveDate::parse_from_str(&tok.lit, DATE_FORMAT)
            .map_err(|_| ParseError::unable_to_parse_date(tok.pos))?;
        let dt = date.and_time(NaiveTime::MIN);
        return Ok(Expr::Literal(Literal::Time(dt.and_utc())));
    }
    Ok(Expr::Literal(Literal::Str(tok.lit)))
}
