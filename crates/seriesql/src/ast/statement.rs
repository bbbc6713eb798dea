//! Statement AST types and auxiliary records.

use core::fmt;
use std::time::Duration;

use thiserror::Error;

use super::expression::{Expr, Literal};

/// A parsed query: an ordered list of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    /// The statements, in source order.
    pub statements: Vec<Statement>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `SELECT …`
    Select(SelectStatement),
    /// `DELETE FROM …`
    Delete(DeleteStatement),
    /// `SHOW DATABASES`
    ShowDatabases(ShowDatabasesStatement),
    /// `SHOW SERIES`
    ShowSeries(ShowSeriesStatement),
    /// `SHOW MEASUREMENTS`
    ShowMeasurements(ShowMeasurementsStatement),
    /// `SHOW FIELD KEYS`
    ShowFieldKeys(ShowFieldKeysStatement),
    /// `SHOW TAG KEYS`
    ShowTagKeys(ShowTagKeysStatement),
    /// `SHOW TAG VALUES`
    ShowTagValues(ShowTagValuesStatement),
    /// `SHOW RETENTION POLICIES`
    ShowRetentionPolicies(ShowRetentionPoliciesStatement),
    /// `SHOW USERS`
    ShowUsers(ShowUsersStatement),
    /// `SHOW CONTINUOUS QUERIES`
    ShowContinuousQueries(ShowContinuousQueriesStatement),
    /// `DROP SERIES`
    DropSeries(DropSeriesStatement),
    /// `DROP DATABASE`
    DropDatabase(DropDatabaseStatement),
    /// `DROP USER`
    DropUser(DropUserStatement),
    /// `DROP CONTINUOUS QUERY`
    DropContinuousQuery(DropContinuousQueryStatement),
    /// `DROP RETENTION POLICY`
    DropRetentionPolicy(DropRetentionPolicyStatement),
    /// `CREATE DATABASE`
    CreateDatabase(CreateDatabaseStatement),
    /// `CREATE USER`
    CreateUser(CreateUserStatement),
    /// `CREATE RETENTION POLICY`
    CreateRetentionPolicy(CreateRetentionPolicyStatement),
    /// `ALTER RETENTION POLICY`
    AlterRetentionPolicy(AlterRetentionPolicyStatement),
    /// `CREATE CONTINUOUS QUERY`
    CreateContinuousQuery(CreateContinuousQueryStatement),
    /// `GRANT`
    Grant(GrantStatement),
    /// `REVOKE`
    Revoke(RevokeStatement),
}

/// A projected field: an expression with an optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// The projected expression.
    pub expr: Expr,
    /// The `AS` alias, if any.
    pub alias: Option<String>,
}

/// A `GROUP BY` term: a tag key, a duration, or a `time(…)` bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    /// The grouping expression.
    pub expr: Expr,
}

/// An `ORDER BY` entry.
///
/// A missing name designates the implicit default order key; a missing
/// direction is ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct SortField {
    /// The sort key, if named.
    pub name: Option<String>,
    /// True for ascending order.
    pub ascending: bool,
}

/// A single named measurement. The name is the lexeme as written,
/// quotes included for quoted segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// The measurement name.
    pub name: String,
}

/// A `join(…)` source combining several measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// The joined measurements, in order.
    pub measurements: Vec<Measurement>,
}

/// A `merge(…)` source combining several measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    /// The merged measurements, in order.
    pub measurements: Vec<Measurement>,
}

/// The data source of a `SELECT`, `DELETE`, or `SHOW` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A single measurement.
    Measurement(Measurement),
    /// A join of measurements.
    Join(Join),
    /// A merge of measurements.
    Merge(Merge),
}

/// The destination of an `INTO` clause. Dotted or quoted multi-segment
/// names are preserved as a single string.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// The destination measurement.
    pub measurement: String,
}

/// An access privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Read access.
    Read,
    /// Write access.
    Write,
    /// Full access.
    All,
}

impl Privilege {
    /// Returns the surface spelling of the privilege.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::All => "ALL PRIVILEGES",
        }
    }
}

/// The error returned when a `time(…)` dimension is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeDimensionError {
    /// `time` was called with zero or several arguments.
    #[error("time dimension expected one argument")]
    WrongArgCount,
    /// The single argument is not a duration literal.
    #[error("time dimension must have one duration argument")]
    NotADuration,
}

/// A `SELECT` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// The projected fields, in order.
    pub fields: Vec<Field>,
    /// The `INTO` destination, if any.
    pub target: Option<Target>,
    /// The `FROM` source.
    pub source: Source,
    /// The `WHERE` condition, if any.
    pub condition: Option<Expr>,
    /// The `GROUP BY` dimensions, in order.
    pub dimensions: Vec<Dimension>,
    /// The `ORDER BY` sort fields, in order.
    pub sort_fields: Vec<SortField>,
    /// Maximum number of rows; 0 when absent.
    pub limit: u64,
    /// Number of rows to skip; 0 when absent.
    pub offset: u64,
}

impl SelectStatement {
    /// Returns the `time(…)` bucket width from the dimensions, if one
    /// is present. Computed on demand; nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns [`TimeDimensionError`] when a `time` dimension does not
    /// carry exactly one duration argument.
    pub fn group_by_interval(&self) -> Result<Option<Duration>, TimeDimensionError> {
        for dim in &self.dimensions {
            if let Expr::Call(call) = &dim.expr {
                if !call.name.eq_ignore_ascii_case("time") {
                    continue;
                }
                let [arg] = call.args.as_slice() else {
                    return Err(TimeDimensionError::WrongArgCount);
                };
                let Expr::Literal(Literal::Duration(d)) = arg else {
                    return Err(TimeDimensionError::NotADuration);
                };
                return Ok(Some(*d));
            }
        }
        Ok(None)
    }
}

/// A `DELETE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    /// The source to delete from.
    pub source: Source,
    /// The `WHERE` condition, if any.
    pub condition: Option<Expr>,
}

/// A `SHOW DATABASES` statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShowDatabasesStatement {
    /// The `FROM` source, if any.
    pub source: Option<Source>,
    /// The `WHERE` condition, if any.
    pub condition: Option<Expr>,
    /// The `ORDER BY` sort fields.
    pub sort_fields: Vec<SortField>,
    /// Maximum number of rows; 0 when absent.
    pub limit: u64,
    /// Number of rows to skip; 0 when absent.
    pub offset: u64,
}

/// A `SHOW SERIES` statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShowSeriesStatement {
    /// The `FROM` source, if any.
    pub source: Option<Source>,
    /// The `WHERE` condition, if any.
    pub condition: Option<Expr>,
    /// The `ORDER BY` sort fields.
    pub sort_fields: Vec<SortField>,
    /// Maximum number of rows; 0 when absent.
    pub limit: u64,
    /// Number of rows to skip; 0 when absent.
    pub offset: u64,
}

/// A `SHOW MEASUREMENTS` statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShowMeasurementsStatement {
    /// The `FROM` source, if any.
    pub source: Option<Source>,
    /// The `WHERE` condition, if any.
    pub condition: Option<Expr>,
    /// The `ORDER BY` sort fields.
    pub sort_fields: Vec<SortField>,
    /// Maximum number of rows; 0 when absent.
    pub limit: u64,
    /// Number of rows to skip; 0 when absent.
    pub offset: u64,
}

/// A `SHOW FIELD KEYS` statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShowFieldKeysStatement {
    /// The `FROM` source, if any.
    pub source: Option<Source>,
    /// The `WHERE` condition, if any.
    pub condition: Option<Expr>,
    /// The `ORDER BY` sort fields.
    pub sort_fields: Vec<SortField>,
    /// Maximum number of rows; 0 when absent.
    pub limit: u64,
    /// Number of rows to skip; 0 when absent.
    pub offset: u64,
}

/// A `SHOW TAG KEYS` statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShowTagKeysStatement {
    /// The `FROM` source, if any.
    pub source: Option<Source>,
    /// The `WHERE` condition, if any.
    pub condition: Option<Expr>,
    /// The `ORDER BY` sort fields.
    pub sort_fields: Vec<SortField>,
    /// Maximum number of rows; 0 when absent.
    pub limit: u64,
    /// Number of rows to skip; 0 when absent.
    pub offset: u64,
}

/// A `SHOW TAG VALUES` statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShowTagValuesStatement {
    /// The `FROM` source, if any.
    pub source: Option<Source>,
    /// The tag keys named by `WITH KEY`, in order.
    pub tag_keys: Vec<String>,
    /// The `WHERE` condition, if any.
    pub condition: Option<Expr>,
    /// The `ORDER BY` sort fields.
    pub sort_fields: Vec<SortField>,
    /// Maximum number of rows; 0 when absent.
    pub limit: u64,
    /// Number of rows to skip; 0 when absent.
    pub offset: u64,
}

/// A `SHOW RETENTION POLICIES` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowRetentionPoliciesStatement {
    /// The database to list policies for.
    pub database: String,
}

/// A `SHOW USERS` statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShowUsersStatement;

/// A `SHOW CONTINUOUS QUERIES` statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShowContinuousQueriesStatement;

/// A `DROP SERIES` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DropSeriesStatement {
    /// The series name.
    pub name: String,
}

/// A `DROP DATABASE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DropDatabaseStatement {
    /// The database name.
    pub name: String,
}

/// A `DROP USER` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DropUserStatement {
    /// The user name.
    pub name: String,
}

/// A `DROP CONTINUOUS QUERY` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DropContinuousQueryStatement {
    /// The continuous query name.
    pub name: String,
}

/// A `DROP RETENTION POLICY` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DropRetentionPolicyStatement {
    /// The policy name, quotes preserved for quoted names.
    pub name: String,
    /// The database the policy belongs to.
    pub database: String,
}

/// A `CREATE DATABASE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDatabaseStatement {
    /// The database name.
    pub name: String,
}

/// A `CREATE USER` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateUserStatement {
    /// The user name.
    pub name: String,
    /// The password.
    pub password: String,
    /// The privilege granted at creation, if any.
    pub privilege: Option<Privilege>,
}

/// A `CREATE RETENTION POLICY` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRetentionPolicyStatement {
    /// The policy name.
    pub name: String,
    /// The database the policy belongs to.
    pub database: String,
    /// How long data is kept.
    pub duration: Duration,
    /// The replication factor.
    pub replication: u32,
    /// True when the policy is the database default.
    pub default: bool,
}

/// An `ALTER RETENTION POLICY` statement. Options may appear in any
/// order; a missing option is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterRetentionPolicyStatement {
    /// The policy name.
    pub name: String,
    /// The database the policy belongs to.
    pub database: String,
    /// The new duration, if given.
    pub duration: Option<Duration>,
    /// The new replication factor, if given.
    pub replication: Option<u32>,
    /// True when the policy becomes the database default.
    pub default: bool,
}

/// A `CREATE CONTINUOUS QUERY` statement wrapping a `SELECT` whose
/// target is set.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateContinuousQueryStatement {
    /// The continuous query name.
    pub name: String,
    /// The database the query runs in.
    pub database: String,
    /// The embedded select.
    pub source: SelectStatement,
}

/// A `GRANT` statement. A missing `on` database means the privilege is
/// cluster-wide.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantStatement {
    /// The granted privilege.
    pub privilege: Privilege,
    /// The database scope, if any.
    pub on: Option<String>,
    /// The receiving user.
    pub user: String,
}

/// A `REVOKE` statement. A missing `on` database means the privilege is
/// cluster-wide.
#[derive(Debug, Clone, PartialEq)]
pub struct RevokeStatement {
    /// The revoked privilege.
    pub privilege: Privilege,
    /// The database scope, if any.
    pub on: Option<String>,
    /// The affected user.
    pub user: String,
}

// ===================================================================
// Display implementations
// ===================================================================

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name} ")?;
        }
        f.write_str(if self.ascending { "ASC" } else { "DESC" })
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn fmt_measurements(f: &mut fmt::Formatter<'_>, ms: &[Measurement]) -> fmt::Result {
    for (i, m) in ms.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{m}")?;
    }
    Ok(())
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "join(")?;
        fmt_measurements(f, &self.measurements)?;
        write!(f, ")")
    }
}

impl fmt::Display for Merge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "merge(")?;
        fmt_measurements(f, &self.measurements)?;
        write!(f, ")")
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Measurement(m) => write!(f, "{m}"),
            Self::Join(j) => write!(f, "{j}"),
            Self::Merge(m) => write!(f, "{m}"),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.measurement)
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders the shared tail of the listing statements.
fn fmt_list_tail(
    f: &mut fmt::Formatter<'_>,
    source: Option<&Source>,
    condition: Option<&Expr>,
    sort_fields: &[SortField],
    limit: u64,
    offset: u64,
) -> fmt::Result {
    if let Some(source) = source {
        write!(f, " FROM {source}")?;
    }
    if let Some(condition) = condition {
        write!(f, " WHERE {condition}")?;
    }
    if !sort_fields.is_empty() {
        write!(f, " ORDER BY ")?;
        for (i, sf) in sort_fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{sf}")?;
        }
    }
    if limit > 0 {
        write!(f, " LIMIT {limit}")?;
    }
    if offset > 0 {
        write!(f, " OFFSET {offset}")?;
    }
    Ok(())
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}")?;
        }
        if let Some(target) = &self.target {
            write!(f, " INTO {target}")?;
        }
        write!(f, " FROM {}", self.source)?;
        if let Some(condition) = &self.condition {
            write!(f, " WHERE {condition}")?;
        }
        if !self.dimensions.is_empty() {
            write!(f, " GROUP BY ")?;
            for (i, dim) in self.dimensions.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{dim}")?;
            }
        }
        if !self.sort_fields.is_empty() {
            write!(f, " ORDER BY ")?;
            for (i, sf) in self.sort_fields.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{sf}")?;
            }
        }
        if self.limit > 0 {
            write!(f, " LIMIT {}", self.limit)?;
        }
        if self.offset > 0 {
            write!(f, " OFFSET {}", self.offset)?;
        }
        Ok(())
    }
}

impl fmt::Display for DeleteStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.source)?;
        if let Some(condition) = &self.condition {
            write!(f, " WHERE {condition}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ShowDatabasesStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHOW DATABASES")?;
        fmt_list_tail(
            f,
            self.source.as_ref(),
            self.condition.as_ref(),
            &self.sort_fields,
            self.limit,
            self.offset,
        )
    }
}

impl fmt::Display for ShowSeriesStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHOW SERIES")?;
        fmt_list_tail(
            f,
            self.source.as_ref(),
            self.condition.as_ref(),
            &self.sort_fields,
            self.limit,
            self.offset,
        )
    }
}

impl fmt::Display for ShowMeasurementsStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHOW MEASUREMENTS")?;
        fmt_list_tail(
            f,
            self.source.as_ref(),
            self.condition.as_ref(),
            &self.sort_fields,
            self.limit,
            self.offset,
        )
    }
}

impl fmt::Display for ShowFieldKeysStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHOW FIELD KEYS")?;
        fmt_list_tail(
            f,
            self.source.as_ref(),
            self.condition.as_ref(),
            &self.sort_fields,
            self.limit,
            self.offset,
        )
    }
}

impl fmt::Display for ShowTagKeysStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHOW TAG KEYS")?;
        fmt_list_tail(
            f,
            self.source.as_ref(),
            self.condition.as_ref(),
            &self.sort_fields,
            self.limit,
            self.offset,
        )
    }
}

impl fmt::Display for ShowTagValuesStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHOW TAG VALUES")?;
        if let Some(source) = &self.source {
            write!(f, " FROM {source}")?;
        }
        match self.tag_keys.as_slice() {
            [] => {}
            [key] => write!(f, " WITH KEY = {key}")?,
            keys => {
                write!(f, " WITH KEY IN (")?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}")?;
                }
                write!(f, ")")?;
            }
        }
        fmt_list_tail(
            f,
            None,
            self.condition.as_ref(),
            &self.sort_fields,
            self.limit,
            self.offset,
        )
    }
}

impl fmt::Display for ShowRetentionPoliciesStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHOW RETENTION POLICIES {}", self.database)
    }
}

impl fmt::Display for ShowUsersStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SHOW USERS")
    }
}

impl fmt::Display for ShowContinuousQueriesStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SHOW CONTINUOUS QUERIES")
    }
}

impl fmt::Display for DropSeriesStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP SERIES {}", self.name)
    }
}

impl fmt::Display for DropDatabaseStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP DATABASE {}", self.name)
    }
}

impl fmt::Display for DropUserStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP USER {}", self.name)
    }
}

impl fmt::Display for DropContinuousQueryStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP CONTINUOUS QUERY {}", self.name)
    }
}

impl fmt::Display for DropRetentionPolicyStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP RETENTION POLICY {} ON {}", self.name, self.database)
    }
}

impl fmt::Display for CreateDatabaseStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE DATABASE {}", self.name)
    }
}

impl fmt::Display for CreateUserStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CREATE USER {} WITH PASSWORD {}",
            self.name,
            crate::quote::quote_string(&self.password)
        )?;
        if self.privilege == Some(Privilege::All) {
            write!(f, " WITH ALL PRIVILEGES")?;
        }
        Ok(())
    }
}

impl fmt::Display for CreateRetentionPolicyStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CREATE RETENTION POLICY {} ON {} DURATION {} REPLICATION {}",
            self.name,
            self.database,
            crate::duration::format_duration(self.duration),
            self.replication
        )?;
        if self.default {
            write!(f, " DEFAULT")?;
        }
        Ok(())
    }
}

impl fmt::Display for AlterRetentionPolicyStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ALTER RETENTION POLICY {} ON {}",
            self.name, self.database
        )?;
        if let Some(duration) = self.duration {
            write!(f, " DURATION {}", crate::duration::format_duration(duration))?;
        }
        if let Some(replication) = self.replication {
            write!(f, " REPLICATION {replication}")?;
        }
        if self.default {
            write!(f, " DEFAULT")?;
        }
        Ok(())
    }
}

impl fmt::Display for CreateContinuousQueryStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CREATE CONTINUOUS QUERY {} ON {} BEGIN {} END",
            self.name, self.database, self.source
        )
    }
}

impl fmt::Display for GrantStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GRANT {}", self.privilege)?;
        if let Some(on) = &self.on {
            write!(f, " ON {on}")?;
        }
        write!(f, " TO {}", self.user)
    }
}

impl fmt::Display for RevokeStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "REVOKE {}", self.privilege)?;
        if let Some(on) = &self.on {
            write!(f, " ON {on}")?;
        }
        write!(f, " FROM {}", self.user)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(s) => write!(f, "{s}"),
            Self::Delete(s) => write!(f, "{s}"),
            Self::ShowDatabases(s) => write!(f, "{s}"),
            Self::ShowSeries(s) => write!(f, "{s}"),
            Self::ShowMeasurements(s) => write!(f, "{s}"),
            Self::ShowFieldKeys(s) => write!(f, "{s}"),
            Self::ShowTagKeys(s) => write!(f, "{s}"),
            Self::ShowTagValues(s) => write!(f, "{s}"),
            Self::ShowRetentionPolicies(s) => write!(f, "{s}"),
            Self::ShowUsers(s) => write!(f, "{s}"),
            Self::ShowContinuousQueries(s) => write!(f, "{s}"),
            Self::DropSeries(s) => write!(f, "{s}"),
            Self::DropDatabase(s) => write!(f, "{s}"),
            Self::DropUser(s) => write!(f, "{s}"),
            Self::DropContinuousQuery(s) => write!(f, "{s}"),
            Self::DropRetentionPolicy(s) => write!(f, "{s}"),
            Self::CreateDatabase(s) => write!(f, "{s}"),
            Self::CreateUser(s) => write!(f, "{s}"),
            Self::CreateRetentionPolicy(s) => write!(f, "{s}"),
            Self::AlterRetentionPolicy(s) => write!(f, "{s}"),
            Self::CreateContinuousQuery(s) => write!(f, "{s}"),
            Self::Grant(s) => write!(f, "{s}"),
            Self::Revoke(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select_from(name: &str) -> SelectStatement {
        SelectStatement {
            fields: vec![Field {
                expr: Expr::Wildcard,
                alias: None,
            }],
            target: None,
            source: Source::Measurement(Measurement {
                name: String::from(name),
            }),
            condition: None,
            dimensions: Vec::new(),
            sort_fields: Vec::new(),
            limit: 0,
            offset: 0,
        }
    }

    #[test]
    fn test_display_select() {
        assert_eq!(select_from("cpu").to_string(), "SELECT * FROM cpu");
    }

    #[test]
    fn test_display_select_with_clauses() {
        let mut stmt = select_from("cpu");
        stmt.condition = Some(Expr::var_ref("host").eq(Expr::string("server01")));
        stmt.sort_fields = vec![SortField {
            name: None,
            ascending: true,
        }];
        stmt.limit = 20;
        stmt.offset = 10;
        assert_eq!(
            stmt.to_string(),
            "SELECT * FROM cpu WHERE host = 'server01' ORDER BY ASC LIMIT 20 OFFSET 10"
        );
    }

    #[test]
    fn test_display_sort_field() {
        let named = SortField {
            name: Some(String::from("field1")),
            ascending: false,
        };
        assert_eq!(named.to_string(), "field1 DESC");
        let bare = SortField {
            name: None,
            ascending: true,
        };
        assert_eq!(bare.to_string(), "ASC");
    }

    #[test]
    fn test_display_join_source() {
        let join = Source::Join(Join {
            measurements: vec![
                Measurement {
                    name: String::from("aa"),
                },
                Measurement {
                    name: String::from("\"bb\""),
                },
            ],
        });
        assert_eq!(join.to_string(), "join(aa, \"bb\")");
    }

    #[test]
    fn test_display_grant_cluster_wide() {
        let stmt = GrantStatement {
            privilege: Privilege::All,
            on: None,
            user: String::from("jdoe"),
        };
        assert_eq!(stmt.to_string(), "GRANT ALL PRIVILEGES TO jdoe");
    }

    #[test]
    fn test_display_alter_retention_policy() {
        let stmt = AlterRetentionPolicyStatement {
            name: String::from("policy1"),
            database: String::from("testdb"),
            duration: Some(Duration::from_secs(60)),
            replication: Some(4),
            default: true,
        };
        assert_eq!(
            stmt.to_string(),
            "ALTER RETENTION POLICY policy1 ON testdb DURATION 1m REPLICATION 4 DEFAULT"
        );
    }

    #[test]
    fn test_group_by_interval() {
        let mut stmt = select_from("cpu");
        stmt.dimensions = vec![Dimension {
            expr: Expr::call("time", vec![Expr::duration(Duration::from_secs(300))]),
        }];
        assert_eq!(
            stmt.group_by_interval(),
            Ok(Some(Duration::from_secs(300)))
        );
    }

    #[test]
    fn test_group_by_interval_absent() {
        let mut stmt = select_from("cpu");
        stmt.dimensions = vec![Dimension {
            expr: Expr::var_ref("host"),
        }];
        assert_eq!(stmt.group_by_interval(), Ok(None));
    }

    #[test]
    fn test_group_by_interval_malformed() {
        let mut stmt = select_from("cpu");
        stmt.dimensions = vec![Dimension {
            expr: Expr::call("time", vec![]),
        }];
        assert_eq!(
            stmt.group_by_interval(),
            Err(TimeDimensionError::WrongArgCount)
        );

        stmt.dimensions = vec![Dimension {
            expr: Expr::call("time", vec![Expr::var_ref("x")]),
        }];
        assert_eq!(
            stmt.group_by_interval(),
            Err(TimeDimensionError::NotADuration)
        );
    }
}
