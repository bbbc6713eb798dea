//! Abstract syntax tree types.
//!
//! Statements and expressions are closed sum types; the parser returns
//! the concrete variant and consumers match on it. Every node is plain
//! owned data, immutable once the parser returns it, and renders its
//! canonical surface text via `Display`.

mod expression;
mod statement;

pub use expression::{BinaryOp, Expr, FunctionCall, Literal};
pub use statement::{
    AlterRetentionPolicyStatement, CreateContinuousQueryStatement, CreateDatabaseStatement,
    CreateRetentionPolicyStatement, CreateUserStatement, DeleteStatement, Dimension,
    DropContinuousQueryStatement, DropDatabaseStatement, DropRetentionPolicyStatement,
    DropSeriesStatement, DropUserStatement, Field, GrantStatement, Join, Measurement, Merge,
    Privilege, Query, RevokeStatement, SelectStatement, ShowContinuousQueriesStatement,
    ShowDatabasesStatement, ShowFieldKeysStatement, ShowMeasurementsStatement,
    ShowRetentionPoliciesStatement, ShowSeriesStatement, ShowTagKeysStatement,
    ShowTagValuesStatement, ShowUsersStatement, SortField, Source, Statement, Target,
    TimeDimensionError,
};
