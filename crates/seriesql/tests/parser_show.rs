//! Tests for the SHOW statement family.

mod common;
use common::*;

use seriesql::{Expr, Source, Statement};

fn uswest_condition() -> Option<Expr> {
    Some(Expr::var_ref("region").eq(Expr::string("uswest")))
}

fn source_name(source: &Option<Source>) -> Option<&str> {
    match source {
        Some(Source::Measurement(m)) => Some(m.name.as_str()),
        None => None,
        other => panic!("expected measurement source, got {other:?}"),
    }
}

#[test]
fn show_databases() {
    let Statement::ShowDatabases(stmt) = parse("SHOW DATABASES") else {
        panic!("expected SHOW DATABASES");
    };
    assert!(stmt.source.is_none());
    assert!(stmt.condition.is_none());
    assert!(stmt.sort_fields.is_empty());
    assert_eq!(stmt.limit, 0);
    assert_eq!(stmt.offset, 0);
    round_trip("SHOW DATABASES");
}

#[test]
fn show_series_bare() {
    let Statement::ShowSeries(stmt) = parse("SHOW SERIES") else {
        panic!("expected SHOW SERIES");
    };
    assert!(stmt.condition.is_none());
}

#[test]
fn show_series_full() {
    let Statement::ShowSeries(stmt) =
        parse("SHOW SERIES WHERE region = 'uswest' ORDER BY ASC, field1, field2 DESC LIMIT 10")
    else {
        panic!("expected SHOW SERIES");
    };
    assert_eq!(stmt.condition, uswest_condition());
    assert_eq!(stmt.sort_fields.len(), 3);
    assert_eq!(stmt.limit, 10);
    round_trip("SHOW SERIES WHERE region = 'uswest' ORDER BY ASC, field1 ASC, field2 DESC LIMIT 10");
}

#[test]
fn show_measurements() {
    let Statement::ShowMeasurements(stmt) = parse(
        "SHOW MEASUREMENTS WHERE region = 'uswest' ORDER BY ASC, field1, field2 DESC LIMIT 10",
    ) else {
        panic!("expected SHOW MEASUREMENTS");
    };
    assert_eq!(stmt.condition, uswest_condition());
    assert_eq!(stmt.sort_fields.len(), 3);
    assert_eq!(stmt.limit, 10);
}

#[test]
fn show_field_keys() {
    let Statement::ShowFieldKeys(stmt) = parse(
        "SHOW FIELD KEYS FROM src WHERE region = 'uswest' ORDER BY ASC, field1, field2 DESC LIMIT 10",
    ) else {
        panic!("expected SHOW FIELD KEYS");
    };
    assert_eq!(source_name(&stmt.source), Some("src"));
    assert_eq!(stmt.condition, uswest_condition());
    assert_eq!(stmt.limit, 10);
}

#[test]
fn show_tag_keys() {
    let Statement::ShowTagKeys(stmt) = parse("SHOW TAG KEYS FROM src") else {
        panic!("expected SHOW TAG KEYS");
    };
    assert_eq!(source_name(&stmt.source), Some("src"));
    assert!(stmt.condition.is_none());
    round_trip("SHOW TAG KEYS FROM src");
}

#[test]
fn show_tag_keys_full() {
    let Statement::ShowTagKeys(stmt) = parse(
        "SHOW TAG KEYS FROM src WHERE region = 'uswest' ORDER BY ASC, field1, field2 DESC LIMIT 10",
    ) else {
        panic!("expected SHOW TAG KEYS");
    };
    assert_eq!(source_name(&stmt.source), Some("src"));
    assert_eq!(stmt.condition, uswest_condition());
    assert_eq!(stmt.sort_fields.len(), 3);
    assert_eq!(stmt.limit, 10);
}

#[test]
fn show_tag_values_with_key_eq() {
    let Statement::ShowTagValues(stmt) = parse(
        "SHOW TAG VALUES FROM src WITH KEY = region WHERE region = 'uswest' ORDER BY ASC, field1, field2 DESC LIMIT 10",
    ) else {
        panic!("expected SHOW TAG VALUES");
    };
    assert_eq!(source_name(&stmt.source), Some("src"));
    assert_eq!(stmt.tag_keys, ["region"]);
    assert_eq!(stmt.condition, uswest_condition());
    assert_eq!(stmt.sort_fields.len(), 3);
    assert_eq!(stmt.limit, 10);
}

#[test]
fn show_tag_values_with_key_in() {
    let Statement::ShowTagValues(stmt) =
        parse("SHOW TAG VALUES FROM cpu WITH KEY IN (region, host) WHERE region = 'uswest'")
    else {
        panic!("expected SHOW TAG VALUES");
    };
    assert_eq!(source_name(&stmt.source), Some("cpu"));
    assert_eq!(stmt.tag_keys, ["region", "host"]);
    assert_eq!(stmt.condition, uswest_condition());
}

#[test]
fn show_tag_values_key_list_without_spaces() {
    let Statement::ShowTagValues(stmt) =
        parse("SHOW TAG VALUES FROM cpu WITH KEY IN (region,service,host)WHERE region = 'uswest'")
    else {
        panic!("expected SHOW TAG VALUES");
    };
    assert_eq!(stmt.tag_keys, ["region", "service", "host"]);
    assert_eq!(stmt.condition, uswest_condition());
}

#[test]
fn show_tag_values_without_source() {
    let Statement::ShowTagValues(stmt) =
        parse("SHOW TAG VALUES WITH KEY = host WHERE region = 'uswest'")
    else {
        panic!("expected SHOW TAG VALUES");
    };
    assert!(stmt.source.is_none());
    assert_eq!(stmt.tag_keys, ["host"]);
    assert_eq!(stmt.condition, uswest_condition());
    round_trip("SHOW TAG VALUES WITH KEY = host WHERE region = 'uswest'");
}

#[test]
fn show_retention_policies() {
    let Statement::ShowRetentionPolicies(stmt) = parse("SHOW RETENTION POLICIES mydb") else {
        panic!("expected SHOW RETENTION POLICIES");
    };
    assert_eq!(stmt.database, "mydb");
    round_trip("SHOW RETENTION POLICIES mydb");
}

#[test]
fn show_users() {
    assert!(matches!(parse("SHOW USERS"), Statement::ShowUsers(_)));
    round_trip("SHOW USERS");
}

#[test]
fn show_continuous_queries() {
    assert!(matches!(
        parse("SHOW CONTINUOUS QUERIES"),
        Statement::ShowContinuousQueries(_)
    ));
    round_trip("SHOW CONTINUOUS QUERIES");
}

#[test]
fn show_tag_values_round_trips_key_list() {
    round_trip("SHOW TAG VALUES FROM cpu WITH KEY IN (region, host) WHERE region = 'uswest'");
}
