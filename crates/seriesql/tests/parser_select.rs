//! Tests for SELECT and DELETE statements.

mod common;
use common::*;

use std::time::Duration;

use seriesql::ast::DeleteStatement;
use seriesql::{BinaryOp, Expr, Literal, Source, Statement};

fn measurement_name(source: &Source) -> &str {
    match source {
        Source::Measurement(m) => &m.name,
        other => panic!("expected measurement source, got {other:?}"),
    }
}

#[test]
fn select_wildcard() {
    let s = parse_select("SELECT * FROM myseries");
    assert_eq!(s.fields.len(), 1);
    assert_eq!(s.fields[0].expr, Expr::Wildcard);
    assert!(s.fields[0].alias.is_none());
    assert_eq!(measurement_name(&s.source), "myseries");
    round_trip("SELECT * FROM myseries");
}

#[test]
fn select_all_clauses() {
    let s = parse_select(
        "SELECT field1, field2 ,field3 AS field_x FROM myseries \
         WHERE host = 'hosta.influxdb.org' \
         GROUP BY 10h ORDER BY ASC LIMIT 20 OFFSET 10;",
    );

    assert_eq!(s.fields.len(), 3);
    assert_eq!(s.fields[0].expr, Expr::var_ref("field1"));
    assert_eq!(s.fields[1].expr, Expr::var_ref("field2"));
    assert_eq!(s.fields[2].expr, Expr::var_ref("field3"));
    assert_eq!(s.fields[2].alias.as_deref(), Some("field_x"));

    assert_eq!(measurement_name(&s.source), "myseries");
    assert_eq!(
        s.condition,
        Some(Expr::var_ref("host").eq(Expr::string("hosta.influxdb.org")))
    );

    assert_eq!(s.dimensions.len(), 1);
    assert_eq!(
        s.dimensions[0].expr,
        Expr::duration(Duration::from_secs(36_000))
    );

    assert_eq!(s.sort_fields.len(), 1);
    assert!(s.sort_fields[0].name.is_none());
    assert!(s.sort_fields[0].ascending);

    assert_eq!(s.limit, 20);
    assert_eq!(s.offset, 10);
}

#[test]
fn select_lowercase_keywords() {
    let s = parse_select("select my_field from myseries");
    assert_eq!(s.fields[0].expr, Expr::var_ref("my_field"));
    assert_eq!(measurement_name(&s.source), "myseries");
}

#[test]
fn select_join_source() {
    let s = parse_select(r#"SELECT field1 FROM join(aa,"bb", cc)"#);
    let Source::Join(join) = &s.source else {
        panic!("expected join source");
    };
    let names: Vec<&str> = join.measurements.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["aa", "\"bb\"", "cc"]);
}

#[test]
fn select_trailing_join_absorbed() {
    let s = parse_select(r#"SELECT field1 FROM join(aa,"bb", cc) JOIN cc"#);
    let Source::Join(join) = &s.source else {
        panic!("expected join source");
    };
    let names: Vec<&str> = join.measurements.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["aa", "\"bb\"", "cc"]);
}

#[test]
fn select_merge_source_with_dotted_name() {
    let s = parse_select("SELECT field1 FROM merge(aa,b.b)");
    let Source::Merge(merge) = &s.source else {
        panic!("expected merge source");
    };
    let names: Vec<&str> = merge.measurements.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["aa", "b.b"]);
}

#[test]
fn select_quoted_measurement() {
    let s = parse_select(r#"SELECT field FROM "series" WHERE value > 10"#);
    assert_eq!(measurement_name(&s.source), "\"series\"");
    assert_eq!(
        s.condition,
        Some(Expr::var_ref("value").binary(BinaryOp::Gt, Expr::number(10.0)))
    );
}

#[test]
fn select_multiple_sort_fields() {
    let s = parse_select("SELECT field1 FROM myseries ORDER BY ASC, field1, field2 DESC LIMIT 10");
    assert_eq!(s.sort_fields.len(), 3);

    assert!(s.sort_fields[0].name.is_none());
    assert!(s.sort_fields[0].ascending);

    assert_eq!(s.sort_fields[1].name.as_deref(), Some("field1"));
    assert!(s.sort_fields[1].ascending);

    assert_eq!(s.sort_fields[2].name.as_deref(), Some("field2"));
    assert!(!s.sort_fields[2].ascending);

    assert_eq!(s.limit, 10);
}

#[test]
fn select_into_target() {
    let s = parse_select("SELECT count() INTO measure1 FROM myseries");
    assert_eq!(s.target.as_ref().map(|t| t.measurement.as_str()), Some("measure1"));
}

#[test]
fn select_into_quoted_dotted_target() {
    let s = parse_select(r#"SELECT count() INTO "1h.policy1"."cpu.load" FROM myseries"#);
    assert_eq!(
        s.target.as_ref().map(|t| t.measurement.as_str()),
        Some(r#""1h.policy1"."cpu.load""#)
    );
}

#[test]
fn select_group_by_tag_and_time() {
    let s = parse_select("SELECT mean(value) FROM cpu GROUP BY time(5m), host");
    assert_eq!(s.dimensions.len(), 2);
    assert_eq!(
        s.dimensions[0].expr,
        Expr::call("time", vec![Expr::duration(Duration::from_secs(300))])
    );
    assert_eq!(s.dimensions[1].expr, Expr::var_ref("host"));
    assert_eq!(
        s.group_by_interval(),
        Ok(Some(Duration::from_secs(300)))
    );
}

#[test]
fn select_without_time_dimension_has_no_interval() {
    let s = parse_select("SELECT mean(value) FROM cpu GROUP BY host");
    assert_eq!(s.group_by_interval(), Ok(None));
}

#[test]
fn select_round_trips() {
    for input in [
        "SELECT * FROM myseries",
        "SELECT field1, field2, field3 AS field_x FROM myseries WHERE host = 'hosta.influxdb.org' GROUP BY 10h ORDER BY ASC LIMIT 20 OFFSET 10",
        "SELECT field1 FROM join(aa, \"bb\", cc)",
        "SELECT field1 FROM merge(aa, b.b)",
        "SELECT count() INTO \"1h.policy1\".\"cpu.load\" FROM myseries GROUP BY time(5m)",
        "SELECT field1 FROM myseries ORDER BY ASC, field1 ASC, field2 DESC LIMIT 10",
    ] {
        round_trip(input);
    }
}

#[test]
fn delete_statement() {
    let Statement::Delete(DeleteStatement { source, condition }) =
        parse("DELETE FROM myseries WHERE host = 'hosta.influxdb.org'")
    else {
        panic!("expected DELETE statement");
    };
    assert_eq!(measurement_name(&source), "myseries");
    assert_eq!(
        condition,
        Some(Expr::var_ref("host").eq(Expr::string("hosta.influxdb.org")))
    );
    round_trip("DELETE FROM myseries WHERE host = 'hosta.influxdb.org'");
}

#[test]
fn delete_without_condition() {
    let Statement::Delete(stmt) = parse("DELETE FROM myseries") else {
        panic!("expected DELETE statement");
    };
    assert!(stmt.condition.is_none());
}

#[test]
fn select_condition_strings_are_not_wildcards() {
    // The wildcard special case applies to the field list only.
    let s = parse_select("SELECT * FROM m WHERE a = 1");
    assert_eq!(s.fields.len(), 1);
    assert!(matches!(
        s.condition,
        Some(Expr::Binary {
            op: BinaryOp::Eq,
            ..
        })
    ));
}

#[test]
fn select_where_time_literal() {
    let s = parse_select("SELECT value FROM cpu WHERE time > '2000-01-01 00:00:00'");
    let Some(Expr::Binary { rhs, .. }) = s.condition else {
        panic!("expected binary condition");
    };
    assert!(matches!(*rhs, Expr::Literal(Literal::Time(_))));
}
