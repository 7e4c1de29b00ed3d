//! End-to-end tests for filters over JSON records.
//!
//! These tests exercise the public API the way a caller would: build or
//! decode a filter against a stat set, evaluate it over records, store it as
//! compact JSON and translate it for the remote API.

use std::sync::Arc;

use serde_json::{json, Value};
use stat_filter::filter::{
    ApiCompareOperator, ApiCondition, ApiFilter, ApiValue, CompareOp, Filter, FilterIdAllocator,
    LteMapping, Operand, RemoteTranslator,
};
use stat_filter::stat::{JsonStat, StatLookup, StatRef, StatSet};

fn stat(id: &str, api_field: &str, path: &str) -> StatRef<Value> {
    Arc::new(JsonStat::new(id, api_field, path))
}

fn team_stats() -> StatSet<Value> {
    StatSet::new()
        .with_group(
            "Scoring",
            vec![
                stat("auto", "AutoPoints", "/scores/auto"),
                stat("teleop", "DcPoints", "/scores/teleop"),
                stat("total", "TotalPoints", "/scores/total"),
            ],
        )
        .with_group(
            "Team",
            vec![
                stat("number", "TeamNumber", "/number"),
                stat("name", "TeamName", "/name"),
                stat("rank", "Rank", "/rank"),
            ],
        )
}

fn team_records() -> Vec<Value> {
    vec![
        json!({
            "number": 5064,
            "name": "Aperture Science",
            "rank": {"number": 1, "name": "1st"},
            "scores": {"auto": 40, "teleop": 120, "total": 160}
        }),
        json!({
            "number": 8565,
            "name": "Technical Difficulties",
            "rank": {"number": 4, "name": "4th"},
            "scores": {"auto": 12, "teleop": 150, "total": 162}
        }),
        json!({
            "number": 16236,
            "name": "Brick Wall",
            "rank": {"number": 9, "name": "9th"},
            "scores": {"auto": 0, "teleop": 45, "total": 45}
        }),
        json!({
            "number": 11115,
            "name": "Gluten Free",
            "scores": {"auto": 25}
        }),
    ]
}

fn numbers(records: &[&Value]) -> Vec<i64> {
    records.iter().filter_map(|r| r["number"].as_i64()).collect()
}

#[test]
fn test_x_greater_than_y_example() {
    let ids = FilterIdAllocator::new();
    let x = stat("x", "X", "/x");
    let y = stat("y", "Y", "/y");
    let records = vec![json!({"x": 1, "y": 2}), json!({"x": 5, "y": 1})];

    let filter = Filter::compare(&ids, Operand::Stat(x), CompareOp::Gt, Operand::Stat(y));
    assert_eq!(filter.filter_records(&records), vec![&records[1]]);
}

#[test]
fn test_decode_and_filter_records() {
    let stats = team_stats();
    let ids = FilterIdAllocator::new();
    let stored = json!({
        "all": [
            {"lhs": "total", "op": "≥", "rhs": 100},
            {"any": [
                {"lhs": "auto", "op": ">", "rhs": "teleop"},
                {"lhs": "rank", "op": "≤", "rhs": 5}
            ]}
        ]
    });

    let filter = Filter::from_json(&stored, &stats, &ids).expect("filter should decode");
    let records = team_records();
    assert_eq!(numbers(&filter.filter_records(&records)), vec![5064, 8565]);
}

#[test]
fn test_missing_fields_do_not_match_ordering() {
    let stats = team_stats();
    let ids = FilterIdAllocator::new();
    let filter = Filter::from_json(
        &json!({"lhs": "teleop", "op": "≥", "rhs": 0}),
        &stats,
        &ids,
    )
    .unwrap();

    let records = team_records();
    assert_eq!(numbers(&filter.filter_records(&records)), vec![5064, 8565, 16236]);
}

#[test]
fn test_text_and_numeric_stats_never_equal() {
    let stats = team_stats();
    let ids = FilterIdAllocator::new();
    let name = stats.find("name").unwrap();
    let rank = stats.find("rank").unwrap();

    // rank has a numeric projection, name does not: never equal.
    let filter = Filter::compare(&ids, Operand::Stat(name), CompareOp::Eq, Operand::Stat(rank));
    let records = team_records();
    assert!(filter.filter_records(&records).is_empty());
}

#[test]
fn test_compact_json_round_trip_evaluates_identically() {
    let stats = team_stats();
    let ids = FilterIdAllocator::new();
    let auto = stats.find("auto").unwrap();
    let teleop = stats.find("teleop").unwrap();
    let rank = stats.find("rank").unwrap();
    let total = stats.find("total").unwrap();

    let tree = Filter::any(
        &ids,
        vec![
            Filter::all(
                &ids,
                vec![
                    Filter::compare(&ids, Operand::Stat(auto.clone()), CompareOp::Gte, Operand::Number(20.0)),
                    Filter::compare(&ids, Operand::Stat(rank), CompareOp::Neq, Operand::Number(1.0)),
                ],
            ),
            Filter::compare(&ids, Operand::Stat(teleop), CompareOp::Lt, Operand::Stat(auto)),
            Filter::compare(&ids, Operand::Number(100.0), CompareOp::Eq, Operand::Stat(total)),
            Filter::empty(&ids),
        ],
    );

    let decoded = Filter::from_json(&tree.to_json(), &stats, &ids).unwrap();
    assert_eq!(decoded, tree);

    for record in team_records() {
        assert_eq!(decoded.matches(&record), tree.matches(&record), "{record}");
    }
}

#[test]
fn test_round_trip_through_text() {
    let stats = team_stats();
    let ids = FilterIdAllocator::new();
    let text = r#"{"any":[{"lhs":"number","op":"<","rhs":10000},{"lhs":"auto","op":"=","rhs":0}]}"#;

    let filter = Filter::from_json_str(text, &stats, &ids).unwrap();
    let reencoded = serde_json::to_string(&filter.to_json()).unwrap();
    assert_eq!(reencoded, text);
    let again = Filter::from_json_str(&reencoded, &stats, &ids).unwrap();
    assert_eq!(filter, again);

    let records = team_records();
    assert_eq!(numbers(&again.filter_records(&records)), vec![5064, 8565, 16236]);
}

#[test]
fn test_decode_prunes_malformed_children() {
    let stats = team_stats();
    let ids = FilterIdAllocator::new();
    let json = json!({"all": [{"malformed": true}, {"lhs": 1, "op": "=", "rhs": 2}]});

    let filter: Filter<Value> = Filter::from_json(&json, &stats, &ids).unwrap();
    let conditions = filter.conditions().unwrap();
    assert!(matches!(filter, Filter::All { .. }));
    assert_eq!(conditions.len(), 1);
}

#[test]
fn test_unconfigured_leaf_is_pruned_on_decode() {
    let stats = team_stats();
    let ids = FilterIdAllocator::new();
    let auto = stats.find("auto").unwrap();
    let tree = Filter::all(
        &ids,
        vec![Filter::compare(&ids, Operand::Stat(auto), CompareOp::Gt, Operand::Unset)],
    );

    let decoded = Filter::from_json(&tree.to_json(), &stats, &ids).unwrap();
    assert!(decoded.is_empty());
}

#[test]
fn test_remote_translation() {
    let stats = team_stats();
    let ids = FilterIdAllocator::new();
    let stored = json!({
        "all": [
            {"lhs": "auto", "op": "≤", "rhs": 30},
            {"lhs": "rank", "op": "<", "rhs": null}
        ]
    });
    // The second leaf has a null side and is dropped on decode.
    let filter = Filter::from_json(&stored, &stats, &ids).unwrap();
    let total = stats.find("total").unwrap();
    let with_unset = Filter::all(
        &ids,
        vec![
            filter.conditions().unwrap()[0].clone(),
            Filter::compare(&ids, Operand::Stat(total), CompareOp::Gt, Operand::Unset),
        ],
    );

    assert_eq!(
        with_unset.to_api_filter(),
        ApiFilter::All(vec![
            ApiFilter::Condition(ApiCondition {
                lhs: ApiValue::Field("AutoPoints".to_string()),
                compare_operator: ApiCompareOperator::Lte,
                rhs: ApiValue::Value(30.0),
            }),
            ApiFilter::Condition(ApiCondition {
                lhs: ApiValue::Value(0.0),
                compare_operator: ApiCompareOperator::Eq,
                rhs: ApiValue::Value(0.0),
            }),
        ])
    );

    let legacy = RemoteTranslator::new().with_lte_mapping(LteMapping::LegacyGt);
    let ApiFilter::All(children) = legacy.translate(&with_unset) else {
        panic!("expected All");
    };
    assert!(matches!(
        &children[0],
        ApiFilter::Condition(c) if c.compare_operator == ApiCompareOperator::Gt
    ));

    let strict = legacy.translate_strict(&with_unset.without_unconfigured()).unwrap();
    let ApiFilter::All(children) = strict else {
        panic!("expected All");
    };
    assert_eq!(children.len(), 1);
}
