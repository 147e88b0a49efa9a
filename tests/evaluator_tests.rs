// tests/evaluator_tests.rs

use chrono::{NaiveDate, NaiveDateTime};
use metarule::convert::yaml_to_value;
use metarule::{Evaluator, Value, evaluate, evaluate_at, parse_condition};

fn doc(yaml: &str) -> Value {
    yaml_to_value(serde_yaml::from_str(yaml).unwrap())
}

fn check(condition: &str, document: &Value) -> bool {
    evaluate(&parse_condition(condition).unwrap(), document)
}

fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(12, 0, 0)).unwrap()
}

fn note() -> Value {
    doc(r#"
title: Weekly review
status: draft
priority: "3"
views: 12
tags: [work, project, 2024]
metadata:
  reviewed: false
  owner: null
tasks:
  - name: write
    done: true
  - name: edit
    done: false
due: 2024-05-01
"#)
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_equality() {
    let d = note();
    assert!(check("status = \"draft\"", &d));
    assert!(!check("status = \"published\"", &d));
    assert!(check("status != \"published\"", &d));
    assert!(check("metadata.reviewed = false", &d));
    assert!(check("metadata.owner = null", &d));
}

#[test]
fn test_numeric_strings_compare_as_numbers() {
    let d = note();
    assert!(check("priority = 3", &d));
    assert!(check("priority < 10", &d));
    assert!(check("views >= \"12\"", &d));
    assert!(!check("views > 12", &d));
}

#[test]
fn test_string_ordering() {
    let d = note();
    assert!(check("due < \"2024-06-01\"", &d));
    assert!(check("title >= \"Weekly\"", &d));
    // no ordering between a string and a boolean
    assert!(!check("status > true", &d));
    assert!(!check("status < true", &d));
}

#[test]
fn test_absent_field_makes_comparisons_false() {
    let d = note();
    assert!(!check("missing = null", &d));
    assert!(!check("missing != \"x\"", &d));
    assert!(!check("missing < 1", &d));
    assert!(!check("title.sub = \"x\"", &d));
}

#[test]
fn test_array_index_paths() {
    let d = note();
    assert!(check("tasks.0.name = \"write\"", &d));
    assert!(check("tasks.-1.done = false", &d));
    assert!(!check("tasks.5.name EXISTS", &d));

    let grid = doc("matrix: [[1, 2], [3, 4]]\n");
    assert!(check("matrix.0.1 = 2", &grid));
    assert!(check("matrix.-1.0 = 3", &grid));
}

// ============================================================================
// Presence and truthiness
// ============================================================================

#[test]
fn test_has() {
    let d = note();
    assert!(check("HAS status", &d));
    assert!(check("HAS metadata.owner", &d));
    assert!(check("NOT HAS reviewed", &d));
    assert!(check("metadata.reviewed EXISTS", &d));
    assert!(check("archived NOT EXISTS", &d));
}

#[test]
fn test_truthiness() {
    let d = doc("a: true\nb: 0\nc: \"\"\nd: []\ne: {}\nf: text\ng: null\n");
    assert!(check("a", &d));
    assert!(!check("b", &d));
    assert!(!check("c", &d));
    assert!(!check("d", &d));
    assert!(!check("e", &d));
    assert!(check("f", &d));
    assert!(!check("g", &d));
    assert!(!check("missing", &d));
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn test_contains() {
    let d = note();
    assert!(check("tags CONTAINS \"work\"", &d));
    assert!(check("tags CONTAINS 2024", &d));
    assert!(!check("tags CONTAINS \"wor\"", &d));
    assert!(check("title CONTAINS \"review\"", &d));
    assert!(check("tags NOT CONTAINS \"archived\"", &d));
    assert!(!check("views CONTAINS 1", &d));
    assert!(!check("missing CONTAINS \"x\"", &d));
}

#[test]
fn test_in() {
    let d = note();
    assert!(check("status IN [\"draft\", \"review\"]", &d));
    assert!(!check("status IN [\"done\"]", &d));
    assert!(check("priority IN [1, 2, 3]", &d));
    assert!(check("status NOT IN [\"done\"]", &d));
    assert!(!check("missing IN [null]", &d));
}

// ============================================================================
// Quantifier and logic
// ============================================================================

#[test]
fn test_any() {
    let d = note();
    assert!(check("ANY tasks WHERE done = false", &d));
    assert!(check("ANY tasks WHERE name = \"edit\" AND done = false", &d));
    assert!(!check("ANY tasks WHERE name = \"edit\" AND done = true", &d));
    assert!(check("ANY tags WHERE @ = \"project\"", &d));
    assert!(!check("ANY title WHERE @ = \"x\"", &d));
    assert!(!check("ANY missing WHERE @ = \"x\"", &d));
}

#[test]
fn test_any_on_empty_array() {
    let d = doc("tasks: []\n");
    assert!(!check("ANY tasks WHERE done = false", &d));
    assert!(check("NOT (ANY tasks WHERE done = false)", &d));
}

#[test]
fn test_logic() {
    let d = note();
    assert!(check("status = \"draft\" AND NOT HAS reviewed", &d));
    assert!(check("status = \"done\" OR views > 10", &d));
    assert!(!check("NOT status = \"draft\"", &d));
    assert!(check("(status = \"done\" OR views > 10) AND HAS tags", &d));
}

// ============================================================================
// Clock and purity
// ============================================================================

#[test]
fn test_today_uses_injected_clock() {
    let d = note();
    let cond = parse_condition("due < TODAY").unwrap();
    assert!(evaluate_at(&cond, &d, noon(2024, 6, 1)));
    assert!(!evaluate_at(&cond, &d, noon(2024, 4, 1)));
    assert!(Evaluator::at(noon(2024, 5, 2)).evaluate(&cond, &d));
    assert_eq!(Evaluator::at(noon(2024, 5, 2)).now(), &noon(2024, 5, 2));
}

#[test]
fn test_evaluation_does_not_mutate() {
    let d = note();
    let before = d.clone();
    for text in [
        "ANY tasks WHERE done = false",
        "missing.deep = 1",
        "HAS a.b.c",
        "tags CONTAINS \"x\"",
    ] {
        check(text, &d);
    }
    assert_eq!(d, before);
}

#[test]
fn test_non_object_root() {
    let d = Value::from("just text");
    assert!(!check("status = \"x\"", &d));
    assert!(check("@ = \"just text\"", &d));
    assert!(check("@ CONTAINS \"text\"", &d));
}
