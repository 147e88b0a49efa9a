// tests/action_parser_tests.rs

use metarule::ast::{Action, CollectionOp, CollectionVerb, Condition, Literal, MoveDestination, Operation, SortOrder};
use metarule::path::Path;
use metarule::{ParseError, parse_action};

fn parse(text: &str) -> Action {
    parse_action(text).unwrap()
}

fn parse_err(text: &str) -> ParseError {
    parse_action(text).unwrap_err()
}

fn collection(text: &str) -> CollectionOp {
    let mut action = parse(text);
    assert_eq!(action.operations.len(), 1);
    match action.operations.remove(0) {
        Operation::Collection(op) => op,
        other => panic!("Expected collection operation, got {:?}", other),
    }
}

// ============================================================================
// Scalar operations
// ============================================================================

#[test]
fn test_set_multiple_fields() {
    let action = parse("SET status \"published\", reviewed TODAY");
    assert_eq!(
        action.operations,
        vec![
            Operation::Set {
                path: Path::key("status"),
                value: Literal::String("published".into()),
            },
            Operation::Set {
                path: Path::key("reviewed"),
                value: Literal::Today,
            },
        ]
    );
}

#[test]
fn test_set_accepts_equals_sign() {
    assert_eq!(parse("SET status = \"done\""), parse("SET status \"done\""));
}

#[test]
fn test_set_object_and_list_values() {
    match &parse("SET meta {owner: \"sam\", tags: [\"a\"]}").operations[0] {
        Operation::Set {
            value: Literal::Object(pairs),
            ..
        } => {
            assert_eq!(pairs[0].0, "owner");
            assert_eq!(pairs[1].1, Literal::Array(vec![Literal::String("a".into())]));
        }
        other => panic!("Expected SET with object, got {:?}", other),
    }
}

#[test]
fn test_delete_and_rename() {
    assert_eq!(parse("DELETE draft, temp").operations.len(), 2);
    assert_eq!(
        parse("RENAME author TO creator").operations,
        vec![Operation::Rename {
            from: Path::key("author"),
            to: Path::key("creator"),
        }]
    );
}

#[test]
fn test_increment_amounts() {
    assert_eq!(
        parse("INCREMENT views 5, shares").operations,
        vec![
            Operation::Increment {
                path: Path::key("views"),
                amount: Some(5.0),
            },
            Operation::Increment {
                path: Path::key("shares"),
                amount: None,
            },
        ]
    );
    assert!(matches!(
        parse("DECREMENT stock 2.5").operations[0],
        Operation::Decrement { amount: Some(a), .. } if a == 2.5
    ));
}

// ============================================================================
// Collection operations
// ============================================================================

#[test]
fn test_append_prepend() {
    assert_eq!(collection("FOR tags APPEND \"x\"").verb, CollectionVerb::Append(Literal::String("x".into())));
    assert_eq!(collection("FOR tags PREPEND 1").verb, CollectionVerb::Prepend(Literal::Number(1.0)));
}

#[test]
fn test_insert_at() {
    assert_eq!(
        collection("FOR tags INSERT \"x\" AT -2").verb,
        CollectionVerb::Insert {
            value: Literal::String("x".into()),
            at: -2,
        }
    );
}

#[test]
fn test_remove_forms() {
    assert_eq!(
        collection("FOR tags REMOVE \"draft\"").verb,
        CollectionVerb::Remove(Some(Literal::String("draft".into())))
    );
    let op = collection("FOR tasks WHERE done = true REMOVE");
    assert_eq!(op.verb, CollectionVerb::Remove(None));
    assert!(matches!(op.filter, Some(Condition::Comparison { .. })));

    match collection("FOR tags REMOVE_ALL [\"a\", \"b\"]").verb {
        CollectionVerb::RemoveAll(Literal::Array(items)) => assert_eq!(items.len(), 2),
        other => panic!("Expected REMOVE_ALL list, got {:?}", other),
    }
}

#[test]
fn test_sort_forms() {
    assert_eq!(
        collection("FOR tags SORT").verb,
        CollectionVerb::Sort {
            by: None,
            order: SortOrder::Asc,
        }
    );
    assert_eq!(
        collection("FOR tasks SORT BY priority DESC").verb,
        CollectionVerb::Sort {
            by: Some(Path::key("priority")),
            order: SortOrder::Desc,
        }
    );
    assert_eq!(collection("FOR tags SORT ASC").verb, collection("FOR tags SORT").verb);
}

#[test]
fn test_move_forms() {
    assert_eq!(collection("FOR tasks MOVE FROM 0 TO -1").verb, CollectionVerb::MoveIndex { from: 0, to: -1 });
    assert_eq!(
        collection("FOR tags WHERE @ = \"urgent\" MOVE TO START").verb,
        CollectionVerb::MoveWhere(MoveDestination::Start)
    );
    assert_eq!(
        collection("FOR tasks WHERE done = true MOVE TO END").verb,
        CollectionVerb::MoveWhere(MoveDestination::End)
    );
    assert!(matches!(
        collection("FOR tasks WHERE id = 3 MOVE TO AFTER id = 1").verb,
        CollectionVerb::MoveWhere(MoveDestination::After(Condition::Comparison { .. }))
    ));
    assert!(matches!(
        collection("FOR tasks WHERE id = 3 MOVE TO BEFORE id = 1 OR id = 2").verb,
        CollectionVerb::MoveWhere(MoveDestination::Before(Condition::Or(_, _)))
    ));
}

#[test]
fn test_deduplicate_and_merge() {
    assert_eq!(collection("FOR tags DEDUPLICATE").verb, CollectionVerb::Deduplicate);
    assert!(matches!(collection("FOR meta MERGE {a: 1}").verb, CollectionVerb::Merge { deep: true, .. }));
    assert!(matches!(
        collection("FOR meta MERGE_OVERWRITE {a: 1}").verb,
        CollectionVerb::Merge { deep: false, .. }
    ));
}

#[test]
fn test_where_set_assignments() {
    let op = collection("FOR countsLog WHERE mantra = \"Brave New World\" SET unit \"Meditations\", verified true");
    assert_eq!(op.target, Path::key("countsLog"));
    match op.verb {
        CollectionVerb::Update(assignments) => {
            assert_eq!(assignments.len(), 2);
            assert_eq!(assignments[0], (Path::key("unit"), Literal::String("Meditations".into())));
            assert_eq!(assignments[1], (Path::key("verified"), Literal::Boolean(true)));
        }
        other => panic!("Expected SET assignments, got {:?}", other),
    }
}

#[test]
fn test_where_set_current_element() {
    match collection("FOR tags WHERE @ = \"wip\" SET @ \"in-progress\"").verb {
        CollectionVerb::Update(assignments) => assert!(assignments[0].0.is_current()),
        other => panic!("Expected SET assignments, got {:?}", other),
    }
}

// ============================================================================
// Validation errors
// ============================================================================

#[test]
fn test_empty_action() {
    assert!(parse_err("").message.contains("Expected an action"));
}

#[test]
fn test_where_rejected_for_append() {
    let err = parse_err("FOR tags WHERE @ = \"a\" APPEND \"b\"");
    assert!(err.message.starts_with("APPEND does not accept a WHERE clause"));
    assert_eq!(err.offset, 9);
}

#[test]
fn test_where_rejected_for_other_verbs() {
    for text in [
        "FOR tags WHERE @ = 1 PREPEND 2",
        "FOR tags WHERE @ = 1 INSERT 2 AT 0",
        "FOR tags WHERE @ = 1 REMOVE_ALL 2",
        "FOR tags WHERE @ = 1 SORT",
        "FOR tags WHERE @ = 1 DEDUPLICATE",
        "FOR tags WHERE @ = 1 MOVE FROM 0 TO 1",
        "FOR meta WHERE a = 1 MERGE {b: 2}",
        "FOR meta WHERE a = 1 MERGE_OVERWRITE {b: 2}",
    ] {
        let err = parse_err(text);
        assert!(err.message.contains("does not accept a WHERE clause"), "{}: {}", text, err);
    }
}

#[test]
fn test_where_must_precede_verb() {
    let err = parse_err("FOR tags REMOVE \"a\" WHERE @ = \"b\"");
    assert!(err.message.contains("WHERE must come before the verb"));
}

#[test]
fn test_for_set_without_where() {
    let err = parse_err("FOR tasks SET status \"done\"");
    assert!(err.message.contains("requires a WHERE clause"));
    assert!(err.message.contains("FOR tasks WHERE"));
}

#[test]
fn test_move_to_without_where() {
    let err = parse_err("FOR tags MOVE TO START");
    assert!(err.message.starts_with("MOVE TO needs a WHERE clause"));
}

#[test]
fn test_remove_needs_value_or_where() {
    let err = parse_err("FOR tags REMOVE");
    assert!(err.message.contains("a value after REMOVE, or a WHERE clause"));
    let err = parse_err("FOR tasks WHERE done REMOVE \"x\"");
    assert!(err.message.contains("takes no value"));
}

#[test]
fn test_insert_requires_at() {
    let err = parse_err("FOR tags INSERT \"x\"");
    assert!(err.message.contains("INSERT requires an explicit position"));
}

#[test]
fn test_top_level_where() {
    let err = parse_err("WHERE done = true SET a 1");
    assert!(err.message.starts_with("WHERE is only allowed after FOR path"));
}

#[test]
fn test_collection_verb_needs_for() {
    let err = parse_err("APPEND \"x\"");
    assert!(err.message.contains("APPEND needs a target introduced by FOR"));
}

#[test]
fn test_scalar_verb_rejects_for_and_where() {
    assert!(parse_err("FOR views INCREMENT").message.contains("does not take a FOR prefix"));
    assert!(
        parse_err("SET status \"x\" WHERE a = 1")
            .message
            .contains("Scalar operations do not accept WHERE")
    );
}

#[test]
fn test_one_verb_per_action() {
    let err = parse_err("SET a 1, DELETE b");
    assert!(err.message.contains("one action uses one verb"));
}

#[test]
fn test_missing_set_value() {
    let err = parse_err("SET status");
    assert!(err.message.starts_with("Expected a value for 'status'"));
    assert_eq!(err.offset, 10);
}

#[test]
fn test_scalar_target_must_name_a_field() {
    let err = parse_err("SET @ 5");
    assert!(err.message.contains("cannot target the whole document"));
    assert_eq!(err.offset, 4);

    assert!(parse_err("DELETE @").message.contains("cannot target the whole document"));
    assert_eq!(parse_err("RENAME a TO @").offset, 12);
    // `@` inside a path is still fine
    assert_eq!(parse("SET @.status \"done\"").operations.len(), 1);
}

#[test]
fn test_trailing_tokens() {
    let err = parse_err("FOR tags DEDUPLICATE now");
    assert!(err.message.contains("after complete action"));
}
