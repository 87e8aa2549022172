//! Function signature table tests.

use calc::hir::{FunctionCategory, FunctionSignature, FunctionTable, TableError};
use rstest::rstest;

#[rstest]
#[case("SUM", "1")]
#[case("IIF", "3-4")]
#[case("NOW", "0")]
#[case("ROUND", "1-2")]
#[case("IF", "1+")]
fn test_builtin_arity_labels(#[case] name: &str, #[case] label: &str) {
    let table = FunctionTable::builtin();
    let signature = table
        .get(name)
        .unwrap_or_else(|| panic!("{name} should be built in"));
    assert_eq!(signature.arity_label(), label);
}

#[test]
fn test_lookup_is_case_insensitive() {
    let table = FunctionTable::builtin();
    assert_eq!(table.get("dateadd").map(|s| s.name.as_str()), Some("DATEADD"));
    assert!(table.get("NotAFunction").is_none());
}

#[test]
fn test_builtin_covers_every_category() {
    let table = FunctionTable::builtin();
    for category in [
        FunctionCategory::Aggregate,
        FunctionCategory::Logical,
        FunctionCategory::String,
        FunctionCategory::Date,
        FunctionCategory::Number,
        FunctionCategory::TypeConversion,
        FunctionCategory::TableCalculation,
        FunctionCategory::Construct,
    ] {
        assert!(
            table.iter().any(|s| s.category == category),
            "no {} functions",
            category.as_str()
        );
    }
}

#[test]
fn test_custom_table_replaces_builtin() {
    let table = FunctionTable::from_entries([
        FunctionSignature::new("my_func", 1, Some(3)).with_syntax("MY_FUNC(a, [b], [c])"),
        FunctionSignature::new("OTHER", 0, None),
    ])
    .unwrap();

    assert_eq!(table.len(), 2);
    let names: Vec<_> = table.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["MY_FUNC", "OTHER"]);
    assert!(table.get("my_func").unwrap().accepts(3));
    assert!(!table.get("my_func").unwrap().accepts(4));
    assert!(table.get("OTHER").unwrap().accepts(100));
}

#[test]
fn test_load_failures() {
    assert!(matches!(
        FunctionTable::from_entries(Vec::new()),
        Err(TableError::Empty)
    ));
    assert!(matches!(
        FunctionTable::from_entries([
            FunctionSignature::new("A", 1, Some(1)),
            FunctionSignature::new("a", 1, Some(1)),
        ]),
        Err(TableError::Duplicate(_))
    ));
    assert!(matches!(
        FunctionTable::from_entries([FunctionSignature::new("B", 3, Some(1))]),
        Err(TableError::InvalidArity { .. })
    ));
    assert!(matches!(
        FunctionTable::from_entries([FunctionSignature::new("  ", 0, None)]),
        Err(TableError::EmptyName { index: 0 })
    ));
}
