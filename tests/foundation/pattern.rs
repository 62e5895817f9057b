//! Integration tests for the bracket pattern parser

use cppdecl_foundation::{PatternParser, is_call_invocation, is_instantiation};
use proptest::prelude::*;

const TEMPLATES: PatternParser = PatternParser::TEMPLATES;
const CALLS: PatternParser = PatternParser::CALL_INVOCATION;

// =============================================================================
// Recognition
// =============================================================================

#[test]
fn instantiations_are_recognized_in_the_last_segment() {
    assert!(is_instantiation("std::vector<int>"));
    assert!(is_instantiation("ns::A<int>::B<char>"));
    assert!(!is_instantiation("A<int>::B"));
    assert!(!is_instantiation("operator>"));
    assert!(!is_instantiation("plain"));
}

#[test]
fn call_invocations_are_recognized() {
    assert!(is_call_invocation("f(1, 2)"));
    assert!(is_call_invocation("ns::make()"));
    assert!(!is_call_invocation("f"));
}

// =============================================================================
// Splitting
// =============================================================================

#[test]
fn split_nested_template() {
    let (name, args) = TEMPLATES
        .split("std::map<int, std::vector<char, std::allocator<char> > >")
        .unwrap();
    assert_eq!(name, "std::map");
    assert_eq!(
        args,
        vec!["int", "std::vector<char, std::allocator<char> >"]
    );
}

#[test]
fn split_recursive_visits_every_nested_pattern() {
    let splits = TEMPLATES.split_recursive("A<B<C<int> >, D<x> >").unwrap();
    let names: Vec<&str> = splits.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names.len(), 4);
    assert_eq!(names[0], "A");
    for expected in ["B", "C", "D"] {
        assert!(names.contains(&expected), "{expected} missing from {names:?}");
    }
}

#[test]
fn empty_argument_list() {
    assert!(TEMPLATES.args("A< >").unwrap().is_empty());
    assert!(CALLS.args("f()").unwrap().is_empty());
}

#[test]
fn malformed_patterns_are_rejected() {
    assert!(TEMPLATES.args("A<int").is_err());
    assert!(TEMPLATES.args("A int>").is_err());
    assert!(TEMPLATES.args("A>int<").is_err());
    assert!(TEMPLATES.split("plain").is_err());
    let err = TEMPLATES.args("A<B<int>").unwrap_err();
    assert!(format!("{err}").contains("invalid pattern"));
}

#[test]
fn find_args_returns_the_outer_group() {
    let text = "foo(a,(b,c),d)";
    assert_eq!(CALLS.find_args(text, 3), Some((3, text.len() - 1)));
    assert_eq!(CALLS.find_args(text, 4), Some((6, 10)));
    assert_eq!(CALLS.find_args("foo(a,(b,c)", 0), None);
    assert_eq!(CALLS.find_args("foo", 0), None);
}

// =============================================================================
// Joining
// =============================================================================

#[test]
fn join_uses_canonical_spacing() {
    let none: [&str; 0] = [];
    assert_eq!(TEMPLATES.join("A", &none), "A< >");
    assert_eq!(TEMPLATES.join("A", &["x"]), "A< x >");
    assert_eq!(TEMPLATES.join("A", &["x", "y"]), "A< x, y >");
    assert_eq!(TEMPLATES.join_compact("A", &["x", "y"]), "A<x,y>");
    assert_eq!(CALLS.join("f", &["1", "2"]), "f( 1, 2 )");
}

#[test]
fn normalize_equates_spellings() {
    assert_eq!(
        TEMPLATES.normalize("std::map<int,std::vector<char>>"),
        TEMPLATES.normalize("std::map< int, std::vector< char > >")
    );
    assert_eq!(TEMPLATES.normalize("plain"), "plain");
}

// =============================================================================
// Properties
// =============================================================================

fn identifier() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,8}"
}

proptest! {
    #[test]
    fn join_then_split_recovers_parts(
        name in identifier(),
        args in prop::collection::vec(identifier(), 1..5),
    ) {
        let joined = TEMPLATES.join(&name, &args);
        let (split_name, split_args) = TEMPLATES.split(&joined).unwrap();
        prop_assert_eq!(split_name, name);
        prop_assert_eq!(split_args, args);
    }

    #[test]
    fn normalize_is_idempotent(
        outer in identifier(),
        inner in identifier(),
        args in prop::collection::vec(identifier(), 1..4),
        spacing in prop::bool::ANY,
    ) {
        let nested = if spacing {
            TEMPLATES.join_compact(&inner, &args)
        } else {
            TEMPLATES.join(&inner, &args)
        };
        let text = TEMPLATES.join_compact(&outer, &[nested.as_str(), "int"]);
        let once = TEMPLATES.normalize(&text);
        prop_assert_eq!(TEMPLATES.normalize(&once), once);
    }
}
