//! Matcher combinators over a small tree

use cppdecl_foundation::{DeclId, Location};
use cppdecl_model::{
    AccessType, Argument, CalldefKind, DeclCategory, DeclTree, Declaration, FundamentalKind, Type,
    Virtuality,
};
use cppdecl_query::{
    AccessTypeMatcher, CalldefMatcher, CustomMatcher, DeclarationMatcher, Matcher, MatcherExt,
    OperatorMatcher, RegexMatcher, VariableMatcher, VirtualityTypeMatcher,
};

struct Sample {
    tree: DeclTree,
    widget: DeclId,
    count: DeclId,
    label: DeclId,
    paint: DeclId,
    equals: DeclId,
}

fn sample() -> Sample {
    let mut tree = DeclTree::new();
    let ui = tree.insert(tree.root(), Declaration::namespace("ui")).unwrap();
    let widget = tree
        .insert(
            ui,
            Declaration::class("Widget").with_location(Location::new("/src/ui/widget.h", 10)),
        )
        .unwrap();
    let count = tree
        .insert_member(widget, Declaration::variable("count", Type::int()), AccessType::Private)
        .unwrap();
    let label = tree
        .insert_member(
            widget,
            Declaration::variable("label", Type::fundamental(FundamentalKind::Char).into_pointer()),
            AccessType::Public,
        )
        .unwrap();
    let paint = tree
        .insert_member(
            widget,
            Declaration::member_function("paint", Type::void(), vec![Argument::new("x", Type::int())])
                .with_calldef(|c| c.virtuality = Virtuality::PureVirtual),
            AccessType::Public,
        )
        .unwrap();
    let widget_ref = Type::Declarated(widget).into_const().into_reference();
    let equals = tree
        .insert_member(
            widget,
            Declaration::calldef(
                "operator==",
                CalldefKind::MemberOperator,
                Some(Type::fundamental(FundamentalKind::Bool)),
                vec![Argument::new("other", widget_ref)],
            ),
            AccessType::Public,
        )
        .unwrap();
    Sample {
        tree,
        widget,
        count,
        label,
        paint,
        equals,
    }
}

#[test]
fn combinators() {
    let s = sample();
    let variables = DeclarationMatcher::new().with_category(DeclCategory::Variable);
    let public = AccessTypeMatcher::new(AccessType::Public);
    let public_variables = variables.clone().and(public);
    assert!(public_variables.matches(&s.tree, s.label));
    assert!(!public_variables.matches(&s.tree, s.count));

    let either = DeclarationMatcher::named("count").or(DeclarationMatcher::named("label"));
    assert!(either.matches(&s.tree, s.count));
    assert!(either.matches(&s.tree, s.label));
    assert!(!either.matches(&s.tree, s.paint));

    let not_variable = variables.not();
    assert!(not_variable.matches(&s.tree, s.paint));
    assert!(!not_variable.matches(&s.tree, s.count));
    assert!(public_variables.describe().contains("access type"));
}

#[test]
fn names_short_and_qualified() {
    let s = sample();
    assert!(DeclarationMatcher::named("Widget").matches(&s.tree, s.widget));
    assert!(DeclarationMatcher::named("::ui::Widget").matches(&s.tree, s.widget));
    assert!(DeclarationMatcher::named("ui::Widget").matches(&s.tree, s.widget));
    assert!(!DeclarationMatcher::named("::Widget").matches(&s.tree, s.widget));
}

#[test]
fn header_locations() {
    let s = sample();
    let inside = DeclarationMatcher::new().with_header_dir("/src/ui").unwrap();
    assert!(inside.matches(&s.tree, s.widget));
    let sibling = DeclarationMatcher::new().with_header_dir("/src/u").unwrap();
    assert!(!sibling.matches(&s.tree, s.widget));
    let file = DeclarationMatcher::new()
        .with_header_file("/src/ui/widget.h")
        .unwrap();
    assert!(file.matches(&s.tree, s.widget));
    assert!(!file.matches(&s.tree, s.count));
    assert!(DeclarationMatcher::new().with_header_dir("src").is_err());
}

#[test]
fn signature_matchers() {
    let s = sample();
    assert!(VariableMatcher::named("label").with_type("char *").matches(&s.tree, s.label));
    assert!(!VariableMatcher::named("label").with_type(Type::int()).matches(&s.tree, s.label));

    let paint = CalldefMatcher::named("paint")
        .with_return_type(Type::void())
        .with_arguments(vec![Some(Type::int().into())]);
    assert!(paint.matches(&s.tree, s.paint));
    let any_argument = CalldefMatcher::named("paint").with_arguments(vec![None]);
    assert!(any_argument.matches(&s.tree, s.paint));
    let no_arguments = CalldefMatcher::named("paint").with_arguments(vec![]);
    assert!(!no_arguments.matches(&s.tree, s.paint));

    assert!(OperatorMatcher::symbol("==").matches(&s.tree, s.equals));
    assert!(!OperatorMatcher::symbol("!=").matches(&s.tree, s.equals));
}

#[test]
fn virtuality_regex_and_custom() {
    let s = sample();
    assert!(VirtualityTypeMatcher::new(Virtuality::PureVirtual).matches(&s.tree, s.paint));
    assert!(!VirtualityTypeMatcher::new(Virtuality::NotVirtual).matches(&s.tree, s.paint));

    let regex = RegexMatcher::new("co").unwrap();
    assert!(regex.matches(&s.tree, s.count));
    assert!(!regex.matches(&s.tree, s.label));
    assert!(RegexMatcher::new("(").is_err());

    let full_name = RegexMatcher::new(r"::ui::")
        .unwrap()
        .with_extractor(|tree, id| tree.full_name(id).ok());
    assert!(full_name.matches(&s.tree, s.widget));

    let has_members = CustomMatcher::new("has members", |tree, id| {
        tree.decl(id)
            .ok()
            .and_then(|d| d.as_class())
            .is_some_and(|c| c.all_members().next().is_some())
    });
    assert!(has_members.matches(&s.tree, s.widget));
    assert!(!has_members.matches(&s.tree, s.count));
}
