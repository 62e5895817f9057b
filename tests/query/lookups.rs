//! Single and plural lookups and their failures

use cppdecl_foundation::{DeclId, ErrorKind, QueryConfig};
use cppdecl_model::{AccessType, Argument, DeclTree, Declaration, FundamentalKind, Type};
use cppdecl_query::{DeclarationMatcher, QueryEngine, QueryOptions};

struct Sample {
    tree: DeclTree,
    app: DeclId,
    shape: DeclId,
}

fn sample() -> Sample {
    let mut tree = DeclTree::new();
    let app = tree.insert(tree.root(), Declaration::namespace("app")).unwrap();
    let shape = tree.insert(app, Declaration::class("Shape")).unwrap();
    tree.insert_member(
        shape,
        Declaration::member_function("area", Type::fundamental(FundamentalKind::Double), vec![]),
        AccessType::Public,
    )
    .unwrap();
    tree.insert_member(shape, Declaration::constructor("Shape", vec![]), AccessType::Public)
        .unwrap();
    tree.insert_member(shape, Declaration::destructor("Shape"), AccessType::Public)
        .unwrap();
    tree.insert(
        app,
        Declaration::free_function("draw", Type::void(), vec![Argument::new("n", Type::int())]),
    )
    .unwrap();
    tree.insert(
        app,
        Declaration::free_function(
            "draw",
            Type::void(),
            vec![Argument::new("s", Type::Declarated(shape).into_const().into_reference())],
        ),
    )
    .unwrap();
    Sample { tree, app, shape }
}

#[test]
fn single_lookups_by_kind() {
    let s = sample();
    let engine = QueryEngine::new();
    let root = s.tree.root();
    assert_eq!(engine.namespace(&s.tree, root, "app").unwrap(), s.app);
    assert_eq!(engine.class(&s.tree, root, "::app::Shape").unwrap(), s.shape);
    assert_eq!(engine.class(&s.tree, root, "app::Shape").unwrap(), s.shape);
    assert!(engine.member_function(&s.tree, s.shape, "area").is_ok());
    assert!(engine.constructor(&s.tree, s.shape, "Shape").is_ok());
    assert!(engine.destructor(&s.tree, s.shape, "~Shape").is_ok());
}

#[test]
fn missing_declaration_is_not_found() {
    let s = sample();
    let engine = QueryEngine::new();
    let err = engine.class(&s.tree, s.tree.root(), "Circle").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotFound { .. }));
    let context = err.context.unwrap();
    assert_eq!(context.scope.as_deref(), Some("::"));
}

#[test]
fn overloads_are_ambiguous() {
    let s = sample();
    let engine = QueryEngine::new();
    let err = engine.free_function(&s.tree, s.app, "draw").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Ambiguous { count: 2, .. }));
    assert_eq!(engine.free_functions(&s.tree, s.app, Some("draw")).unwrap().len(), 2);
}

#[test]
fn empty_plural_results_need_permission() {
    let s = sample();
    let engine = QueryEngine::new();
    let matcher = DeclarationMatcher::named("nothing");
    assert!(engine.find(&s.tree, s.app, &matcher).unwrap_err().is_not_found());

    let options = QueryOptions::new().with_allow_empty(true);
    let group = engine.find_with(&s.tree, s.app, &matcher, options).unwrap();
    assert!(group.is_empty());

    let lenient = QueryEngine::with_config(QueryConfig::default().with_allow_empty(true));
    assert!(lenient.find(&s.tree, s.app, &matcher).unwrap().is_empty());
}

#[test]
fn non_recursive_lookups_stay_in_scope() {
    let s = sample();
    let engine = QueryEngine::new();
    let direct = QueryOptions::new().with_recursive(false);
    let matcher = DeclarationMatcher::named("Shape");
    assert!(engine
        .find_single_with(&s.tree, s.tree.root(), &matcher, direct)
        .is_err());
    assert_eq!(
        engine.find_single_with(&s.tree, s.app, &matcher, direct).unwrap(),
        s.shape
    );
}

#[test]
fn groups_apply_batch_edits() {
    let mut s = sample();
    let engine = QueryEngine::new();
    let group = engine.free_functions(&s.tree, s.app, Some("draw")).unwrap();
    group.set_attributes(&mut s.tree, "gccxml(exported)").unwrap();
    for id in group.iter() {
        assert_eq!(
            s.tree.decl(id).unwrap().attributes.as_deref(),
            Some("gccxml(exported)")
        );
    }
    assert_eq!(
        group.full_names(&s.tree).unwrap(),
        vec!["::app::draw", "::app::draw"]
    );
}
