//! Optimized lookups agree with plain scans

use cppdecl_foundation::{DeclId, QueryConfig};
use cppdecl_model::{AccessType, DeclCategory, DeclTree, Declaration, Type};
use cppdecl_query::{DeclarationMatcher, QueryEngine, QueryOptions};
use proptest::prelude::*;

const NAMES: [&str; 3] = ["a", "b", "c"];

#[derive(Clone, Copy, Debug)]
enum Node {
    Namespace,
    Class,
    Typedef,
    Variable,
    Function,
}

fn node() -> impl Strategy<Value = Node> {
    prop_oneof![
        Just(Node::Namespace),
        Just(Node::Class),
        Just(Node::Typedef),
        Just(Node::Variable),
        Just(Node::Function),
    ]
}

/// Builds a tree where names repeat across scopes. The first three nodes
/// form a namespace chain so there are at least three nesting levels.
fn build(nodes: &[(usize, Node, usize)]) -> DeclTree {
    let mut tree = DeclTree::new();
    let mut scopes = vec![tree.root()];
    for depth in 0..3 {
        let id = tree
            .insert(scopes[depth], Declaration::namespace(NAMES[depth]))
            .unwrap();
        scopes.push(id);
    }
    for (parent, kind, name) in nodes {
        let parent = scopes[parent % scopes.len()];
        let name = NAMES[name % NAMES.len()];
        let decl = match kind {
            Node::Namespace => Declaration::namespace(name),
            Node::Class => Declaration::class(name),
            Node::Typedef => Declaration::typedef(name, Type::int()),
            Node::Variable => Declaration::variable(name, Type::int()),
            Node::Function => Declaration::free_function(name, Type::void(), Vec::new()),
        };
        // Free functions belong to namespaces.
        let parent = if matches!(kind, Node::Function)
            && tree.decl(parent).unwrap().as_class().is_some()
        {
            tree.root()
        } else {
            parent
        };
        let id = tree.insert(parent, decl).unwrap();
        if matches!(kind, Node::Namespace | Node::Class) {
            scopes.push(id);
        }
    }
    tree
}

fn sorted(mut ids: Vec<DeclId>) -> Vec<DeclId> {
    ids.sort();
    ids
}

const CATEGORIES: [Option<DeclCategory>; 5] = [
    None,
    Some(DeclCategory::Namespace),
    Some(DeclCategory::Class),
    Some(DeclCategory::Variable),
    Some(DeclCategory::FreeFunction),
];

proptest! {
    #[test]
    fn optimized_and_scanned_queries_agree(
        nodes in prop::collection::vec((0usize..12, node(), 0usize..3), 0..40),
    ) {
        let tree = build(&nodes);
        let scan = QueryEngine::with_config(QueryConfig::default().with_optimize(false));
        let mut optimized = QueryEngine::new();
        optimized.init_optimizer(&tree, tree.root()).unwrap();

        let scopes: Vec<DeclId> = tree
            .iter()
            .filter(|id| tree.decl(*id).unwrap().is_scope())
            .collect();
        for scope in scopes {
            prop_assert!(optimized.is_optimized(&tree, scope));
            for category in CATEGORIES {
                for name in [None, Some("a"), Some("b"), Some("::a::b")] {
                    let mut matcher = DeclarationMatcher::new();
                    if let Some(category) = category {
                        matcher = matcher.with_category(category);
                    }
                    if let Some(name) = name {
                        matcher = matcher.with_name(name);
                    }
                    for recursive in [true, false] {
                        let options = QueryOptions::new()
                            .with_recursive(recursive)
                            .with_allow_empty(true);
                        let expected = scan.find_with(&tree, scope, &matcher, options).unwrap();
                        let actual = optimized.find_with(&tree, scope, &matcher, options).unwrap();
                        prop_assert_eq!(sorted(actual.into_vec()), sorted(expected.into_vec()));
                    }
                }
            }
        }
    }
}

#[test]
fn edits_invalidate_indices() {
    let mut tree = DeclTree::new();
    let app = tree.insert(tree.root(), Declaration::namespace("app")).unwrap();
    tree.insert(app, Declaration::class("Widget")).unwrap();

    let mut engine = QueryEngine::new();
    engine.init_optimizer(&tree, tree.root()).unwrap();
    assert!(engine.is_optimized(&tree, app));

    let added = tree.insert(app, Declaration::class("Gadget")).unwrap();
    assert!(!engine.is_optimized(&tree, app));
    assert_eq!(engine.class(&tree, tree.root(), "Gadget").unwrap(), added);

    engine.init_optimizer(&tree, tree.root()).unwrap();
    assert!(engine.is_optimized(&tree, app));
    assert_eq!(engine.class(&tree, app, "Gadget").unwrap(), added);

    engine.clear_optimizer();
    assert!(engine.scope_index(app).is_none());
}

#[test]
fn one_engine_across_two_trees() {
    let mut a = DeclTree::new();
    a.insert(a.root(), Declaration::class("X")).unwrap();
    let mut b = DeclTree::new();
    let y = b.insert(b.root(), Declaration::class("Y")).unwrap();

    let mut engine = QueryEngine::new();
    engine.init_optimizer(&a, a.root()).unwrap();
    assert!(!engine.is_optimized(&b, b.root()));
    assert_eq!(
        engine
            .find_single(&b, b.root(), &DeclarationMatcher::new().with_name("Y"))
            .unwrap(),
        y
    );

    engine.init_optimizer(&b, b.root()).unwrap();
    assert!(engine.is_optimized(&b, b.root()));
    assert!(!engine.is_optimized(&a, a.root()));
}

#[test]
fn inheritance_edits_invalidate_indices() {
    let mut tree = DeclTree::new();
    let base = tree.insert(tree.root(), Declaration::class("Base")).unwrap();
    let derived = tree.insert(tree.root(), Declaration::class("Derived")).unwrap();

    let mut engine = QueryEngine::new();
    engine.init_optimizer(&tree, tree.root()).unwrap();
    tree.add_base(derived, base, AccessType::Public, false).unwrap();
    assert!(!engine.is_optimized(&tree, tree.root()));
    assert_eq!(engine.class(&tree, tree.root(), "Derived").unwrap(), derived);
}

#[test]
fn template_names_bypass_the_name_bucket() {
    let mut tree = DeclTree::new();
    let std = tree.insert(tree.root(), Declaration::namespace("std")).unwrap();
    let vector = tree
        .insert(std, Declaration::class("vector<int, std::allocator<int> >"))
        .unwrap();

    let mut engine = QueryEngine::new();
    engine.init_optimizer(&tree, tree.root()).unwrap();
    assert_eq!(engine.class(&tree, tree.root(), "vector<int>").unwrap(), vector);
    assert_eq!(
        engine.class(&tree, tree.root(), "std::vector< int, std::allocator< int > >").unwrap(),
        vector
    );
}
