//! Declaration paths and qualified names over generated trees

use cppdecl_foundation::DeclId;
use cppdecl_model::{DeclTree, Declaration, full_name_from_path};
use proptest::prelude::*;

/// Builds a tree from `(parent_index, name)` pairs. Parent indices refer to
/// earlier scopes (index 0 is the global namespace).
fn build(shape: &[(usize, String)]) -> (DeclTree, Vec<DeclId>) {
    let mut tree = DeclTree::new();
    let mut scopes = vec![tree.root()];
    for (parent, name) in shape {
        let parent = scopes[parent % scopes.len()];
        let id = tree.insert(parent, Declaration::namespace(name.as_str())).unwrap();
        scopes.push(id);
    }
    (tree, scopes)
}

fn shapes() -> impl Strategy<Value = Vec<(usize, String)>> {
    prop::collection::vec((0usize..16, "[a-c]{1,2}"), 1..24)
}

proptest! {
    #[test]
    fn path_extends_parent_path(shape in shapes()) {
        let (tree, scopes) = build(&shape);
        for id in scopes {
            let path = tree.declaration_path(id).unwrap();
            match tree.parent(id).unwrap() {
                None => prop_assert_eq!(path, vec!["::".to_string()]),
                Some(parent) => {
                    let mut expected = tree.declaration_path(parent).unwrap();
                    expected.push(tree.decl(id).unwrap().name().to_string());
                    prop_assert_eq!(path, expected);
                }
            }
        }
    }

    #[test]
    fn full_name_joins_path(shape in shapes()) {
        let (tree, scopes) = build(&shape);
        for id in scopes {
            let path = tree.declaration_path(id).unwrap();
            prop_assert_eq!(tree.full_name(id).unwrap(), full_name_from_path(&path));
        }
    }

    #[test]
    fn cached_and_uncached_names_agree(shape in shapes()) {
        let (mut tree, scopes) = build(&shape);
        let cached: Vec<String> = scopes.iter().map(|id| tree.full_name(*id).unwrap()).collect();
        tree.set_cache_enabled(false);
        let fresh: Vec<String> = scopes.iter().map(|id| tree.full_name(*id).unwrap()).collect();
        prop_assert_eq!(cached, fresh);
    }
}

#[test]
fn global_namespace_name() {
    let tree = DeclTree::new();
    assert_eq!(tree.declaration_path(tree.root()).unwrap(), vec!["::"]);
    assert_eq!(tree.full_name(tree.root()).unwrap(), "::");
}

#[test]
fn qualified_names_of_nested_declarations() {
    let mut tree = DeclTree::new();
    let app = tree.insert(tree.root(), Declaration::namespace("app")).unwrap();
    let widget = tree.insert(app, Declaration::class("Widget")).unwrap();
    let std = tree.insert(tree.root(), Declaration::namespace("std")).unwrap();
    let vector = tree
        .insert(std, Declaration::class("vector<int, std::allocator<int> >"))
        .unwrap();

    assert_eq!(tree.full_name(widget).unwrap(), "::app::Widget");
    assert_eq!(
        tree.full_name(vector).unwrap(),
        "::std::vector<int, std::allocator<int> >"
    );
    assert_eq!(tree.partial_full_name(vector).unwrap(), "::std::vector<int>");
    assert_eq!(tree.partial_name(vector).unwrap(), "vector<int>");
    assert_eq!(
        tree.qualified_name(vector, false).unwrap(),
        tree.partial_full_name(vector).unwrap()
    );
}

#[test]
fn anonymous_namespaces_are_skipped() {
    let mut tree = DeclTree::new();
    let hidden = tree.insert(tree.root(), Declaration::namespace("")).unwrap();
    let helper = tree.insert(hidden, Declaration::class("Helper")).unwrap();
    assert_eq!(tree.declaration_path(helper).unwrap(), vec!["::", "", "Helper"]);
    assert_eq!(tree.full_name(helper).unwrap(), "::Helper");
}
