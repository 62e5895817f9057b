//! Copy semantics and special members of class hierarchies

use cppdecl_foundation::DeclId;
use cppdecl_model::{AccessType, Argument, CalldefKind, DeclTree, Declaration, Type, Virtuality};
use cppdecl_query::QueryEngine;
use cppdecl_traits::{
    find_noncopyable_vars, has_public_destructor, has_vtable, is_base_and_derived,
    is_noncopyable, recursive_bases,
};

/// Adds the members a compiler would declare implicitly.
fn implicit_members(tree: &mut DeclTree, class: DeclId, name: &str) {
    let copy = Type::Declarated(class).into_const().into_reference();
    let members = [
        Declaration::constructor(name, vec![]),
        Declaration::constructor(name, vec![Argument::new("", copy.clone())]),
        Declaration::calldef(
            "operator=",
            CalldefKind::MemberOperator,
            Some(Type::Declarated(class).into_reference()),
            vec![Argument::new("", copy)],
        ),
        Declaration::destructor(name),
    ];
    for decl in members {
        tree.insert_member(class, decl.artificial(), AccessType::Public)
            .unwrap();
    }
}

#[test]
fn boost_noncopyable_propagates() {
    let mut tree = DeclTree::new();
    let boost = tree.insert(tree.root(), Declaration::namespace("boost")).unwrap();
    let noncopyable = tree.insert(boost, Declaration::class("noncopyable")).unwrap();
    let resource = tree.insert(tree.root(), Declaration::class("Resource")).unwrap();
    implicit_members(&mut tree, resource, "Resource");
    tree.add_base(resource, noncopyable, AccessType::Private, false)
        .unwrap();
    let file = tree.insert(tree.root(), Declaration::class("File")).unwrap();
    implicit_members(&mut tree, file, "File");
    tree.add_base(file, resource, AccessType::Public, false).unwrap();

    assert!(is_noncopyable(&tree, resource));
    assert!(is_noncopyable(&tree, file));
    assert!(is_base_and_derived(&tree, resource, file));
    let bases: Vec<DeclId> = recursive_bases(&tree, file)
        .into_iter()
        .map(|info| info.related_class)
        .collect();
    assert_eq!(bases, vec![resource, noncopyable]);
}

#[test]
fn members_decide_copyability() {
    let mut tree = DeclTree::new();
    let point = tree.insert(tree.root(), Declaration::struct_("Point")).unwrap();
    implicit_members(&mut tree, point, "Point");
    tree.insert(point, Declaration::variable("x", Type::int())).unwrap();
    assert!(!is_noncopyable(&tree, point));

    let frozen = tree.insert(tree.root(), Declaration::struct_("Frozen")).unwrap();
    implicit_members(&mut tree, frozen, "Frozen");
    let origin = tree
        .insert(
            frozen,
            Declaration::variable("origin", Type::Declarated(point).into_const()),
        )
        .unwrap();
    assert_eq!(find_noncopyable_vars(&tree, frozen), vec![origin]);
}

#[test]
fn virtual_destructor_needs_vtable() {
    let mut tree = DeclTree::new();
    let engine = QueryEngine::new();
    let shape = tree.insert(tree.root(), Declaration::class("Shape")).unwrap();
    implicit_members(&mut tree, shape, "Shape");
    assert!(!has_vtable(&tree, shape));
    assert!(has_public_destructor(&tree, shape));

    let dtor = engine.destructor(&tree, shape, "~Shape").unwrap();
    tree.decl_mut(dtor)
        .unwrap()
        .as_calldef_mut()
        .unwrap()
        .virtuality = Virtuality::Virtual;
    assert!(has_vtable(&tree, shape));
}
