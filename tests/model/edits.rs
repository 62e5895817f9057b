//! Structural edits and cache invalidation

use cppdecl_model::{AccessType, DeclTree, Declaration, Type};

#[test]
fn full_name_is_stable_until_rename() {
    let mut tree = DeclTree::new();
    let app = tree.insert(tree.root(), Declaration::namespace("app")).unwrap();
    let gui = tree.insert(app, Declaration::namespace("gui")).unwrap();
    let button = tree.insert(gui, Declaration::class("Button")).unwrap();
    let net = tree.insert(app, Declaration::namespace("net")).unwrap();

    assert_eq!(tree.full_name(app).unwrap(), "::app");
    let first = tree.full_name(button).unwrap();
    assert_eq!(first, tree.full_name(button).unwrap());
    assert_eq!(tree.full_name(net).unwrap(), "::app::net");
    assert!(!tree.decl(button).unwrap().cache().is_empty());

    tree.rename(gui, "ui").unwrap();
    assert!(tree.decl(button).unwrap().cache().is_empty());
    assert!(!tree.decl(net).unwrap().cache().is_empty());
    assert!(!tree.decl(app).unwrap().cache().is_empty());

    assert_eq!(tree.full_name(button).unwrap(), "::app::ui::Button");
    assert_eq!(tree.full_name(net).unwrap(), "::app::net");
}

#[test]
fn moving_a_subtree_renames_it() {
    let mut tree = DeclTree::new();
    let a = tree.insert(tree.root(), Declaration::namespace("a")).unwrap();
    let b = tree.insert(tree.root(), Declaration::namespace("b")).unwrap();
    let inner = tree.insert(a, Declaration::namespace("inner")).unwrap();
    let leaf = tree.insert(inner, Declaration::class("Leaf")).unwrap();
    assert_eq!(tree.full_name(leaf).unwrap(), "::a::inner::Leaf");

    tree.remove_declaration(inner).unwrap();
    assert_eq!(tree.parent(inner).unwrap(), None);
    tree.attach(b, inner, None).unwrap();
    assert_eq!(tree.full_name(leaf).unwrap(), "::b::inner::Leaf");
}

#[test]
fn every_edit_bumps_the_revision() {
    let mut tree = DeclTree::new();
    let start = tree.revision();
    let class = tree.insert(tree.root(), Declaration::class("C")).unwrap();
    let after_insert = tree.revision();
    assert!(after_insert > start);

    let member = tree
        .insert_member(class, Declaration::variable("x", Type::int()), AccessType::Private)
        .unwrap();
    tree.set_access(member, AccessType::Public).unwrap();
    let after_access = tree.revision();
    assert!(after_access > after_insert);

    tree.rename(member, "y").unwrap();
    let after_rename = tree.revision();
    assert!(after_rename > after_access);

    tree.decl_mut(member).unwrap().is_artificial = true;
    let after_borrow = tree.revision();
    assert!(after_borrow > after_rename);

    let base = tree.insert(tree.root(), Declaration::class("B")).unwrap();
    let after_base_insert = tree.revision();
    tree.add_base(class, base, AccessType::Public, false).unwrap();
    assert!(tree.revision() > after_base_insert);
}

#[test]
fn trees_have_distinct_identities() {
    let a = DeclTree::new();
    let b = DeclTree::new();
    assert_eq!(a.revision(), b.revision());
    assert_ne!(a.identity(), b.identity());
}

#[test]
fn access_changes_are_visible() {
    let mut tree = DeclTree::new();
    let class = tree.insert(tree.root(), Declaration::class("C")).unwrap();
    let field = tree
        .insert(class, Declaration::variable("x", Type::int()))
        .unwrap();
    assert_eq!(tree.access_type(field).unwrap(), Some(AccessType::Private));
    tree.set_access(field, AccessType::Protected).unwrap();
    assert_eq!(tree.access_type(field).unwrap(), Some(AccessType::Protected));
}

#[test]
fn destroyed_handles_are_stale() {
    let mut tree = DeclTree::new();
    let gone = tree.insert(tree.root(), Declaration::class("Gone")).unwrap();
    tree.remove_declaration(gone).unwrap();
    tree.destroy(gone).unwrap();
    assert!(!tree.exists(gone));
    assert!(tree.full_name(gone).is_err());

    let reused = tree.insert(tree.root(), Declaration::class("New")).unwrap();
    assert_ne!(reused, gone);
    assert!(tree.decl(gone).is_err());
}
