//! Implicit conversions between types

use cppdecl_foundation::DeclId;
use cppdecl_model::{AccessType, Argument, DeclTree, Declaration, FundamentalKind, Type};
use cppdecl_traits::is_convertible;

struct Hierarchy {
    tree: DeclTree,
    base: DeclId,
    derived: DeclId,
    hidden: DeclId,
    color: DeclId,
    handle: DeclId,
}

fn copyable(tree: &mut DeclTree, name: &str) -> DeclId {
    let class = tree.insert(tree.root(), Declaration::class(name)).unwrap();
    let copy = Type::Declarated(class).into_const().into_reference();
    tree.insert_member(
        class,
        Declaration::constructor(name, vec![Argument::new("", copy)]).artificial(),
        AccessType::Public,
    )
    .unwrap();
    class
}

fn hierarchy() -> Hierarchy {
    let mut tree = DeclTree::new();
    let base = copyable(&mut tree, "Base");
    let derived = copyable(&mut tree, "Derived");
    let hidden = copyable(&mut tree, "Hidden");
    tree.add_base(derived, base, AccessType::Public, false).unwrap();
    tree.add_base(hidden, base, AccessType::Private, false).unwrap();
    let color = tree
        .insert(
            tree.root(),
            Declaration::enumeration("Color", [("red", None), ("green", None)]),
        )
        .unwrap();
    let handle = copyable(&mut tree, "Handle");
    tree.insert_member(
        handle,
        Declaration::constructor("Handle", vec![Argument::new("fd", Type::int())]),
        AccessType::Public,
    )
    .unwrap();
    Hierarchy {
        tree,
        base,
        derived,
        hidden,
        color,
        handle,
    }
}

#[test]
fn int_binds_to_const_reference() {
    let h = hierarchy();
    assert!(is_convertible(
        &h.tree,
        &Type::int(),
        &Type::int().into_const().into_reference()
    ));
    assert!(is_convertible(&h.tree, &Type::int(), &Type::int().into_const()));
}

#[test]
fn derived_pointer_to_base_pointer() {
    let h = hierarchy();
    let base = Type::Declarated(h.base);
    let derived = Type::Declarated(h.derived);
    assert!(is_convertible(
        &h.tree,
        &derived.clone().into_pointer(),
        &base.clone().into_pointer()
    ));
    assert!(is_convertible(
        &h.tree,
        &derived.clone().into_reference(),
        &base.clone().into_const().into_reference()
    ));
    assert!(!is_convertible(
        &h.tree,
        &base.clone().into_pointer(),
        &derived.into_pointer()
    ));
    assert!(!is_convertible(
        &h.tree,
        &Type::Declarated(h.hidden).into_pointer(),
        &base.into_pointer()
    ));
}

#[test]
fn arrays_decay_to_pointers() {
    let h = hierarchy();
    let array = Type::int().into_array(Some(4));
    assert!(is_convertible(&h.tree, &array, &Type::int().into_pointer()));
    assert!(is_convertible(
        &h.tree,
        &array,
        &Type::int().into_const().into_pointer()
    ));
    assert!(!is_convertible(&h.tree, &array, &Type::int()));
}

#[test]
fn enums_convert_one_way() {
    let h = hierarchy();
    let color = Type::Declarated(h.color);
    let float = Type::fundamental(FundamentalKind::Float);
    assert!(!is_convertible(&h.tree, &float, &color));
    assert!(is_convertible(&h.tree, &color, &Type::int()));
    assert!(!is_convertible(&h.tree, &color, &Type::void()));
}

#[test]
fn pointers_convert_to_void_pointers() {
    let h = hierarchy();
    let void_ptr = Type::void().into_pointer();
    assert!(is_convertible(&h.tree, &Type::int().into_pointer(), &void_ptr));
    assert!(!is_convertible(&h.tree, &Type::int(), &void_ptr));
}

#[test]
fn converting_constructors() {
    let h = hierarchy();
    let handle = Type::Declarated(h.handle);
    assert!(is_convertible(&h.tree, &Type::int(), &handle));
    assert!(is_convertible(
        &h.tree,
        &Type::int(),
        &handle.into_const().into_reference()
    ));
    assert!(!is_convertible(
        &h.tree,
        &Type::int(),
        &Type::Declarated(h.base)
    ));
}
