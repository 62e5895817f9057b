//! Dependency edges and include sets

use cppdecl_model::{
    AccessType, Argument, DeclTree, Declaration, DependencyHint, FundamentalKind, Type,
};

#[test]
fn member_function_needs_its_types_and_class() {
    let mut tree = DeclTree::new();
    let app = tree.insert(tree.root(), Declaration::namespace("app")).unwrap();
    let point = tree.insert(app, Declaration::struct_("Point")).unwrap();
    let shape = tree.insert(app, Declaration::class("Shape")).unwrap();
    let size = tree
        .insert(
            app,
            Declaration::typedef("size_type", Type::fundamental(FundamentalKind::LongUnsignedInt)),
        )
        .unwrap();
    let method = tree
        .insert_member(
            shape,
            Declaration::member_function(
                "move_to",
                Type::Declarated(size),
                vec![Argument::new("p", Type::Declarated(point).into_const().into_reference())],
            ),
            AccessType::Public,
        )
        .unwrap();

    let edges = tree.i_depend_on_them(method, false).unwrap();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].hint, DependencyHint::ReturnType);
    assert_eq!(edges[1].hint, DependencyHint::Argument);

    let needed = tree.required_declarations(method).unwrap();
    assert!(needed.contains(&point));
    assert!(needed.contains(&size));
    assert!(needed.contains(&shape));
    assert!(!needed.contains(&method));
}

#[test]
fn class_dependencies_recurse_into_members() {
    let mut tree = DeclTree::new();
    let base = tree.insert(tree.root(), Declaration::class("Base")).unwrap();
    let field_type = tree.insert(tree.root(), Declaration::class("Field")).unwrap();
    let derived = tree.insert(tree.root(), Declaration::class("Derived")).unwrap();
    tree.add_base(derived, base, AccessType::Public, false).unwrap();
    tree.insert(derived, Declaration::variable("f", Type::Declarated(field_type)))
        .unwrap();

    let shallow = tree.i_depend_on_them(derived, false).unwrap();
    assert_eq!(shallow.len(), 1);
    assert_eq!(shallow[0].hint, DependencyHint::BaseClass);

    let deep = tree.required_declarations(derived).unwrap();
    assert!(deep.contains(&base));
    assert!(deep.contains(&field_type));
}
