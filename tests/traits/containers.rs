//! Container recognition and element types on header-shaped trees

use cppdecl_foundation::{ContainerKind, DeclId};
use cppdecl_model::{AccessType, DeclTree, Declaration, FundamentalKind, Type};
use cppdecl_traits::{
    element_type, find_type_container_traits, is_mapping, is_sequence, key_type,
    remove_defaults,
};

struct Std {
    tree: DeclTree,
    vector: DeclId,
    map: DeclId,
    point: DeclId,
}

fn std_tree() -> Std {
    let mut tree = DeclTree::new();
    let std = tree.insert(tree.root(), Declaration::namespace("std")).unwrap();
    let app = tree.insert(tree.root(), Declaration::namespace("app")).unwrap();
    let point = tree.insert(app, Declaration::struct_("Point")).unwrap();

    let vector = tree
        .insert(
            std,
            Declaration::class("vector<app::Point, std::allocator<app::Point> >"),
        )
        .unwrap();
    tree.insert_member(
        vector,
        Declaration::typedef("value_type", Type::Declarated(point)),
        AccessType::Public,
    )
    .unwrap();

    let map = tree
        .insert(
            std,
            Declaration::class_declaration(
                "map<int, double, std::less<int>, std::allocator<std::pair<const int, double> > >",
            ),
        )
        .unwrap();
    Std {
        tree,
        vector,
        map,
        point,
    }
}

#[test]
fn element_type_from_definition() {
    let s = std_tree();
    let vector = Type::Declarated(s.vector);
    let traits = find_type_container_traits(&s.tree, &vector).unwrap();
    assert_eq!(traits.kind, ContainerKind::Vector);
    assert!(is_sequence(&s.tree, &vector));
    assert_eq!(element_type(&s.tree, &vector).unwrap(), Type::Declarated(s.point));
    assert_eq!(remove_defaults(&s.tree, &vector).unwrap(), "vector<app::Point>");
}

#[test]
fn key_and_mapped_types_from_forward_declaration() {
    let s = std_tree();
    let map = Type::Declarated(s.map);
    assert!(is_mapping(&s.tree, &map));
    assert_eq!(key_type(&s.tree, &map).unwrap(), Type::int());
    assert_eq!(
        element_type(&s.tree, &map).unwrap(),
        Type::fundamental(FundamentalKind::Double)
    );
    assert_eq!(remove_defaults(&s.tree, &map).unwrap(), "map<int,double>");
}

#[test]
fn non_containers_are_rejected() {
    let s = std_tree();
    let point = Type::Declarated(s.point);
    assert!(find_type_container_traits(&s.tree, &point).is_none());
    assert!(element_type(&s.tree, &point).is_err());
    assert!(key_type(&s.tree, &Type::Declarated(s.vector)).is_err());
}
