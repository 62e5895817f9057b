//! Type and declaration traits for cppdecl.
//!
//! This crate provides:
//! - [`type_traits`] - Alias and cv removal, decomposition, type predicates
//! - [`is_convertible`] - Implicit convertibility between two types
//! - [`class_traits`] - Special members, inheritance, copyability, operator arity
//! - [`container_traits`] - Standard containers and their element and key types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod class_traits;
pub mod container_traits;
pub mod convertibility;
pub mod type_traits;

pub use class_traits::{
    find_copy_constructor, find_destructor, find_noncopyable_vars, find_trivial_constructor,
    has_any_non_copyconstructor, has_copy_constructor, has_destructor, has_public_assign,
    has_public_constructor, has_public_destructor, has_trivial_constructor, has_vtable,
    is_base_and_derived, is_binary_operator, is_copy_constructor, is_noncopyable,
    is_trivial_constructor, is_unary_operator, recursive_bases,
};
pub use container_traits::{
    container_class, element_type, find_decl_container_traits, find_type_container_traits,
    find_value_type, is_mapping, is_sequence, key_type, remove_defaults,
};
pub use convertibility::is_convertible;
pub use type_traits::{
    array_item_type, array_size, base_type, declaration_of, decompose_type, is_arithmetic,
    is_array, is_bool, is_calldef_pointer, is_class, is_class_declaration, is_const, is_enum,
    is_floating_point, is_fundamental, is_integral, is_pointer, is_reference, is_same,
    is_std_ostream, is_std_string, is_std_wostream, is_std_wstring, is_struct, is_union,
    is_void, is_void_pointer, is_volatile, remove_alias, remove_const, remove_cv,
    remove_pointer, remove_reference, remove_volatile,
};
