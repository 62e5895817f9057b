//! Questions about class declarations: special members, inheritance,
//! copyability, and operator arity.
//!
//! Every function takes a class handle. Handles that are stale or do not
//! name a class give `false`, `None`, or an empty list.

use std::collections::HashSet;

use cppdecl_foundation::DeclId;
use cppdecl_model::{
    AccessType, Argument, CalldefKind, ClassKey, DeclCategory, DeclTree, FundamentalKind,
    HierarchyInfo, Modifier, Type, Virtuality,
};
use tracing::debug;

use crate::convertibility::members;
use crate::type_traits::{
    declaration_of, is_array, is_class, is_const, is_enum, is_fundamental, remove_const,
    remove_reference,
};

/// Full names of the classes whose descendants are never copyable.
const NONCOPYABLE_BASES: [&str; 2] = ["::boost::noncopyable", "::boost::noncopyable_::noncopyable"];

fn is_public(tree: &DeclTree, member: DeclId) -> bool {
    matches!(tree.access_type(member), Ok(Some(AccessType::Public)))
}

// =============================================================================
// Special Members
// =============================================================================

/// Returns true for a constructor taking no arguments.
#[must_use]
pub fn is_trivial_constructor(tree: &DeclTree, constructor: DeclId) -> bool {
    tree.get(constructor)
        .and_then(|decl| decl.as_calldef())
        .is_some_and(|data| data.kind == CalldefKind::Constructor && data.arguments.is_empty())
}

/// Returns true for a constructor whose only argument is a `const`
/// reference to its own class.
#[must_use]
pub fn is_copy_constructor(tree: &DeclTree, constructor: DeclId) -> bool {
    let Some(decl) = tree.get(constructor) else {
        return false;
    };
    let Some(data) = decl.as_calldef() else {
        return false;
    };
    if data.kind != CalldefKind::Constructor {
        return false;
    }
    let [argument] = data.arguments.as_slice() else {
        return false;
    };
    let Some(referee) = argument.ty.strip(Modifier::Reference) else {
        return false;
    };
    let referee = referee.remove_alias(tree);
    referee
        .strip(Modifier::Const)
        .and_then(Type::declaration)
        .is_some_and(|class| Some(class) == decl.parent())
}

/// The first constructor taking no arguments.
#[must_use]
pub fn find_trivial_constructor(tree: &DeclTree, class: DeclId) -> Option<DeclId> {
    members(tree, class, DeclCategory::Constructor)
        .into_iter()
        .find(|ctor| is_trivial_constructor(tree, *ctor))
}

/// The first copy constructor.
#[must_use]
pub fn find_copy_constructor(tree: &DeclTree, class: DeclId) -> Option<DeclId> {
    members(tree, class, DeclCategory::Constructor)
        .into_iter()
        .find(|ctor| is_copy_constructor(tree, *ctor))
}

/// The destructor, if declared.
#[must_use]
pub fn find_destructor(tree: &DeclTree, class: DeclId) -> Option<DeclId> {
    members(tree, class, DeclCategory::Destructor)
        .into_iter()
        .next()
}

/// Returns true if the class has a public default constructor.
#[must_use]
pub fn has_trivial_constructor(tree: &DeclTree, class: DeclId) -> bool {
    find_trivial_constructor(tree, class).is_some_and(|ctor| is_public(tree, ctor))
}

/// Returns true if the class has a public copy constructor.
#[must_use]
pub fn has_copy_constructor(tree: &DeclTree, class: DeclId) -> bool {
    find_copy_constructor(tree, class).is_some_and(|ctor| is_public(tree, ctor))
}

/// Returns true if the class has a public constructor other than the copy
/// constructor.
#[must_use]
pub fn has_public_constructor(tree: &DeclTree, class: DeclId) -> bool {
    members(tree, class, DeclCategory::Constructor)
        .into_iter()
        .any(|ctor| !is_copy_constructor(tree, ctor) && is_public(tree, ctor))
}

/// Returns true if the class has any constructor other than the copy
/// constructor, whatever its access.
#[must_use]
pub fn has_any_non_copyconstructor(tree: &DeclTree, class: DeclId) -> bool {
    members(tree, class, DeclCategory::Constructor)
        .into_iter()
        .any(|ctor| !is_copy_constructor(tree, ctor))
}

/// Returns true if the class has a public `operator=`.
#[must_use]
pub fn has_public_assign(tree: &DeclTree, class: DeclId) -> bool {
    members(tree, class, DeclCategory::MemberOperator)
        .into_iter()
        .any(|op| {
            tree.get(op).and_then(|decl| decl.operator_symbol()) == Some("=") && is_public(tree, op)
        })
}

/// Returns true if the class declares a destructor.
#[must_use]
pub fn has_destructor(tree: &DeclTree, class: DeclId) -> bool {
    find_destructor(tree, class).is_some()
}

/// Returns true if the class declares a public destructor.
#[must_use]
pub fn has_public_destructor(tree: &DeclTree, class: DeclId) -> bool {
    find_destructor(tree, class).is_some_and(|dtor| is_public(tree, dtor))
}

/// Returns true if any member function, operator, or the destructor is
/// virtual.
#[must_use]
pub fn has_vtable(tree: &DeclTree, class: DeclId) -> bool {
    members(tree, class, DeclCategory::MemberCalldef)
        .into_iter()
        .filter_map(|id| tree.get(id).and_then(|decl| decl.as_calldef()))
        .any(|data| data.virtuality != Virtuality::NotVirtual)
}

// =============================================================================
// Inheritance
// =============================================================================

/// Every direct and indirect base link of `class`, nearest first.
///
/// Each base appears once, with the access of the link that reached it
/// first.
#[must_use]
pub fn recursive_bases(tree: &DeclTree, class: DeclId) -> Vec<HierarchyInfo> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();
    let mut frontier = vec![class];
    while !frontier.is_empty() {
        let mut next = Vec::new();
        for id in frontier {
            let Some(data) = tree.get(id).and_then(|decl| decl.as_class()) else {
                continue;
            };
            for info in data.bases() {
                if seen.insert(info.related_class) {
                    found.push(*info);
                    next.push(info.related_class);
                }
            }
        }
        frontier = next;
    }
    found
}

/// Returns true if `base` is a direct or indirect base of `derived`.
#[must_use]
pub fn is_base_and_derived(tree: &DeclTree, base: DeclId, derived: DeclId) -> bool {
    recursive_bases(tree, derived)
        .iter()
        .any(|info| info.related_class == base)
}

// =============================================================================
// Copyability
// =============================================================================

/// Returns true if objects of the class cannot be copied.
///
/// A public, user-written copy constructor makes a class copyable. Abstract
/// classes, classes deriving from `boost::noncopyable` or from a base with
/// a private copy constructor, classes lacking a public copy constructor,
/// a public constructor or a public destructor, and classes holding
/// non-copyable data members are not.
#[must_use]
pub fn is_noncopyable(tree: &DeclTree, class: DeclId) -> bool {
    noncopyable(tree, class, &mut Vec::new())
}

/// Non-static data members that prevent copying: `const` members of
/// value type and members whose class is not copyable.
#[must_use]
pub fn find_noncopyable_vars(tree: &DeclTree, class: DeclId) -> Vec<DeclId> {
    noncopyable_vars(tree, class, &mut Vec::new())
}

fn noncopyable(tree: &DeclTree, class: DeclId, visited: &mut Vec<DeclId>) -> bool {
    let Some(decl) = tree.get(class) else {
        return false;
    };
    let Some(data) = decl.as_class() else {
        return false;
    };
    let name = tree.full_name(class).unwrap_or_default();
    if data.class_key == ClassKey::Union {
        return false;
    }
    if data.is_abstract {
        debug!(class = %name, "noncopyable: abstract class");
        return true;
    }
    if let Some(copy) = find_copy_constructor(tree, class) {
        let user_written = tree.get(copy).is_some_and(|ctor| !ctor.is_artificial);
        if is_public(tree, copy) && user_written {
            return false;
        }
    }

    for info in recursive_bases(tree, class) {
        let base = info.related_class;
        let base_name = tree.full_name(base).unwrap_or_default();
        if NONCOPYABLE_BASES.contains(&base_name.as_str()) {
            debug!(class = %name, base = %base_name, "noncopyable: derives from boost::noncopyable");
            return true;
        }
        if !has_copy_constructor(tree, base) {
            let private_copy = find_copy_constructor(tree, base).is_some_and(|copy| {
                matches!(tree.access_type(copy), Ok(Some(AccessType::Private)))
            });
            if private_copy {
                debug!(class = %name, base = %base_name, "noncopyable: base has a private copy constructor");
                return true;
            }
        }
        if noncopyable_single(tree, base, visited) {
            debug!(class = %name, base = %base_name, "noncopyable: base is not copyable");
            return true;
        }
    }

    if !has_copy_constructor(tree, class) {
        debug!(class = %name, "noncopyable: no public copy constructor");
        return true;
    }
    if !has_public_constructor(tree, class) {
        debug!(class = %name, "noncopyable: no public constructor");
        return true;
    }
    if has_destructor(tree, class) && !has_public_destructor(tree, class) {
        debug!(class = %name, "noncopyable: destructor is not public");
        return true;
    }
    noncopyable_single(tree, class, visited)
}

/// Looks at one class without its bases.
fn noncopyable_single(tree: &DeclTree, class: DeclId, visited: &mut Vec<DeclId>) -> bool {
    let name = tree.full_name(class).unwrap_or_default();
    if has_copy_constructor(tree, class)
        && has_public_constructor(tree, class)
        && has_public_assign(tree, class)
        && has_public_destructor(tree, class)
    {
        debug!(class = %name, "copyable: public copy constructor, constructor, assignment and destructor");
        return false;
    }
    if noncopyable_vars(tree, class, visited).is_empty() {
        debug!(class = %name, "copyable: no noncopyable data members");
        false
    } else {
        debug!(class = %name, "noncopyable: holds noncopyable data members");
        true
    }
}

fn noncopyable_vars(tree: &DeclTree, class: DeclId, visited: &mut Vec<DeclId>) -> Vec<DeclId> {
    let mut found = Vec::new();
    for var in members(tree, class, DeclCategory::Variable) {
        let Some(data) = tree.get(var).and_then(|decl| decl.as_variable()) else {
            continue;
        };
        if data.qualifiers.has_static {
            continue;
        }
        let ty = remove_reference(tree, &data.ty);
        if is_const(tree, &ty) {
            let value = remove_const(tree, &ty);
            if is_fundamental(tree, &value)
                || is_enum(tree, &value)
                || is_class(tree, &value)
                || is_array(tree, &value)
            {
                debug!(member = %ty.decl_string(tree), "noncopyable member: const value");
                found.push(var);
                continue;
            }
        }
        if !is_class(tree, &ty) {
            continue;
        }
        let Some(member_class) = declaration_of(tree, &ty) else {
            continue;
        };
        if visited.contains(&member_class) {
            continue;
        }
        visited.push(member_class);
        if noncopyable(tree, member_class, visited) {
            debug!(member = %ty.decl_string(tree), "noncopyable member: class is not copyable");
            found.push(var);
        }
    }
    found
}

// =============================================================================
// Operators
// =============================================================================

const UNARY_SYMBOLS: [&str; 8] = ["!", "&", "~", "*", "+", "++", "-", "--"];

const BINARY_SYMBOLS: [&str; 34] = [
    ",", "()", "[]", "!=", "%", "%=", "&", "&&", "&=", "*", "*=", "+", "+=", "-", "-=", "->",
    "->*", "/", "/=", "<", "<<", "<<=", "<=", "=", "==", ">", ">=", ">>", ">>=", "^", "^=", "|",
    "|=", "||",
];

fn operator_parts(tree: &DeclTree, id: DeclId) -> Option<(bool, &str, &[Argument])> {
    let decl = tree.get(id)?;
    let data = decl.as_calldef()?;
    let is_member = match data.kind {
        CalldefKind::MemberOperator => true,
        CalldefKind::FreeOperator => false,
        _ => return None,
    };
    Some((is_member, decl.operator_symbol()?, data.arguments.as_slice()))
}

fn is_int(ty: &Type) -> bool {
    *ty == Type::fundamental(FundamentalKind::Int)
}

/// Returns true for operators taking one operand: `!x`, `-x`, `x++`, ...
///
/// Members take no argument (or the `int` of postfix `++`/`--`); free
/// operators take one (or the operand and the postfix `int`).
#[must_use]
pub fn is_unary_operator(tree: &DeclTree, id: DeclId) -> bool {
    let Some((is_member, symbol, arguments)) = operator_parts(tree, id) else {
        return false;
    };
    if !UNARY_SYMBOLS.contains(&symbol) {
        return false;
    }
    let postfix = symbol == "++" || symbol == "--";
    if is_member {
        match arguments {
            [] => true,
            [argument] => postfix && is_int(&argument.ty),
            _ => false,
        }
    } else {
        match arguments {
            [_] => true,
            [_, argument] => postfix && is_int(&argument.ty),
            _ => false,
        }
    }
}

/// Returns true for operators taking two operands.
#[must_use]
pub fn is_binary_operator(tree: &DeclTree, id: DeclId) -> bool {
    let Some((is_member, symbol, arguments)) = operator_parts(tree, id) else {
        return false;
    };
    if !BINARY_SYMBOLS.contains(&symbol) {
        return false;
    }
    arguments.len() == if is_member { 1 } else { 2 }
}
