//! Type transformations and predicates.
//!
//! Transformations return a new [`Type`]; when a transformation does not
//! apply, the input is returned unchanged. Predicates never fail: stale
//! handles and unexpected shapes simply answer `false`.
//!
//! Most predicates look through typedefs and top-level cv-qualifiers
//! first, so `const my_int` is integral when `my_int` aliases `int`.

use cppdecl_foundation::{
    DeclId, is_std_ostream_name, is_std_string_name, is_std_wostream_name, is_std_wstring_name,
};
use cppdecl_model::{ClassKey, DeclKind, DeclTree, FundamentalKind, Modifier, Type};

// =============================================================================
// Transformations
// =============================================================================

/// Replaces typedefs by the types they alias.
#[must_use]
pub fn remove_alias(tree: &DeclTree, ty: &Type) -> Type {
    ty.remove_alias(tree)
}

/// Strips top-level `const` and `volatile`.
#[must_use]
pub fn remove_cv(tree: &DeclTree, ty: &Type) -> Type {
    let mut current = ty.remove_alias(tree);
    if !matches!(
        current.as_compound(),
        Some((Modifier::Const | Modifier::Volatile, _))
    ) {
        return ty.clone();
    }
    while let Type::Compound {
        modifier: Modifier::Const | Modifier::Volatile,
        base,
    } = current
    {
        current = *base;
    }
    current
}

/// Strips one `const`, looking through `volatile` and arrays.
#[must_use]
pub fn remove_const(tree: &DeclTree, ty: &Type) -> Type {
    let nake = ty.remove_alias(tree);
    if !is_const(tree, &nake) {
        return ty.clone();
    }
    strip_qualifier(nake, Modifier::Const)
}

/// Strips one `volatile`, looking through `const` and arrays.
#[must_use]
pub fn remove_volatile(tree: &DeclTree, ty: &Type) -> Type {
    let nake = ty.remove_alias(tree);
    if !is_volatile(tree, &nake) {
        return ty.clone();
    }
    strip_qualifier(nake, Modifier::Volatile)
}

fn strip_qualifier(ty: Type, qualifier: Modifier) -> Type {
    match ty {
        Type::Compound { modifier, base } if modifier == qualifier => *base,
        Type::Compound {
            modifier: modifier @ (Modifier::Const | Modifier::Volatile | Modifier::Array(_)),
            base,
        } => strip_qualifier(*base, qualifier).with(modifier),
        other => other,
    }
}

/// `T *` (possibly cv-qualified) to `T`.
#[must_use]
pub fn remove_pointer(tree: &DeclTree, ty: &Type) -> Type {
    if !is_pointer(tree, ty) {
        return ty.clone();
    }
    match remove_cv(tree, &ty.remove_alias(tree)) {
        Type::Compound { base, .. } => *base,
        other => other,
    }
}

/// `T &` to `T`.
#[must_use]
pub fn remove_reference(tree: &DeclTree, ty: &Type) -> Type {
    match ty.remove_alias(tree) {
        Type::Compound {
            modifier: Modifier::Reference,
            base,
        } => *base,
        _ => ty.clone(),
    }
}

/// Every layer of a type, outermost first, looking through typedefs.
///
/// `const my_ptr` with `typedef int *my_ptr` gives
/// `[const my_ptr, my_ptr, int *, int]`.
#[must_use]
pub fn decompose_type(tree: &DeclTree, ty: &Type) -> Vec<Type> {
    let mut layers = Vec::new();
    let mut current = ty.clone();
    // Bounded like `remove_alias`: typedef chains cannot outnumber
    // declarations.
    let mut budget = tree.len();
    loop {
        layers.push(current.clone());
        let next = match &current {
            Type::Compound { base, .. } => (**base).clone(),
            Type::Declarated(id) if budget > 0 => {
                match tree.get(*id).and_then(|decl| decl.as_typedef()) {
                    Some(typedef) => {
                        budget -= 1;
                        typedef.ty.clone()
                    }
                    None => break,
                }
            }
            _ => break,
        };
        current = next;
    }
    layers
}

/// The innermost type once every modifier and typedef is stripped.
#[must_use]
pub fn base_type(tree: &DeclTree, ty: &Type) -> Type {
    decompose_type(tree, ty).pop().unwrap_or_else(|| ty.clone())
}

/// Returns true if both types render identically.
#[must_use]
pub fn is_same(tree: &DeclTree, a: &Type, b: &Type) -> bool {
    a.same(b, tree)
}

/// The declaration a (cv-qualified, aliased) declarated type names.
#[must_use]
pub fn declaration_of(tree: &DeclTree, ty: &Type) -> Option<DeclId> {
    remove_cv(tree, &ty.remove_alias(tree)).declaration()
}

/// Bound of an array type, possibly behind a reference.
///
/// `None` for non-arrays and arrays of unknown bound.
#[must_use]
pub fn array_size(tree: &DeclTree, ty: &Type) -> Option<u64> {
    match array_parts(tree, ty)? {
        (Modifier::Array(size), _) => size,
        _ => None,
    }
}

/// Element type of an array, or pointee of a pointer.
#[must_use]
pub fn array_item_type(tree: &DeclTree, ty: &Type) -> Option<Type> {
    if let Some((_, item)) = array_parts(tree, ty) {
        return Some(item);
    }
    if is_pointer(tree, ty) {
        return Some(remove_pointer(tree, ty));
    }
    None
}

fn array_parts(tree: &DeclTree, ty: &Type) -> Option<(Modifier, Type)> {
    let nake = remove_reference(tree, &ty.remove_alias(tree));
    match remove_cv(tree, &nake) {
        Type::Compound {
            modifier: modifier @ Modifier::Array(_),
            base,
        } => Some((modifier, *base)),
        _ => None,
    }
}

// =============================================================================
// Predicates
// =============================================================================

fn fundamental_kind(tree: &DeclTree, ty: &Type) -> Option<FundamentalKind> {
    match remove_cv(tree, &ty.remove_alias(tree)) {
        Type::Fundamental(kind) => Some(kind),
        _ => None,
    }
}

/// `void`, possibly cv-qualified.
#[must_use]
pub fn is_void(tree: &DeclTree, ty: &Type) -> bool {
    fundamental_kind(tree, ty).is_some_and(FundamentalKind::is_void)
}

/// `void *`, possibly cv-qualified on either level.
#[must_use]
pub fn is_void_pointer(tree: &DeclTree, ty: &Type) -> bool {
    is_pointer(tree, ty) && is_void(tree, &remove_pointer(tree, ty))
}

/// `bool`
#[must_use]
pub fn is_bool(tree: &DeclTree, ty: &Type) -> bool {
    fundamental_kind(tree, ty).is_some_and(FundamentalKind::is_bool)
}

/// Character, boolean, and integer types.
#[must_use]
pub fn is_integral(tree: &DeclTree, ty: &Type) -> bool {
    fundamental_kind(tree, ty).is_some_and(FundamentalKind::is_integral)
}

/// Real and complex floating point types.
#[must_use]
pub fn is_floating_point(tree: &DeclTree, ty: &Type) -> bool {
    fundamental_kind(tree, ty).is_some_and(FundamentalKind::is_floating_point)
}

/// Integral or floating point.
#[must_use]
pub fn is_arithmetic(tree: &DeclTree, ty: &Type) -> bool {
    is_integral(tree, ty) || is_floating_point(tree, ty)
}

/// Any built-in type, `void` included.
#[must_use]
pub fn is_fundamental(tree: &DeclTree, ty: &Type) -> bool {
    fundamental_kind(tree, ty).is_some()
}

/// `T *`, possibly cv-qualified.
#[must_use]
pub fn is_pointer(tree: &DeclTree, ty: &Type) -> bool {
    matches!(
        remove_cv(tree, &ty.remove_alias(tree)).as_compound(),
        Some((Modifier::Pointer, _))
    )
}

/// `T &`
#[must_use]
pub fn is_reference(tree: &DeclTree, ty: &Type) -> bool {
    matches!(
        ty.remove_alias(tree).as_compound(),
        Some((Modifier::Reference, _))
    )
}

/// `T[n]`, possibly behind a reference.
#[must_use]
pub fn is_array(tree: &DeclTree, ty: &Type) -> bool {
    array_parts(tree, ty).is_some()
}

/// Pointer to a free or member function.
#[must_use]
pub fn is_calldef_pointer(tree: &DeclTree, ty: &Type) -> bool {
    is_pointer(tree, ty) && matches!(remove_pointer(tree, ty), Type::Callable(_))
}

/// `const` at the top level, looking through `volatile` and arrays.
#[must_use]
pub fn is_const(tree: &DeclTree, ty: &Type) -> bool {
    has_qualifier(&ty.remove_alias(tree), Modifier::Const)
}

/// `volatile` at the top level, looking through `const` and arrays.
#[must_use]
pub fn is_volatile(tree: &DeclTree, ty: &Type) -> bool {
    has_qualifier(&ty.remove_alias(tree), Modifier::Volatile)
}

fn has_qualifier(ty: &Type, qualifier: Modifier) -> bool {
    match ty.as_compound() {
        Some((modifier, _)) if modifier == qualifier => true,
        Some((Modifier::Const | Modifier::Volatile | Modifier::Array(_), base)) => {
            has_qualifier(base, qualifier)
        }
        _ => false,
    }
}

fn declared_kind(tree: &DeclTree, ty: &Type) -> Option<DeclKind> {
    declaration_of(tree, ty)
        .and_then(|id| tree.get(id))
        .map(cppdecl_model::Declaration::kind)
}

fn class_key(tree: &DeclTree, ty: &Type) -> Option<ClassKey> {
    declaration_of(tree, ty)
        .and_then(|id| tree.get(id))
        .and_then(|decl| decl.as_class())
        .map(|class| class.class_key)
}

/// A defined class, struct, or union.
#[must_use]
pub fn is_class(tree: &DeclTree, ty: &Type) -> bool {
    declared_kind(tree, ty) == Some(DeclKind::Class)
}

/// A class that is only forward declared.
#[must_use]
pub fn is_class_declaration(tree: &DeclTree, ty: &Type) -> bool {
    declared_kind(tree, ty) == Some(DeclKind::ClassDeclaration)
}

/// An enumeration.
#[must_use]
pub fn is_enum(tree: &DeclTree, ty: &Type) -> bool {
    declared_kind(tree, ty) == Some(DeclKind::Enumeration)
}

/// A union.
#[must_use]
pub fn is_union(tree: &DeclTree, ty: &Type) -> bool {
    class_key(tree, ty) == Some(ClassKey::Union)
}

/// A class defined with `struct`.
#[must_use]
pub fn is_struct(tree: &DeclTree, ty: &Type) -> bool {
    class_key(tree, ty) == Some(ClassKey::Struct)
}

/// Decl-strings of `ty` with references and cv stripped, as written and
/// with typedefs removed.
fn spellings(tree: &DeclTree, ty: &Type) -> [String; 2] {
    let written = remove_cv(tree, &remove_reference(tree, ty));
    let resolved = remove_cv(tree, &remove_reference(tree, &ty.remove_alias(tree)));
    [written.decl_string(tree), resolved.decl_string(tree)]
}

/// Any spelling of `std::string`.
#[must_use]
pub fn is_std_string(tree: &DeclTree, ty: &Type) -> bool {
    spellings(tree, ty).iter().any(|s| is_std_string_name(s))
}

/// Any spelling of `std::wstring`.
#[must_use]
pub fn is_std_wstring(tree: &DeclTree, ty: &Type) -> bool {
    spellings(tree, ty).iter().any(|s| is_std_wstring_name(s))
}

/// Any spelling of `std::ostream`.
#[must_use]
pub fn is_std_ostream(tree: &DeclTree, ty: &Type) -> bool {
    spellings(tree, ty).iter().any(|s| is_std_ostream_name(s))
}

/// Any spelling of `std::wostream`.
#[must_use]
pub fn is_std_wostream(tree: &DeclTree, ty: &Type) -> bool {
    spellings(tree, ty).iter().any(|s| is_std_wostream_name(s))
}
