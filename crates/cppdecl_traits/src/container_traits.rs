//! Standard containers recognized in a declaration tree.
//!
//! A class counts as a standard container when its name is
//! `<container><...>` and it is declared directly in `std`, `stdext` or
//! `__gnu_cxx` (optionally through a nested `tr1`), which in turn sits
//! directly in the global namespace. Recognition and the resolved
//! element and key types are memoized in the class's cache.

use cppdecl_foundation::{
    ALL_CONTAINER_TRAITS, ContainerKind, ContainerTraits, DeclId, Error, PatternParser, Result,
    STD_NAMESPACES, is_std_string_name, is_std_wstring_name,
};
use cppdecl_model::{
    CacheSlot, DeclCache, DeclCategory, DeclKind, DeclTree, FundamentalKind, Type, memoize,
};
use cppdecl_query::{DeclarationMatcher, find_all_declarations};
use tracing::{debug, trace};

use crate::type_traits::declaration_of;

/// The container class a (cv-qualified, aliased) type names.
#[must_use]
pub fn container_class(tree: &DeclTree, ty: &Type) -> Option<DeclId> {
    let id = declaration_of(tree, ty)?;
    find_decl_container_traits(tree, id).map(|_| id)
}

/// Container traits for the class a type names.
#[must_use]
pub fn find_type_container_traits(tree: &DeclTree, ty: &Type) -> Option<&'static ContainerTraits> {
    find_decl_container_traits(tree, declaration_of(tree, ty)?)
}

/// Container traits for a class or forward class declaration.
#[must_use]
pub fn find_decl_container_traits(tree: &DeclTree, id: DeclId) -> Option<&'static ContainerTraits> {
    let decl = tree.get(id)?;
    if !matches!(decl.kind(), DeclKind::Class | DeclKind::ClassDeclaration) {
        return None;
    }
    let slot = decl.cache().container_traits();
    if tree.cache_enabled() {
        if let Some(kind) = slot.get() {
            return kind.map(ContainerKind::traits);
        }
    }
    let kind = recognize(tree, id);
    if tree.cache_enabled() {
        slot.set(kind);
    }
    kind.map(ContainerKind::traits)
}

fn recognize(tree: &DeclTree, id: DeclId) -> Option<ContainerKind> {
    let decl = tree.get(id)?;
    let traits = ALL_CONTAINER_TRAITS.iter().find(|t| {
        decl.name()
            .strip_prefix(t.name)
            .is_some_and(|rest| rest.starts_with('<'))
    })?;

    let mut scope = tree.get(decl.parent()?)?;
    if scope.kind() == DeclKind::Namespace && scope.name() == "tr1" {
        scope = tree.get(scope.parent()?)?;
    }
    let in_std = scope.kind() == DeclKind::Namespace
        && STD_NAMESPACES.contains(&scope.name())
        && scope.parent() == Some(tree.root());
    if !in_std {
        trace!(class = %decl.name(), "container name outside the standard namespaces");
        return None;
    }
    debug!(class = %decl.name(), container = traits.name, "container recognized");
    Some(traits.kind)
}

fn require_container(tree: &DeclTree, ty: &Type) -> Result<(DeclId, &'static ContainerTraits)> {
    declaration_of(tree, ty)
        .and_then(|id| find_decl_container_traits(tree, id).map(|traits| (id, traits)))
        .ok_or_else(|| {
            Error::precondition(format!(
                "type '{}' is not a standard container",
                ty.decl_string(tree)
            ))
        })
}

/// Returns true if the type names a sequence or set container.
#[must_use]
pub fn is_sequence(tree: &DeclTree, ty: &Type) -> bool {
    find_type_container_traits(tree, ty).is_some_and(ContainerTraits::is_sequence)
}

/// Returns true if the type names a mapping container.
#[must_use]
pub fn is_mapping(tree: &DeclTree, ty: &Type) -> bool {
    find_type_container_traits(tree, ty).is_some_and(ContainerTraits::is_mapping)
}

/// The container's class name without default template arguments, e.g.
/// `vector<int>`.
///
/// # Errors
///
/// `PreconditionViolation` if the type is not a standard container.
pub fn remove_defaults(tree: &DeclTree, ty: &Type) -> Result<String> {
    let (class, traits) = require_container(tree, ty)?;
    Ok(traits.remove_defaults(tree.decl(class)?.name()))
}

/// The element type (mapped type for mappings).
///
/// # Errors
///
/// `PreconditionViolation` if the type is not a standard container;
/// `NotFound` if the element type names nothing in the tree.
pub fn element_type(tree: &DeclTree, ty: &Type) -> Result<Type> {
    let (class, traits) = require_container(tree, ty)?;
    resolve_argument(
        tree,
        class,
        traits.element_index,
        traits.element_typedef,
        DeclCache::container_element_type,
    )
}

/// The key type of a mapping container.
///
/// # Errors
///
/// `PreconditionViolation` if the type is not a mapping container;
/// `NotFound` if the key type names nothing in the tree.
pub fn key_type(tree: &DeclTree, ty: &Type) -> Result<Type> {
    let (class, traits) = require_container(tree, ty)?;
    let (Some(index), Some(typedef)) = (traits.key_index, traits.key_typedef) else {
        return Err(Error::precondition(format!(
            "type '{}' is not a mapping container",
            ty.decl_string(tree)
        )));
    };
    resolve_argument(tree, class, index, typedef, DeclCache::container_key_type)
}

/// Resolves a template argument through the class's member typedef, or
/// by looking up the argument's spelling from the global namespace.
fn resolve_argument(
    tree: &DeclTree,
    class: DeclId,
    index: usize,
    typedef: &str,
    slot: fn(&DeclCache) -> &CacheSlot<Type>,
) -> Result<Type> {
    let decl = tree.decl(class)?;
    memoize(slot(decl.cache()), tree.cache_enabled(), || {
        if decl.kind() == DeclKind::Class {
            let matcher = DeclarationMatcher::named(typedef).with_category(DeclCategory::Typedef);
            let found = find_all_declarations(tree, &tree.children(class)?, &matcher, false);
            if let Some(aliased) = found.first().and_then(|id| tree.get(*id)).and_then(|d| d.decl_type()) {
                return Ok(aliased.remove_alias(tree));
            }
        }
        let arguments = PatternParser::TEMPLATES.args(decl.name())?;
        let argument = arguments.get(index).ok_or_else(|| {
            Error::precondition(format!(
                "'{}' has no template argument {index}",
                decl.name()
            ))
        })?;
        find_value_type(tree, argument).ok_or_else(|| {
            Error::not_found(format!(
                "type '{argument}' used by '{}'",
                decl.name()
            ))
        })
    })
}

/// Finds the type spelled `text`, relative to the global namespace.
///
/// Declared types are looked up by full name. Failing that, fundamental
/// type names, the `std::string` / `std::wstring` spellings, a leading
/// `const ` and a trailing `*` are understood.
#[must_use]
pub fn find_value_type(tree: &DeclTree, text: &str) -> Option<Type> {
    let text = text.trim();
    let qualified = if text.starts_with("::") {
        text.to_string()
    } else {
        format!("::{text}")
    };

    let named = DeclarationMatcher::named(&qualified);
    let found: Vec<DeclId> = find_all_declarations(tree, &[tree.root()], &named, true)
        .into_iter()
        .filter(|id| {
            tree.get(*id).is_some_and(|decl| {
                matches!(
                    decl.kind(),
                    DeclKind::Class
                        | DeclKind::ClassDeclaration
                        | DeclKind::Enumeration
                        | DeclKind::Typedef
                )
            })
        })
        .collect();
    match found.as_slice() {
        [single] => return Some(Type::Declarated(*single).remove_alias(tree)),
        [] => {}
        _ => return None,
    }

    let bare = &qualified[2..];
    if let Some(kind) = FundamentalKind::from_name(bare) {
        return Some(Type::fundamental(kind));
    }
    // Other spellings fall back to the `std::string` typedef.
    if is_std_string_name(&qualified) {
        return (qualified != "::std::string")
            .then(|| find_value_type(tree, "::std::string"))
            .flatten();
    }
    if is_std_wstring_name(&qualified) {
        return (qualified != "::std::wstring")
            .then(|| find_value_type(tree, "::std::wstring"))
            .flatten();
    }

    let (has_const, rest) = match bare.strip_prefix("const ") {
        Some(rest) => (true, rest),
        None => (false, bare),
    };
    let (has_pointer, rest) = match rest.strip_suffix('*') {
        Some(rest) => (true, rest.trim_end()),
        None => (false, rest),
    };
    if !has_const && !has_pointer {
        return None;
    }
    let mut ty = find_value_type(tree, rest)?;
    if has_const {
        ty = ty.into_const();
    }
    if has_pointer {
        ty = ty.into_pointer();
    }
    Some(ty)
}
