//! Implicit convertibility between two types.
//!
//! [`is_convertible`] runs an ordered list of tests and answers `true` at
//! the first that applies:
//!
//! 1. trivial conversions (identity, adding `const` or a reference,
//!    array decay, pointers to `void *`, adding `const` to a pointee or
//!    referee)
//! 2. arrays convert to nothing else
//! 3. function pointers and function types
//! 4. references to values of fundamental, enum, and copyable class types
//! 5. fundamental to fundamental
//! 6. derived class to base class over non-private inheritance
//! 7. enum to a non-void fundamental
//! 8. the source class's casting operators
//! 9. the target class's non-explicit single-argument constructors
//!
//! Forward declarations are resolved to the class defined beside them.
//! Steps 8 and 9 recurse; a pair already under examination answers
//! `false`.

use std::collections::HashSet;

use cppdecl_foundation::DeclId;
use cppdecl_model::{AccessType, DeclCategory, DeclKind, DeclTree, Modifier, Type};
use cppdecl_query::{DeclarationMatcher, find_all_declarations, find_declaration};
use tracing::trace;

use crate::class_traits::{has_copy_constructor, is_copy_constructor};
use crate::type_traits::{
    is_array, is_class, is_enum, is_fundamental, is_integral, is_pointer, is_same, is_void,
    remove_const, remove_cv, remove_reference,
};

/// Returns true if a value of `source` implicitly converts to `target`.
#[must_use]
pub fn is_convertible(tree: &DeclTree, source: &Type, target: &Type) -> bool {
    Convertibility {
        tree,
        in_progress: HashSet::new(),
    }
    .check(source, target)
}

struct Convertibility<'t> {
    tree: &'t DeclTree,
    in_progress: HashSet<(String, String)>,
}

impl Convertibility<'_> {
    fn check(&mut self, source: &Type, target: &Type) -> bool {
        let source = self.normalize(source);
        let target = self.normalize(target);
        let key = (
            source.decl_string(self.tree),
            target.decl_string(self.tree),
        );
        if !self.in_progress.insert(key.clone()) {
            trace!(source = %key.0, target = %key.1, "conversion cycle");
            return false;
        }
        let result = self.run(&source, &target);
        self.in_progress.remove(&key);
        result
    }

    fn run(&mut self, source: &Type, target: &Type) -> bool {
        if self.trivial(source, target) {
            return true;
        }
        if is_array(self.tree, source) || is_array(self.tree, target) {
            return false;
        }
        self.function_pointer(source, target)
            || self.reference_to_value(source, target)
            || self.fundamental_to_fundamental(source, target)
            || self.derived_to_base(source, target)
            || self.enum_to_fundamental(source, target)
            || self.casting_operator(source, target)
            || self.converting_constructor(source, target)
    }

    /// Removes typedefs and swaps forward declarations for definitions.
    fn normalize(&self, ty: &Type) -> Type {
        self.resolve_declarations(ty.remove_alias(self.tree))
    }

    fn resolve_declarations(&self, ty: Type) -> Type {
        match ty {
            Type::Compound { modifier, base } => {
                self.resolve_declarations(*base).with(modifier)
            }
            Type::Declarated(id) => {
                Type::Declarated(definition_of(self.tree, id).unwrap_or(id))
            }
            other => other,
        }
    }

    fn same(&self, a: &Type, b: &Type) -> bool {
        is_same(self.tree, a, b)
    }

    fn trivial(&self, source: &Type, target: &Type) -> bool {
        if self.same(source, target) {
            return true;
        }
        // X => const X
        if target
            .strip(Modifier::Const)
            .is_some_and(|t| self.same(source, t))
        {
            return true;
        }
        if let Some(referee) = target.strip(Modifier::Reference) {
            // X => X&
            if self.same(source, referee) {
                return true;
            }
            // X => const X&
            if referee
                .strip(Modifier::Const)
                .is_some_and(|t| self.same(source, t))
            {
                return true;
            }
        }
        if let (Some((Modifier::Array(_), item)), Some(pointee)) =
            (source.as_compound(), target.strip(Modifier::Pointer))
        {
            // X[n] => X*, X[n] => const X*
            if self.same(item, pointee) {
                return true;
            }
            if pointee
                .strip(Modifier::Const)
                .is_some_and(|p| self.same(&remove_const(self.tree, item), p))
            {
                return true;
            }
        }
        if let Some(pointee) = remove_cv(self.tree, target).strip(Modifier::Pointer) {
            if is_void(self.tree, pointee) {
                // X* => void*, never from integers or enums
                if is_integral(self.tree, source) || is_enum(self.tree, source) {
                    return false;
                }
                return is_pointer(self.tree, source) || is_array(self.tree, source);
            }
        }
        if let (Some(s), Some(t)) = (source.strip(Modifier::Pointer), target.strip(Modifier::Pointer)) {
            // X* => const X*
            if t.strip(Modifier::Const).is_some_and(|t| self.same(s, t)) {
                return true;
            }
        }
        if let (Some(s), Some(t)) = (
            source.strip(Modifier::Reference),
            target.strip(Modifier::Reference),
        ) {
            // X& => const X&
            if t.strip(Modifier::Const).is_some_and(|t| self.same(s, t)) {
                return true;
            }
        }
        false
    }

    /// `F*` to `F` or `F&`, and `F` or `F&` to `F*`, for function and
    /// member pointer types `F`.
    fn function_pointer(&self, source: &Type, target: &Type) -> bool {
        let is_function =
            |ty: &Type| matches!(ty, Type::Callable(_) | Type::MemberVariable { .. });
        let as_function = |ty: &Type| -> Option<Type> {
            let inner = ty.strip(Modifier::Reference).unwrap_or(ty);
            is_function(inner).then(|| inner.clone())
        };
        if let Some(pointee) = source.strip(Modifier::Pointer) {
            if is_function(pointee) && as_function(target).is_some_and(|t| self.same(pointee, &t)) {
                return true;
            }
        }
        if let Some(pointee) = target.strip(Modifier::Pointer) {
            if is_function(pointee) && as_function(source).is_some_and(|s| self.same(pointee, &s)) {
                return true;
            }
        }
        false
    }

    /// `X&` and `const X&` to `X` when `X` can be copied, and to another
    /// fundamental type when `X` is fundamental or an enum.
    fn reference_to_value(&self, source: &Type, target: &Type) -> bool {
        let Some(referee) = source.strip(Modifier::Reference) else {
            return false;
        };
        let value = referee.strip(Modifier::Const).unwrap_or(referee);
        if self.same(value, target) {
            return is_fundamental(self.tree, target)
                || is_enum(self.tree, target)
                || target
                    .declaration()
                    .is_some_and(|class| has_copy_constructor(self.tree, class));
        }
        let target_is_number = is_fundamental(self.tree, target) && !is_void(self.tree, target);
        target_is_number
            && ((is_fundamental(self.tree, value) && !is_void(self.tree, value))
                || is_enum(self.tree, value))
    }

    fn fundamental_to_fundamental(&self, source: &Type, target: &Type) -> bool {
        let value = remove_cv(self.tree, &remove_reference(self.tree, source));
        if !is_fundamental(self.tree, &value) || is_void(self.tree, &value) {
            return false;
        }
        let target = match target.strip(Modifier::Reference) {
            // X => const Y&
            Some(referee) if referee.strip(Modifier::Const).is_some() => referee,
            Some(_) => return false,
            None => target,
        };
        is_fundamental(self.tree, target) && !is_void(self.tree, target)
    }

    fn derived_to_base(&self, source: &Type, target: &Type) -> bool {
        let (source_shape, derived) = shape(source);
        let (target_shape, base) = shape(target);
        let (Some(derived), Some(base)) = (derived.declaration(), base.declaration()) else {
            return false;
        };
        if !is_class(self.tree, &Type::Declarated(derived))
            || !is_class(self.tree, &Type::Declarated(base))
        {
            return false;
        }
        let compatible = matches!(
            (source_shape.as_slice(), target_shape.as_slice()),
            ([], [])
                | ([Modifier::Pointer], [Modifier::Pointer])
                | ([Modifier::Pointer], [Modifier::Pointer, Modifier::Const])
                | ([Modifier::Pointer, Modifier::Const], [Modifier::Pointer, Modifier::Const])
                | ([Modifier::Reference], [Modifier::Reference])
                | ([Modifier::Reference], [Modifier::Reference, Modifier::Const])
                | ([Modifier::Reference, Modifier::Const], [Modifier::Reference, Modifier::Const])
                | ([], [Modifier::Reference, Modifier::Const])
        );
        compatible && accessible_base(self.tree, derived, base, &mut HashSet::new())
    }

    fn enum_to_fundamental(&self, source: &Type, target: &Type) -> bool {
        is_enum(self.tree, &remove_reference(self.tree, source))
            && is_fundamental(self.tree, target)
            && !is_void(self.tree, target)
    }

    fn casting_operator(&mut self, source: &Type, target: &Type) -> bool {
        let value = remove_cv(self.tree, &remove_reference(self.tree, source));
        let Some(class) = value.declaration().filter(|c| is_class(self.tree, &Type::Declarated(*c)))
        else {
            return false;
        };
        let operators = members(self.tree, class, DeclCategory::CastingOperator);
        operators.into_iter().any(|op| {
            let return_type = self
                .tree
                .get(op)
                .and_then(|decl| decl.as_calldef())
                .and_then(|data| data.return_type.clone());
            return_type.is_some_and(|ty| self.check(&ty, target))
        })
    }

    fn converting_constructor(&mut self, source: &Type, target: &Type) -> bool {
        // Only C, const C and const C& accept a temporary.
        let value = match target.strip(Modifier::Reference) {
            Some(referee) => match referee.strip(Modifier::Const) {
                Some(value) => value,
                None => return false,
            },
            None => target.strip(Modifier::Const).unwrap_or(target),
        };
        let Some(class) = value.declaration().filter(|c| is_class(self.tree, &Type::Declarated(*c)))
        else {
            return false;
        };
        let constructors = members(self.tree, class, DeclCategory::Constructor);
        constructors.into_iter().any(|ctor| {
            if is_copy_constructor(self.tree, ctor) {
                return false;
            }
            let Some(data) = self.tree.get(ctor).and_then(|decl| decl.as_calldef()) else {
                return false;
            };
            if data.is_explicit || data.arguments.is_empty() || data.required_args().len() > 1 {
                return false;
            }
            let argument = data.arguments[0].ty.clone();
            self.check(source, &argument)
        })
    }
}

/// The modifiers of `ty` outermost first, and the type they wrap.
fn shape(ty: &Type) -> (Vec<Modifier>, &Type) {
    let mut modifiers = Vec::new();
    let mut current = ty;
    while let Some((modifier, base)) = current.as_compound() {
        modifiers.push(modifier);
        current = base;
    }
    (modifiers, current)
}

/// Returns true if `base` is reachable from `derived` over non-private
/// inheritance links only.
pub(crate) fn accessible_base(
    tree: &DeclTree,
    derived: DeclId,
    base: DeclId,
    visited: &mut HashSet<DeclId>,
) -> bool {
    let Some(class) = tree.get(derived).and_then(|decl| decl.as_class()) else {
        return false;
    };
    class
        .bases()
        .iter()
        .filter(|info| info.access != AccessType::Private)
        .any(|info| {
            info.related_class == base
                || (visited.insert(info.related_class)
                    && accessible_base(tree, info.related_class, base, visited))
        })
}

/// Direct members of `class` in `category`.
pub(crate) fn members(tree: &DeclTree, class: DeclId, category: DeclCategory) -> Vec<DeclId> {
    let Ok(children) = tree.children(class) else {
        return Vec::new();
    };
    find_all_declarations(
        tree,
        &children,
        &DeclarationMatcher::new().with_category(category),
        false,
    )
}

/// The class defined next to a forward declaration, if there is exactly
/// one.
fn definition_of(tree: &DeclTree, id: DeclId) -> Option<DeclId> {
    let decl = tree.get(id)?;
    if decl.kind() != DeclKind::ClassDeclaration {
        return None;
    }
    let siblings = tree.children(decl.parent()?).ok()?;
    find_declaration(
        tree,
        &siblings,
        &DeclarationMatcher::named(decl.name()).with_category(DeclCategory::Class),
        false,
    )
}
