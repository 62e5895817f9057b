//! C++ type expressions.
//!
//! A [`Type`] is a small tree: compound modifiers wrap a base type,
//! declarated types point into the declaration tree, and callable types
//! carry their signature. Two types are considered the same when their
//! decl-strings are equal; see [`Type::same`].

use std::fmt;

use cppdecl_foundation::DeclId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::decl::DeclData;
use crate::tree::DeclTree;

/// Width of data and function pointers on the modelled (LP64) target.
pub const POINTER_SIZE: u64 = 8;

// =============================================================================
// Fundamental Types
// =============================================================================

/// Built-in C++ types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub enum FundamentalKind {
    Void,
    Char,
    SignedChar,
    UnsignedChar,
    WChar,
    Char8,
    Char16,
    Char32,
    ShortInt,
    ShortUnsignedInt,
    Bool,
    Int,
    UnsignedInt,
    LongInt,
    LongUnsignedInt,
    LongLongInt,
    LongLongUnsignedInt,
    Int128,
    Uint128,
    Float,
    Double,
    LongDouble,
    ComplexFloat,
    ComplexDouble,
    ComplexLongDouble,
}

impl FundamentalKind {
    /// Every fundamental kind, in declaration order.
    pub const ALL: [FundamentalKind; 25] = [
        Self::Void,
        Self::Char,
        Self::SignedChar,
        Self::UnsignedChar,
        Self::WChar,
        Self::Char8,
        Self::Char16,
        Self::Char32,
        Self::ShortInt,
        Self::ShortUnsignedInt,
        Self::Bool,
        Self::Int,
        Self::UnsignedInt,
        Self::LongInt,
        Self::LongUnsignedInt,
        Self::LongLongInt,
        Self::LongLongUnsignedInt,
        Self::Int128,
        Self::Uint128,
        Self::Float,
        Self::Double,
        Self::LongDouble,
        Self::ComplexFloat,
        Self::ComplexDouble,
        Self::ComplexLongDouble,
    ];

    /// The spelling compilers use for this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Char => "char",
            Self::SignedChar => "signed char",
            Self::UnsignedChar => "unsigned char",
            Self::WChar => "wchar_t",
            Self::Char8 => "char8_t",
            Self::Char16 => "char16_t",
            Self::Char32 => "char32_t",
            Self::ShortInt => "short int",
            Self::ShortUnsignedInt => "short unsigned int",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::UnsignedInt => "unsigned int",
            Self::LongInt => "long int",
            Self::LongUnsignedInt => "long unsigned int",
            Self::LongLongInt => "long long int",
            Self::LongLongUnsignedInt => "long long unsigned int",
            Self::Int128 => "__int128_t",
            Self::Uint128 => "__uint128_t",
            Self::Float => "float",
            Self::Double => "double",
            Self::LongDouble => "long double",
            Self::ComplexFloat => "complex float",
            Self::ComplexDouble => "complex double",
            Self::ComplexLongDouble => "complex long double",
        }
    }

    /// Looks a fundamental type up by spelling. A few common alternative
    /// spellings (`unsigned`, `long`, `short`, ...) are accepted too.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let canonical = match name.trim() {
            "unsigned" => "unsigned int",
            "signed" | "signed int" => "int",
            "short" | "signed short" | "short signed int" => "short int",
            "unsigned short" | "unsigned short int" => "short unsigned int",
            "long" | "signed long" | "long signed int" => "long int",
            "unsigned long" | "unsigned long int" => "long unsigned int",
            "long long" | "long long signed int" => "long long int",
            "unsigned long long" | "unsigned long long int" => "long long unsigned int",
            other => other,
        };
        Self::ALL.into_iter().find(|kind| kind.name() == canonical)
    }

    /// Size in bytes on an LP64 target.
    #[must_use]
    pub const fn byte_size(self) -> u64 {
        match self {
            Self::Void => 0,
            Self::Char | Self::SignedChar | Self::UnsignedChar | Self::Char8 | Self::Bool => 1,
            Self::Char16 | Self::ShortInt | Self::ShortUnsignedInt => 2,
            Self::WChar | Self::Char32 | Self::Int | Self::UnsignedInt | Self::Float => 4,
            Self::LongInt
            | Self::LongUnsignedInt
            | Self::LongLongInt
            | Self::LongLongUnsignedInt
            | Self::Double
            | Self::ComplexFloat => 8,
            Self::Int128 | Self::Uint128 | Self::LongDouble | Self::ComplexDouble => 16,
            Self::ComplexLongDouble => 32,
        }
    }

    /// Alignment in bytes on an LP64 target.
    #[must_use]
    pub const fn byte_align(self) -> u64 {
        match self {
            Self::Void => 1,
            Self::ComplexFloat | Self::ComplexDouble | Self::ComplexLongDouble => {
                self.byte_size() / 2
            }
            _ => self.byte_size(),
        }
    }

    /// Returns true for `void`.
    #[must_use]
    pub const fn is_void(self) -> bool {
        matches!(self, Self::Void)
    }

    /// Returns true for `bool`.
    #[must_use]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Returns true for the character, boolean, and integer types.
    #[must_use]
    pub const fn is_integral(self) -> bool {
        !self.is_void() && !self.is_floating_point()
    }

    /// Returns true for the real and complex floating point types.
    #[must_use]
    pub const fn is_floating_point(self) -> bool {
        matches!(
            self,
            Self::Float
                | Self::Double
                | Self::LongDouble
                | Self::ComplexFloat
                | Self::ComplexDouble
                | Self::ComplexLongDouble
        )
    }
}

impl fmt::Display for FundamentalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Type Expressions
// =============================================================================

/// A compound modifier wrapping a base type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Modifier {
    /// `T const`
    Const,
    /// `T volatile`
    Volatile,
    /// `T __restrict__`
    Restrict,
    /// `T *`
    Pointer,
    /// `T &`
    Reference,
    /// `T[n]`; `None` when the bound is unknown.
    Array(Option<u64>),
}

/// Whether a callable type is free or bound to a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CallableKind {
    /// Free function (or static member function).
    Free,
    /// Non-static member function of `class`.
    Member {
        /// The class the function belongs to.
        class: DeclId,
        /// Whether the function is `const` qualified.
        is_const: bool,
    },
}

/// Signature of a function type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CallableType {
    /// Return type; `None` for constructors and destructors.
    pub return_type: Option<Type>,
    /// Argument types, in order.
    pub arguments: Vec<Type>,
    /// Free or member binding.
    pub kind: CallableKind,
}

/// A C++ type expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// A built-in type.
    Fundamental(FundamentalKind),
    /// A modifier applied to a base type.
    Compound {
        /// The modifier.
        modifier: Modifier,
        /// The modified type.
        base: Box<Type>,
    },
    /// A type named by a declaration (class, enum, typedef, ...).
    Declarated(DeclId),
    /// A function type.
    Callable(Box<CallableType>),
    /// Pointer-to-data-member type `T C::*`.
    MemberVariable {
        /// The class the member belongs to.
        class: DeclId,
        /// The member's type.
        ty: Box<Type>,
    },
    /// The `...` of a variadic argument list.
    Ellipsis,
    /// A type the front-end could not structure, kept as text.
    Dummy(String),
}

impl Type {
    /// Creates a fundamental type.
    #[must_use]
    pub const fn fundamental(kind: FundamentalKind) -> Self {
        Self::Fundamental(kind)
    }

    /// `void`
    #[must_use]
    pub const fn void() -> Self {
        Self::Fundamental(FundamentalKind::Void)
    }

    /// `int`
    #[must_use]
    pub const fn int() -> Self {
        Self::Fundamental(FundamentalKind::Int)
    }

    /// Wraps `self` in a modifier.
    #[must_use]
    pub fn with(self, modifier: Modifier) -> Self {
        Self::Compound {
            modifier,
            base: Box::new(self),
        }
    }

    /// `T const`
    #[must_use]
    pub fn into_const(self) -> Self {
        self.with(Modifier::Const)
    }

    /// `T volatile`
    #[must_use]
    pub fn into_volatile(self) -> Self {
        self.with(Modifier::Volatile)
    }

    /// `T *`
    #[must_use]
    pub fn into_pointer(self) -> Self {
        self.with(Modifier::Pointer)
    }

    /// `T &`
    #[must_use]
    pub fn into_reference(self) -> Self {
        self.with(Modifier::Reference)
    }

    /// `T[size]`
    #[must_use]
    pub fn into_array(self, size: Option<u64>) -> Self {
        self.with(Modifier::Array(size))
    }

    /// A free function type.
    #[must_use]
    pub fn free_function(return_type: Option<Type>, arguments: Vec<Type>) -> Self {
        Self::Callable(Box::new(CallableType {
            return_type,
            arguments,
            kind: CallableKind::Free,
        }))
    }

    /// A member function type.
    #[must_use]
    pub fn member_function(
        class: DeclId,
        return_type: Option<Type>,
        arguments: Vec<Type>,
        is_const: bool,
    ) -> Self {
        Self::Callable(Box::new(CallableType {
            return_type,
            arguments,
            kind: CallableKind::Member { class, is_const },
        }))
    }

    /// Returns the modifier and base if this is a compound type.
    #[must_use]
    pub fn as_compound(&self) -> Option<(Modifier, &Type)> {
        match self {
            Self::Compound { modifier, base } => Some((*modifier, base)),
            _ => None,
        }
    }

    /// Returns the base type if this is `base` wrapped in `modifier`.
    #[must_use]
    pub fn strip(&self, modifier: Modifier) -> Option<&Type> {
        match self {
            Self::Compound { modifier: m, base } if *m == modifier => Some(base),
            _ => None,
        }
    }

    /// Returns the declaration handle if this is a declarated type.
    #[must_use]
    pub fn declaration(&self) -> Option<DeclId> {
        match self {
            Self::Declarated(id) => Some(*id),
            _ => None,
        }
    }

    /// Strips every compound modifier and returns the innermost type.
    ///
    /// Typedefs are not looked through.
    #[must_use]
    pub fn innermost(&self) -> &Type {
        let mut current = self;
        while let Self::Compound { base, .. } = current {
            current = base;
        }
        current
    }

    /// Renders the canonical textual form, with default template arguments.
    #[must_use]
    pub fn decl_string(&self, tree: &DeclTree) -> String {
        self.build_decl_string(tree, true)
    }

    /// Renders the canonical textual form, without default template
    /// arguments.
    #[must_use]
    pub fn partial_decl_string(&self, tree: &DeclTree) -> String {
        self.build_decl_string(tree, false)
    }

    /// Renders the decl-string with or without default template arguments.
    #[must_use]
    pub fn build_decl_string(&self, tree: &DeclTree, with_defaults: bool) -> String {
        match self {
            Self::Fundamental(kind) => kind.name().to_string(),
            Self::Compound { modifier, base } => {
                let base = base.build_decl_string(tree, with_defaults);
                match modifier {
                    Modifier::Const => format!("{base} const"),
                    Modifier::Volatile => format!("{base} volatile"),
                    Modifier::Restrict => format!("{base} __restrict__"),
                    Modifier::Pointer => format!("{base} *"),
                    Modifier::Reference => format!("{base} &"),
                    Modifier::Array(Some(size)) => format!("{base}[{size}]"),
                    Modifier::Array(None) => format!("{base}[]"),
                }
            }
            Self::Declarated(id) => declaration_name(tree, *id, with_defaults),
            Self::Callable(callable) => {
                let return_type = callable
                    .return_type
                    .as_ref()
                    .map(|t| t.build_decl_string(tree, with_defaults))
                    .unwrap_or_default();
                let arguments = callable
                    .arguments
                    .iter()
                    .map(|t| t.build_decl_string(tree, with_defaults))
                    .collect::<Vec<_>>()
                    .join(", ");
                let head = match callable.kind {
                    CallableKind::Free => "(*)".to_string(),
                    CallableKind::Member { class, .. } => {
                        format!("( {}::* )", declaration_name(tree, class, with_defaults))
                    }
                };
                let tail = match callable.kind {
                    CallableKind::Member { is_const: true, .. } => " const",
                    _ => "",
                };
                if return_type.is_empty() {
                    format!("{head}( {arguments} ){tail}")
                } else {
                    format!("{return_type} {head}( {arguments} ){tail}")
                }
            }
            Self::MemberVariable { class, ty } => format!(
                "{} ( {}::* )",
                ty.build_decl_string(tree, with_defaults),
                declaration_name(tree, *class, with_defaults)
            ),
            Self::Ellipsis => "...".to_string(),
            Self::Dummy(text) => text.clone(),
        }
    }

    /// Replaces typedefs by the types they alias, inside compound types
    /// too. The walk follows at most as many typedefs as the tree holds
    /// declarations, so cyclic aliases terminate.
    #[must_use]
    pub fn remove_alias(&self, tree: &DeclTree) -> Type {
        self.remove_alias_bounded(tree, tree.len())
    }

    fn remove_alias_bounded(&self, tree: &DeclTree, budget: usize) -> Type {
        match self {
            Self::Declarated(id) if budget > 0 => match tree.get(*id).and_then(|d| d.as_typedef()) {
                Some(typedef) => typedef.ty.remove_alias_bounded(tree, budget - 1),
                None => self.clone(),
            },
            Self::Compound { modifier, base } => Self::Compound {
                modifier: *modifier,
                base: Box::new(base.remove_alias_bounded(tree, budget)),
            },
            _ => self.clone(),
        }
    }

    /// Returns true if both types render to the same decl-string.
    #[must_use]
    pub fn same(&self, other: &Type, tree: &DeclTree) -> bool {
        self == other || self.decl_string(tree) == other.decl_string(tree)
    }

    /// Size of a value of this type in bytes. Array sizes saturate at
    /// `u64::MAX`.
    #[must_use]
    pub fn byte_size(&self, tree: &DeclTree) -> u64 {
        self.layout(tree, tree.len()).0
    }

    /// Alignment of this type in bytes.
    #[must_use]
    pub fn byte_align(&self, tree: &DeclTree) -> u64 {
        self.layout(tree, tree.len()).1
    }

    /// Size and alignment. `budget` bounds how many typedefs are followed.
    fn layout(&self, tree: &DeclTree, budget: usize) -> (u64, u64) {
        match self {
            Self::Fundamental(kind) => (kind.byte_size(), kind.byte_align()),
            Self::Compound { modifier, base } => match modifier {
                Modifier::Pointer | Modifier::Reference => (POINTER_SIZE, POINTER_SIZE),
                Modifier::Array(size) => {
                    let (item, align) = base.layout(tree, budget);
                    (size.unwrap_or(0).saturating_mul(item), align)
                }
                Modifier::Const | Modifier::Volatile | Modifier::Restrict => {
                    base.layout(tree, budget)
                }
            },
            Self::Declarated(id) => declaration_layout(tree, *id, budget),
            Self::Callable(callable) => match callable.kind {
                CallableKind::Free => (POINTER_SIZE, POINTER_SIZE),
                CallableKind::Member { .. } => (2 * POINTER_SIZE, POINTER_SIZE),
            },
            Self::MemberVariable { .. } => (POINTER_SIZE, POINTER_SIZE),
            Self::Ellipsis | Self::Dummy(_) => (0, 1),
        }
    }
}

impl From<FundamentalKind> for Type {
    fn from(kind: FundamentalKind) -> Self {
        Self::Fundamental(kind)
    }
}

fn declaration_name(tree: &DeclTree, id: DeclId, with_defaults: bool) -> String {
    if with_defaults {
        tree.full_name(id)
    } else {
        tree.partial_full_name(id)
    }
    .unwrap_or_else(|_| format!("<unresolved {id}>"))
}

fn declaration_layout(tree: &DeclTree, id: DeclId, budget: usize) -> (u64, u64) {
    let Some(decl) = tree.get(id) else {
        return (0, 1);
    };
    match decl.data() {
        DeclData::Class(class) => (class.byte_size, class.byte_align.max(1)),
        DeclData::Enumeration(enumeration) => (enumeration.byte_size, enumeration.byte_align),
        // Cyclic aliases run out of budget.
        DeclData::Typedef(typedef) if budget > 0 => typedef.ty.layout(tree, budget - 1),
        _ => (0, 1),
    }
}
