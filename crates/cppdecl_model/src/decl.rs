//! Declaration nodes and their kind-specific data.

use std::fmt;

use cppdecl_foundation::{DeclId, Location};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cache::DeclCache;
use crate::types::Type;

// =============================================================================
// Small Enumerations
// =============================================================================

/// Member access level inside a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AccessType {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
}

impl AccessType {
    /// All access levels in bucket order.
    pub const ALL: [AccessType; 3] = [Self::Public, Self::Protected, Self::Private];

    /// The C++ keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Virtuality of a member function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Virtuality {
    /// Not virtual.
    #[default]
    NotVirtual,
    /// `virtual`
    Virtual,
    /// `virtual ... = 0`
    PureVirtual,
}

impl Virtuality {
    /// Returns true for virtual and pure virtual functions.
    #[must_use]
    pub const fn is_virtual(self) -> bool {
        !matches!(self, Self::NotVirtual)
    }
}

/// The keyword a class was introduced with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClassKey {
    /// `class`
    #[default]
    Class,
    /// `struct`
    Struct,
    /// `union`
    Union,
}

impl ClassKey {
    /// Access level members get when none is given.
    #[must_use]
    pub const fn default_access(self) -> AccessType {
        match self {
            Self::Class => AccessType::Private,
            Self::Struct | Self::Union => AccessType::Public,
        }
    }
}

/// The concrete callable kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CalldefKind {
    /// Namespace-level function.
    FreeFunction,
    /// Namespace-level operator.
    FreeOperator,
    /// Member function.
    MemberFunction,
    /// Member operator.
    MemberOperator,
    /// Constructor.
    Constructor,
    /// Destructor.
    Destructor,
    /// `operator T()`
    CastingOperator,
}

impl CalldefKind {
    /// Returns true for kinds that live inside a class.
    #[must_use]
    pub const fn is_member(self) -> bool {
        !matches!(self, Self::FreeFunction | Self::FreeOperator)
    }

    /// Returns true for the operator kinds.
    #[must_use]
    pub const fn is_operator(self) -> bool {
        matches!(
            self,
            Self::FreeOperator | Self::MemberOperator | Self::CastingOperator
        )
    }
}

// =============================================================================
// Kinds and Categories
// =============================================================================

/// The concrete kind of a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// `namespace`
    Namespace,
    /// Class with a definition.
    Class,
    /// Forward class declaration.
    ClassDeclaration,
    /// `enum`
    Enumeration,
    /// `typedef` / `using` alias.
    Typedef,
    /// Variable or data member.
    Variable,
    /// A callable.
    Calldef(CalldefKind),
}

/// Groups of declaration kinds used by matchers and the optimizer index.
///
/// A declaration belongs to every category its kind falls under; a
/// member operator is an `Operator`, a `MemberCalldef`, a `Calldef`, and
/// `Any`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum DeclCategory {
    Any,
    Scope,
    Namespace,
    Class,
    ClassDeclaration,
    Enumeration,
    Typedef,
    Variable,
    Calldef,
    FreeCalldef,
    MemberCalldef,
    FreeFunction,
    FreeOperator,
    MemberFunction,
    MemberOperator,
    Operator,
    Constructor,
    Destructor,
    CastingOperator,
}

impl DeclKind {
    /// Every category this kind belongs to.
    #[must_use]
    pub const fn categories(self) -> &'static [DeclCategory] {
        use DeclCategory as C;
        match self {
            Self::Namespace => &[C::Any, C::Scope, C::Namespace],
            Self::Class => &[C::Any, C::Scope, C::Class],
            Self::ClassDeclaration => &[C::Any, C::ClassDeclaration],
            Self::Enumeration => &[C::Any, C::Enumeration],
            Self::Typedef => &[C::Any, C::Typedef],
            Self::Variable => &[C::Any, C::Variable],
            Self::Calldef(kind) => match kind {
                CalldefKind::FreeFunction => &[C::Any, C::Calldef, C::FreeCalldef, C::FreeFunction],
                CalldefKind::FreeOperator => &[
                    C::Any,
                    C::Calldef,
                    C::FreeCalldef,
                    C::FreeOperator,
                    C::Operator,
                ],
                CalldefKind::MemberFunction => {
                    &[C::Any, C::Calldef, C::MemberCalldef, C::MemberFunction]
                }
                CalldefKind::MemberOperator => &[
                    C::Any,
                    C::Calldef,
                    C::MemberCalldef,
                    C::MemberOperator,
                    C::Operator,
                ],
                CalldefKind::Constructor => &[C::Any, C::Calldef, C::MemberCalldef, C::Constructor],
                CalldefKind::Destructor => &[C::Any, C::Calldef, C::MemberCalldef, C::Destructor],
                CalldefKind::CastingOperator => &[
                    C::Any,
                    C::Calldef,
                    C::MemberCalldef,
                    C::CastingOperator,
                    C::Operator,
                ],
            },
        }
    }

    /// Returns true if this kind belongs to `category`.
    #[must_use]
    pub fn is_a(self, category: DeclCategory) -> bool {
        self.categories().contains(&category)
    }
}

impl fmt::Display for DeclCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Any => "declaration",
            Self::Scope => "scope",
            Self::Namespace => "namespace",
            Self::Class => "class",
            Self::ClassDeclaration => "class declaration",
            Self::Enumeration => "enumeration",
            Self::Typedef => "typedef",
            Self::Variable => "variable",
            Self::Calldef => "calldef",
            Self::FreeCalldef => "free calldef",
            Self::MemberCalldef => "member calldef",
            Self::FreeFunction => "free function",
            Self::FreeOperator => "free operator",
            Self::MemberFunction => "member function",
            Self::MemberOperator => "member operator",
            Self::Operator => "operator",
            Self::Constructor => "constructor",
            Self::Destructor => "destructor",
            Self::CastingOperator => "casting operator",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Kind-Specific Data
// =============================================================================

/// Children of a namespace.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamespaceData {
    pub(crate) children: Vec<DeclId>,
}

/// A base or derived class link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HierarchyInfo {
    /// The class on the other end of the link.
    pub related_class: DeclId,
    /// Inheritance access.
    pub access: AccessType,
    /// Whether the inheritance is virtual.
    pub is_virtual: bool,
}

/// Class definition data.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassData {
    /// `class`, `struct` or `union`.
    pub class_key: ClassKey,
    /// Size in bytes.
    pub byte_size: u64,
    /// Alignment in bytes.
    pub byte_align: u64,
    /// Whether the class has pure virtual functions.
    pub is_abstract: bool,
    pub(crate) public_members: Vec<DeclId>,
    pub(crate) protected_members: Vec<DeclId>,
    pub(crate) private_members: Vec<DeclId>,
    pub(crate) bases: Vec<HierarchyInfo>,
    pub(crate) derived: Vec<HierarchyInfo>,
}

impl ClassData {
    /// Members with the given access, in declaration order.
    #[must_use]
    pub fn members(&self, access: AccessType) -> &[DeclId] {
        match access {
            AccessType::Public => &self.public_members,
            AccessType::Protected => &self.protected_members,
            AccessType::Private => &self.private_members,
        }
    }

    pub(crate) fn members_mut(&mut self, access: AccessType) -> &mut Vec<DeclId> {
        match access {
            AccessType::Public => &mut self.public_members,
            AccessType::Protected => &mut self.protected_members,
            AccessType::Private => &mut self.private_members,
        }
    }

    /// All members: public, then protected, then private.
    pub fn all_members(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.public_members
            .iter()
            .chain(&self.protected_members)
            .chain(&self.private_members)
            .copied()
    }

    /// The access bucket holding `member`, if any.
    #[must_use]
    pub fn access_of(&self, member: DeclId) -> Option<AccessType> {
        AccessType::ALL
            .into_iter()
            .find(|access| self.members(*access).contains(&member))
    }

    /// Direct base classes.
    #[must_use]
    pub fn bases(&self) -> &[HierarchyInfo] {
        &self.bases
    }

    /// Direct derived classes.
    #[must_use]
    pub fn derived(&self) -> &[HierarchyInfo] {
        &self.derived
    }
}

/// Enumeration data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumData {
    /// Enumerators, in declaration order.
    pub values: Vec<(String, i64)>,
    /// Size in bytes.
    pub byte_size: u64,
    /// Alignment in bytes.
    pub byte_align: u64,
}

impl Default for EnumData {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            byte_size: 4,
            byte_align: 4,
        }
    }
}

impl EnumData {
    /// Appends an enumerator. Without an explicit value it gets the
    /// previous value plus one (saturating at `i64::MAX`), or 0 when it
    /// is the first.
    pub fn append_value(&mut self, name: impl Into<String>, value: Option<i64>) {
        let value = value.unwrap_or_else(|| {
            self.values
                .last()
                .map_or(0, |(_, v)| v.saturating_add(1))
        });
        self.values.push((name.into(), value));
    }

    /// Returns true if an enumerator with this name exists.
    #[must_use]
    pub fn has_value_name(&self, name: &str) -> bool {
        self.values.iter().any(|(n, _)| n == name)
    }

    /// Looks up an enumerator's value.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }
}

/// Typedef data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypedefData {
    /// The aliased type.
    pub ty: Type,
}

/// Storage qualifiers of a variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct TypeQualifiers {
    /// `static`
    pub has_static: bool,
    /// `mutable`
    pub has_mutable: bool,
    /// `extern`
    pub has_extern: bool,
}

/// Variable data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariableData {
    /// The variable's type.
    pub ty: Type,
    /// Storage qualifiers.
    pub qualifiers: TypeQualifiers,
    /// Initializer expression.
    pub value: Option<String>,
    /// Bit-field width.
    pub bits: Option<u32>,
    /// Offset inside the enclosing class, in bytes.
    pub byte_offset: u64,
}

/// One argument of a callable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Argument {
    /// Argument name (may be empty).
    pub name: String,
    /// Argument type; [`Type::Ellipsis`] for `...`.
    pub ty: Type,
    /// Default value expression.
    pub default_value: Option<String>,
    /// Raw compiler attributes.
    pub attributes: Option<String>,
}

impl Argument {
    /// Creates an argument without a default value.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
            attributes: None,
        }
    }

    /// Builder method to set the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Callable data, shared by every calldef kind.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct CalldefData {
    /// Which kind of callable this is.
    pub kind: CalldefKind,
    /// Arguments, required ones first.
    pub arguments: Vec<Argument>,
    /// Return type; `None` for constructors and destructors.
    pub return_type: Option<Type>,
    /// Whether an exception specification is present.
    pub does_throw: bool,
    /// Types listed in the exception specification.
    pub exceptions: Vec<Type>,
    /// `extern`
    pub has_extern: bool,
    /// `inline`
    pub has_inline: bool,
    /// Virtuality (member kinds only).
    pub virtuality: Virtuality,
    /// `const` qualified (member kinds only).
    pub has_const: bool,
    /// `static` (member kinds only).
    pub has_static: bool,
    /// `explicit` (constructors only).
    pub is_explicit: bool,
}

impl CalldefData {
    /// Creates callable data of the given kind with no arguments.
    #[must_use]
    pub fn new(kind: CalldefKind) -> Self {
        Self {
            kind,
            arguments: Vec::new(),
            return_type: None,
            does_throw: true,
            exceptions: Vec::new(),
            has_extern: false,
            has_inline: false,
            virtuality: Virtuality::NotVirtual,
            has_const: false,
            has_static: false,
            is_explicit: false,
        }
    }

    /// Arguments without a default value.
    #[must_use]
    pub fn required_args(&self) -> &[Argument] {
        let count = self
            .arguments
            .iter()
            .take_while(|arg| arg.default_value.is_none())
            .count();
        &self.arguments[..count]
    }

    /// Arguments with a default value.
    #[must_use]
    pub fn optional_args(&self) -> &[Argument] {
        &self.arguments[self.required_args().len()..]
    }

    /// Returns true if the last argument is `...`.
    #[must_use]
    pub fn has_ellipsis(&self) -> bool {
        self.arguments
            .last()
            .is_some_and(|arg| matches!(arg.ty, Type::Ellipsis))
    }

    /// Argument types, in order.
    #[must_use]
    pub fn argument_types(&self) -> Vec<Type> {
        self.arguments.iter().map(|arg| arg.ty.clone()).collect()
    }
}

/// Kind-specific declaration data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeclData {
    /// `namespace`
    Namespace(NamespaceData),
    /// Class with a definition.
    Class(ClassData),
    /// Forward class declaration.
    ClassDeclaration,
    /// `enum`
    Enumeration(EnumData),
    /// Type alias.
    Typedef(TypedefData),
    /// Variable or data member.
    Variable(VariableData),
    /// Any callable.
    Calldef(CalldefData),
}

// =============================================================================
// Declaration
// =============================================================================

/// One C++ declaration.
///
/// Name and parent are owned by the tree; change them through
/// [`DeclTree::rename`](crate::DeclTree::rename) and the attach/remove
/// operations so cached names stay coherent. The demangled string is
/// changed through [`Declaration::set_demangled`] for the same reason.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Declaration {
    pub(crate) name: String,
    pub(crate) parent: Option<DeclId>,
    /// Where the front-end found the declaration.
    pub location: Option<Location>,
    /// Compiler-mangled symbol name.
    pub mangled: Option<String>,
    pub(crate) demangled: Option<String>,
    /// Whether the compiler generated this declaration.
    pub is_artificial: bool,
    /// Raw attribute string (`gccxml(...)`, `__attribute__`, ...).
    pub attributes: Option<String>,
    /// Name and version of the compiler that produced it.
    pub compiler: Option<String>,
    pub(crate) data: DeclData,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) cache: DeclCache,
}

impl Declaration {
    /// Creates a declaration from a name and its data.
    #[must_use]
    pub fn new(name: impl Into<String>, data: DeclData) -> Self {
        Self {
            name: name.into(),
            parent: None,
            location: None,
            mangled: None,
            demangled: None,
            is_artificial: false,
            attributes: None,
            compiler: None,
            data,
            cache: DeclCache::default(),
        }
    }

    /// A namespace.
    #[must_use]
    pub fn namespace(name: impl Into<String>) -> Self {
        Self::new(name, DeclData::Namespace(NamespaceData::default()))
    }

    /// A class defined with `class`.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, DeclData::Class(ClassData::default()))
    }

    /// A class defined with `struct`.
    #[must_use]
    pub fn struct_(name: impl Into<String>) -> Self {
        Self::new(
            name,
            DeclData::Class(ClassData {
                class_key: ClassKey::Struct,
                ..ClassData::default()
            }),
        )
    }

    /// A union.
    #[must_use]
    pub fn union(name: impl Into<String>) -> Self {
        Self::new(
            name,
            DeclData::Class(ClassData {
                class_key: ClassKey::Union,
                ..ClassData::default()
            }),
        )
    }

    /// A forward class declaration.
    #[must_use]
    pub fn class_declaration(name: impl Into<String>) -> Self {
        Self::new(name, DeclData::ClassDeclaration)
    }

    /// An enumeration with the given enumerators; `None` values
    /// auto-increment.
    #[must_use]
    pub fn enumeration<N: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = (N, Option<i64>)>,
    ) -> Self {
        let mut data = EnumData::default();
        for (value_name, value) in values {
            data.append_value(value_name, value);
        }
        Self::new(name, DeclData::Enumeration(data))
    }

    /// A typedef.
    #[must_use]
    pub fn typedef(name: impl Into<String>, ty: Type) -> Self {
        Self::new(name, DeclData::Typedef(TypedefData { ty }))
    }

    /// A variable.
    #[must_use]
    pub fn variable(name: impl Into<String>, ty: Type) -> Self {
        Self::new(
            name,
            DeclData::Variable(VariableData {
                ty,
                qualifiers: TypeQualifiers::default(),
                value: None,
                bits: None,
                byte_offset: 0,
            }),
        )
    }

    /// A callable of the given kind.
    #[must_use]
    pub fn calldef(
        name: impl Into<String>,
        kind: CalldefKind,
        return_type: Option<Type>,
        arguments: Vec<Argument>,
    ) -> Self {
        let mut data = CalldefData::new(kind);
        data.return_type = return_type;
        data.arguments = arguments;
        Self::new(name, DeclData::Calldef(data))
    }

    /// A free function.
    #[must_use]
    pub fn free_function(
        name: impl Into<String>,
        return_type: Type,
        arguments: Vec<Argument>,
    ) -> Self {
        Self::calldef(name, CalldefKind::FreeFunction, Some(return_type), arguments)
    }

    /// A member function.
    #[must_use]
    pub fn member_function(
        name: impl Into<String>,
        return_type: Type,
        arguments: Vec<Argument>,
    ) -> Self {
        Self::calldef(
            name,
            CalldefKind::MemberFunction,
            Some(return_type),
            arguments,
        )
    }

    /// A constructor.
    #[must_use]
    pub fn constructor(name: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self::calldef(name, CalldefKind::Constructor, None, arguments)
    }

    /// A destructor. `name` is the class name; `~` is prepended.
    #[must_use]
    pub fn destructor(name: impl Into<String>) -> Self {
        Self::calldef(
            format!("~{}", name.into()),
            CalldefKind::Destructor,
            None,
            Vec::new(),
        )
    }

    /// Builder method to set the source location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Builder method to mark the declaration compiler-generated.
    #[must_use]
    pub fn artificial(mut self) -> Self {
        self.is_artificial = true;
        self
    }

    /// Builder method to set the mangled name.
    #[must_use]
    pub fn with_mangled(mut self, mangled: impl Into<String>) -> Self {
        self.mangled = Some(mangled.into());
        self
    }

    /// Builder method to set the demangled name.
    #[must_use]
    pub fn with_demangled(mut self, demangled: impl Into<String>) -> Self {
        self.demangled = Some(demangled.into());
        self
    }

    /// Builder method to set the attribute string.
    #[must_use]
    pub fn with_attributes(mut self, attributes: impl Into<String>) -> Self {
        self.attributes = Some(attributes.into());
        self
    }

    /// Builder method to edit callable data in place. No-op for
    /// non-callables.
    #[must_use]
    pub fn with_calldef(mut self, edit: impl FnOnce(&mut CalldefData)) -> Self {
        if let DeclData::Calldef(data) = &mut self.data {
            edit(data);
        }
        self
    }

    /// Builder method to edit class data in place. No-op for non-classes.
    #[must_use]
    pub fn with_class(mut self, edit: impl FnOnce(&mut ClassData)) -> Self {
        if let DeclData::Class(data) = &mut self.data {
            edit(data);
        }
        self
    }

    /// Builder method to edit variable data in place. No-op for
    /// non-variables.
    #[must_use]
    pub fn with_variable(mut self, edit: impl FnOnce(&mut VariableData)) -> Self {
        if let DeclData::Variable(data) = &mut self.data {
            edit(data);
        }
        self
    }

    /// The declared name; empty for anonymous entities.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The enclosing scope, `None` for the root and detached nodes.
    #[must_use]
    pub fn parent(&self) -> Option<DeclId> {
        self.parent
    }

    /// Output of the demangler for `mangled`.
    #[must_use]
    pub fn demangled(&self) -> Option<&str> {
        self.demangled.as_deref()
    }

    /// Replaces the demangled string and drops the name derived from it.
    pub fn set_demangled(&mut self, demangled: Option<String>) {
        self.demangled = demangled;
        self.cache.demangled_name.clear();
    }

    /// Kind-specific data.
    #[must_use]
    pub fn data(&self) -> &DeclData {
        &self.data
    }

    /// The memo slots of this declaration.
    #[must_use]
    pub fn cache(&self) -> &DeclCache {
        &self.cache
    }

    /// The concrete kind.
    #[must_use]
    pub fn kind(&self) -> DeclKind {
        match &self.data {
            DeclData::Namespace(_) => DeclKind::Namespace,
            DeclData::Class(_) => DeclKind::Class,
            DeclData::ClassDeclaration => DeclKind::ClassDeclaration,
            DeclData::Enumeration(_) => DeclKind::Enumeration,
            DeclData::Typedef(_) => DeclKind::Typedef,
            DeclData::Variable(_) => DeclKind::Variable,
            DeclData::Calldef(data) => DeclKind::Calldef(data.kind),
        }
    }

    /// Returns true if this declaration belongs to `category`.
    #[must_use]
    pub fn is_a(&self, category: DeclCategory) -> bool {
        self.kind().is_a(category)
    }

    /// Returns true for namespaces and classes.
    #[must_use]
    pub fn is_scope(&self) -> bool {
        matches!(self.data, DeclData::Namespace(_) | DeclData::Class(_))
    }

    /// Direct children of a scope, in order (class members: public, then
    /// protected, then private). Empty for non-scopes.
    #[must_use]
    pub fn children(&self) -> Vec<DeclId> {
        match &self.data {
            DeclData::Namespace(ns) => ns.children.clone(),
            DeclData::Class(class) => class.all_members().collect(),
            _ => Vec::new(),
        }
    }

    /// Class data, if this is a class.
    #[must_use]
    pub fn as_class(&self) -> Option<&ClassData> {
        match &self.data {
            DeclData::Class(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable class data. Membership and hierarchy links are managed by
    /// the tree and cannot be edited here.
    pub fn as_class_mut(&mut self) -> Option<&mut ClassData> {
        match &mut self.data {
            DeclData::Class(data) => Some(data),
            _ => None,
        }
    }

    /// Enumeration data, if this is an enum.
    #[must_use]
    pub fn as_enumeration(&self) -> Option<&EnumData> {
        match &self.data {
            DeclData::Enumeration(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable enumeration data.
    pub fn as_enumeration_mut(&mut self) -> Option<&mut EnumData> {
        match &mut self.data {
            DeclData::Enumeration(data) => Some(data),
            _ => None,
        }
    }

    /// Typedef data, if this is a typedef.
    #[must_use]
    pub fn as_typedef(&self) -> Option<&TypedefData> {
        match &self.data {
            DeclData::Typedef(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable typedef data.
    pub fn as_typedef_mut(&mut self) -> Option<&mut TypedefData> {
        match &mut self.data {
            DeclData::Typedef(data) => Some(data),
            _ => None,
        }
    }

    /// Variable data, if this is a variable.
    #[must_use]
    pub fn as_variable(&self) -> Option<&VariableData> {
        match &self.data {
            DeclData::Variable(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable variable data.
    pub fn as_variable_mut(&mut self) -> Option<&mut VariableData> {
        match &mut self.data {
            DeclData::Variable(data) => Some(data),
            _ => None,
        }
    }

    /// Callable data, if this is a calldef.
    #[must_use]
    pub fn as_calldef(&self) -> Option<&CalldefData> {
        match &self.data {
            DeclData::Calldef(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable callable data.
    pub fn as_calldef_mut(&mut self) -> Option<&mut CalldefData> {
        match &mut self.data {
            DeclData::Calldef(data) => Some(data),
            _ => None,
        }
    }

    /// The type a typedef aliases or a variable holds.
    #[must_use]
    pub fn decl_type(&self) -> Option<&Type> {
        match &self.data {
            DeclData::Typedef(data) => Some(&data.ty),
            DeclData::Variable(data) => Some(&data.ty),
            _ => None,
        }
    }

    /// For operators, the operator symbol with the `operator` keyword
    /// stripped (`operator+=` gives `+=`). `None` for other declarations.
    #[must_use]
    pub fn operator_symbol(&self) -> Option<&str> {
        let data = self.as_calldef()?;
        if !data.kind.is_operator() {
            return None;
        }
        let symbol = self.name.strip_prefix("operator").unwrap_or(&self.name);
        Some(symbol.trim())
    }
}
