//! Composable predicates over declarations.
//!
//! Every matcher implements [`Matcher`]. Besides the predicate itself a
//! matcher may report a category and a short name it requires; the query
//! engine uses these hints to pick a narrower optimizer bucket.
//!
//! # Example
//!
//! ```
//! use cppdecl_model::{DeclCategory, DeclTree, Declaration};
//! use cppdecl_query::{DeclarationMatcher, Matcher, MatcherExt, RegexMatcher};
//!
//! let mut tree = DeclTree::new();
//! let widget = tree.insert(tree.root(), Declaration::class("Widget")).unwrap();
//!
//! let matcher = DeclarationMatcher::new()
//!     .with_category(DeclCategory::Class)
//!     .and(RegexMatcher::new("W").unwrap());
//! assert!(matcher.matches(&tree, widget));
//! ```

use std::fmt::{self, Write};

use cppdecl_foundation::{
    DeclId, Error, PatternParser, Result, is_absolute_path, is_instantiation, normalize_path,
};
use cppdecl_model::{AccessType, DeclCategory, DeclTree, Declaration, Type, Virtuality};
use regex::Regex;

/// A predicate over declarations in a tree.
pub trait Matcher {
    /// Returns true if the declaration satisfies this matcher.
    ///
    /// Stale handles never match.
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool;

    /// A category every matching declaration belongs to, if known.
    fn kind_hint(&self) -> Option<DeclCategory> {
        None
    }

    /// The unqualified name every matching declaration carries, if known.
    fn name_hint(&self) -> Option<&str> {
        None
    }

    /// Human-readable description used in error messages.
    fn describe(&self) -> String;
}

impl<M: Matcher + ?Sized> Matcher for &M {
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool {
        (**self).matches(tree, id)
    }

    fn kind_hint(&self) -> Option<DeclCategory> {
        (**self).kind_hint()
    }

    fn name_hint(&self) -> Option<&str> {
        (**self).name_hint()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<M: Matcher + ?Sized> Matcher for Box<M> {
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool {
        (**self).matches(tree, id)
    }

    fn kind_hint(&self) -> Option<DeclCategory> {
        (**self).kind_hint()
    }

    fn name_hint(&self) -> Option<&str> {
        (**self).name_hint()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Combinator sugar for any matcher.
pub trait MatcherExt: Matcher + Sized + 'static {
    /// Both `self` and `other` must match.
    fn and<M: Matcher + 'static>(self, other: M) -> AndMatcher {
        AndMatcher::new(vec![Box::new(self), Box::new(other)])
    }

    /// Either `self` or `other` must match.
    fn or<M: Matcher + 'static>(self, other: M) -> OrMatcher {
        OrMatcher::new(vec![Box::new(self), Box::new(other)])
    }

    /// `self` must not match.
    fn not(self) -> NotMatcher {
        NotMatcher::new(self)
    }
}

impl<M: Matcher + Sized + 'static> MatcherExt for M {}

// =============================================================================
// Logical Combinators
// =============================================================================

/// Matches when every sub-matcher matches.
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    /// Creates a conjunction. An empty conjunction matches everything.
    #[must_use]
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool {
        self.matchers.iter().all(|m| m.matches(tree, id))
    }

    // Any conjunct's requirement holds for the whole conjunction.
    fn kind_hint(&self) -> Option<DeclCategory> {
        self.matchers.iter().find_map(|m| m.kind_hint())
    }

    fn name_hint(&self) -> Option<&str> {
        self.matchers.iter().find_map(|m| m.name_hint())
    }

    fn describe(&self) -> String {
        join_descriptions(&self.matchers, " and ")
    }
}

/// Matches when any sub-matcher matches.
pub struct OrMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl OrMatcher {
    /// Creates a disjunction. An empty disjunction matches nothing.
    #[must_use]
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for OrMatcher {
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool {
        self.matchers.iter().any(|m| m.matches(tree, id))
    }

    fn describe(&self) -> String {
        join_descriptions(&self.matchers, " or ")
    }
}

/// Inverts a matcher.
pub struct NotMatcher {
    inner: Box<dyn Matcher>,
}

impl NotMatcher {
    /// Creates a negation.
    pub fn new<M: Matcher + 'static>(inner: M) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl Matcher for NotMatcher {
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool {
        tree.exists(id) && !self.inner.matches(tree, id)
    }

    fn describe(&self) -> String {
        format!("not ({})", self.inner.describe())
    }
}

fn join_descriptions(matchers: &[Box<dyn Matcher>], separator: &str) -> String {
    matchers
        .iter()
        .map(|m| format!("({})", m.describe()))
        .collect::<Vec<_>>()
        .join(separator)
}

// =============================================================================
// Declaration Matcher
// =============================================================================

#[derive(Clone, Debug)]
struct NameCriterion {
    text: String,
    is_template: bool,
    is_full_name: bool,
    name_only: String,
}

impl NameCriterion {
    fn new(name: &str) -> Self {
        let name = name.trim();
        let is_template = is_instantiation(name);
        let head = if is_template {
            PatternParser::TEMPLATES.name(name)
        } else {
            name.to_string()
        };
        let is_full_name = head.contains("::");
        let text = if is_full_name && !name.starts_with("::") {
            format!("::{name}")
        } else {
            name.to_string()
        };
        let text = if is_template {
            PatternParser::TEMPLATES.normalize(&text)
        } else {
            text
        };
        let name_only = if is_full_name {
            PatternParser::TEMPLATES.last_segment(&head).to_string()
        } else {
            head
        };
        Self {
            text,
            is_template,
            is_full_name,
            name_only,
        }
    }

    fn matches(&self, tree: &DeclTree, id: DeclId, decl: &Declaration) -> bool {
        let candidates: [Result<String>; 2] = match (self.is_template, self.is_full_name) {
            (true, false) => [tree.normalize_name(id), tree.normalize_partial_name(id)],
            (true, true) => [
                tree.normalize_full_name(id, true),
                tree.normalize_full_name(id, false),
            ],
            (false, false) => {
                return decl.name() == self.text
                    || tree.partial_name(id).is_ok_and(|n| n == self.text);
            }
            (false, true) => [tree.full_name(id), tree.partial_full_name(id)],
        };
        candidates
            .iter()
            .any(|c| c.as_ref().is_ok_and(|c| *c == self.text))
    }
}

/// Matches declarations by category, name and header location.
///
/// Names may be short (`Widget`), fully qualified (`::app::Widget`, a
/// missing leading `::` is added) or template instantiations
/// (`vector<int>`), which are compared in canonical spacing both with and
/// without default template arguments.
#[derive(Clone, Debug, Default)]
pub struct DeclarationMatcher {
    category: Option<DeclCategory>,
    name: Option<NameCriterion>,
    header_dir: Option<String>,
    header_file: Option<String>,
}

impl DeclarationMatcher {
    /// A matcher that accepts every declaration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `new().with_name(name)`.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::new().with_name(name)
    }

    /// Restricts matches to a category.
    #[must_use]
    pub fn with_category(mut self, category: DeclCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Restricts matches to a name.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(NameCriterion::new(name));
        self
    }

    /// Restricts matches to declarations located under `dir`.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionViolation` if `dir` is not absolute.
    pub fn with_header_dir(mut self, dir: &str) -> Result<Self> {
        self.header_dir = Some(absolute(dir)?);
        Ok(self)
    }

    /// Restricts matches to declarations located in `file`.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionViolation` if `file` is not absolute.
    pub fn with_header_file(mut self, file: &str) -> Result<Self> {
        self.header_file = Some(absolute(file)?);
        Ok(self)
    }

    /// The category constraint.
    #[must_use]
    pub fn category(&self) -> Option<DeclCategory> {
        self.category
    }

    /// The name as it is compared, after qualification and normalization.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.text.as_str())
    }

    /// Returns true if the name constraint is fully qualified.
    #[must_use]
    pub fn is_full_name(&self) -> bool {
        self.name.as_ref().is_some_and(|n| n.is_full_name)
    }

    /// The last segment of the name constraint.
    #[must_use]
    pub fn decl_name_only(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.name_only.as_str())
    }

    fn check_location(&self, decl: &Declaration) -> bool {
        if let Some(dir) = &self.header_dir {
            let Some(location) = &decl.location else {
                return false;
            };
            let decl_dir = location.directory();
            let inside = decl_dir == *dir
                || dir == "/"
                || decl_dir
                    .strip_prefix(dir.as_str())
                    .is_some_and(|rest| rest.starts_with('/'));
            if !inside {
                return false;
            }
        }
        if let Some(file) = &self.header_file {
            let Some(location) = &decl.location else {
                return false;
            };
            if location.normalized_file() != *file {
                return false;
            }
        }
        true
    }
}

fn absolute(path: &str) -> Result<String> {
    if !is_absolute_path(path) {
        return Err(Error::precondition(format!(
            "path '{path}' must be absolute"
        )));
    }
    Ok(normalize_path(path))
}

impl Matcher for DeclarationMatcher {
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool {
        let Some(decl) = tree.get(id) else {
            return false;
        };
        if let Some(category) = self.category {
            if !decl.is_a(category) {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if !name.matches(tree, id, decl) {
                return false;
            }
        }
        self.check_location(decl)
    }

    fn kind_hint(&self) -> Option<DeclCategory> {
        self.category
    }

    fn name_hint(&self) -> Option<&str> {
        self.name
            .as_ref()
            .filter(|n| !n.is_template)
            .map(|n| n.name_only.as_str())
    }

    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(category) = self.category {
            parts.push(format!("(decl type == {category})"));
        }
        if let Some(name) = &self.name {
            parts.push(format!("(name == {})", name.text));
        }
        if let Some(dir) = &self.header_dir {
            parts.push(format!("(header dir == {dir})"));
        }
        if let Some(file) = &self.header_file {
            parts.push(format!("(header file == {file})"));
        }
        if parts.is_empty() {
            "any declaration".to_string()
        } else {
            parts.join(" and ")
        }
    }
}

// =============================================================================
// Signature Matchers
// =============================================================================

/// A type constraint: either a type compared by decl-string, or the
/// decl-string itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeCriterion {
    /// Compare against this type.
    Type(Type),
    /// Compare against this decl-string, e.g. `"int const &"`.
    DeclString(String),
}

impl TypeCriterion {
    /// Returns true if `ty` satisfies the constraint.
    #[must_use]
    pub fn matches(&self, tree: &DeclTree, ty: &Type) -> bool {
        match self {
            Self::Type(expected) => expected.same(ty, tree),
            Self::DeclString(text) => ty.decl_string(tree) == *text,
        }
    }
}

impl From<Type> for TypeCriterion {
    fn from(ty: Type) -> Self {
        Self::Type(ty)
    }
}

impl From<&str> for TypeCriterion {
    fn from(text: &str) -> Self {
        Self::DeclString(text.to_string())
    }
}

impl From<String> for TypeCriterion {
    fn from(text: String) -> Self {
        Self::DeclString(text)
    }
}

impl fmt::Display for TypeCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(ty) => write!(f, "{ty:?}"),
            Self::DeclString(text) => f.write_str(text),
        }
    }
}

/// Matches variables, optionally by type.
#[derive(Clone, Debug)]
pub struct VariableMatcher {
    declaration: DeclarationMatcher,
    ty: Option<TypeCriterion>,
}

impl VariableMatcher {
    /// Wraps a declaration matcher; the category is forced to variables.
    #[must_use]
    pub fn new(declaration: DeclarationMatcher) -> Self {
        Self {
            declaration: declaration.with_category(DeclCategory::Variable),
            ty: None,
        }
    }

    /// Shorthand for a variable with the given name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::new(DeclarationMatcher::named(name))
    }

    /// Restricts matches to variables of a type.
    #[must_use]
    pub fn with_type(mut self, ty: impl Into<TypeCriterion>) -> Self {
        self.ty = Some(ty.into());
        self
    }
}

impl Matcher for VariableMatcher {
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool {
        if !self.declaration.matches(tree, id) {
            return false;
        }
        match &self.ty {
            None => true,
            Some(expected) => tree
                .get(id)
                .and_then(Declaration::decl_type)
                .is_some_and(|ty| expected.matches(tree, ty)),
        }
    }

    fn kind_hint(&self) -> Option<DeclCategory> {
        self.declaration.kind_hint()
    }

    fn name_hint(&self) -> Option<&str> {
        self.declaration.name_hint()
    }

    fn describe(&self) -> String {
        match &self.ty {
            None => self.declaration.describe(),
            Some(ty) => format!("{} and (value type == {ty})", self.declaration.describe()),
        }
    }
}

/// Matches callables, optionally by return and argument types.
#[derive(Clone, Debug)]
pub struct CalldefMatcher {
    declaration: DeclarationMatcher,
    return_type: Option<TypeCriterion>,
    arguments: Option<Vec<Option<TypeCriterion>>>,
}

impl CalldefMatcher {
    /// Wraps a declaration matcher. Without a category constraint the
    /// matcher accepts every callable.
    #[must_use]
    pub fn new(declaration: DeclarationMatcher) -> Self {
        let declaration = if declaration.category.is_some() {
            declaration
        } else {
            declaration.with_category(DeclCategory::Calldef)
        };
        Self {
            declaration,
            return_type: None,
            arguments: None,
        }
    }

    /// Shorthand for a callable with the given name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::new(DeclarationMatcher::named(name))
    }

    /// Restricts matches to a return type. Constructors and destructors
    /// have none and never match.
    #[must_use]
    pub fn with_return_type(mut self, ty: impl Into<TypeCriterion>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    /// Restricts matches to an argument list. `None` entries are
    /// wildcards; the argument count must match exactly.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<Option<TypeCriterion>>) -> Self {
        self.arguments = Some(arguments);
        self
    }

    fn check_signature(&self, tree: &DeclTree, id: DeclId) -> bool {
        let Some(data) = tree.get(id).and_then(Declaration::as_calldef) else {
            return false;
        };
        if let Some(expected) = &self.return_type {
            match &data.return_type {
                Some(actual) if expected.matches(tree, actual) => {}
                _ => return false,
            }
        }
        if let Some(expected) = &self.arguments {
            if expected.len() != data.arguments.len() {
                return false;
            }
            let all_match = expected
                .iter()
                .zip(&data.arguments)
                .all(|(criterion, argument)| {
                    criterion
                        .as_ref()
                        .is_none_or(|c| c.matches(tree, &argument.ty))
                });
            if !all_match {
                return false;
            }
        }
        true
    }
}

impl Matcher for CalldefMatcher {
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool {
        self.declaration.matches(tree, id) && self.check_signature(tree, id)
    }

    fn kind_hint(&self) -> Option<DeclCategory> {
        self.declaration.kind_hint()
    }

    fn name_hint(&self) -> Option<&str> {
        self.declaration.name_hint()
    }

    fn describe(&self) -> String {
        let mut text = self.declaration.describe();
        if let Some(ty) = &self.return_type {
            let _ = write!(text, " and (return type == {ty})");
        }
        if let Some(arguments) = &self.arguments {
            let rendered: Vec<String> = arguments
                .iter()
                .map(|a| a.as_ref().map_or_else(|| "?".to_string(), ToString::to_string))
                .collect();
            let _ = write!(text, " and (argument types == [{}])", rendered.join(", "));
        }
        text
    }
}

/// Matches operators, optionally by symbol (`+=`, `()`, `int`).
#[derive(Clone, Debug)]
pub struct OperatorMatcher {
    calldef: CalldefMatcher,
    symbol: Option<String>,
}

impl OperatorMatcher {
    /// Wraps a declaration matcher. Without a category constraint the
    /// matcher accepts every operator.
    #[must_use]
    pub fn new(declaration: DeclarationMatcher) -> Self {
        let declaration = if declaration.category.is_some() {
            declaration
        } else {
            declaration.with_category(DeclCategory::Operator)
        };
        Self {
            calldef: CalldefMatcher::new(declaration),
            symbol: None,
        }
    }

    /// Shorthand for an operator with the given symbol.
    #[must_use]
    pub fn symbol(symbol: &str) -> Self {
        Self::new(DeclarationMatcher::new()).with_symbol(symbol)
    }

    /// Restricts matches to a symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: &str) -> Self {
        self.symbol = Some(symbol.trim().to_string());
        self
    }

    /// Restricts matches to a return type.
    #[must_use]
    pub fn with_return_type(mut self, ty: impl Into<TypeCriterion>) -> Self {
        self.calldef = self.calldef.with_return_type(ty);
        self
    }

    /// Restricts matches to an argument list.
    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<Option<TypeCriterion>>) -> Self {
        self.calldef = self.calldef.with_arguments(arguments);
        self
    }
}

impl Matcher for OperatorMatcher {
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool {
        if !self.calldef.matches(tree, id) {
            return false;
        }
        match &self.symbol {
            None => true,
            Some(symbol) => tree
                .get(id)
                .and_then(Declaration::operator_symbol)
                .is_some_and(|s| s == symbol),
        }
    }

    fn kind_hint(&self) -> Option<DeclCategory> {
        self.calldef.kind_hint()
    }

    fn name_hint(&self) -> Option<&str> {
        self.calldef.name_hint()
    }

    fn describe(&self) -> String {
        match &self.symbol {
            None => self.calldef.describe(),
            Some(symbol) => format!("{} and (symbol == {symbol})", self.calldef.describe()),
        }
    }
}

// =============================================================================
// Other Matchers
// =============================================================================

type Extractor = Box<dyn Fn(&DeclTree, DeclId) -> Option<String>>;

/// Matches a regular expression at the start of an extracted string.
///
/// The declaration's name is matched unless an extractor is supplied.
pub struct RegexMatcher {
    regex: Regex,
    extractor: Option<Extractor>,
}

impl RegexMatcher {
    /// Compiles the pattern.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if the regex does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex =
            Regex::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e.to_string()))?;
        Ok(Self {
            regex,
            extractor: None,
        })
    }

    /// Matches against the string `extractor` returns instead of the
    /// name. Declarations for which it returns `None` do not match.
    #[must_use]
    pub fn with_extractor(
        mut self,
        extractor: impl Fn(&DeclTree, DeclId) -> Option<String> + 'static,
    ) -> Self {
        self.extractor = Some(Box::new(extractor));
        self
    }
}

impl fmt::Debug for RegexMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegexMatcher")
            .field("regex", &self.regex.as_str())
            .field("extractor", &self.extractor.is_some())
            .finish()
    }
}

impl Matcher for RegexMatcher {
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool {
        let text = match &self.extractor {
            Some(extract) => extract(tree, id),
            None => tree.get(id).map(|d| d.name().to_string()),
        };
        text.filter(|t| !t.is_empty())
            .and_then(|t| self.regex.find(&t).map(|m| m.start() == 0))
            .unwrap_or(false)
    }

    fn describe(&self) -> String {
        format!("(regex == {})", self.regex.as_str())
    }
}

/// Matches class members with a given access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessTypeMatcher {
    access: AccessType,
}

impl AccessTypeMatcher {
    /// Creates the matcher.
    #[must_use]
    pub fn new(access: AccessType) -> Self {
        Self { access }
    }
}

impl Matcher for AccessTypeMatcher {
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool {
        matches!(tree.access_type(id), Ok(Some(access)) if access == self.access)
    }

    fn describe(&self) -> String {
        format!("(access type == {})", self.access)
    }
}

/// Matches member callables with a given virtuality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VirtualityTypeMatcher {
    virtuality: Virtuality,
}

impl VirtualityTypeMatcher {
    /// Creates the matcher.
    #[must_use]
    pub fn new(virtuality: Virtuality) -> Self {
        Self { virtuality }
    }
}

impl Matcher for VirtualityTypeMatcher {
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool {
        let Some(decl) = tree.get(id) else {
            return false;
        };
        let in_class = decl
            .parent()
            .and_then(|p| tree.get(p))
            .is_some_and(|p| p.as_class().is_some());
        in_class
            && decl
                .as_calldef()
                .is_some_and(|data| data.virtuality == self.virtuality)
    }

    fn describe(&self) -> String {
        format!("(virtuality type == {:?})", self.virtuality)
    }
}

type Predicate = Box<dyn Fn(&DeclTree, DeclId) -> bool>;

/// Matches with an arbitrary predicate.
pub struct CustomMatcher {
    predicate: Predicate,
    description: String,
}

impl CustomMatcher {
    /// Creates the matcher. `description` shows up in error messages.
    pub fn new(
        description: impl Into<String>,
        predicate: impl Fn(&DeclTree, DeclId) -> bool + 'static,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            description: description.into(),
        }
    }
}

impl Matcher for CustomMatcher {
    fn matches(&self, tree: &DeclTree, id: DeclId) -> bool {
        tree.exists(id) && (self.predicate)(tree, id)
    }

    fn describe(&self) -> String {
        format!("(custom: {})", self.description)
    }
}
