//! Qualified names, declaration paths, and decl-strings.
//!
//! All of these are memoized in the declaration's cache while caching is
//! enabled. Paths walk up only until an ancestor with a cached path is
//! found.

use cppdecl_foundation::{
    DeclId, PatternParser, Result, containers, is_std_string_name, is_std_wstring_name,
};

use crate::cache::{CacheSlot, DeclCache, memoize};
use crate::decl::{AccessType, CalldefKind, DeclData, Declaration};
use crate::tree::DeclTree;
use crate::types::Type;

#[derive(Clone, Copy)]
enum Flavor {
    Full,
    Partial,
}

impl Flavor {
    fn path_slot(self, cache: &DeclCache) -> &CacheSlot<Vec<String>> {
        match self {
            Self::Full => &cache.declaration_path,
            Self::Partial => &cache.partial_declaration_path,
        }
    }

    fn name_slot(self, cache: &DeclCache) -> &CacheSlot<String> {
        match self {
            Self::Full => &cache.full_name,
            Self::Partial => &cache.full_partial_name,
        }
    }
}

/// Joins a declaration path into a qualified name.
///
/// Empty segments (anonymous entities) are skipped, so names inside an
/// anonymous namespace read like names in the enclosing one.
#[must_use]
pub fn full_name_from_path(path: &[String]) -> String {
    let segments: Vec<&str> = path
        .iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    match segments.split_first() {
        None => String::new(),
        Some((&"::", rest)) => format!("::{}", rest.join("::")),
        Some(_) => segments.join("::"),
    }
}

impl DeclTree {
    /// Names from the outermost ancestor down to the declaration.
    ///
    /// For a declaration in the tree this starts with `"::"`.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn declaration_path(&self, id: DeclId) -> Result<Vec<String>> {
        self.path(id, Flavor::Full)
    }

    /// Like [`declaration_path`](Self::declaration_path) but built from
    /// partial names (container default arguments removed).
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn partial_declaration_path(&self, id: DeclId) -> Result<Vec<String>> {
        self.path(id, Flavor::Partial)
    }

    /// Fully qualified name, e.g. `::std::vector<int, std::allocator<int> >`.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn full_name(&self, id: DeclId) -> Result<String> {
        self.qualified(id, Flavor::Full)
    }

    /// Fully qualified name without container default arguments, e.g.
    /// `::std::vector<int>`.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn partial_full_name(&self, id: DeclId) -> Result<String> {
        self.qualified(id, Flavor::Partial)
    }

    /// Qualified name with or without default template arguments.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn qualified_name(&self, id: DeclId, with_defaults: bool) -> Result<String> {
        if with_defaults {
            self.full_name(id)
        } else {
            self.partial_full_name(id)
        }
    }

    /// The declaration's own name without default template arguments.
    ///
    /// `std::string` and `std::wstring` classes report `string` and
    /// `wstring`.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn partial_name(&self, id: DeclId) -> Result<String> {
        let decl = self.decl(id)?;
        memoize(&decl.cache.partial_name, self.cache_enabled(), || {
            match decl.data {
                DeclData::Class(_) | DeclData::ClassDeclaration => {
                    let full = self.full_name(id)?;
                    if is_std_string_name(&full) {
                        Ok("string".to_string())
                    } else if is_std_wstring_name(&full) {
                        Ok("wstring".to_string())
                    } else {
                        Ok(containers::partial_name(&decl.name))
                    }
                }
                _ => Ok(decl.name.clone()),
            }
        })
    }

    /// Access of a class member; `None` outside classes.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn access_type(&self, id: DeclId) -> Result<Option<AccessType>> {
        let decl = self.decl(id)?;
        memoize(&decl.cache.access_type, self.cache_enabled(), || {
            Ok(decl
                .parent
                .and_then(|p| self.get(p))
                .and_then(Declaration::as_class)
                .and_then(|class| class.access_of(id)))
        })
    }

    /// The true name recovered from the demangled symbol.
    ///
    /// The text before the argument list is taken and its last qualified
    /// segment returned, which restores template arguments some compilers
    /// drop from declaration names. Falls back to the declared name.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn demangled_name(&self, id: DeclId) -> Result<String> {
        let decl = self.decl(id)?;
        memoize(&decl.cache.demangled_name, self.cache_enabled(), || {
            let Some(demangled) = decl.demangled.as_deref().filter(|d| !d.is_empty()) else {
                return Ok(decl.name.clone());
            };
            let callee = PatternParser::CALL_INVOCATION.name(demangled);
            let segment = PatternParser::TEMPLATES.last_segment(&callee).trim();
            if segment.is_empty() {
                Ok(decl.name.clone())
            } else {
                Ok(segment.to_string())
            }
        })
    }

    /// The name in canonical template spacing.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn normalize_name(&self, id: DeclId) -> Result<String> {
        Ok(PatternParser::TEMPLATES.normalize(self.decl(id)?.name()))
    }

    /// The partial name in canonical template spacing.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn normalize_partial_name(&self, id: DeclId) -> Result<String> {
        Ok(PatternParser::TEMPLATES.normalize(&self.partial_name(id)?))
    }

    /// The qualified name in canonical template spacing.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn normalize_full_name(&self, id: DeclId, with_defaults: bool) -> Result<String> {
        Ok(PatternParser::TEMPLATES.normalize(&self.qualified_name(id, with_defaults)?))
    }

    /// The type of a callable: a free function type for free and static
    /// functions, a member function type otherwise.
    ///
    /// # Errors
    ///
    /// Fails for stale handles or when `id` is not a calldef.
    pub fn function_type(&self, id: DeclId) -> Result<Type> {
        let decl = self.decl(id)?;
        let Some(data) = decl.as_calldef() else {
            return Err(cppdecl_foundation::Error::precondition(format!(
                "{} is not a calldef",
                decl.name
            )));
        };
        let arguments = data.argument_types();
        let bound = data.kind.is_member()
            && !data.has_static
            && !matches!(data.kind, CalldefKind::Constructor | CalldefKind::Destructor);
        match decl.parent {
            Some(class) if bound && self.get(class).is_some_and(|p| p.as_class().is_some()) => {
                Ok(Type::member_function(
                    class,
                    data.return_type.clone(),
                    arguments,
                    data.has_const,
                ))
            }
            _ => Ok(Type::free_function(data.return_type.clone(), arguments)),
        }
    }

    /// Canonical textual rendering of a declaration.
    ///
    /// Callables render as their function type; everything else as its
    /// qualified name.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn decl_string(&self, id: DeclId) -> Result<String> {
        if self.decl(id)?.as_calldef().is_some() {
            Ok(self.function_type(id)?.decl_string(self))
        } else {
            self.full_name(id)
        }
    }

    fn segment(&self, id: DeclId, flavor: Flavor) -> Result<String> {
        match flavor {
            Flavor::Full => Ok(self.decl(id)?.name.clone()),
            Flavor::Partial => self.partial_name(id),
        }
    }

    fn path(&self, id: DeclId, flavor: Flavor) -> Result<Vec<String>> {
        let decl = self.decl(id)?;
        let enabled = self.cache_enabled();
        memoize(flavor.path_slot(&decl.cache), enabled, || {
            let mut reversed = vec![self.segment(id, flavor)?];
            let mut current = decl.parent;
            while let Some(parent) = current {
                let parent_decl = self.decl(parent)?;
                let cached = if enabled {
                    flavor.path_slot(&parent_decl.cache).get()
                } else {
                    None
                };
                if let Some(mut prefix) = cached {
                    prefix.extend(reversed.into_iter().rev());
                    return Ok(prefix);
                }
                reversed.push(self.segment(parent, flavor)?);
                current = parent_decl.parent;
            }
            reversed.reverse();
            Ok(reversed)
        })
    }

    fn qualified(&self, id: DeclId, flavor: Flavor) -> Result<String> {
        let decl = self.decl(id)?;
        memoize(flavor.name_slot(&decl.cache), self.cache_enabled(), || {
            let path = self.path(id, flavor)?;
            Ok(full_name_from_path(&path))
        })
    }
}
