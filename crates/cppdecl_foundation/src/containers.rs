//! Standard container recognition and default template argument erasure.
//!
//! This module works on names only. Recognizing container declarations in
//! a declaration tree and resolving their element and key types lives in
//! the traits layer; the name-level part lives here because the model
//! needs it to compute partial (defaults-free) names.

use tracing::trace;

use crate::pattern::PatternParser;

/// Namespaces whose direct class templates count as standard containers.
pub const STD_NAMESPACES: [&str; 3] = ["std", "stdext", "__gnu_cxx"];

/// Spellings of `std::string`, fully qualified.
pub const STRING_EQUIVALENCES: [&str; 7] = [
    "::std::basic_string<char,std::char_traits<char>,std::allocator<char> >",
    "::std::basic_string<char, std::char_traits<char>, std::allocator<char> >",
    "::std::__cxx11::basic_string<char,std::char_traits<char>,std::allocator<char> >",
    "::std::__cxx11::basic_string<char, std::char_traits<char>, std::allocator<char> >",
    "::std::basic_string<char>",
    "::std::__cxx11::basic_string<char>",
    "::std::string",
];

/// Spellings of `std::wstring`, fully qualified.
pub const WSTRING_EQUIVALENCES: [&str; 7] = [
    "::std::basic_string<wchar_t,std::char_traits<wchar_t>,std::allocator<wchar_t> >",
    "::std::basic_string<wchar_t, std::char_traits<wchar_t>, std::allocator<wchar_t> >",
    "::std::__cxx11::basic_string<wchar_t,std::char_traits<wchar_t>,std::allocator<wchar_t> >",
    "::std::__cxx11::basic_string<wchar_t, std::char_traits<wchar_t>, std::allocator<wchar_t> >",
    "::std::basic_string<wchar_t>",
    "::std::__cxx11::basic_string<wchar_t>",
    "::std::wstring",
];

/// Spellings of `std::ostream`, fully qualified.
pub const OSTREAM_EQUIVALENCES: [&str; 4] = [
    "::std::basic_ostream<char, std::char_traits<char> >",
    "::std::basic_ostream<char,std::char_traits<char> >",
    "::std::basic_ostream<char>",
    "::std::ostream",
];

/// Spellings of `std::wostream`, fully qualified.
pub const WOSTREAM_EQUIVALENCES: [&str; 4] = [
    "::std::basic_ostream<wchar_t, std::char_traits<wchar_t> >",
    "::std::basic_ostream<wchar_t,std::char_traits<wchar_t> >",
    "::std::basic_ostream<wchar_t>",
    "::std::wostream",
];

/// Returns true if `name` spells `std::string`.
#[must_use]
pub fn is_std_string_name(name: &str) -> bool {
    STRING_EQUIVALENCES.contains(&name)
}

/// Returns true if `name` spells `std::wstring`.
#[must_use]
pub fn is_std_wstring_name(name: &str) -> bool {
    WSTRING_EQUIVALENCES.contains(&name)
}

/// Returns true if `name` spells `std::ostream`.
#[must_use]
pub fn is_std_ostream_name(name: &str) -> bool {
    OSTREAM_EQUIVALENCES.contains(&name)
}

/// Returns true if `name` spells `std::wostream`.
#[must_use]
pub fn is_std_wostream_name(name: &str) -> bool {
    WOSTREAM_EQUIVALENCES.contains(&name)
}

/// The standard containers cppdecl recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// `std::list`
    List,
    /// `std::deque`
    Deque,
    /// `std::queue`
    Queue,
    /// `std::priority_queue`
    PriorityQueue,
    /// `std::vector`
    Vector,
    /// `std::stack`
    Stack,
    /// `std::map`
    Map,
    /// `std::multimap`
    Multimap,
    /// `hash_map` (`stdext` / `__gnu_cxx`)
    HashMap,
    /// `hash_multimap`
    HashMultimap,
    /// `std::set`
    Set,
    /// `std::multiset`
    Multiset,
    /// `hash_set`
    HashSet,
    /// `hash_multiset`
    HashMultiset,
    /// `std::unordered_map`
    UnorderedMap,
    /// `std::unordered_multimap`
    UnorderedMultimap,
    /// `std::unordered_set`
    UnorderedSet,
    /// `std::unordered_multiset`
    UnorderedMultiset,
}

impl ContainerKind {
    /// Returns the traits entry for this container.
    #[must_use]
    pub fn traits(self) -> &'static ContainerTraits {
        ALL_CONTAINER_TRAITS
            .iter()
            .find(|t| t.kind == self)
            .unwrap_or(&ALL_CONTAINER_TRAITS[0])
    }
}

/// How the default template arguments of a container are recognized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultEraser {
    /// `C<T, std::allocator<T> >`
    Allocator,
    /// `C<T, std::deque<T> >`
    Container,
    /// `C<T, std::vector<T>, std::less<T> >`
    ContainerCompare,
    /// `C<T, std::less<T>, std::allocator<T> >`
    CompareAllocator,
    /// `C<K, V, std::less<K>, std::allocator<std::pair<const K, V> > >`
    MapCompareAllocator,
    /// Hashed sets, with either `hash_compare` or `hash` + `equal_to`.
    HashAllocator,
    /// Hashed maps, with either `hash_compare` or `hash` + `equal_to`.
    HashMapCompareAllocator,
}

/// Metadata describing one standard container template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerTraits {
    /// Which container this entry describes.
    pub kind: ContainerKind,
    /// Unqualified template name, e.g. `vector`.
    pub name: &'static str,
    /// Index of the element type among the template arguments.
    pub element_index: usize,
    /// Name of the member typedef naming the element type.
    pub element_typedef: &'static str,
    /// Recognizer for default template arguments.
    pub eraser: DefaultEraser,
    /// Index of the key type among the template arguments (mappings only).
    pub key_index: Option<usize>,
    /// Name of the member typedef naming the key type (mappings only).
    pub key_typedef: Option<&'static str>,
}

const fn sequence(
    kind: ContainerKind,
    name: &'static str,
    eraser: DefaultEraser,
) -> ContainerTraits {
    ContainerTraits {
        kind,
        name,
        element_index: 0,
        element_typedef: "value_type",
        eraser,
        key_index: None,
        key_typedef: None,
    }
}

const fn mapping(
    kind: ContainerKind,
    name: &'static str,
    eraser: DefaultEraser,
) -> ContainerTraits {
    ContainerTraits {
        kind,
        name,
        element_index: 1,
        element_typedef: "mapped_type",
        eraser,
        key_index: Some(0),
        key_typedef: Some("key_type"),
    }
}

/// Every container cppdecl recognizes.
pub static ALL_CONTAINER_TRAITS: [ContainerTraits; 18] = [
    sequence(ContainerKind::List, "list", DefaultEraser::Allocator),
    sequence(ContainerKind::Deque, "deque", DefaultEraser::Allocator),
    sequence(ContainerKind::Queue, "queue", DefaultEraser::Container),
    sequence(
        ContainerKind::PriorityQueue,
        "priority_queue",
        DefaultEraser::ContainerCompare,
    ),
    sequence(ContainerKind::Vector, "vector", DefaultEraser::Allocator),
    sequence(ContainerKind::Stack, "stack", DefaultEraser::Container),
    mapping(
        ContainerKind::Map,
        "map",
        DefaultEraser::MapCompareAllocator,
    ),
    mapping(
        ContainerKind::Multimap,
        "multimap",
        DefaultEraser::MapCompareAllocator,
    ),
    mapping(
        ContainerKind::HashMap,
        "hash_map",
        DefaultEraser::HashMapCompareAllocator,
    ),
    mapping(
        ContainerKind::HashMultimap,
        "hash_multimap",
        DefaultEraser::HashMapCompareAllocator,
    ),
    sequence(ContainerKind::Set, "set", DefaultEraser::CompareAllocator),
    sequence(
        ContainerKind::Multiset,
        "multiset",
        DefaultEraser::CompareAllocator,
    ),
    sequence(ContainerKind::HashSet, "hash_set", DefaultEraser::HashAllocator),
    sequence(
        ContainerKind::HashMultiset,
        "hash_multiset",
        DefaultEraser::HashAllocator,
    ),
    mapping(
        ContainerKind::UnorderedMap,
        "unordered_map",
        DefaultEraser::HashMapCompareAllocator,
    ),
    mapping(
        ContainerKind::UnorderedMultimap,
        "unordered_multimap",
        DefaultEraser::HashMapCompareAllocator,
    ),
    sequence(
        ContainerKind::UnorderedSet,
        "unordered_set",
        DefaultEraser::HashAllocator,
    ),
    sequence(
        ContainerKind::UnorderedMultiset,
        "unordered_multiset",
        DefaultEraser::HashAllocator,
    ),
];

/// Finds the container traits for an instantiation name such as
/// `std::vector<int, std::allocator<int> >`.
///
/// Returns `None` for names that are not instantiations of a known
/// container template.
#[must_use]
pub fn find_container_traits(name: &str) -> Option<&'static ContainerTraits> {
    if !PatternParser::TEMPLATES.has_pattern(name) {
        return None;
    }
    let template = PatternParser::TEMPLATES.name(name);
    let template = unqualified_container_name(&template);
    ALL_CONTAINER_TRAITS.iter().find(|t| t.name == template)
}

/// Strips a leading `::`, one standard namespace and an optional `tr1::`.
fn unqualified_container_name(name: &str) -> &str {
    let mut rest = name.strip_prefix("::").unwrap_or(name);
    for ns in STD_NAMESPACES {
        if let Some(stripped) = rest.strip_prefix(ns).and_then(|r| r.strip_prefix("::")) {
            rest = stripped;
            break;
        }
    }
    rest.strip_prefix("tr1::").unwrap_or(rest)
}

impl ContainerTraits {
    /// Returns true if this container maps keys to values.
    #[must_use]
    pub fn is_mapping(&self) -> bool {
        self.key_index.is_some()
    }

    /// Returns true if this container is a plain sequence or set.
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        !self.is_mapping()
    }

    /// Removes default template arguments from an instantiation name.
    ///
    /// The container's fully defaulted spelling is rebuilt from the
    /// user-supplied arguments and compared with `name`, ignoring
    /// whitespace. On a match only the user-supplied arguments are kept,
    /// recursively stripped of their own defaults, and joined compactly
    /// under the unqualified template name: `vector<int>`, `map<K,V>`.
    /// Names that do not match are returned unchanged.
    #[must_use]
    pub fn remove_defaults(&self, name: &str) -> String {
        let erased = match self.eraser {
            DefaultEraser::Allocator => erase_allocator(name),
            DefaultEraser::Container => erase_container(name),
            DefaultEraser::ContainerCompare => erase_container_compare(name),
            DefaultEraser::CompareAllocator => erase_compare_allocator(name),
            DefaultEraser::MapCompareAllocator => erase_map_compare_allocator(name),
            DefaultEraser::HashAllocator => erase_hash_allocator(name),
            DefaultEraser::HashMapCompareAllocator => erase_hashmap_compare_allocator(name),
        };
        match erased {
            Some(short) => {
                trace!(container = self.name, from = name, to = %short, "removed default arguments");
                short
            }
            None => name.to_string(),
        }
    }
}

/// Returns the partial (defaults-free) spelling of a class name.
///
/// Container instantiations lose their default arguments; everything else
/// is returned unchanged.
#[must_use]
pub fn partial_name(name: &str) -> String {
    match find_container_traits(name) {
        Some(traits) => traits.remove_defaults(name),
        None => name.to_string(),
    }
}

// =============================================================================
// Default argument erasers
// =============================================================================

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn same_spelling(a: &str, b: &str) -> bool {
    without_whitespace(a) == without_whitespace(b)
}

fn short_name(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

fn tr1_prefix(name: &str) -> &'static str {
    if name.contains("tr1") { "tr1::" } else { "" }
}

fn split(name: &str) -> Option<(String, Vec<String>)> {
    PatternParser::TEMPLATES.split(name).ok()
}

fn joined(container: &str, args: &[String]) -> String {
    PatternParser::TEMPLATES.join_compact(short_name(container), args)
}

fn replace_basic_string(name: &str) -> String {
    let mut result = name.to_string();
    for (short, spellings) in [
        ("std::string", &STRING_EQUIVALENCES),
        ("std::wstring", &WSTRING_EQUIVALENCES),
    ] {
        for spelling in spellings.iter() {
            let spelling = spelling.trim_start_matches("::");
            if spelling != short {
                result = result.replace(spelling, short);
            }
        }
    }
    result
}

fn with_prefix(name: &str, prefix: &str, then: fn(&str) -> String) -> String {
    match name.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() => format!("{prefix}{}", then(rest)),
        _ => then(name),
    }
}

/// Strips namespace and cv decorations, erases defaults, and puts the
/// decorations back.
fn erase_recursive(name: &str) -> String {
    with_prefix(name, "::", erase_no_std)
}

fn erase_no_std(name: &str) -> String {
    let tr1 = tr1_prefix(name);
    let prefix = format!("std::{tr1}");
    match name.strip_prefix(prefix.as_str()) {
        Some(rest) => format!("{prefix}{}", erase_no_stdext(rest)),
        None => erase_no_stdext(name),
    }
}

fn erase_no_stdext(name: &str) -> String {
    with_prefix(name, "stdext::", erase_no_gnu)
}

fn erase_no_gnu(name: &str) -> String {
    with_prefix(name, "__gnu_cxx::", erase_no_const)
}

fn erase_no_const(name: &str) -> String {
    with_prefix(name, "const ", erase_no_end_const)
}

fn erase_no_end_const(name: &str) -> String {
    match name.strip_suffix(" const") {
        Some(rest) => format!("{} const", erase_call(rest)),
        None => erase_call(name),
    }
}

fn erase_call(name: &str) -> String {
    match find_container_traits(name) {
        Some(traits) => traits.remove_defaults(name),
        None => name.to_string(),
    }
}

fn erase_allocator(name: &str) -> Option<String> {
    let name = replace_basic_string(name);
    let (container, args) = split(&name)?;
    if args.len() != 2 {
        return None;
    }
    let value = &args[0];
    let defaulted = format!("{container}< {value}, std::allocator<{value}> >");
    same_spelling(&name, &defaulted).then(|| joined(&container, &[erase_recursive(value)]))
}

fn erase_container(name: &str) -> Option<String> {
    let name = replace_basic_string(name);
    let (container, args) = split(&name)?;
    if args.len() != 2 {
        return None;
    }
    let value = &args[0];
    let adapted = erase_recursive(&args[1]);
    let default_container = PatternParser::TEMPLATES.join("std::deque", &[value.as_str()]);
    same_spelling(&adapted, &default_container)
        .then(|| joined(&container, &[erase_recursive(value)]))
}

fn erase_container_compare(name: &str) -> Option<String> {
    let name = replace_basic_string(name);
    let (container, args) = split(&name)?;
    if args.len() != 3 {
        return None;
    }
    let value = &args[0];
    let adapted = erase_recursive(&args[1]);
    if !same_spelling(
        &adapted,
        &PatternParser::TEMPLATES.join("std::vector", &[value.as_str()]),
    ) {
        return None;
    }
    let compare = erase_recursive(&args[2]);
    if !same_spelling(
        &compare,
        &PatternParser::TEMPLATES.join("std::less", &[value.as_str()]),
    ) {
        return None;
    }
    Some(joined(&container, &[erase_recursive(value)]))
}

fn erase_compare_allocator(name: &str) -> Option<String> {
    let name = replace_basic_string(name);
    let (container, args) = split(&name)?;
    if args.len() != 3 {
        return None;
    }
    let value = &args[0];
    let defaulted =
        format!("{container}< {value}, std::less<{value}>, std::allocator<{value}> >");
    same_spelling(&name, &defaulted).then(|| joined(&container, &[erase_recursive(value)]))
}

fn erase_map_compare_allocator(name: &str) -> Option<String> {
    let name = replace_basic_string(name);
    let (container, args) = split(&name)?;
    if args.len() != 4 {
        return None;
    }
    let key = &args[0];
    let mapped = &args[1];
    let spellings = [
        format!(
            "{container}< {key}, {mapped}, std::less<{key}>, std::allocator< std::pair< const {key}, {mapped}> > >"
        ),
        format!(
            "{container}< {key}, {mapped}, std::less<{key}>, std::allocator< std::pair< {key} const, {mapped}> > >"
        ),
        format!(
            "{container}< {key}, {mapped}, std::less<{key}>, std::allocator< std::pair< const {key}, {mapped} const> > >"
        ),
    ];
    spellings
        .iter()
        .any(|defaulted| same_spelling(&name, defaulted))
        .then(|| joined(&container, &[erase_recursive(key), erase_recursive(mapped)]))
}

fn erase_hash_allocator(name: &str) -> Option<String> {
    let name = replace_basic_string(name);
    let (container, args) = split(&name)?;
    let value = args.first()?;
    let tr1 = tr1_prefix(&container);
    for ns in STD_NAMESPACES {
        let defaulted = match args.len() {
            3 => format!(
                "{container}< {value}, {ns}::{tr1}hash_compare<{value}, std::less<{value}> >, std::allocator<{value}> >"
            ),
            4 => format!(
                "{container}< {value}, {ns}::{tr1}hash<{value} >, std::equal_to<{value} >, std::allocator<{value}> >"
            ),
            _ => return None,
        };
        if same_spelling(&name, &replace_basic_string(&defaulted)) {
            return Some(joined(&container, &[erase_recursive(value)]));
        }
    }
    None
}

fn erase_hashmap_compare_allocator(name: &str) -> Option<String> {
    let name = replace_basic_string(name);
    let (container, args) = split(&name)?;
    if args.len() < 4 {
        return None;
    }
    let key = &args[0];
    let mapped = &args[1];
    let key_is_const = key.starts_with("const ") || key.ends_with(" const");
    let pair_key = if key_is_const {
        key.clone()
    } else {
        format!("const {key}")
    };
    let tr1 = tr1_prefix(&container);
    for ns in STD_NAMESPACES {
        let defaulted = match args.len() {
            4 => format!(
                "{container}< {key}, {mapped}, {ns}::{tr1}hash_compare<{key}, std::less<{key}> >, std::allocator< std::pair< {pair_key}, {mapped}> > >"
            ),
            5 => format!(
                "{container}< {key}, {mapped}, {ns}::{tr1}hash<{key} >, std::equal_to<{key}>, std::allocator< std::pair< {pair_key}, {mapped}> > >"
            ),
            _ => return None,
        };
        if same_spelling(&name, &replace_basic_string(&defaulted)) {
            return Some(joined(
                &container,
                &[erase_recursive(key), erase_recursive(mapped)],
            ));
        }
    }
    None
}
