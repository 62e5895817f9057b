//! Integration tests for name-level container recognition

use cppdecl_foundation::{
    ContainerKind, find_container_traits, is_std_ostream_name, is_std_string_name,
    is_std_wstring_name,
};

#[test]
fn containers_found_by_instantiation_name() {
    let cases = [
        ("std::vector<int, std::allocator<int> >", ContainerKind::Vector),
        ("::std::list<int>", ContainerKind::List),
        ("std::tr1::unordered_map<int, int>", ContainerKind::UnorderedMap),
        ("__gnu_cxx::hash_set<int>", ContainerKind::HashSet),
        ("stdext::hash_map<int, int>", ContainerKind::HashMap),
    ];
    for (name, kind) in cases {
        let traits = find_container_traits(name).unwrap_or_else(|| panic!("{name}"));
        assert_eq!(traits.kind, kind, "{name}");
    }
    assert!(find_container_traits("std::vector").is_none());
    assert!(find_container_traits("app::vector<int>").is_none());
    assert!(find_container_traits("std::basic_string<char>").is_none());
}

#[test]
fn mapping_and_sequence_indices() {
    let map = find_container_traits("std::map<int, double>").unwrap();
    assert!(map.is_mapping());
    assert_eq!(map.key_index, Some(0));
    assert_eq!(map.element_index, 1);
    assert_eq!(map.element_typedef, "mapped_type");

    let set = find_container_traits("std::set<int>").unwrap();
    assert!(set.is_sequence());
    assert_eq!(set.key_typedef, None);
}

#[test]
fn defaults_removed_from_vector() {
    let name = "std::vector<int, std::allocator<int> >";
    let traits = find_container_traits(name).unwrap();
    assert_eq!(traits.remove_defaults(name), "vector<int>");
}

#[test]
fn defaults_removed_from_map() {
    let name = "std::map<K,V,std::less<K>,std::allocator<std::pair<const K,V> > >";
    let traits = find_container_traits(name).unwrap();
    assert_eq!(traits.remove_defaults(name), "map<K,V>");
}

#[test]
fn custom_arguments_are_kept() {
    let name = "std::vector<int, my_allocator<int> >";
    let traits = find_container_traits(name).unwrap();
    assert_eq!(traits.remove_defaults(name), name);
}

#[test]
fn string_spellings() {
    assert!(is_std_string_name("::std::string"));
    assert!(is_std_string_name(
        "::std::basic_string<char,std::char_traits<char>,std::allocator<char> >"
    ));
    assert!(!is_std_string_name("::std::wstring"));
    assert!(is_std_wstring_name("::std::basic_string<wchar_t>"));
    assert!(is_std_ostream_name("::std::ostream"));
}
