use super::*;
use crate::def::DefinitionStore;
use crate::fixtures::Collections;
use crate::types::{AncestorRef, ArgExpr};

#[test]
fn test_path_to_self_is_empty() {
    let fx = Collections::new();
    let walker = HierarchyWalker::new(&fx.store);
    assert_eq!(walker.ancestor_path(fx.list, fx.list), Some(Vec::new()));
    assert!(walker.is_derived_from(fx.list, fx.list));
}

#[test]
fn test_direct_and_transitive_paths() {
    let fx = Collections::new();
    let walker = HierarchyWalker::new(&fx.store);

    let path = walker
        .ancestor_path(fx.array_list, fx.iterable)
        .expect("ArrayList -> List -> Collection -> Iterable");
    let hops: Vec<DefId> = path.iter().map(|step| step.ancestor.def).collect();
    assert_eq!(hops, vec![fx.list, fx.collection, fx.iterable]);
    assert!(path.iter().all(|step| step.edge == AncestorEdge::Interface(0)));

    assert!(walker.is_derived_from(fx.string_int_map, fx.map));
    assert!(!walker.is_derived_from(fx.map, fx.string_int_map));
    assert!(!walker.is_derived_from(fx.list, fx.set));
}

#[test]
fn test_superclass_searched_before_interfaces() {
    let fx = Collections::new();
    let walker = HierarchyWalker::new(&fx.store);
    // HashMap reaches Map both via AbstractMap and directly; the direct
    // interface edge is found at depth one.
    let path = walker.ancestor_path(fx.hash_map, fx.map).expect("HashMap is a Map");
    assert_eq!(path.len(), 1);
    assert_eq!(path[0].edge, AncestorEdge::Interface(0));

    let path = walker
        .ancestor_path(fx.linked_hash_set, fx.hash_set)
        .expect("LinkedHashSet extends HashSet");
    assert_eq!(path.len(), 1);
    assert_eq!(path[0].edge, AncestorEdge::Superclass);

    // Set is reached directly before it is reached through HashSet.
    let path = walker
        .ancestor_path(fx.linked_hash_set, fx.collection)
        .expect("LinkedHashSet is a Collection");
    let hops: Vec<DefId> = path.iter().map(|step| step.ancestor.def).collect();
    assert_eq!(hops, vec![fx.set, fx.collection]);
    assert_eq!(path[0].edge, AncestorEdge::Interface(0));
}

#[test]
fn test_find_supertype_substitutes_along_path() {
    let fx = Collections::new();
    let walker = HierarchyWalker::new(&fx.store);
    let byte = fx.simple(fx.byte);
    let set = fx.ty(fx.linked_hash_set, &[byte]);

    let iterable = walker.find_supertype(&set, fx.iterable).expect("is Iterable");
    assert_eq!(iterable.brief_description(), "Iterable<Byte>");
    assert_eq!(walker.find_supertype(&set, fx.linked_hash_set), Some(set.clone()));
    assert!(walker.find_supertype(&set, fx.map).is_none());
}

#[test]
fn test_find_supertype_through_concrete_arguments() {
    let fx = Collections::new();
    let walker = HierarchyWalker::new(&fx.store);
    let slm = fx.simple(fx.string_long_map);
    let map = walker.find_supertype(&slm, fx.map).expect("is Map");
    assert_eq!(map.brief_description(), "Map<String,Long>");
}

#[test]
fn test_ancestors_breadth_first_and_deduplicated() {
    let fx = Collections::new();
    let walker = HierarchyWalker::new(&fx.store);
    let string = fx.simple(fx.string);
    let integer = fx.simple(fx.integer);
    let map = fx.ty(fx.hash_map, &[string, integer]);

    let briefs: Vec<String> = walker
        .ancestors(&map)
        .iter()
        .map(ResolvedType::brief_description)
        .collect();
    assert_eq!(
        briefs,
        vec!["AbstractMap<String,Integer>", "Map<String,Integer>"]
    );
}

#[test]
fn test_ancestors_of_root_type() {
    let fx = Collections::new();
    let walker = HierarchyWalker::new(&fx.store);
    assert!(walker.ancestors(&fx.simple(fx.integer)).is_empty());
}

#[test]
fn test_ancestors_deep_chain() {
    let fx = Collections::new();
    let walker = HierarchyWalker::new(&fx.store);
    let names: Vec<String> = walker
        .ancestors(&fx.simple(fx.int_array_list))
        .iter()
        .map(ResolvedType::brief_description)
        .collect();
    assert_eq!(
        names,
        vec![
            "ArrayList<Integer>",
            "List<Integer>",
            "Collection<Integer>",
            "Iterable<Integer>",
        ]
    );
}

#[test]
fn test_diamond_first_path_wins() {
    let store = DefinitionStore::new();
    let string = store.class("String", &[]);
    let long = store.class("Long", &[]);
    let top = store.interface("Top", &["T"]);
    let left = store.interface("Left", &[]);
    let right = store.interface("Right", &[]);
    let bottom = store.class("Bottom", &[]);

    store
        .add_super_interface(left, AncestorRef::new(top, vec![ArgExpr::named(string)]))
        .expect("Left extends Top<String>");
    store
        .add_super_interface(right, AncestorRef::new(top, vec![ArgExpr::named(long)]))
        .expect("Right extends Top<Long>");
    store
        .add_super_interface(bottom, AncestorRef::plain(left))
        .expect("Bottom implements Left");
    store
        .add_super_interface(bottom, AncestorRef::plain(right))
        .expect("Bottom implements Right");

    let walker = HierarchyWalker::new(&store);
    let bottom_ty = crate::resolver::TypeResolver::new(&store)
        .resolve(bottom, &[])
        .expect("Bottom is known");

    let found = walker.find_supertype(&bottom_ty, top).expect("Bottom is a Top");
    assert_eq!(found.brief_description(), "Top<String>");

    let ancestors = walker.ancestors(&bottom_ty);
    let tops: Vec<_> = ancestors.iter().filter(|a| a.def_id() == top).collect();
    assert_eq!(tops.len(), 1);
    assert_eq!(tops[0].brief_description(), "Top<String>");
}

#[test]
fn test_unknown_ids_have_no_paths() {
    let fx = Collections::new();
    let walker = HierarchyWalker::new(&fx.store);
    assert!(walker.ancestor_path(DefId(999), fx.map).is_none());
    assert!(!walker.is_derived_from(fx.map, DefId(999)));
}
