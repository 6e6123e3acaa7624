use super::catalog_file::{build_store, load_catalog, parse_catalog};
use gentype_solver::{AncestorRef, ArgExpr, DefKind, TypeCatalog, TypeFormatter};

const COLLECTIONS: &str = include_str!("../../../catalogs/collections.json");

#[test]
fn loads_sample_catalog() {
    let store = parse_catalog(COLLECTIONS).expect("sample catalog is valid");
    assert_eq!(store.len(), 21);

    let map = store.lookup("Map").expect("Map declared");
    assert_eq!(store.kind(map), DefKind::Interface);
    assert_eq!(store.arity(map), 2);

    let formatter = TypeFormatter::new(&store);
    let list_wrapper = store.lookup("ListWrapper").expect("ListWrapper declared");
    assert_eq!(
        formatter.declaration(list_wrapper),
        "class ListWrapper<E> extends Wrapper<List<E>>"
    );
    let hash_map = store.lookup("HashMap").expect("HashMap declared");
    assert_eq!(
        formatter.declaration(hash_map),
        "class HashMap<K,V> extends AbstractMap<K,V> implements Map<K,V>"
    );
}

#[test]
fn declarations_may_reference_later_types() {
    let store = parse_catalog(
        r#"{ "types": [
            { "name": "Child", "params": ["T"], "extends": "Parent<T,Leaf>" },
            { "name": "Parent", "params": ["A", "B"] },
            { "name": "Leaf" }
        ] }"#,
    )
    .expect("forward references are fine");

    let child = store.lookup("Child").expect("Child");
    let parent = store.lookup("Parent").expect("Parent");
    let leaf = store.lookup("Leaf").expect("Leaf");
    assert_eq!(
        store.declared_superclass(child),
        Some(AncestorRef::new(parent, vec![ArgExpr::slot(0), ArgExpr::named(leaf)]))
    );
}

#[test]
fn interface_extends_accepts_a_list() {
    let store = parse_catalog(
        r#"{ "types": [
            { "name": "A", "kind": "interface" },
            { "name": "B", "kind": "interface" },
            { "name": "C", "kind": "interface", "extends": ["A", "B"] }
        ] }"#,
    )
    .expect("valid catalog");
    let c = store.lookup("C").expect("C");
    assert_eq!(store.declared_super_interfaces(c).len(), 2);
    assert!(store.declared_superclass(c).is_none());
}

fn error_chain(text: &str) -> String {
    let err = parse_catalog(text).expect_err("catalog should be rejected");
    format!("{err:#}")
}

#[test]
fn rejects_unknown_ancestor() {
    let message = error_chain(r#"{ "types": [ { "name": "A", "extends": "Missing" } ] }"#);
    assert!(message.contains("in declaration of A"), "{message}");
    assert!(message.contains("unknown type Missing"), "{message}");
}

#[test]
fn rejects_cycles_with_catalog_error() {
    let message = error_chain(
        r#"{ "types": [
            { "name": "A", "kind": "interface", "extends": "B" },
            { "name": "B", "kind": "interface", "extends": "A" }
        ] }"#,
    );
    assert!(message.contains("B cannot inherit from A: A already derives from B"), "{message}");
}

#[test]
fn rejects_ancestor_arity_mismatch() {
    let message = error_chain(
        r#"{ "types": [
            { "name": "Map", "kind": "interface", "params": ["K", "V"] },
            { "name": "Bad", "params": ["T"], "implements": ["Map<T>"] }
        ] }"#,
    );
    assert!(
        message.contains("ancestor reference to Map passes 1 type arguments, but Map declares 2"),
        "{message}"
    );
}

#[test]
fn rejects_unbound_in_declarations() {
    let message = error_chain(
        r#"{ "types": [
            { "name": "List", "kind": "interface", "params": ["E"] },
            { "name": "Bad", "implements": ["List<?>"] }
        ] }"#,
    );
    assert!(message.contains("only allowed in queries"), "{message}");
}

#[test]
fn rejects_parameter_as_ancestor() {
    let message = error_chain(r#"{ "types": [ { "name": "Bad", "params": ["T"], "extends": "T" } ] }"#);
    assert!(message.contains("must name a declared type"), "{message}");
}

#[test]
fn rejects_malformed_entries() {
    assert!(error_chain(r#"{ "types": [ { "name": "A" }, { "name": "A" } ] }"#)
        .contains("declared more than once"));
    assert!(error_chain(r#"{ "types": [ { "name": "A", "params": ["T", "T"] } ] }"#)
        .contains("declares type parameter T twice"));
    assert!(error_chain(r#"{ "types": [ { "name": "A", "kind": "interface", "implements": ["B"] } ] }"#)
        .contains("cannot use `implements`"));
    assert!(error_chain(r#"{ "types": [ { "name": "A", "extends": ["B", "C"] } ] }"#)
        .contains("can extend only one type"));
    assert!(error_chain(r#"{ "types": [ { "name": "A", "kind": "struct" } ] }"#)
        .contains("malformed catalog JSON"));
    assert!(error_chain(r#"{ "types": [ { "name": "A", "parents": [] } ] }"#)
        .contains("malformed catalog JSON"));
}

#[test]
fn rejects_superclass_interface() {
    let message = error_chain(
        r#"{ "types": [
            { "name": "Runnable", "kind": "interface" },
            { "name": "Task", "extends": "Runnable" }
        ] }"#,
    );
    assert!(message.contains("Task cannot use interface Runnable as its superclass"), "{message}");
}

#[test]
fn load_catalog_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("missing.json");
    let err = load_catalog(&missing).expect_err("file does not exist");
    assert!(format!("{err:#}").contains("failed to read catalog"));

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").expect("write catalog");
    let err = load_catalog(&path).expect_err("malformed JSON");
    let message = format!("{err:#}");
    assert!(message.contains("invalid catalog"), "{message}");
    assert!(message.contains("broken.json"), "{message}");
}

#[test]
fn empty_catalog_is_valid() {
    let file = serde_json::from_str(r#"{ "types": [] }"#).expect("valid JSON");
    let store = build_store(&file).expect("empty catalog");
    assert!(store.is_empty());
}
