//! Collections-style catalog shared by the solver tests.
//!
//! ```text
//! class String implements Comparable<String>      interface Comparable<T>
//! class Integer, Long, Byte                       interface Iterable<T>
//! interface Collection<E> extends Iterable<E>
//! interface List<E> extends Collection<E>         interface Set<E> extends Collection<E>
//! interface Map<K,V>
//! class AbstractMap<K,V> implements Map<K,V>
//! class HashMap<K,V> extends AbstractMap<K,V> implements Map<K,V>
//! class ArrayList<E> implements List<E>
//! class HashSet<E> implements Set<E>
//! class LinkedHashSet<E> extends HashSet<E> implements Set<E>
//! class StringIntMap extends HashMap<String,Integer>
//! class IntArrayList extends ArrayList<Integer>
//! interface StringKeyMap<VT> extends Map<String,VT>
//! interface StringLongMap extends StringKeyMap<Long>
//! class Wrapper<T>
//! class ListWrapper<E> extends Wrapper<List<E>>
//! ```

use crate::def::{DefId, DefinitionStore};
use crate::resolved::ResolvedType;
use crate::resolver::TypeResolver;
use crate::types::{AncestorRef, ArgExpr};

pub(crate) struct Collections {
    pub store: DefinitionStore,
    pub comparable: DefId,
    pub string: DefId,
    pub integer: DefId,
    pub long: DefId,
    pub byte: DefId,
    pub iterable: DefId,
    pub collection: DefId,
    pub list: DefId,
    pub set: DefId,
    pub map: DefId,
    pub abstract_map: DefId,
    pub hash_map: DefId,
    pub array_list: DefId,
    pub hash_set: DefId,
    pub linked_hash_set: DefId,
    pub string_int_map: DefId,
    pub int_array_list: DefId,
    pub string_key_map: DefId,
    pub string_long_map: DefId,
    pub wrapper: DefId,
    pub list_wrapper: DefId,
}

impl Collections {
    pub fn new() -> Self {
        let store = DefinitionStore::new();

        let comparable = store.interface("Comparable", &["T"]);
        let string = store.class("String", &[]);
        let integer = store.class("Integer", &[]);
        let long = store.class("Long", &[]);
        let byte = store.class("Byte", &[]);
        let iterable = store.interface("Iterable", &["T"]);
        let collection = store.interface("Collection", &["E"]);
        let list = store.interface("List", &["E"]);
        let set = store.interface("Set", &["E"]);
        let map = store.interface("Map", &["K", "V"]);
        let abstract_map = store.class("AbstractMap", &["K", "V"]);
        let hash_map = store.class("HashMap", &["K", "V"]);
        let array_list = store.class("ArrayList", &["E"]);
        let hash_set = store.class("HashSet", &["E"]);
        let linked_hash_set = store.class("LinkedHashSet", &["E"]);
        let string_int_map = store.class("StringIntMap", &[]);
        let int_array_list = store.class("IntArrayList", &[]);
        let string_key_map = store.interface("StringKeyMap", &["VT"]);
        let string_long_map = store.interface("StringLongMap", &[]);
        let wrapper = store.class("Wrapper", &["T"]);
        let list_wrapper = store.class("ListWrapper", &["E"]);

        let slot = ArgExpr::slot;
        let interface = |def, target, args| {
            store
                .add_super_interface(def, AncestorRef::new(target, args))
                .expect("valid super-interface");
        };
        let superclass = |def, target, args| {
            store
                .set_superclass(def, AncestorRef::new(target, args))
                .expect("valid superclass");
        };

        interface(string, comparable, vec![ArgExpr::named(string)]);
        interface(collection, iterable, vec![slot(0)]);
        interface(list, collection, vec![slot(0)]);
        interface(set, collection, vec![slot(0)]);
        interface(abstract_map, map, vec![slot(0), slot(1)]);
        superclass(hash_map, abstract_map, vec![slot(0), slot(1)]);
        interface(hash_map, map, vec![slot(0), slot(1)]);
        interface(array_list, list, vec![slot(0)]);
        interface(hash_set, set, vec![slot(0)]);
        superclass(linked_hash_set, hash_set, vec![slot(0)]);
        interface(linked_hash_set, set, vec![slot(0)]);
        superclass(
            string_int_map,
            hash_map,
            vec![ArgExpr::named(string), ArgExpr::named(integer)],
        );
        superclass(int_array_list, array_list, vec![ArgExpr::named(integer)]);
        interface(string_key_map, map, vec![ArgExpr::named(string), slot(0)]);
        interface(string_long_map, string_key_map, vec![ArgExpr::named(long)]);
        superclass(
            list_wrapper,
            wrapper,
            vec![ArgExpr::apply(list, vec![slot(0)])],
        );

        Self {
            store,
            comparable,
            string,
            integer,
            long,
            byte,
            iterable,
            collection,
            list,
            set,
            map,
            abstract_map,
            hash_map,
            array_list,
            hash_set,
            linked_hash_set,
            string_int_map,
            int_array_list,
            string_key_map,
            string_long_map,
            wrapper,
            list_wrapper,
        }
    }

    /// Resolve with explicit arguments through an uncached resolver.
    pub fn ty(&self, def: DefId, args: &[ResolvedType]) -> ResolvedType {
        TypeResolver::new(&self.store)
            .resolve(def, args)
            .expect("fixture arity matches")
    }

    /// A non-generic type.
    pub fn simple(&self, def: DefId) -> ResolvedType {
        self.ty(def, &[])
    }
}
