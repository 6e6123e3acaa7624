//! A single resolver shared across threads.

use super::*;
use crate::fixtures::Collections;
use rayon::prelude::*;

#[test]
fn test_concurrent_resolve_converges() {
    let fx = Collections::new();
    let resolver = TypeResolver::new(&fx.store);
    let string = resolver.resolve(fx.string, &[]).expect("String");
    let long = resolver.resolve(fx.long, &[]).expect("Long");

    let results: Vec<ResolvedType> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let (resolver, string, long) = (&resolver, string.clone(), long.clone());
                scope.spawn(move || {
                    resolver
                        .resolve(fx.hash_map, &[string, long])
                        .expect("HashMap<String,Long>")
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker thread"))
            .collect()
    });

    let first = &results[0];
    assert!(results.iter().all(|ty| ty == first));

    // Racing misses may build duplicates, but only one entry is kept.
    let stats = resolver.cache_stats();
    assert_eq!(stats.entries, 3);
    assert_eq!(stats.hits + stats.misses, 10);

    let cached = resolver
        .resolve(fx.hash_map, &[string, long])
        .expect("HashMap<String,Long>");
    assert_eq!(&cached, first);
}

#[test]
fn test_parallel_subtype_resolution() {
    let fx = Collections::new();
    let resolver = TypeResolver::new(&fx.store);
    let string = resolver.resolve(fx.string, &[]).expect("String");
    let long = resolver.resolve(fx.long, &[]).expect("Long");
    let map = resolver.resolve(fx.map, &[string, long]).expect("Map<String,Long>");

    let targets = [fx.hash_map, fx.string_key_map, fx.string_long_map, fx.abstract_map];
    let expected: Vec<_> = targets
        .iter()
        .map(|target| resolver.resolve_subtype(&map, *target))
        .collect();

    let parallel: Vec<Vec<_>> = (0..64)
        .into_par_iter()
        .map(|_| {
            targets
                .iter()
                .map(|target| resolver.resolve_subtype(&map, *target))
                .collect()
        })
        .collect();

    for run in parallel {
        assert_eq!(run, expected);
    }
}

#[test]
fn test_shared_ancestor_views() {
    let fx = Collections::new();
    let resolver = TypeResolver::new(&fx.store);
    let byte = resolver.resolve(fx.byte, &[]).expect("Byte");
    let set = resolver
        .resolve(fx.linked_hash_set, &[byte])
        .expect("LinkedHashSet<Byte>");

    let briefs: Vec<String> = (0..32)
        .into_par_iter()
        .map(|i| {
            let target = if i % 2 == 0 { fx.iterable } else { fx.collection };
            resolver
                .find_supertype(&set, target)
                .expect("LinkedHashSet is a Collection")
                .brief_description()
        })
        .collect();

    for (i, brief) in briefs.iter().enumerate() {
        let expected = if i % 2 == 0 { "Iterable<Byte>" } else { "Collection<Byte>" };
        assert_eq!(brief, expected);
    }
}
