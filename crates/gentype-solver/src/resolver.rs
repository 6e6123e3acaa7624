//! Resolution facade.
//!
//! [`TypeResolver`] is the entry point external callers use. It is a thin
//! coordinator over the catalog, [`HierarchyWalker`] and [`SubtypeResolver`],
//! plus an optional memo table for [`TypeResolver::resolve`].
//!
//! The memo table is scoped to the resolver instance. Concurrent callers
//! populate it with insert-or-fetch: two threads racing on the same key may
//! both build a value, but only the first insert is kept and both receive
//! value-equal results. Entries are keyed by the catalog generation, so a
//! catalog that gains ancestors after a lookup is never answered from a
//! stale entry. Memoization is never observable beyond sharing.

use crate::bindings::TypeBindings;
use crate::def::{DefId, TypeCatalog};
use crate::errors::ResolutionError;
use crate::format::TypeFormatter;
use crate::hierarchy::HierarchyWalker;
use crate::query_trace;
use crate::resolved::ResolvedType;
use crate::subtype_resolve::SubtypeResolver;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Tuning knobs for [`TypeResolver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Cache `resolve` results per `(identity, arguments)`.
    pub memoize: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self { memoize: true }
    }
}

/// Snapshot of the memo table counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// `(identity, bindings, catalog generation)`.
type ResolveKey = (DefId, TypeBindings, u64);

pub struct TypeResolver<'a> {
    catalog: &'a dyn TypeCatalog,
    options: ResolverOptions,
    cache: DashMap<ResolveKey, ResolvedType, FxBuildHasher>,
    hits: AtomicU64,
    misses: AtomicU64,
    /// Catalog generation the table was last populated under.
    generation: AtomicU64,
}

impl<'a> TypeResolver<'a> {
    pub fn new(catalog: &'a dyn TypeCatalog) -> Self {
        Self::with_options(catalog, ResolverOptions::default())
    }

    pub fn with_options(catalog: &'a dyn TypeCatalog, options: ResolverOptions) -> Self {
        Self {
            catalog,
            options,
            cache: DashMap::with_hasher(FxBuildHasher),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            generation: AtomicU64::new(catalog.generation()),
        }
    }

    pub fn catalog(&self) -> &'a dyn TypeCatalog {
        self.catalog
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    pub fn formatter(&self) -> TypeFormatter<'a> {
        TypeFormatter::new(self.catalog)
    }

    fn ensure_known(&self, def: DefId) -> Result<(), ResolutionError> {
        if self.catalog.contains(def) {
            Ok(())
        } else {
            Err(ResolutionError::UnknownDefinition(def))
        }
    }

    /// Bind `def`'s parameters to `args` verbatim.
    ///
    /// Only the argument count is checked; declared bounds are not.
    pub fn resolve(&self, def: DefId, args: &[ResolvedType]) -> Result<ResolvedType, ResolutionError> {
        self.ensure_known(def)?;
        let bindings = TypeBindings::create(self.catalog, def, args)?;
        Ok(self.intern(def, bindings, "resolve"))
    }

    /// `def` with every parameter unbound.
    pub fn resolve_raw(&self, def: DefId) -> Result<ResolvedType, ResolutionError> {
        self.ensure_known(def)?;
        let bindings = TypeBindings::unbound(self.catalog.arity(def));
        Ok(self.intern(def, bindings, "resolve_raw"))
    }

    fn intern(&self, def: DefId, bindings: TypeBindings, op: &'static str) -> ResolvedType {
        let query_id = query_trace::enabled().then(query_trace::next_query_id);
        if let Some(query_id) = query_id {
            query_trace::query_start(query_id, op, def, None);
        }

        if !self.options.memoize {
            let ty = ResolvedType::from_parts(def, self.catalog.describe(def), bindings);
            if let Some(query_id) = query_id {
                query_trace::query_end(query_id, op, true, false);
            }
            return ty;
        }

        let generation = self.catalog.generation();
        if self.generation.swap(generation, Ordering::AcqRel) != generation {
            debug!(generation, "catalog changed; dropping stale resolve entries");
            self.cache.retain(|key, _| key.2 == generation);
        }

        let key = (def, bindings, generation);
        if let Some(hit) = self.cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(ty = %hit.value(), "resolve cache hit");
            if let Some(query_id) = query_id {
                query_trace::query_end(query_id, op, true, true);
            }
            return hit.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let ty = ResolvedType::from_parts(def, self.catalog.describe(def), key.1.clone());
        let ty = self.cache.entry(key).or_insert(ty).clone();
        if let Some(query_id) = query_id {
            query_trace::query_end(query_id, op, true, false);
        }
        ty
    }

    /// Infer `target`'s own bindings from a known ancestor instance.
    pub fn resolve_subtype(
        &self,
        ancestor: &ResolvedType,
        target: DefId,
    ) -> Result<ResolvedType, ResolutionError> {
        let query_id = query_trace::enabled().then(query_trace::next_query_id);
        if let Some(query_id) = query_id {
            query_trace::query_start(query_id, "resolve_subtype", ancestor.def_id(), Some(target));
        }
        let result = SubtypeResolver::new(self.catalog).resolve(ancestor, target);
        if let Err(err) = &result {
            debug!(%err, "resolve_subtype failed");
        }
        if let Some(query_id) = query_id {
            query_trace::query_end(query_id, "resolve_subtype", result.is_ok(), false);
        }
        result
    }

    /// The ancestor of `ty` (or `ty` itself) with identity `target`.
    pub fn find_supertype(
        &self,
        ty: &ResolvedType,
        target: DefId,
    ) -> Result<ResolvedType, ResolutionError> {
        HierarchyWalker::new(self.catalog)
            .find_supertype(ty, target)
            .ok_or_else(|| ResolutionError::NotFound {
                name: ty.name().to_string(),
                target: self.catalog.describe(target).to_string(),
            })
    }

    /// Bindings of `ty`'s ancestor `target`, as seen from `ty`.
    pub fn type_parameters_for(
        &self,
        ty: &ResolvedType,
        target: DefId,
    ) -> Result<TypeBindings, ResolutionError> {
        self.find_supertype(ty, target)
            .map(|ancestor| ancestor.bindings().clone())
    }

    /// Every proper ancestor of `ty`, breadth-first.
    pub fn ancestors(&self, ty: &ResolvedType) -> Vec<ResolvedType> {
        HierarchyWalker::new(self.catalog).ancestors(ty)
    }

    pub fn is_derived_from(&self, def: DefId, ancestor: DefId) -> bool {
        HierarchyWalker::new(self.catalog).is_derived_from(def, ancestor)
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.len(),
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
