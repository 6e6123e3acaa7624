//! Ancestor traversal.
//!
//! All searches are breadth-first, visiting a declaration's superclass before
//! its super-interfaces (in declaration order), and visit each identity once.
//! When multiple-inheritance reaches the same identity along several paths,
//! the first path found wins even if another path would substitute different
//! bindings; no reconciliation is attempted.
//!
//! Identity-level searches ([`HierarchyWalker::ancestor_path`]) and resolved
//! searches ([`HierarchyWalker::find_supertype`]) use the same order, so the
//! subtype resolver and the supertype lookup always agree on the path.

use crate::def::{DefId, TypeCatalog};
use crate::resolved::ResolvedType;
use crate::types::{AncestorEdge, AncestorStep};
use gentype_common::limits::ANCESTOR_WALK_CAPACITY;
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::trace;

pub struct HierarchyWalker<'a> {
    catalog: &'a dyn TypeCatalog,
}

impl<'a> HierarchyWalker<'a> {
    pub fn new(catalog: &'a dyn TypeCatalog) -> Self {
        Self { catalog }
    }

    /// Direct ancestors of `def` in traversal order.
    fn direct_ancestors(&self, def: DefId) -> Vec<AncestorStep> {
        let mut steps = Vec::new();
        if let Some(superclass) = self.catalog.declared_superclass(def) {
            steps.push(AncestorStep {
                edge: AncestorEdge::Superclass,
                ancestor: superclass,
            });
        }
        for (index, interface) in self
            .catalog
            .declared_super_interfaces(def)
            .into_iter()
            .enumerate()
        {
            steps.push(AncestorStep {
                edge: AncestorEdge::Interface(index),
                ancestor: interface,
            });
        }
        steps
    }

    /// The declared steps leading from `from` up to `to`, ignoring bindings.
    ///
    /// Returns an empty path when `from == to`, and `None` when `to` is not
    /// an ancestor of `from`.
    pub fn ancestor_path(&self, from: DefId, to: DefId) -> Option<Vec<AncestorStep>> {
        if from == to {
            return Some(Vec::new());
        }

        let mut parents: FxHashMap<DefId, (DefId, AncestorStep)> = FxHashMap::default();
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::with_capacity(ANCESTOR_WALK_CAPACITY);
        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for step in self.direct_ancestors(current) {
                let next = step.ancestor.def;
                if !visited.insert(next) {
                    continue;
                }
                parents.insert(next, (current, step));
                if next == to {
                    return Some(Self::unwind(parents, from, to));
                }
                queue.push_back(next);
            }
        }
        None
    }

    fn unwind(
        mut parents: FxHashMap<DefId, (DefId, AncestorStep)>,
        from: DefId,
        to: DefId,
    ) -> Vec<AncestorStep> {
        let mut path = Vec::new();
        let mut current = to;
        while current != from {
            let Some((parent, step)) = parents.remove(&current) else {
                break;
            };
            path.push(step);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Whether `ancestor` is `def` itself or reachable from it.
    pub fn is_derived_from(&self, def: DefId, ancestor: DefId) -> bool {
        self.ancestor_path(def, ancestor).is_some()
    }

    /// The ancestor of `ty` (or `ty` itself) whose identity is `target`, with
    /// `ty`'s bindings substituted along the way.
    pub fn find_supertype(&self, ty: &ResolvedType, target: DefId) -> Option<ResolvedType> {
        let path = self.ancestor_path(ty.def_id(), target)?;
        let mut current = ty.clone();
        for step in &path {
            current = current.resolved_ancestor(self.catalog, step.edge)?;
        }
        trace!(from = %ty, target = %target, found = %current, "find_supertype");
        Some(current)
    }

    /// Every proper ancestor of `ty`, breadth-first, one entry per identity.
    pub fn ancestors(&self, ty: &ResolvedType) -> Vec<ResolvedType> {
        let mut seen: IndexMap<DefId, ResolvedType, FxBuildHasher> = IndexMap::default();
        let mut queue = VecDeque::with_capacity(ANCESTOR_WALK_CAPACITY);
        queue.push_back(ty.clone());

        while let Some(current) = queue.pop_front() {
            let direct = current
                .resolved_superclass(self.catalog)
                .into_iter()
                .chain(current.resolved_super_interfaces(self.catalog));
            for ancestor in direct {
                if ancestor.def_id() == ty.def_id() || seen.contains_key(&ancestor.def_id()) {
                    continue;
                }
                seen.insert(ancestor.def_id(), ancestor.clone());
                queue.push_back(ancestor.clone());
            }
        }
        seen.into_values().collect()
    }
}

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod tests;
