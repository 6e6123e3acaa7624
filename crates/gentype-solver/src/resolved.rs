//! Resolved generic types.
//!
//! A [`ResolvedType`] is an identity plus its [`TypeBindings`]. Values are
//! immutable and reference counted, so cloning is cheap and a single value
//! can be shared across threads. Equality and hashing consider only the
//! identity and the bindings (recursively); the cached supertype edges and
//! the display name never take part.

use crate::bindings::TypeBindings;
use crate::def::{DefId, DefKind, TypeCatalog};
use crate::format;
use crate::hierarchy::HierarchyWalker;
use crate::types::{AncestorEdge, AncestorRef};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Clone)]
pub struct ResolvedType(Arc<ResolvedTypeData>);

struct ResolvedTypeData {
    def: DefId,
    name: Arc<str>,
    bindings: TypeBindings,
    /// Substituted direct ancestors, computed on first request and
    /// recomputed when the catalog generation moves on.
    ///
    /// Assumes the instance is only ever queried against the catalog that
    /// produced it.
    supertypes: RwLock<Option<Arc<Supertypes>>>,
}

struct Supertypes {
    generation: u64,
    superclass: Option<ResolvedType>,
    interfaces: Vec<ResolvedType>,
}

impl ResolvedType {
    /// Assemble a resolved type without checking `bindings` against the
    /// declaration. Callers guarantee the arity invariant.
    pub(crate) fn from_parts(def: DefId, name: Arc<str>, bindings: TypeBindings) -> Self {
        ResolvedType(Arc::new(ResolvedTypeData {
            def,
            name,
            bindings,
            supertypes: RwLock::new(None),
        }))
    }

    /// The erased identity.
    pub fn def_id(&self) -> DefId {
        self.0.def
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn bindings(&self) -> &TypeBindings {
        &self.0.bindings
    }

    /// True when no slot at any nesting level is unbound.
    pub fn is_fully_bound(&self) -> bool {
        self.0.bindings.is_fully_bound()
    }

    pub fn is_interface(&self, catalog: &dyn TypeCatalog) -> bool {
        catalog.kind(self.0.def) == DefKind::Interface
    }

    /// Look up a binding by the declared parameter name.
    pub fn bound_type_by_name(&self, catalog: &dyn TypeCatalog, param: &str) -> Option<&ResolvedType> {
        let index = catalog
            .type_param_names(self.0.def)
            .iter()
            .position(|name| &**name == param)?;
        self.0.bindings.get(index)
    }

    /// The declared superclass with this type's bindings substituted in.
    pub fn resolved_superclass(&self, catalog: &dyn TypeCatalog) -> Option<ResolvedType> {
        self.supertypes(catalog).superclass.clone()
    }

    /// The declared super-interfaces with this type's bindings substituted in.
    pub fn resolved_super_interfaces(&self, catalog: &dyn TypeCatalog) -> Vec<ResolvedType> {
        self.supertypes(catalog).interfaces.clone()
    }

    /// The direct ancestor reached through `edge`.
    pub fn resolved_ancestor(
        &self,
        catalog: &dyn TypeCatalog,
        edge: AncestorEdge,
    ) -> Option<ResolvedType> {
        let supertypes = self.supertypes(catalog);
        match edge {
            AncestorEdge::Superclass => supertypes.superclass.clone(),
            AncestorEdge::Interface(index) => supertypes.interfaces.get(index).cloned(),
        }
    }

    /// True when both handles point at the same interned value.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }

    /// The ancestor (or self) whose identity is `target`, as seen from here.
    pub fn find_supertype(&self, catalog: &dyn TypeCatalog, target: DefId) -> Option<ResolvedType> {
        HierarchyWalker::new(catalog).find_supertype(self, target)
    }

    /// Shorthand for `find_supertype(..).bindings()`.
    pub fn type_parameters_for(
        &self,
        catalog: &dyn TypeCatalog,
        target: DefId,
    ) -> Option<TypeBindings> {
        self.find_supertype(catalog, target)
            .map(|ty| ty.bindings().clone())
    }

    /// `Name<Arg,...>`, with unbound slots rendered as `?`.
    pub fn brief_description(&self) -> String {
        let mut out = String::new();
        format::write_brief(&mut out, self);
        out
    }

    /// Generic signature in JVM descriptor form, e.g.
    /// `Ljava/util/HashMap<Ljava/lang/String;Ljava/lang/Long;>;`.
    pub fn signature(&self) -> String {
        let mut out = String::new();
        format::write_signature(&mut out, self);
        out
    }

    /// Brief description followed by `extends`/`implements` clauses.
    pub fn full_description(&self, catalog: &dyn TypeCatalog) -> String {
        format::TypeFormatter::new(catalog).full_description(self)
    }

    fn supertypes(&self, catalog: &dyn TypeCatalog) -> Arc<Supertypes> {
        let generation = catalog.generation();
        {
            let cached = self.0.supertypes.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(supertypes) = cached.as_ref().filter(|s| s.generation == generation) {
                return Arc::clone(supertypes);
            }
        }

        let def = self.0.def;
        let supertypes = Arc::new(Supertypes {
            generation,
            superclass: catalog
                .declared_superclass(def)
                .map(|reference| self.substitute(catalog, &reference)),
            interfaces: catalog
                .declared_super_interfaces(def)
                .iter()
                .map(|reference| self.substitute(catalog, reference))
                .collect(),
        });

        let mut cached = self.0.supertypes.write().unwrap_or_else(PoisonError::into_inner);
        match cached.as_ref() {
            // A racing reader already stored this generation; keep its copy.
            Some(existing) if existing.generation == generation => Arc::clone(existing),
            _ => {
                *cached = Some(Arc::clone(&supertypes));
                supertypes
            }
        }
    }

    /// Evaluate an ancestor reference declared on this type's identity.
    fn substitute(&self, catalog: &dyn TypeCatalog, reference: &AncestorRef) -> ResolvedType {
        let slots = self.0.bindings.as_slice();
        let bindings = TypeBindings::from_slots(
            reference
                .args
                .iter()
                .map(|arg| arg.instantiate(catalog, slots)),
        );
        ResolvedType::from_parts(reference.def, catalog.describe(reference.def), bindings)
    }
}

impl PartialEq for ResolvedType {
    fn eq(&self, other: &Self) -> bool {
        ResolvedType::ptr_eq(self, other)
            || (self.0.def == other.0.def && self.0.bindings == other.0.bindings)
    }
}

impl Eq for ResolvedType {}

impl Hash for ResolvedType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.def.hash(state);
        self.0.bindings.hash(state);
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.brief_description())
    }
}

impl fmt::Debug for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResolvedType({} {})", self.0.def, self.brief_description())
    }
}

#[cfg(test)]
#[path = "../tests/resolved_tests.rs"]
mod tests;
