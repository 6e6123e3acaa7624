//! Definition identifiers and the in-memory type catalog.
//!
//! The resolver never inspects declarations directly; it asks a
//! [`TypeCatalog`] for arity, declared ancestors and names. [`DefinitionStore`]
//! is the catalog used by tests and the CLI: an arena of declarations indexed
//! by [`DefId`], where ancestor edges are `DefId`s rather than pointers, so
//! diamond-shaped hierarchies need no shared ownership.

use crate::errors::CatalogError;
use crate::format::TypeFormatter;
use crate::hierarchy::HierarchyWalker;
use crate::types::{AncestorRef, ArgExpr};
use dashmap::DashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::{debug, trace};

/// Global counter for assigning unique instance IDs to `DefinitionStore` instances.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// DefId - Nominal Type Identity
// =============================================================================

/// Identity of a nominal type declaration (its erasure).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel value for invalid `DefId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DefId`.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this `DefId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

impl fmt::Display for DefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of type definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    /// Single-inheritance type: may declare one superclass.
    Class,
    /// Multiple-inheritance type: only super-interfaces.
    Interface,
}

// =============================================================================
// TypeCatalog - read-only declaration oracle
// =============================================================================

/// Read-only source of type declarations.
///
/// Implementations must be pure: the same `DefId` always reports the same
/// declaration. Queries about unknown ids return neutral answers (arity 0,
/// no ancestors); callers check [`TypeCatalog::contains`] where it matters.
pub trait TypeCatalog: Send + Sync {
    fn contains(&self, def: DefId) -> bool;

    /// Number of declared type parameters.
    fn arity(&self, def: DefId) -> usize;

    fn declared_superclass(&self, def: DefId) -> Option<AncestorRef>;

    fn declared_super_interfaces(&self, def: DefId) -> Vec<AncestorRef>;

    /// Human-readable name, for rendering and diagnostics.
    fn describe(&self, def: DefId) -> Arc<str>;

    fn kind(&self, _def: DefId) -> DefKind {
        DefKind::Class
    }

    /// Advances whenever a declared ancestor changes. Values derived from
    /// ancestors are only reused while the generation stays the same.
    fn generation(&self) -> u64 {
        0
    }

    /// Declared parameter names, in slot order.
    fn type_param_names(&self, def: DefId) -> Vec<Arc<str>> {
        (0..self.arity(def))
            .map(|i| Arc::from(format!("T{i}")))
            .collect()
    }
}

// =============================================================================
// DefinitionStore - Storage for Declarations
// =============================================================================

/// A single stored declaration.
#[derive(Clone, Debug)]
pub struct TypeDeclaration {
    pub kind: DefKind,
    pub name: Arc<str>,
    pub type_params: Vec<Arc<str>>,
    pub superclass: Option<AncestorRef>,
    pub interfaces: Vec<AncestorRef>,
}

/// Thread-safe storage for type declarations.
///
/// Declarations are registered first and linked afterwards, so types may
/// reference each other in any order:
///
/// ```ignore
/// let store = DefinitionStore::new();
/// let map = store.interface("Map", &["K", "V"]);
/// let key_map = store.interface("StringKeyMap", &["VT"]);
/// store.add_super_interface(
///     key_map,
///     AncestorRef::new(map, vec![ArgExpr::named(string), ArgExpr::slot(0)]),
/// )?;
/// ```
#[derive(Debug)]
pub struct DefinitionStore {
    /// Unique instance ID for debugging
    instance_id: u64,

    /// `DefId` -> declaration mapping
    definitions: DashMap<DefId, TypeDeclaration>,

    /// Declared name -> first `DefId` registered under it
    names: DashMap<Arc<str>, DefId>,

    /// Next available `DefId`
    next_id: AtomicU32,

    /// Bumped after every successful link
    generation: AtomicU64,

    /// Serializes link validation and insertion
    link_lock: Mutex<()>,
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionStore {
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "DefinitionStore::new");
        Self {
            instance_id,
            definitions: DashMap::new(),
            names: DashMap::new(),
            next_id: AtomicU32::new(DefId::FIRST_VALID),
            generation: AtomicU64::new(0),
            link_lock: Mutex::new(()),
        }
    }

    fn allocate(&self) -> DefId {
        DefId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Register a declaration without ancestors and return its `DefId`.
    pub fn declare(&self, name: &str, kind: DefKind, type_params: &[&str]) -> DefId {
        let id = self.allocate();
        let name: Arc<str> = Arc::from(name);
        trace!(
            instance_id = self.instance_id,
            def_id = %id,
            name = %name,
            ?kind,
            arity = type_params.len(),
            "DefinitionStore::declare"
        );
        self.names.entry(name.clone()).or_insert(id);
        self.definitions.insert(
            id,
            TypeDeclaration {
                kind,
                name,
                type_params: type_params.iter().map(|p| Arc::from(*p)).collect(),
                superclass: None,
                interfaces: Vec::new(),
            },
        );
        id
    }

    pub fn class(&self, name: &str, type_params: &[&str]) -> DefId {
        self.declare(name, DefKind::Class, type_params)
    }

    pub fn interface(&self, name: &str, type_params: &[&str]) -> DefId {
        self.declare(name, DefKind::Interface, type_params)
    }

    /// Attach the superclass reference of `def`.
    pub fn set_superclass(&self, def: DefId, superclass: AncestorRef) -> Result<(), CatalogError> {
        let _link = self.link_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.validate_ancestor(def, &superclass)?;
        if self.kind(superclass.def) == DefKind::Interface {
            return Err(CatalogError::SuperclassNotClass {
                name: self.describe(def).to_string(),
                ancestor: self.describe(superclass.def).to_string(),
            });
        }
        if let Some(existing) = self.declared_superclass(def) {
            return Err(CatalogError::DuplicateSuperclass {
                name: self.describe(def).to_string(),
                existing: TypeFormatter::new(self).ancestor_ref(def, &existing),
            });
        }
        debug!(def_id = %def, superclass = %superclass.def, "DefinitionStore::set_superclass");
        if let Some(mut entry) = self.definitions.get_mut(&def) {
            entry.superclass = Some(superclass);
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Append a super-interface reference to `def`.
    pub fn add_super_interface(
        &self,
        def: DefId,
        interface: AncestorRef,
    ) -> Result<(), CatalogError> {
        let _link = self.link_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.validate_ancestor(def, &interface)?;
        debug!(def_id = %def, interface = %interface.def, "DefinitionStore::add_super_interface");
        if let Some(mut entry) = self.definitions.get_mut(&def) {
            entry.interfaces.push(interface);
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Check an ancestor reference against `owner`'s declaration.
    ///
    /// Must not be called while holding a map guard: it reads other entries.
    /// Callers hold `link_lock` so the checks and the insert that follows
    /// see the same ancestor graph.
    fn validate_ancestor(&self, owner: DefId, ancestor: &AncestorRef) -> Result<(), CatalogError> {
        if !self.contains(owner) {
            return Err(CatalogError::UnknownDefinition(owner));
        }
        self.validate_application(owner, ancestor.def, &ancestor.args)?;

        let walker = HierarchyWalker::new(self);
        if owner == ancestor.def || walker.is_derived_from(ancestor.def, owner) {
            return Err(CatalogError::InheritanceCycle {
                name: self.describe(owner).to_string(),
                ancestor: self.describe(ancestor.def).to_string(),
            });
        }
        Ok(())
    }

    fn validate_application(
        &self,
        owner: DefId,
        target: DefId,
        args: &[ArgExpr],
    ) -> Result<(), CatalogError> {
        if !self.contains(target) {
            return Err(CatalogError::UnknownDefinition(target));
        }
        let expected = self.arity(target);
        if args.len() != expected {
            return Err(CatalogError::AncestorArityMismatch {
                target: self.describe(target).to_string(),
                expected,
                found: args.len(),
            });
        }
        for arg in args {
            match arg {
                ArgExpr::Slot(index) => {
                    let arity = self.arity(owner);
                    if *index >= arity {
                        return Err(CatalogError::SlotOutOfRange {
                            owner: self.describe(owner).to_string(),
                            index: index + 1,
                            arity,
                        });
                    }
                }
                ArgExpr::Concrete(_) => {}
                ArgExpr::Apply { def, args } => self.validate_application(owner, *def, args)?,
            }
        }
        Ok(())
    }

    /// Get a copy of a declaration.
    pub fn get(&self, id: DefId) -> Option<TypeDeclaration> {
        self.definitions.get(&id).map(|r| r.clone())
    }

    /// Find a declaration by name. When a name is declared twice the first
    /// registration wins.
    pub fn lookup(&self, name: &str) -> Option<DefId> {
        self.names.get(name).map(|r| *r)
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// All registered ids in allocation order.
    pub fn all_ids(&self) -> Vec<DefId> {
        let mut ids: Vec<DefId> = self.definitions.iter().map(|r| *r.key()).collect();
        ids.sort_unstable();
        ids
    }
}

impl TypeCatalog for DefinitionStore {
    fn contains(&self, def: DefId) -> bool {
        self.definitions.contains_key(&def)
    }

    fn arity(&self, def: DefId) -> usize {
        self.definitions
            .get(&def)
            .map_or(0, |r| r.type_params.len())
    }

    fn declared_superclass(&self, def: DefId) -> Option<AncestorRef> {
        self.definitions
            .get(&def)
            .and_then(|r| r.superclass.clone())
    }

    fn declared_super_interfaces(&self, def: DefId) -> Vec<AncestorRef> {
        self.definitions
            .get(&def)
            .map(|r| r.interfaces.clone())
            .unwrap_or_default()
    }

    fn describe(&self, def: DefId) -> Arc<str> {
        match self.definitions.get(&def) {
            Some(r) => r.name.clone(),
            None => Arc::from(format!("<unknown {def}>")),
        }
    }

    fn kind(&self, def: DefId) -> DefKind {
        self.definitions.get(&def).map_or(DefKind::Class, |r| r.kind)
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn type_param_names(&self, def: DefId) -> Vec<Arc<str>> {
        self.definitions
            .get(&def)
            .map(|r| r.type_params.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
