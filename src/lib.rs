//! gentype: generic nominal type resolution.
//!
//! The resolver itself lives in `gentype-solver`; this crate adds the
//! command-line front end (JSON catalogs, a type-expression parser and
//! report rendering) and tracing setup.

pub use gentype_common as common;
pub use gentype_solver as solver;

pub use gentype_solver::{
    AncestorEdge, AncestorRef, ArgExpr, CacheStats, CatalogError, DefId, DefKind,
    DefinitionStore, HierarchyWalker, ResolutionError, ResolvedType, ResolverOptions,
    SubtypeResolver, TypeBindings, TypeCatalog, TypeFormatter, TypeResolver,
};

pub mod cli;
pub mod tracing_config;
