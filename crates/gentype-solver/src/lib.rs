//! Generic Nominal Type Resolver
//!
//! This crate resolves generic nominal types (declarations with type
//! parameters, related through one superclass and any number of
//! super-interfaces) into representations that keep the concrete arguments
//! bound at every level of the hierarchy.
//!
//! - **`ResolvedType` / `TypeBindings`**: immutable, shareable resolved types
//! - **Hierarchy walking**: ancestor views with bindings substituted upward
//! - **Subtype resolution**: inferring a descendant's bindings from a known
//!   ancestor by unification (placeholders backed by `ena`)
//! - **`TypeResolver`**: the facade, with an optional per-instance memo table
//!
//! Declarations come from a [`TypeCatalog`]; [`DefinitionStore`] is the
//! in-memory implementation.
mod bindings;
pub mod def;
mod errors;
mod format;
pub mod hierarchy;
mod query_trace;
mod resolved;
mod resolver;
mod subtype_resolve;
pub mod types;

pub use bindings::TypeBindings;
pub use def::{DefId, DefKind, DefinitionStore, TypeCatalog, TypeDeclaration};
pub use errors::{CatalogError, ResolutionError};
pub use format::TypeFormatter;
pub use hierarchy::HierarchyWalker;
pub use query_trace::QUERY_TRACE_TARGET;
pub use resolved::ResolvedType;
pub use resolver::{CacheStats, ResolverOptions, TypeResolver};
pub use subtype_resolve::SubtypeResolver;
pub use types::{AncestorEdge, AncestorRef, AncestorStep, ArgExpr};

#[cfg(test)]
#[path = "../tests/fixtures.rs"]
pub(crate) mod fixtures;

// Most test modules are loaded by their source files via #[path = "../tests/..."].
#[cfg(test)]
#[path = "../tests/scenario_tests.rs"]
mod scenario_tests;
#[cfg(test)]
#[path = "../tests/concurrency_tests.rs"]
mod concurrency_tests;
