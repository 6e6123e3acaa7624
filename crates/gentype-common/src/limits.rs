//! Centralized limits and thresholds.
//!
//! Resolution itself is bounded by the size of the acyclic ancestor graph, so
//! the solver needs no depth limits. The limits here protect the CLI and other
//! front ends that accept untrusted catalog files and type expressions.

/// Maximum nesting depth of a parsed type expression such as `A<B<C<D>>>`.
///
/// The expression parser is recursive descent; each `<` adds a frame.
pub const MAX_TYPE_EXPR_DEPTH: u32 = 64;

/// Maximum number of type declarations accepted from a single catalog file.
pub const MAX_CATALOG_DECLARATIONS: usize = 100_000;

/// Maximum number of type parameters a single declaration may have.
pub const MAX_TYPE_PARAMS: usize = 255;

/// Initial capacity for breadth-first ancestor traversals.
///
/// Most nominal hierarchies are shallow; this avoids reallocation in the
/// common case without over-allocating.
pub const ANCESTOR_WALK_CAPACITY: usize = 16;
