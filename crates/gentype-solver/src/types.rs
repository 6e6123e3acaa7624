//! Ancestor references and their argument expressions.
//!
//! A declaration such as `class ListWrapper<E> extends Wrapper<List<E>>` is
//! stored as an [`AncestorRef`] targeting `Wrapper` whose single argument is
//! `Apply { def: List, args: [Slot(0)] }`. Slots always refer to the
//! *declaring* type's own parameters, by position.

use crate::bindings::TypeBindings;
use crate::def::{DefId, TypeCatalog};
use crate::resolved::ResolvedType;

/// One argument of an ancestor reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArgExpr {
    /// The declaring type's own parameter at this position.
    Slot(usize),
    /// A fully resolved type, independent of the declaring type's parameters.
    Concrete(ResolvedType),
    /// A nominal type applied to nested argument expressions.
    Apply { def: DefId, args: Vec<ArgExpr> },
}

impl ArgExpr {
    pub const fn slot(index: usize) -> Self {
        ArgExpr::Slot(index)
    }

    pub fn apply(def: DefId, args: Vec<ArgExpr>) -> Self {
        ArgExpr::Apply { def, args }
    }

    /// A non-generic type used as an argument.
    pub fn named(def: DefId) -> Self {
        ArgExpr::Apply {
            def,
            args: Vec::new(),
        }
    }

    /// Evaluate this expression with `slots` standing for the declaring
    /// type's parameters.
    ///
    /// A slot index past the end of `slots` evaluates to [`SlotValue::unbound`];
    /// validated catalogs never produce one.
    pub(crate) fn instantiate<T: SlotValue>(&self, catalog: &dyn TypeCatalog, slots: &[T]) -> T {
        match self {
            ArgExpr::Slot(index) => slots.get(*index).cloned().unwrap_or_else(T::unbound),
            ArgExpr::Concrete(ty) => T::from_concrete(ty),
            ArgExpr::Apply { def, args } => {
                let args = args
                    .iter()
                    .map(|arg| arg.instantiate(catalog, slots))
                    .collect();
                T::apply(catalog, *def, args)
            }
        }
    }
}

impl From<ResolvedType> for ArgExpr {
    fn from(ty: ResolvedType) -> Self {
        ArgExpr::Concrete(ty)
    }
}

/// Values that can stand in for a declaring type's parameters while an
/// [`ArgExpr`] is evaluated.
///
/// Concrete substitution uses `Option<ResolvedType>` (`None` is an unbound
/// slot); subtype resolution uses formal arguments carrying placeholders.
pub(crate) trait SlotValue: Clone {
    fn unbound() -> Self;
    fn from_concrete(ty: &ResolvedType) -> Self;
    fn apply(catalog: &dyn TypeCatalog, def: DefId, args: Vec<Self>) -> Self;
}

impl SlotValue for Option<ResolvedType> {
    fn unbound() -> Self {
        None
    }

    fn from_concrete(ty: &ResolvedType) -> Self {
        Some(ty.clone())
    }

    fn apply(catalog: &dyn TypeCatalog, def: DefId, args: Vec<Self>) -> Self {
        Some(ResolvedType::from_parts(
            def,
            catalog.describe(def),
            TypeBindings::from_slots(args),
        ))
    }
}

/// Which edge of a declaration an ancestor was reached through.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AncestorEdge {
    Superclass,
    /// Index into the declaring type's super-interface list.
    Interface(usize),
}

/// A declared superclass or super-interface, parameterized in terms of the
/// declaring type's own slots.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AncestorRef {
    pub def: DefId,
    pub args: Vec<ArgExpr>,
}

impl AncestorRef {
    pub fn new(def: DefId, args: Vec<ArgExpr>) -> Self {
        Self { def, args }
    }

    /// Reference to a non-generic ancestor.
    pub fn plain(def: DefId) -> Self {
        Self {
            def,
            args: Vec::new(),
        }
    }
}

/// One hop along an ancestor path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AncestorStep {
    pub edge: AncestorEdge,
    pub ancestor: AncestorRef,
}
