//! Positional type-argument bindings.

use crate::def::{DefId, TypeCatalog};
use crate::errors::ResolutionError;
use crate::resolved::ResolvedType;
use smallvec::SmallVec;
use std::fmt;

const INLINE_SLOTS: usize = 4;

/// Ordered assignment of resolved types to a declaration's parameter slots.
///
/// The length always equals the arity of the declaration the bindings belong
/// to. A `None` slot is unbound: it compares equal only to another unbound
/// slot.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct TypeBindings {
    slots: SmallVec<[Option<ResolvedType>; INLINE_SLOTS]>,
}

impl TypeBindings {
    /// Bindings for a non-generic declaration.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Bind every slot of `def`, all or nothing.
    pub fn create(
        catalog: &dyn TypeCatalog,
        def: DefId,
        args: &[ResolvedType],
    ) -> Result<Self, ResolutionError> {
        let expected = catalog.arity(def);
        if args.len() != expected {
            return Err(ResolutionError::ArityMismatch {
                name: catalog.describe(def).to_string(),
                expected,
                found: args.len(),
            });
        }
        Ok(Self::from_slots(args.iter().cloned().map(Some)))
    }

    /// Bindings with every slot unbound.
    pub(crate) fn unbound(arity: usize) -> Self {
        Self::from_slots(std::iter::repeat_n(None, arity))
    }

    pub(crate) fn from_slots(slots: impl IntoIterator<Item = Option<ResolvedType>>) -> Self {
        Self {
            slots: slots.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The type bound at `index`, or `None` if the slot is unbound or does
    /// not exist.
    pub fn get(&self, index: usize) -> Option<&ResolvedType> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Like [`TypeBindings::get`], but distinguishes a missing slot
    /// (`OutOfRange`) from an unbound one (`Ok(None)`).
    pub fn bound_type(&self, index: usize) -> Result<Option<&ResolvedType>, ResolutionError> {
        match self.slots.get(index) {
            Some(slot) => Ok(slot.as_ref()),
            None => Err(ResolutionError::OutOfRange {
                index,
                len: self.slots.len(),
            }),
        }
    }

    pub fn is_bound(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// True when every slot is bound, recursively.
    pub fn is_fully_bound(&self) -> bool {
        self.slots
            .iter()
            .all(|slot| slot.as_ref().is_some_and(ResolvedType::is_fully_bound))
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&ResolvedType>> {
        self.slots.iter().map(Option::as_ref)
    }

    pub(crate) fn as_slice(&self) -> &[Option<ResolvedType>] {
        &self.slots
    }
}

impl fmt::Debug for TypeBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for TypeBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match slot {
                Some(ty) => write!(f, "{ty}")?,
                None => f.write_str("?")?,
            }
        }
        f.write_str("]")
    }
}

#[cfg(test)]
#[path = "../tests/bindings_tests.rs"]
mod tests;
