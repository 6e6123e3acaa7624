//! Subtype resolution: inferring a descendant's own bindings from a known,
//! already-bound ancestor.
//!
//! Given `Map<String,Long>` and the target `StringKeyMap<VT>` (declared as
//! `StringKeyMap<VT> extends Map<String,VT>`), the resolver
//!
//! 1. finds the declared path from the target up to `Map`,
//! 2. instantiates the target formally, one placeholder per own parameter,
//! 3. substitutes along the path to get the formal view `Map<String,VT>`,
//! 4. unifies that view with `Map<String,Long>` position by position, and
//! 5. reads `VT := Long` back out of the unification table.
//!
//! Placeholders live in an `ena` unification table scoped to one call. They
//! never escape: the final bindings contain only resolved types or unbound
//! slots (for parameters the ancestor does not constrain).
//!
//! An unbound slot on either side carries no information. It neither
//! constrains a placeholder nor conflicts with a declared argument, so raw
//! ancestors and raw declarations resolve permissively.

use crate::bindings::TypeBindings;
use crate::def::{DefId, TypeCatalog};
use crate::errors::ResolutionError;
use crate::format::write_brief;
use crate::hierarchy::HierarchyWalker;
use crate::resolved::ResolvedType;
use crate::types::SlotValue;
use ena::unify::{InPlaceUnificationTable, UnifyKey, UnifyValue};
use std::sync::Arc;
use tracing::{debug, trace};

// =============================================================================
// Placeholders
// =============================================================================

/// Unification variable standing for one of the target's own parameters.
/// Placeholder `n` is the target's slot `n`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct Placeholder(u32);

#[derive(Clone, Debug, PartialEq, Eq)]
struct PlaceholderValue(Option<ResolvedType>);

/// The same placeholder was equated with two different types.
#[derive(Clone, Debug)]
struct Conflict {
    first: ResolvedType,
    second: ResolvedType,
}

impl UnifyKey for Placeholder {
    type Value = PlaceholderValue;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        Placeholder(u)
    }

    fn tag() -> &'static str {
        "Placeholder"
    }
}

impl UnifyValue for PlaceholderValue {
    type Error = Conflict;

    fn unify_values(a: &Self, b: &Self) -> Result<Self, Self::Error> {
        match (&a.0, &b.0) {
            (None, None) => Ok(PlaceholderValue(None)),
            (Some(ty), None) | (None, Some(ty)) => Ok(PlaceholderValue(Some(ty.clone()))),
            (Some(first), Some(second)) if first == second => Ok(a.clone()),
            (Some(first), Some(second)) => Err(Conflict {
                first: first.clone(),
                second: second.clone(),
            }),
        }
    }
}

/// An argument of the formal ancestor view.
#[derive(Clone, Debug)]
enum FormalArg {
    Placeholder(Placeholder),
    /// Only produced by a slot reference the catalog failed to validate.
    Unbound,
    /// No placeholders anywhere inside.
    Concrete(ResolvedType),
    /// A nominal application with at least one placeholder inside.
    Apply { def: DefId, args: Vec<FormalArg> },
}

impl SlotValue for FormalArg {
    fn unbound() -> Self {
        FormalArg::Unbound
    }

    fn from_concrete(ty: &ResolvedType) -> Self {
        FormalArg::Concrete(ty.clone())
    }

    fn apply(catalog: &dyn TypeCatalog, def: DefId, args: Vec<Self>) -> Self {
        let has_placeholders = args
            .iter()
            .any(|arg| matches!(arg, FormalArg::Placeholder(_) | FormalArg::Apply { .. }));
        if has_placeholders {
            return FormalArg::Apply { def, args };
        }
        let slots = args.into_iter().map(|arg| match arg {
            FormalArg::Concrete(ty) => Some(ty),
            _ => None,
        });
        FormalArg::Concrete(ResolvedType::from_parts(
            def,
            catalog.describe(def),
            TypeBindings::from_slots(slots),
        ))
    }
}

/// Where a comparison happens, for diagnostics: slot `index` of `owner`,
/// which has `count` parameters.
#[derive(Clone, Copy)]
struct Position<'p> {
    owner: &'p str,
    index: usize,
    count: usize,
}

// =============================================================================
// SubtypeResolver
// =============================================================================

pub struct SubtypeResolver<'a> {
    catalog: &'a dyn TypeCatalog,
}

impl<'a> SubtypeResolver<'a> {
    pub fn new(catalog: &'a dyn TypeCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve `target` as a subtype of `ancestor`, inferring the target's
    /// own bindings.
    pub fn resolve(
        &self,
        ancestor: &ResolvedType,
        target: DefId,
    ) -> Result<ResolvedType, ResolutionError> {
        if !self.catalog.contains(target) {
            return Err(ResolutionError::UnknownDefinition(target));
        }
        let target_name = self.catalog.describe(target);
        debug!(ancestor = %ancestor, target = %target_name, "resolve_subtype");

        let path = HierarchyWalker::new(self.catalog)
            .ancestor_path(target, ancestor.def_id())
            .ok_or_else(|| ResolutionError::NotASubtype {
                target: target_name.to_string(),
                ancestor: ancestor.name().to_string(),
            })?;

        let mut context = UnificationContext::new(self.catalog, target, target_name.clone());

        // Formal instantiation, then forward substitution along the path.
        let mut formal: Vec<FormalArg> = context
            .placeholders
            .iter()
            .map(|p| FormalArg::Placeholder(*p))
            .collect();
        for step in &path {
            formal = step
                .ancestor
                .args
                .iter()
                .map(|arg| arg.instantiate(self.catalog, &formal))
                .collect();
        }
        trace!(path_len = path.len(), "formal ancestor view built");

        let count = ancestor.bindings().len();
        for (index, (formal_arg, known)) in formal.iter().zip(ancestor.bindings().iter()).enumerate() {
            let position = Position {
                owner: ancestor.name(),
                index,
                count,
            };
            context.unify(formal_arg, known, position)?;
        }

        let resolved = context.finish();
        debug!(result = %resolved, "resolve_subtype done");
        Ok(resolved)
    }
}

/// Working substitution for a single `resolve` call.
struct UnificationContext<'a> {
    catalog: &'a dyn TypeCatalog,
    target: DefId,
    target_name: Arc<str>,
    params: Vec<Arc<str>>,
    table: InPlaceUnificationTable<Placeholder>,
    placeholders: Vec<Placeholder>,
}

impl<'a> UnificationContext<'a> {
    fn new(catalog: &'a dyn TypeCatalog, target: DefId, target_name: Arc<str>) -> Self {
        let mut table: InPlaceUnificationTable<Placeholder> = InPlaceUnificationTable::new();
        let placeholders: Vec<Placeholder> = (0..catalog.arity(target))
            .map(|_| table.new_key(PlaceholderValue(None)))
            .collect();
        Self {
            catalog,
            target,
            target_name,
            params: catalog.type_param_names(target),
            table,
            placeholders,
        }
    }

    fn unify(
        &mut self,
        formal: &FormalArg,
        known: Option<&ResolvedType>,
        position: Position<'_>,
    ) -> Result<(), ResolutionError> {
        let Some(known) = known else {
            return Ok(());
        };
        match formal {
            FormalArg::Unbound => Ok(()),
            FormalArg::Placeholder(placeholder) => {
                trace!(param = %self.param_name(*placeholder), bound = %known, "placeholder equation");
                self.table
                    .unify_var_value(*placeholder, PlaceholderValue(Some(known.clone())))
                    .map_err(|conflict| ResolutionError::InconsistentTypeParameter {
                        target: self.target_name.to_string(),
                        param: self.param_name(*placeholder),
                        first: conflict.first.brief_description(),
                        second: conflict.second.brief_description(),
                    })
            }
            FormalArg::Concrete(declared) => check_concrete(declared, known, position),
            FormalArg::Apply { def, args } => {
                if *def != known.def_id() {
                    return Err(self.mismatch(position, known, formal));
                }
                let count = args.len();
                for (index, arg) in args.iter().enumerate() {
                    let nested = Position {
                        owner: known.name(),
                        index,
                        count,
                    };
                    self.unify(arg, known.bindings().get(index), nested)?;
                }
                Ok(())
            }
        }
    }

    fn mismatch(
        &self,
        position: Position<'_>,
        expected: &ResolvedType,
        found: &FormalArg,
    ) -> ResolutionError {
        let mut rendered = String::new();
        self.write_formal(&mut rendered, found);
        ResolutionError::TypeParameterMismatch {
            owner: position.owner.to_string(),
            position: position.index + 1,
            count: position.count,
            expected: expected.brief_description(),
            found: rendered,
        }
    }

    fn param_name(&self, placeholder: Placeholder) -> String {
        match self.params.get(placeholder.0 as usize) {
            Some(name) => name.to_string(),
            None => format!("#{}", placeholder.0 + 1),
        }
    }

    /// Render a formal argument, naming placeholders by the target's
    /// parameter names.
    fn write_formal(&self, out: &mut String, arg: &FormalArg) {
        match arg {
            FormalArg::Placeholder(p) => out.push_str(&self.param_name(*p)),
            FormalArg::Unbound => out.push('?'),
            FormalArg::Concrete(ty) => write_brief(out, ty),
            FormalArg::Apply { def, args } => {
                out.push_str(&self.catalog.describe(*def));
                out.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_formal(out, arg);
                }
                out.push('>');
            }
        }
    }

    /// Replace every placeholder by its solution; unsolved ones stay unbound.
    fn finish(mut self) -> ResolvedType {
        let slots: Vec<Option<ResolvedType>> = self
            .placeholders
            .iter()
            .map(|p| self.table.probe_value(*p).0)
            .collect();
        ResolvedType::from_parts(self.target, self.target_name, TypeBindings::from_slots(slots))
    }
}

/// Compare a placeholder-free declared argument with the known one.
fn check_concrete(
    declared: &ResolvedType,
    known: &ResolvedType,
    position: Position<'_>,
) -> Result<(), ResolutionError> {
    if declared.def_id() != known.def_id() {
        return Err(ResolutionError::TypeParameterMismatch {
            owner: position.owner.to_string(),
            position: position.index + 1,
            count: position.count,
            expected: known.brief_description(),
            found: declared.brief_description(),
        });
    }
    let count = declared.bindings().len();
    for (index, (declared_arg, known_arg)) in declared
        .bindings()
        .iter()
        .zip(known.bindings().iter())
        .enumerate()
    {
        let (Some(declared_arg), Some(known_arg)) = (declared_arg, known_arg) else {
            continue;
        };
        let nested = Position {
            owner: declared.name(),
            index,
            count,
        };
        check_concrete(declared_arg, known_arg, nested)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/subtype_resolve_tests.rs"]
mod tests;
