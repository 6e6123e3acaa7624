//! Text rendering of resolved types and declarations.
//!
//! Grammar: `Name` for non-generic types, `Name<A,B>` otherwise, `?` for an
//! unbound slot. Value-equal types render identically; types that differ
//! only in identities sharing a display name are indistinguishable here.

use crate::def::{DefId, DefKind, TypeCatalog};
use crate::resolved::ResolvedType;
use crate::types::{AncestorRef, ArgExpr};
use std::fmt::Write;

pub(crate) fn write_brief(out: &mut String, ty: &ResolvedType) {
    out.push_str(ty.name());
    let bindings = ty.bindings();
    if bindings.is_empty() {
        return;
    }
    out.push('<');
    for (i, slot) in bindings.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        match slot {
            Some(arg) => write_brief(out, arg),
            None => out.push('?'),
        }
    }
    out.push('>');
}

/// JVM generic signature: `Ljava/util/List<Ljava/lang/String;>;`, with `*`
/// for an unbound slot.
pub(crate) fn write_signature(out: &mut String, ty: &ResolvedType) {
    out.push('L');
    out.extend(ty.name().chars().map(|c| if c == '.' { '/' } else { c }));
    let bindings = ty.bindings();
    if !bindings.is_empty() {
        out.push('<');
        for slot in bindings.iter() {
            match slot {
                Some(arg) => write_signature(out, arg),
                None => out.push('*'),
            }
        }
        out.push('>');
    }
    out.push(';');
}

/// Renders types that need catalog context: declarations, ancestor clauses
/// and argument expressions.
pub struct TypeFormatter<'a> {
    catalog: &'a dyn TypeCatalog,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(catalog: &'a dyn TypeCatalog) -> Self {
        Self { catalog }
    }

    /// e.g. `HashMap<String,Long> extends AbstractMap<String,Long> implements Map<String,Long>`.
    ///
    /// Interfaces list their super-interfaces after `extends`.
    pub fn full_description(&self, ty: &ResolvedType) -> String {
        let mut out = ty.brief_description();
        let interfaces = ty.resolved_super_interfaces(self.catalog);
        if ty.is_interface(self.catalog) {
            write_clause(&mut out, " extends ", &interfaces);
        } else {
            if let Some(superclass) = ty.resolved_superclass(self.catalog) {
                out.push_str(" extends ");
                write_brief(&mut out, &superclass);
            }
            write_clause(&mut out, " implements ", &interfaces);
        }
        out
    }

    /// The declaration header of `def`, e.g. `class ListWrapper<E> extends Wrapper<List<E>>`.
    pub fn declaration(&self, def: DefId) -> String {
        let mut out = String::new();
        let kind = self.catalog.kind(def);
        out.push_str(match kind {
            DefKind::Class => "class ",
            DefKind::Interface => "interface ",
        });
        out.push_str(&self.catalog.describe(def));
        let params = self.catalog.type_param_names(def);
        if !params.is_empty() {
            out.push('<');
            for (i, param) in params.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(param);
            }
            out.push('>');
        }

        let interfaces = self.catalog.declared_super_interfaces(def);
        let superclass = self.catalog.declared_superclass(def);
        if let Some(superclass) = &superclass {
            let _ = write!(out, " extends {}", self.ancestor_ref(def, superclass));
        }
        if !interfaces.is_empty() {
            out.push_str(if kind == DefKind::Interface && superclass.is_none() {
                " extends "
            } else {
                " implements "
            });
            for (i, interface) in interfaces.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&self.ancestor_ref(def, interface));
            }
        }
        out
    }

    /// Render an ancestor reference declared on `owner`, naming slots by
    /// `owner`'s parameter names.
    pub fn ancestor_ref(&self, owner: DefId, reference: &AncestorRef) -> String {
        let params = self.catalog.type_param_names(owner);
        let mut out = String::new();
        self.write_application(&mut out, &params, reference.def, &reference.args);
        out
    }

    fn write_application(
        &self,
        out: &mut String,
        params: &[std::sync::Arc<str>],
        def: DefId,
        args: &[ArgExpr],
    ) {
        out.push_str(&self.catalog.describe(def));
        if args.is_empty() {
            return;
        }
        out.push('<');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            match arg {
                ArgExpr::Slot(index) => match params.get(*index) {
                    Some(name) => out.push_str(name),
                    None => {
                        let _ = write!(out, "#{}", index + 1);
                    }
                },
                ArgExpr::Concrete(ty) => write_brief(out, ty),
                ArgExpr::Apply { def, args } => self.write_application(out, params, *def, args),
            }
        }
        out.push('>');
    }
}

fn write_clause(out: &mut String, keyword: &str, types: &[ResolvedType]) {
    if types.is_empty() {
        return;
    }
    out.push_str(keyword);
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_brief(out, ty);
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
