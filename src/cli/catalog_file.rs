//! JSON catalog files.
//!
//! ```json
//! { "types": [
//!     { "name": "Map", "kind": "interface", "params": ["K", "V"] },
//!     { "name": "HashMap", "params": ["K", "V"],
//!       "extends": "AbstractMap<K,V>", "implements": ["Map<K,V>"] }
//! ] }
//! ```
//!
//! `kind` defaults to `class`. A class `extends` at most one type; an
//! interface lists its super-interfaces under `extends` (a string or an
//! array) and may not use `implements`. Declarations may appear in any
//! order: every name is registered before any ancestor is linked.

use super::type_expr::{TypeExpr, parse_type_expr};
use anyhow::{Context, Result, bail};
use gentype_common::limits::{MAX_CATALOG_DECLARATIONS, MAX_TYPE_PARAMS};
use gentype_solver::{AncestorRef, ArgExpr, DefId, DefKind, DefinitionStore};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    pub types: Vec<TypeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeEntry {
    pub name: String,
    #[serde(default)]
    pub kind: EntryKind,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub extends: OneOrMany,
    #[serde(default)]
    pub implements: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Class,
    Interface,
}

impl From<EntryKind> for DefKind {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Class => DefKind::Class,
            EntryKind::Interface => DefKind::Interface,
        }
    }
}

/// `"A"` or `["A", "B"]`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn as_slice(&self) -> &[String] {
        match self {
            OneOrMany::None => &[],
            OneOrMany::One(one) => std::slice::from_ref(one),
            OneOrMany::Many(many) => many,
        }
    }
}

/// Read and link a catalog file.
pub fn load_catalog(path: &Path) -> Result<DefinitionStore> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    parse_catalog(&text).with_context(|| format!("invalid catalog {}", path.display()))
}

pub fn parse_catalog(text: &str) -> Result<DefinitionStore> {
    let file: CatalogFile = serde_json::from_str(text).context("malformed catalog JSON")?;
    build_store(&file)
}

/// Declare every entry, then link ancestors.
pub fn build_store(file: &CatalogFile) -> Result<DefinitionStore> {
    if file.types.len() > MAX_CATALOG_DECLARATIONS {
        bail!(
            "catalog declares {} types; at most {MAX_CATALOG_DECLARATIONS} are supported",
            file.types.len()
        );
    }

    let store = DefinitionStore::new();
    let mut seen = FxHashSet::default();
    let mut ids = Vec::with_capacity(file.types.len());
    for entry in &file.types {
        validate_entry(entry)?;
        if !seen.insert(entry.name.as_str()) {
            bail!("type {} is declared more than once", entry.name);
        }
        let params: Vec<&str> = entry.params.iter().map(String::as_str).collect();
        ids.push(store.declare(&entry.name, entry.kind.into(), &params));
    }

    for (entry, &def) in file.types.iter().zip(&ids) {
        link_entry(&store, entry, def).with_context(|| format!("in declaration of {}", entry.name))?;
    }
    debug!(types = store.len(), "catalog loaded");
    Ok(store)
}

fn validate_entry(entry: &TypeEntry) -> Result<()> {
    if entry.params.len() > MAX_TYPE_PARAMS {
        bail!(
            "{} declares {} type parameters; at most {MAX_TYPE_PARAMS} are supported",
            entry.name,
            entry.params.len()
        );
    }
    let mut params = FxHashSet::default();
    for param in &entry.params {
        if !params.insert(param.as_str()) {
            bail!("{} declares type parameter {param} twice", entry.name);
        }
    }
    if entry.kind == EntryKind::Interface && !entry.implements.is_empty() {
        bail!("interface {} cannot use `implements`; list super-interfaces under `extends`", entry.name);
    }
    if entry.kind == EntryKind::Class && entry.extends.as_slice().len() > 1 {
        bail!("class {} can extend only one type", entry.name);
    }
    Ok(())
}

fn link_entry(store: &DefinitionStore, entry: &TypeEntry, def: DefId) -> Result<()> {
    let extends = entry.extends.as_slice();
    match entry.kind {
        EntryKind::Class => {
            if let Some(superclass) = extends.first() {
                store.set_superclass(def, lower_ancestor(store, &entry.params, superclass)?)?;
            }
            for interface in &entry.implements {
                store.add_super_interface(def, lower_ancestor(store, &entry.params, interface)?)?;
            }
        }
        EntryKind::Interface => {
            for interface in extends {
                store.add_super_interface(def, lower_ancestor(store, &entry.params, interface)?)?;
            }
        }
    }
    Ok(())
}

fn lower_ancestor(store: &DefinitionStore, params: &[String], text: &str) -> Result<AncestorRef> {
    let expr = parse_type_expr(text)?;
    match lower_arg(store, params, &expr)? {
        ArgExpr::Apply { def, args } => Ok(AncestorRef::new(def, args)),
        _ => bail!("ancestor `{text}` must name a declared type"),
    }
}

/// Identifiers that name one of `params` become slot references; everything
/// else must name a declaration.
fn lower_arg(store: &DefinitionStore, params: &[String], expr: &TypeExpr) -> Result<ArgExpr> {
    match expr {
        TypeExpr::Unbound => bail!("`?` is only allowed in queries, not in declarations"),
        TypeExpr::Named { name, args } => {
            if let Some(index) = params.iter().position(|param| param == name) {
                if !args.is_empty() {
                    bail!("type parameter {name} cannot take type arguments");
                }
                return Ok(ArgExpr::slot(index));
            }
            let def = store
                .lookup(name)
                .with_context(|| format!("unknown type {name}"))?;
            let args = args
                .iter()
                .map(|arg| lower_arg(store, params, arg))
                .collect::<Result<Vec<_>>>()?;
            Ok(ArgExpr::apply(def, args))
        }
    }
}
