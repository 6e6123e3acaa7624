//! Command execution.
//!
//! A [`Session`] owns one resolver over a loaded catalog and turns textual
//! queries into [`Report`]s. Query failures are ordinary outcomes rendered as
//! diagnostics; only catalog loading failures abort the run.

use super::args::{CliArgs, Command, OutputFormat};
use super::catalog_file::load_catalog;
use super::reporter::Reporter;
use super::type_expr::{TypeExpr, TypeExprError, parse_type_expr};
use anyhow::Result;
use gentype_common::Diagnostic;
use gentype_common::diagnostics::diagnostic_codes;
use gentype_solver::{
    DefId, DefinitionStore, ResolutionError, ResolvedType, ResolverOptions, TypeCatalog,
    TypeResolver,
};
use serde::Serialize;
use std::fmt::Write;
use std::io::IsTerminal;
use thiserror::Error;
use tracing::debug;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_QUERY_FAILED: i32 = 1;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Syntax(#[from] TypeExprError),

    #[error("`?` can only appear as a type argument")]
    BareUnbound,

    #[error("unknown type {0}")]
    UnknownType(String),

    #[error("{expr} mixes bound and unbound arguments; use {raw} for the raw type")]
    PartiallyBound { expr: String, raw: String },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl QueryError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            QueryError::Resolution(err) => err.to_diagnostic(),
            QueryError::Syntax(_) | QueryError::BareUnbound => {
                Diagnostic::error(diagnostic_codes::MALFORMED_TYPE_EXPRESSION, self.to_string())
            }
            QueryError::UnknownType(_) => {
                Diagnostic::error(diagnostic_codes::UNKNOWN_TYPE_NAME, self.to_string())
            }
            QueryError::PartiallyBound { .. } => {
                Diagnostic::error(diagnostic_codes::PARTIALLY_BOUND_QUERY, self.to_string())
            }
        }
    }
}

/// One binding of a result, named by the declared parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub param: String,
    /// `None` when the slot is unbound.
    pub bound: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Report {
    Resolve {
        ty: String,
        full: String,
        fully_bound: bool,
    },
    Subtype {
        ancestor: String,
        result: String,
        bindings: Vec<Binding>,
    },
    Supertype {
        ty: String,
        result: String,
        bindings: Vec<Binding>,
    },
    Ancestors {
        ty: String,
        ancestors: Vec<String>,
    },
    Declarations {
        declarations: Vec<String>,
    },
}

impl Report {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        match self {
            Report::Resolve { ty, full, .. } => {
                let _ = writeln!(out, "{ty}");
                let _ = writeln!(out, "{full}");
            }
            Report::Subtype {
                result, bindings, ..
            }
            | Report::Supertype {
                result, bindings, ..
            } => {
                let _ = writeln!(out, "{result}");
                for binding in bindings {
                    let bound = binding.bound.as_deref().unwrap_or("?");
                    let _ = writeln!(out, "  {} = {bound}", binding.param);
                }
            }
            Report::Ancestors { ancestors: lines, .. }
            | Report::Declarations {
                declarations: lines,
            } => {
                for line in lines {
                    let _ = writeln!(out, "{line}");
                }
            }
        }
        out
    }
}

/// Captured process output.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Output {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub struct Session<'a> {
    store: &'a DefinitionStore,
    resolver: TypeResolver<'a>,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a DefinitionStore, options: ResolverOptions) -> Self {
        Self {
            store,
            resolver: TypeResolver::with_options(store, options),
        }
    }

    pub fn resolver(&self) -> &TypeResolver<'a> {
        &self.resolver
    }

    pub fn execute(&self, command: &Command) -> Result<Report, QueryError> {
        debug!(?command, "execute");
        match command {
            Command::Resolve { ty } => {
                let ty = self.parse_type(ty)?;
                Ok(Report::Resolve {
                    ty: ty.brief_description(),
                    full: ty.full_description(self.store),
                    fully_bound: ty.is_fully_bound(),
                })
            }
            Command::Subtype { ancestor, target } => {
                let ancestor = self.parse_type(ancestor)?;
                let target = self.lookup(target.trim())?;
                let result = self.resolver.resolve_subtype(&ancestor, target)?;
                Ok(Report::Subtype {
                    ancestor: ancestor.brief_description(),
                    result: result.brief_description(),
                    bindings: self.bindings(&result),
                })
            }
            Command::Supertype { ty, ancestor } => {
                let ty = self.parse_type(ty)?;
                let ancestor = self.lookup(ancestor.trim())?;
                let result = self.resolver.find_supertype(&ty, ancestor)?;
                Ok(Report::Supertype {
                    ty: ty.brief_description(),
                    result: result.brief_description(),
                    bindings: self.bindings(&result),
                })
            }
            Command::Ancestors { ty } => {
                let ty = self.parse_type(ty)?;
                Ok(Report::Ancestors {
                    ty: ty.brief_description(),
                    ancestors: self
                        .resolver
                        .ancestors(&ty)
                        .iter()
                        .map(ResolvedType::brief_description)
                        .collect(),
                })
            }
            Command::Declarations => {
                let formatter = self.resolver.formatter();
                Ok(Report::Declarations {
                    declarations: self
                        .store
                        .all_ids()
                        .into_iter()
                        .map(|def| formatter.declaration(def))
                        .collect(),
                })
            }
        }
    }

    /// Resolve a textual type expression.
    ///
    /// A generic type written without arguments, or with only `?` arguments,
    /// is resolved raw.
    pub fn parse_type(&self, text: &str) -> Result<ResolvedType, QueryError> {
        let expr = parse_type_expr(text)?;
        self.lower(&expr)
    }

    fn lower(&self, expr: &TypeExpr) -> Result<ResolvedType, QueryError> {
        let TypeExpr::Named { name, args } = expr else {
            return Err(QueryError::BareUnbound);
        };
        let def = self.lookup(name)?;
        let arity = self.store.arity(def);

        let unbound = args.iter().filter(|arg| **arg == TypeExpr::Unbound).count();
        let raw = arity > 0 && (args.is_empty() || (args.len() == arity && unbound == arity));
        if raw {
            return Ok(self.resolver.resolve_raw(def)?);
        }
        if args.len() != arity {
            return Err(ResolutionError::ArityMismatch {
                name: name.clone(),
                expected: arity,
                found: args.len(),
            }
            .into());
        }
        if unbound > 0 {
            let raw = TypeExpr::Named {
                name: name.clone(),
                args: vec![TypeExpr::Unbound; arity],
            };
            return Err(QueryError::PartiallyBound {
                expr: expr.to_string(),
                raw: raw.to_string(),
            });
        }

        let args = args
            .iter()
            .map(|arg| self.lower(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.resolver.resolve(def, &args)?)
    }

    fn lookup(&self, name: &str) -> Result<DefId, QueryError> {
        self.store
            .lookup(name)
            .ok_or_else(|| QueryError::UnknownType(name.to_string()))
    }

    fn bindings(&self, ty: &ResolvedType) -> Vec<Binding> {
        self.store
            .type_param_names(ty.def_id())
            .iter()
            .zip(ty.bindings().iter())
            .map(|(param, bound)| Binding {
                param: param.to_string(),
                bound: bound.map(ResolvedType::brief_description),
            })
            .collect()
    }
}

/// Load the catalog, run the command and render its outcome.
pub fn run(args: &CliArgs) -> Result<Output> {
    let store = load_catalog(&args.catalog)?;
    let session = Session::new(
        &store,
        ResolverOptions {
            memoize: !args.no_cache,
        },
    );
    let color = !args.no_color && std::io::stderr().is_terminal();
    let output = render(session.execute(&args.command), args.format, color);
    let stats = session.resolver().cache_stats();
    debug!(hits = stats.hits, misses = stats.misses, entries = stats.entries, "resolver cache");
    Ok(output)
}

pub fn render(result: Result<Report, QueryError>, format: OutputFormat, color: bool) -> Output {
    match (result, format) {
        (Ok(report), OutputFormat::Text) => Output {
            exit_code: EXIT_SUCCESS,
            stdout: report.to_text(),
            stderr: String::new(),
        },
        (Ok(report), OutputFormat::Json) => Output {
            exit_code: EXIT_SUCCESS,
            stdout: to_json_line(&report),
            stderr: String::new(),
        },
        (Err(err), OutputFormat::Text) => {
            let mut stderr = Reporter::new(color).render(&[err.to_diagnostic()]);
            stderr.push('\n');
            Output {
                exit_code: EXIT_QUERY_FAILED,
                stdout: String::new(),
                stderr,
            }
        }
        (Err(err), OutputFormat::Json) => {
            #[derive(Serialize)]
            struct Failure {
                error: Diagnostic,
            }
            Output {
                exit_code: EXIT_QUERY_FAILED,
                stdout: to_json_line(&Failure {
                    error: err.to_diagnostic(),
                }),
                stderr: String::new(),
            }
        }
    }
}

/// One compact JSON document per line.
fn to_json_line<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(mut json) => {
            json.push('\n');
            json
        }
        Err(err) => format!("{{\"error\":\"failed to serialize output: {err}\"}}\n"),
    }
}
