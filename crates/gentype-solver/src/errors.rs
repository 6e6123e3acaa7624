//! Resolution and catalog errors.
//!
//! Every variant maps to a stable code in
//! [`gentype_common::diagnostics::diagnostic_codes`]; the `#[error]` strings
//! render the same text as the registered message templates.

use crate::def::DefId;
use gentype_common::Diagnostic;
use gentype_common::diagnostics::diagnostic_codes;
use thiserror::Error;

/// Failure of a resolution query. None of these are transient: each points at
/// a caller error or an inconsistent declaration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("{name} declares {expected} type parameters, but {found} arguments were given")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("type parameter index {index} is out of range; only {len} are declared")]
    OutOfRange { index: usize, len: usize },

    #[error("unknown type definition {0}")]
    UnknownDefinition(DefId),

    /// The target's ancestor closure does not contain the known ancestor.
    #[error("cannot treat {target} as a subtype of {ancestor}")]
    NotASubtype { target: String, ancestor: String },

    /// A concrete argument fixed by the target's declarations disagrees with
    /// the known ancestor. `position` is 1-based within `owner`'s parameters.
    #[error("type parameter #{position}/{count} differs; expected {expected}, found {found}")]
    TypeParameterMismatch {
        owner: String,
        position: usize,
        count: usize,
        expected: String,
        found: String,
    },

    /// One of the target's own parameters is forced to two different types.
    #[error("type parameter {param} of {target} is bound to both {first} and {second}")]
    InconsistentTypeParameter {
        target: String,
        param: String,
        first: String,
        second: String,
    },

    #[error("{name} has no ancestor named {target}")]
    NotFound { name: String, target: String },
}

impl ResolutionError {
    pub fn code(&self) -> u32 {
        match self {
            ResolutionError::ArityMismatch { .. } => diagnostic_codes::ARITY_MISMATCH,
            ResolutionError::OutOfRange { .. } => diagnostic_codes::BINDING_INDEX_OUT_OF_RANGE,
            ResolutionError::UnknownDefinition(_) => diagnostic_codes::UNKNOWN_DEFINITION,
            ResolutionError::NotASubtype { .. } => diagnostic_codes::NOT_A_SUBTYPE,
            ResolutionError::TypeParameterMismatch { .. } => {
                diagnostic_codes::TYPE_PARAMETER_MISMATCH
            }
            ResolutionError::InconsistentTypeParameter { .. } => {
                diagnostic_codes::INCONSISTENT_TYPE_PARAMETER
            }
            ResolutionError::NotFound { .. } => diagnostic_codes::ANCESTOR_NOT_FOUND,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code(), self.to_string());
        match self {
            ResolutionError::TypeParameterMismatch { owner, .. } => {
                diagnostic.with_related(format!("in the type arguments of {owner}"))
            }
            _ => diagnostic,
        }
    }
}

/// Rejected catalog declaration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown type definition {0}")]
    UnknownDefinition(DefId),

    #[error("{name} already declares superclass {existing}")]
    DuplicateSuperclass { name: String, existing: String },

    #[error("ancestor reference to {target} passes {found} type arguments, but {target} declares {expected}")]
    AncestorArityMismatch {
        target: String,
        expected: usize,
        found: usize,
    },

    /// `index` is 1-based.
    #[error("ancestor reference uses type parameter #{index}, but {owner} declares only {arity}")]
    SlotOutOfRange {
        owner: String,
        index: usize,
        arity: usize,
    },

    #[error("{name} cannot inherit from {ancestor}: {ancestor} already derives from {name}")]
    InheritanceCycle { name: String, ancestor: String },

    #[error("{name} cannot use interface {ancestor} as its superclass")]
    SuperclassNotClass { name: String, ancestor: String },
}

impl CatalogError {
    pub fn code(&self) -> u32 {
        match self {
            CatalogError::UnknownDefinition(_) => diagnostic_codes::UNKNOWN_DEFINITION,
            CatalogError::DuplicateSuperclass { .. } => diagnostic_codes::DUPLICATE_SUPERCLASS,
            CatalogError::AncestorArityMismatch { .. } => {
                diagnostic_codes::ANCESTOR_ARITY_MISMATCH
            }
            CatalogError::SlotOutOfRange { .. } => diagnostic_codes::SLOT_OUT_OF_RANGE,
            CatalogError::InheritanceCycle { .. } => diagnostic_codes::INHERITANCE_CYCLE,
            CatalogError::SuperclassNotClass { .. } => diagnostic_codes::SUPERCLASS_NOT_CLASS,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string())
    }
}

#[cfg(test)]
#[path = "../tests/errors_tests.rs"]
mod tests;
