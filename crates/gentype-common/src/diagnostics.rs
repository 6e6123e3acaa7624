//! Diagnostic types and message lookup for the resolver.
//!
//! Every resolution or catalog failure carries a stable numeric code. The
//! code selects a [`DiagnosticMessage`] whose template uses `{0}`, `{1}`, ...
//! placeholders; [`format_message`] fills them in.

use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// A rendered diagnostic, ready to be printed or serialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message_text: String,
    /// Extra context lines (e.g. the declaration that introduced a conflict).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            related_information: Vec::new(),
        }
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, message: impl Into<String>) -> Self {
        self.related_information.push(message.into());
        self
    }
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

// =============================================================================
// Codes
// =============================================================================

pub mod diagnostic_codes {
    // Resolution (1xxx)
    pub const ARITY_MISMATCH: u32 = 1001;
    pub const BINDING_INDEX_OUT_OF_RANGE: u32 = 1002;
    pub const UNKNOWN_DEFINITION: u32 = 1003;
    pub const NOT_A_SUBTYPE: u32 = 1101;
    pub const TYPE_PARAMETER_MISMATCH: u32 = 1102;
    pub const INCONSISTENT_TYPE_PARAMETER: u32 = 1103;
    pub const ANCESTOR_NOT_FOUND: u32 = 1104;

    // Catalog declarations (2xxx)
    pub const DUPLICATE_SUPERCLASS: u32 = 2001;
    pub const ANCESTOR_ARITY_MISMATCH: u32 = 2002;
    pub const SLOT_OUT_OF_RANGE: u32 = 2003;
    pub const INHERITANCE_CYCLE: u32 = 2004;
    pub const SUPERCLASS_NOT_CLASS: u32 = 2005;

    // Queries (3xxx)
    pub const MALFORMED_TYPE_EXPRESSION: u32 = 3001;
    pub const UNKNOWN_TYPE_NAME: u32 = 3002;
    pub const PARTIALLY_BOUND_QUERY: u32 = 3003;
}

use diagnostic_codes as codes;

const fn error(code: u32, message: &'static str) -> DiagnosticMessage {
    DiagnosticMessage {
        code,
        category: DiagnosticCategory::Error,
        message,
    }
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    error(
        codes::ARITY_MISMATCH,
        "{0} declares {1} type parameters, but {2} arguments were given",
    ),
    error(
        codes::BINDING_INDEX_OUT_OF_RANGE,
        "type parameter index {0} is out of range; only {1} are declared",
    ),
    error(codes::UNKNOWN_DEFINITION, "unknown type definition {0}"),
    error(codes::NOT_A_SUBTYPE, "cannot treat {0} as a subtype of {1}"),
    error(
        codes::TYPE_PARAMETER_MISMATCH,
        "type parameter #{0}/{1} differs; expected {2}, found {3}",
    ),
    error(
        codes::INCONSISTENT_TYPE_PARAMETER,
        "type parameter {0} of {1} is bound to both {2} and {3}",
    ),
    error(codes::ANCESTOR_NOT_FOUND, "{0} has no ancestor named {1}"),
    error(
        codes::DUPLICATE_SUPERCLASS,
        "{0} already declares superclass {1}",
    ),
    error(
        codes::ANCESTOR_ARITY_MISMATCH,
        "ancestor reference to {0} passes {1} type arguments, but {0} declares {2}",
    ),
    error(
        codes::SLOT_OUT_OF_RANGE,
        "ancestor reference uses type parameter #{0}, but {1} declares only {2}",
    ),
    error(
        codes::INHERITANCE_CYCLE,
        "{0} cannot inherit from {1}: {1} already derives from {0}",
    ),
    error(
        codes::SUPERCLASS_NOT_CLASS,
        "{0} cannot use interface {1} as its superclass",
    ),
    error(codes::MALFORMED_TYPE_EXPRESSION, "{0}"),
    error(codes::UNKNOWN_TYPE_NAME, "unknown type {0}"),
    error(
        codes::PARTIALLY_BOUND_QUERY,
        "{0} mixes bound and unbound arguments; use {1} for the raw type",
    ),
];

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

/// Get the category for a diagnostic code.
#[must_use]
pub fn get_diagnostic_category(code: u32) -> Option<DiagnosticCategory> {
    get_diagnostic_message(code).map(|m| m.category)
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
