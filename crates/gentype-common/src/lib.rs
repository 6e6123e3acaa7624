//! Common types and utilities for the gentype resolver.
//!
//! This crate provides foundational pieces used across all gentype crates:
//! - Diagnostic codes, categories and message templates
//! - Centralized limits and thresholds

// Diagnostic codes and message lookup
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage, format_message};

// Centralized limits and thresholds
pub mod limits;
