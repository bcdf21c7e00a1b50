//! Sandbox rules enforced by both the parser and the evaluator.
//!
//! The checks here return position-less diagnostics; callers attach the
//! offending span.

use crate::error::Diagnostic;
use crate::options::Options;
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

/// Identifiers naming host-ambient objects, dynamic-code entry points and
/// the ambient `this` binding. Not configurable.
pub static FORBIDDEN_GLOBALS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "globalThis",
        "global",
        "window",
        "self",
        "document",
        "process",
        "require",
        "module",
        "exports",
        "import",
        "Function",
        "eval",
        "arguments",
        "this",
    ]
    .into_iter()
    .collect()
});

pub fn is_forbidden_global(name: &str) -> bool {
    FORBIDDEN_GLOBALS.contains(name)
}

/// Checks a bare identifier: forbidden globals, then dangerous keys.
pub fn check_identifier(name: &str, options: &Options) -> Result<(), Diagnostic> {
    if !options.allow_global_identifiers && is_forbidden_global(name) {
        return Err(Diagnostic::security(format!(
            "access to global '{name}' is not allowed"
        )));
    }
    check_property_key(name, options)
}

/// Checks a property name read through `.`, `[]` or written as an object key.
pub fn check_property_key(key: &str, options: &Options) -> Result<(), Diagnostic> {
    if options.is_dangerous_key(key) {
        return Err(Diagnostic::security(format!(
            "access to property '{key}' is not allowed"
        )));
    }
    Ok(())
}

/// Checks the name of a called function.
pub fn check_function_name(name: &str, options: &Options) -> Result<(), Diagnostic> {
    if !options.allow_global_identifiers && is_forbidden_global(name) {
        return Err(Diagnostic::security(format!(
            "calling global '{name}' is not allowed"
        )));
    }
    Ok(())
}
