//! Runtime diagnostics raised while evaluating.
//!
//! The evaluator reports every failure as a [`Diagnostic`] positioned at the
//! node that caused it. [`bail_diag!`] builds and returns one in a single
//! line; [`host_failure`] classifies errors coming back from host functions.

pub use sentex_syntax::{Diagnostic, ErrorCategory, Span};

/// Return early with a positioned [`Diagnostic`].
///
/// # Usage
/// ```ignore
/// bail_diag!(self, expr.span, runtime, "unknown function '{}'", name);
/// bail_diag!(self, property.span, security, "access to property '{key}' is not allowed");
/// ```
///
/// The first argument is anything with a `locate(Diagnostic, Span)` method,
/// the third names a [`Diagnostic`] constructor.
#[macro_export]
macro_rules! bail_diag {
    ($locator:expr, $span:expr, $ctor:ident, $($arg:tt)*) => {
        return Err($locator.locate(
            $crate::error::Diagnostic::$ctor(format!($($arg)*)),
            $span,
        ))
    };
}

/// Converts the error returned by host function `name`.
///
/// A [`Diagnostic`] raised by the host is passed through unchanged. Anything
/// else becomes a runtime diagnostic, positioned by `locate`, whose
/// [`std::error::Error::source`] is the original error.
pub fn host_failure(
    name: &str,
    err: anyhow::Error,
    locate: impl FnOnce(Diagnostic) -> Diagnostic,
) -> Diagnostic {
    match err.downcast::<Diagnostic>() {
        Ok(diag) => diag,
        Err(err) => {
            let message = format!("function '{name}' failed: {err}");
            locate(Diagnostic::runtime(message).with_cause(err))
        }
    }
}
