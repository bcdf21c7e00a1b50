//! # Sentex
//!
//! A sandboxed, JavaScript-like expression language. Expressions are
//! compiled once and evaluated many times against read-only context data and
//! a fixed set of host functions.
//!
//! ```rust
//! use sentex::prelude::*;
//! use serde_json::json;
//!
//! let expr = Compiler::new()
//!     .with_options(Options::untrusted())
//!     .compile("user.premium ? order.total * 0.9 : order.total")?;
//!
//! let total = expr.evaluate_json(&json!({
//!     "user": { "premium": true },
//!     "order": { "total": 200 },
//! }))?;
//! assert_eq!(total, json!(180));
//! # Ok::<(), sentex::Diagnostic>(())
//! ```
//!
//! Host functions are the only callables. Registering one returns a new
//! compiler, leaving expressions compiled earlier untouched:
//!
//! ```rust
//! use sentex::prelude::*;
//! use serde_json::json;
//!
//! let base = Compiler::new();
//! let before = base.compile("double(2)")?;
//! let with_double = base.with_function("double", |args: &[Value]| {
//!     Ok(Value::Number(args.first().and_then(Value::as_f64).unwrap_or(0.0) * 2.0))
//! })?;
//!
//! assert_eq!(with_double.compile("double(2)")?.evaluate_json(&json!({}))?, json!(4));
//! assert!(before.evaluate_json(&json!({})).is_err());
//! # Ok::<(), sentex::Diagnostic>(())
//! ```

pub mod config;

use std::sync::Arc;
use tracing::debug;

pub use config::Config;
pub use sentex_eval::{FunctionRegistry, Gettable, HostFunction, PropertyKey, Value};
pub use sentex_syntax::{Diagnostic, ErrorCategory, Expr, ExprKind, Options, Span};
pub use sentex_eval as eval;
pub use sentex_syntax as syntax;

/// Builds [`CompiledExpression`]s from one set of options and one function
/// registry. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: Arc<Options>,
    registry: FunctionRegistry,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Arc::new(options);
        self
    }

    /// Returns a compiler whose registry also holds `name`. `self` keeps its
    /// own registry.
    pub fn with_function<F>(&self, name: impl Into<String>, function: F) -> Result<Self, Diagnostic>
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Ok(Self {
            options: Arc::clone(&self.options),
            registry: self.registry.register(name, function)?,
        })
    }

    pub fn with_registry(mut self, registry: FunctionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn compile(&self, source: &str) -> Result<CompiledExpression, Diagnostic> {
        compile_shared(source, Arc::clone(&self.options), self.registry.clone())
    }
}

/// Parses `source` once and captures snapshots of `options` and `registry`.
pub fn compile(
    source: &str,
    options: &Options,
    registry: &FunctionRegistry,
) -> Result<CompiledExpression, Diagnostic> {
    compile_shared(source, Arc::new(options.clone()), registry.clone())
}

fn compile_shared(
    source: &str,
    options: Arc<Options>,
    registry: FunctionRegistry,
) -> Result<CompiledExpression, Diagnostic> {
    let ast = sentex_syntax::parse(source, &options)?;
    debug!(
        bytes = source.len(),
        functions = registry.len(),
        "compiled expression"
    );
    Ok(CompiledExpression {
        inner: Arc::new(Compiled {
            source: source.into(),
            ast,
            options,
            registry,
        }),
    })
}

struct Compiled {
    source: Box<str>,
    ast: Expr,
    options: Arc<Options>,
    registry: FunctionRegistry,
}

/// A parsed expression bound to the options and registry it was compiled
/// with.
///
/// Evaluation never mutates it, so one compiled expression can be shared
/// across threads and evaluated concurrently.
#[derive(Clone)]
pub struct CompiledExpression {
    inner: Arc<Compiled>,
}

impl CompiledExpression {
    pub fn source(&self) -> &str {
        &self.inner.source
    }

    pub fn ast(&self) -> &Expr {
        &self.inner.ast
    }

    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.inner.registry
    }

    /// Evaluates against `context` with a fresh operation budget.
    pub fn evaluate<C: Gettable>(&self, context: &C) -> Result<Value, Diagnostic> {
        sentex_eval::evaluate(
            &self.inner.ast,
            &self.inner.source,
            context,
            &self.inner.options,
            &self.inner.registry,
        )
    }

    /// Evaluates against a JSON context and converts the result back to JSON.
    /// `undefined` becomes `null`.
    pub fn evaluate_json(&self, context: &serde_json::Value) -> Result<serde_json::Value, Diagnostic> {
        self.evaluate(context).map(serde_json::Value::from)
    }

    /// Context names the expression reads, in order of first appearance.
    pub fn referenced_identifiers(&self) -> Vec<String> {
        sentex_syntax::visit::identifiers(&self.inner.ast)
    }

    /// Host functions the expression calls, in order of first appearance.
    pub fn called_functions(&self) -> Vec<String> {
        sentex_syntax::visit::called_functions(&self.inner.ast)
    }
}

impl std::fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("source", &self.source())
            .field("options", self.options())
            .field("registry", self.registry())
            .finish()
    }
}

pub mod prelude {
    pub use crate::{
        CompiledExpression, Compiler, Diagnostic, ErrorCategory, FunctionRegistry, Gettable,
        Options, Value, compile,
    };
}
