mod expressions;

use crate::gettable::Gettable;
use crate::registry::FunctionRegistry;
use crate::value::Value;
use sentex_syntax::ast::Expr;
use sentex_syntax::{Diagnostic, Options, Span};
use tracing::{debug, warn};

/// Tree-walking evaluator for one evaluation.
///
/// Holds the per-call operation counter and recursion depth; create a fresh
/// one for every evaluation. Options and registry are borrowed snapshots.
pub struct Evaluator<'a> {
    source: &'a str,
    options: &'a Options,
    registry: &'a FunctionRegistry,
    operations: u64,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    /// `source` is the text the tree was parsed from and is only used to
    /// position diagnostics.
    pub fn new(source: &'a str, options: &'a Options, registry: &'a FunctionRegistry) -> Self {
        Self {
            source,
            options,
            registry,
            operations: 0,
            depth: 0,
        }
    }

    /// Operations counted so far.
    pub fn operations(&self) -> u64 {
        self.operations
    }

    pub fn evaluate(&mut self, expr: &Expr, context: &dyn Gettable) -> Result<Value, Diagnostic> {
        self.eval_expression(expr, context)
    }

    /// Positions `diag` at `span` in the evaluated source.
    pub fn locate(&self, diag: Diagnostic, span: Span) -> Diagnostic {
        diag.at_span(self.source, span)
    }

    /// Counts one operation against `max_eval_operations`.
    pub(crate) fn tick(&mut self, span: Span) -> Result<(), Diagnostic> {
        self.operations += 1;
        if let Some(max) = self.options.max_eval_operations
            && self.operations > max
        {
            warn!(max, "evaluation operation limit exceeded");
            return Err(self.locate(
                Diagnostic::resource_limit(format!(
                    "evaluation exceeded the maximum of {max} operations"
                )),
                span,
            ));
        }
        Ok(())
    }

    fn enter(&mut self, span: Span) -> Result<(), Diagnostic> {
        self.depth += 1;
        if let Some(max) = self.options.max_ast_depth
            && self.depth > max
        {
            warn!(depth = self.depth, max, "evaluation nesting limit exceeded");
            return Err(self.locate(
                Diagnostic::resource_limit(format!(
                    "expression nesting exceeds the maximum depth of {max}"
                )),
                span,
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// Evaluates `expr` against `context` with a fresh operation counter.
///
/// The context is only read. Every array and object in the result is newly
/// built, so evaluating the same tree twice yields equal, independent values.
pub fn evaluate(
    expr: &Expr,
    source: &str,
    context: &dyn Gettable,
    options: &Options,
    registry: &FunctionRegistry,
) -> Result<Value, Diagnostic> {
    let mut evaluator = Evaluator::new(source, options, registry);
    let result = evaluator.evaluate(expr, context);
    debug!(
        operations = evaluator.operations(),
        ok = result.is_ok(),
        "evaluated expression"
    );
    result
}
