mod expressions;
mod literals;

use crate::ast::Expr;
use crate::error::{Diagnostic, Span};
use crate::lexer::{Token, TokenKind, Tokenizer};
use crate::options::Options;
use crate::visit;
use tracing::{trace, warn};

/// Recursive-descent parser over a lazy [`Tokenizer`] with one token of
/// lookahead.
///
/// Use the free function [`parse()`] for a convenient entry point; it also
/// enforces the source-length and tree-height limits.
pub struct Parser<'a> {
    pub(super) source: &'a str,
    pub(super) tokenizer: Tokenizer<'a>,
    pub(super) current: Token<'a>,
    pub(super) options: &'a Options,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, options: &'a Options) -> Result<Self, Diagnostic> {
        let mut tokenizer = Tokenizer::new(source);
        let current = tokenizer.next_token()?;
        Ok(Self {
            source,
            tokenizer,
            current,
            options,
        })
    }

    /// Parses one complete expression followed by end of input.
    pub fn parse_complete(&mut self) -> Result<Expr, Diagnostic> {
        let expr = self.parse_expression(1)?;
        if !self.current.is_end() {
            return Err(self.error_here(Diagnostic::syntax(format!(
                "unexpected token {} after end of expression",
                self.current.display_name()
            ))));
        }
        Ok(expr)
    }

    /// Consumes the current token and returns it.
    #[inline]
    pub(super) fn advance(&mut self) -> Result<Token<'a>, Diagnostic> {
        let next = self.tokenizer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    pub(super) fn at_punct(&self, punct: &str) -> bool {
        self.current.is_punct(punct)
    }

    pub(super) fn at_kind(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub(super) fn expect_punct(&mut self, punct: &str, context: &str) -> Result<Token<'a>, Diagnostic> {
        if self.at_punct(punct) {
            return self.advance();
        }
        Err(self.error_here(Diagnostic::syntax(format!(
            "expected '{punct}' {context}, found {}",
            self.current.display_name()
        ))))
    }

    /// Positions `diag` at the current token.
    pub(super) fn error_here(&self, diag: Diagnostic) -> Diagnostic {
        diag.at_span(self.source, self.current.span())
    }

    pub(super) fn error_at(&self, diag: Diagnostic, span: Span) -> Diagnostic {
        diag.at_span(self.source, span)
    }

    pub(super) fn unexpected(&self) -> Diagnostic {
        let diag = if self.current.is_end() {
            Diagnostic::syntax("unexpected end of input")
        } else {
            Diagnostic::syntax(format!("unexpected token {}", self.current.display_name()))
        };
        self.error_here(diag)
    }

    pub(super) fn check_depth(&self, depth: usize) -> Result<(), Diagnostic> {
        match self.options.max_ast_depth {
            Some(max) if depth > max => {
                warn!(depth, max, "expression nesting limit exceeded while parsing");
                Err(self.error_here(depth_exceeded(max)))
            }
            _ => Ok(()),
        }
    }
}

fn depth_exceeded(max: usize) -> Diagnostic {
    Diagnostic::resource_limit(format!(
        "expression nesting exceeds the maximum depth of {max}"
    ))
}

/// Parses `source` into a syntax tree under the limits and sandbox rules in
/// `options`.
///
/// The source length is checked before any tokenizing. Sandbox violations
/// (forbidden globals, dangerous property names) are reported here, before
/// a tree exists.
pub fn parse(source: &str, options: &Options) -> Result<Expr, Diagnostic> {
    if let Some(max) = options.max_source_length
        && source.len() > max
    {
        warn!(length = source.len(), max, "expression source too long");
        return Err(Diagnostic::resource_limit(format!(
            "expression source is {} bytes, exceeding the maximum of {max}",
            source.len()
        )));
    }

    let mut parser = Parser::new(source, options)?;
    let expr = parser.parse_complete()?;

    if let Some(max) = options.max_ast_depth {
        let (depth, span) = visit::deepest(&expr);
        if depth > max {
            warn!(depth, max, "expression tree too deep");
            return Err(depth_exceeded(max).at_span(source, span));
        }
    }

    trace!(kind = expr.kind_name(), "parsed expression");
    Ok(expr)
}
