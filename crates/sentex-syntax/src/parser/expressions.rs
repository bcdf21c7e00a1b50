//! Operator-precedence levels, unary operators and postfix chains.

use super::Parser;
use crate::ast::*;
use crate::error::{Diagnostic, Span};
use crate::lexer::TokenKind;
use crate::sandbox;

type Level<'a> = fn(&mut Parser<'a>, usize) -> Result<Expr, Diagnostic>;

impl<'a> Parser<'a> {
    pub(super) fn parse_expression(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        self.check_depth(depth)?;
        self.parse_conditional(depth)
    }

    fn parse_conditional(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        let test = self.parse_nullish(depth)?;
        if !self.at_punct("?") {
            return Ok(test);
        }
        self.advance()?;

        let consequent = self.parse_expression(depth + 1)?;
        self.expect_punct(":", "in conditional expression")?;
        let alternate = self.parse_expression(depth + 1)?;
        let span = test.span.merge(&alternate.span);

        Ok(Expr::new(
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
        ))
    }

    fn parse_nullish(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_logical_or(depth)?;
        let mut links = 0;

        while self.current.is_operator("??") {
            self.advance()?;
            links += 1;
            self.check_depth(depth + links)?;
            let right = self.parse_logical_or(depth + 1)?;
            let span = left.span.merge(&right.span);

            left = Expr::new(
                ExprKind::NullishCoalesce {
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_logical_or(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        self.parse_logical(depth, LogicalOp::Or, Self::parse_logical_and)
    }

    fn parse_logical_and(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        self.parse_logical(depth, LogicalOp::And, Self::parse_equality)
    }

    fn parse_logical(
        &mut self,
        depth: usize,
        op: LogicalOp,
        next: Level<'a>,
    ) -> Result<Expr, Diagnostic> {
        let mut left = next(self, depth)?;
        let mut links = 0;

        while self.current.is_operator(op.as_str()) {
            self.advance()?;
            links += 1;
            self.check_depth(depth + links)?;
            let right = next(self, depth + 1)?;
            let span = left.span.merge(&right.span);

            left = Expr::new(
                ExprKind::Logical {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_equality(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        self.parse_binary(depth, &[BinaryOp::Eq, BinaryOp::Ne], Self::parse_relational)
    }

    fn parse_relational(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        self.parse_binary(
            depth,
            &[BinaryOp::Lt, BinaryOp::Le, BinaryOp::Gt, BinaryOp::Ge],
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        self.parse_binary(depth, &[BinaryOp::Add, BinaryOp::Sub], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        self.parse_binary(
            depth,
            &[BinaryOp::Mul, BinaryOp::Div, BinaryOp::Mod],
            Self::parse_unary,
        )
    }

    /// One left-associative binary level accepting any operator in `ops`.
    ///
    /// A chain of `n` operators puts its leftmost operand `n` levels below
    /// `depth`, so the limit is checked per operator instead of after the
    /// whole chain has been built.
    fn parse_binary(
        &mut self,
        depth: usize,
        ops: &[BinaryOp],
        next: Level<'a>,
    ) -> Result<Expr, Diagnostic> {
        let mut left = next(self, depth)?;
        let mut links = 0;

        loop {
            let op = match self.current.kind {
                TokenKind::Operator => BinaryOp::from_symbol(&self.current.text),
                _ => None,
            };
            let Some(op) = op.filter(|op| ops.contains(op)) else {
                break;
            };
            self.advance()?;
            links += 1;
            self.check_depth(depth + links)?;

            let right = next(self, depth + 1)?;
            let span = left.span.merge(&right.span);

            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_unary(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        let op = match self.current.kind {
            TokenKind::Operator => UnaryOp::from_symbol(&self.current.text),
            _ => None,
        };
        let Some(op) = op else {
            return self.parse_postfix(depth);
        };

        let op_token = self.advance()?;
        self.check_depth(depth + 1)?;
        let operand = self.parse_unary(depth + 1)?;
        let span = op_token.span().merge(&operand.span);

        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// Member access and calls, chainable in any order.
    fn parse_postfix(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        let mut expr = self.parse_primary(depth)?;
        let mut links = 0;

        loop {
            if self.at_punct(".") || self.at_punct("[") || self.at_punct("(") {
                links += 1;
                self.check_depth(depth + links)?;
            }

            if self.at_punct(".") {
                self.advance()?;
                if !self.at_kind(TokenKind::Identifier) {
                    return Err(self.error_here(Diagnostic::syntax(format!(
                        "expected property name after '.', found {}",
                        self.current.display_name()
                    ))));
                }
                let name = self.advance()?;
                let name_span = name.span();
                sandbox::check_property_key(&name.text, self.options)
                    .map_err(|diag| self.error_at(diag, name_span))?;

                let span = expr.span.merge(&name_span);
                let property = Expr::new(ExprKind::Identifier(name.text.into_owned()), name_span);
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: false,
                    },
                    span,
                );
            } else if self.at_punct("[") {
                self.advance()?;
                let property = self.parse_expression(depth + 1)?;
                if let ExprKind::Literal {
                    value: LiteralValue::String(key),
                    ..
                } = &property.kind
                {
                    sandbox::check_property_key(key, self.options)
                        .map_err(|diag| self.error_at(diag, property.span))?;
                }
                let close = self.expect_punct("]", "to close computed member access")?;

                let span = Span::new(expr.span.start, close.end);
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: true,
                    },
                    span,
                );
            } else if self.at_punct("(") {
                self.advance()?;
                let (arguments, close) = self.parse_arguments(depth + 1)?;

                let span = Span::new(expr.span.start, close.end);
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        arguments,
                    },
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Arguments after an opening `(`, through the closing `)`. A trailing
    /// comma is accepted.
    fn parse_arguments(&mut self, depth: usize) -> Result<(Vec<Expr>, Span), Diagnostic> {
        let mut arguments = Vec::new();

        while !self.at_punct(")") {
            arguments.push(self.parse_expression(depth)?);
            if self.at_punct(",") {
                self.advance()?;
            } else {
                break;
            }
        }

        let close = self.expect_punct(")", "to close argument list")?;
        Ok((arguments, close.span()))
    }
}
