//! Primary expressions: literals, identifiers, groups, arrays and objects.

use super::Parser;
use crate::ast::*;
use crate::error::{Diagnostic, Span};
use crate::lexer::TokenKind;
use crate::sandbox;

const KEYWORD_LITERALS: [&str; 3] = ["true", "false", "null"];

impl<'a> Parser<'a> {
    pub(super) fn parse_primary(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        match self.current.kind {
            TokenKind::Number => {
                let token = self.advance()?;
                let span = token.span();
                let value = token.text.parse::<f64>().map_err(|_| {
                    self.error_at(
                        Diagnostic::syntax(format!("invalid number '{}'", token.text)),
                        span,
                    )
                })?;
                Ok(Expr::new(
                    ExprKind::Literal {
                        value: LiteralValue::Number(value),
                        raw: token.text.into_owned(),
                    },
                    span,
                ))
            }

            TokenKind::String => {
                let token = self.advance()?;
                let span = token.span();
                let raw = self.source[token.start..token.end].to_string();
                Ok(Expr::new(
                    ExprKind::Literal {
                        value: LiteralValue::String(token.text.into_owned()),
                        raw,
                    },
                    span,
                ))
            }

            TokenKind::Identifier => {
                let token = self.advance()?;
                let span = token.span();
                let value = match token.text.as_ref() {
                    "true" => LiteralValue::Bool(true),
                    "false" => LiteralValue::Bool(false),
                    "null" => LiteralValue::Null,
                    name => {
                        sandbox::check_identifier(name, self.options)
                            .map_err(|diag| self.error_at(diag, span))?;
                        return Ok(Expr::new(ExprKind::Identifier(name.to_string()), span));
                    }
                };
                Ok(Expr::new(
                    ExprKind::Literal {
                        value,
                        raw: token.text.into_owned(),
                    },
                    span,
                ))
            }

            TokenKind::Punctuation if self.at_punct("(") => {
                self.advance()?;
                let inner = self.parse_expression(depth + 1)?;
                self.expect_punct(")", "to close parenthesized expression")?;
                Ok(inner)
            }

            TokenKind::Punctuation if self.at_punct("[") => self.parse_array(depth),
            TokenKind::Punctuation if self.at_punct("{") => self.parse_object(depth),

            _ => Err(self.unexpected()),
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        let open = self.advance()?;
        let mut elements = Vec::new();

        while !self.at_punct("]") {
            if self.at_punct(",") {
                return Err(self.error_here(Diagnostic::syntax(
                    "unexpected ',' in array literal; empty elements are not supported",
                )));
            }
            elements.push(self.parse_expression(depth + 1)?);
            if self.at_punct(",") {
                self.advance()?;
            } else if !self.at_punct("]") {
                return Err(self.error_here(Diagnostic::syntax(format!(
                    "expected ',' or ']' in array literal, found {}",
                    self.current.display_name()
                ))));
            }
        }

        let close = self.advance()?;
        Ok(Expr::new(
            ExprKind::Array(elements),
            Span::new(open.start, close.end),
        ))
    }

    fn parse_object(&mut self, depth: usize) -> Result<Expr, Diagnostic> {
        let open = self.advance()?;
        let mut properties = Vec::new();

        while !self.at_punct("}") {
            properties.push(self.parse_property(depth + 1)?);
            if self.at_punct(",") {
                self.advance()?;
            } else if !self.at_punct("}") {
                return Err(self.error_here(Diagnostic::syntax(format!(
                    "expected ',' or '}}' in object literal, found {}",
                    self.current.display_name()
                ))));
            }
        }

        let close = self.advance()?;
        Ok(Expr::new(
            ExprKind::Object(properties),
            Span::new(open.start, close.end),
        ))
    }

    fn parse_property(&mut self, depth: usize) -> Result<Property, Diagnostic> {
        let key = match self.current.kind {
            TokenKind::Identifier => {
                let token = self.advance()?;
                let span = token.span();
                let name = token.text.into_owned();
                let key = Expr::new(ExprKind::Identifier(name.clone()), span);

                let is_shorthand = self.at_punct(",") || self.at_punct("}");
                if is_shorthand && !KEYWORD_LITERALS.contains(&name.as_str()) {
                    sandbox::check_identifier(&name, self.options)
                        .map_err(|diag| self.error_at(diag, span))?;
                    return Ok(Property {
                        value: key.clone(),
                        key,
                        shorthand: true,
                        span,
                    });
                }

                sandbox::check_property_key(&name, self.options)
                    .map_err(|diag| self.error_at(diag, span))?;
                key
            }

            TokenKind::String => {
                let token = self.advance()?;
                let span = token.span();
                sandbox::check_property_key(&token.text, self.options)
                    .map_err(|diag| self.error_at(diag, span))?;
                Expr::new(
                    ExprKind::Literal {
                        raw: self.source[span.start..span.end].to_string(),
                        value: LiteralValue::String(token.text.into_owned()),
                    },
                    span,
                )
            }

            TokenKind::Number => self.parse_primary(depth)?,

            _ => {
                return Err(self.error_here(Diagnostic::syntax(format!(
                    "expected property name in object literal, found {}",
                    self.current.display_name()
                ))));
            }
        };

        self.expect_punct(":", "after property name")?;
        let value = self.parse_expression(depth)?;
        let span = key.span.merge(&value.span);

        Ok(Property {
            key,
            value,
            shorthand: false,
            span,
        })
    }
}
