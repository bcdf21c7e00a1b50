//! Expression evaluation: one arm per node shape.

use smallvec::SmallVec;
use std::collections::BTreeMap;
use tracing::{trace, warn};

use crate::bail_diag;
use crate::binary_ops::{eval_binary_op, eval_unary_op};
use crate::error::host_failure;
use crate::gettable::{Gettable, PropertyKey};
use crate::value::Value;
use sentex_syntax::ast::{Expr, ExprKind, LiteralValue, LogicalOp, Property};
use sentex_syntax::{Diagnostic, sandbox};

use super::Evaluator;

impl Evaluator<'_> {
    /// Evaluates an expression and returns its runtime [`Value`].
    pub(crate) fn eval_expression(
        &mut self,
        expr: &Expr,
        ctx: &dyn Gettable,
    ) -> Result<Value, Diagnostic> {
        self.tick(expr.span)?;
        self.enter(expr.span)?;
        let result = self.eval_kind(expr, ctx);
        self.leave();
        result
    }

    fn eval_kind(&mut self, expr: &Expr, ctx: &dyn Gettable) -> Result<Value, Diagnostic> {
        match &expr.kind {
            ExprKind::Literal { value, .. } => Ok(match value {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::String(s) => Value::String(s.clone()),
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Null => Value::Null,
            }),

            ExprKind::Identifier(name) => self.resolve_identifier(name, expr, ctx),

            ExprKind::Unary { op, operand } => {
                let value = self.eval_expression(operand, ctx)?;
                eval_unary_op(*op, &value).map_err(|diag| self.locate(diag, expr.span))
            }

            ExprKind::Binary { op, left, right } => {
                let left = self.eval_expression(left, ctx)?;
                let right = self.eval_expression(right, ctx)?;
                eval_binary_op(&left, *op, &right).map_err(|diag| self.locate(diag, expr.span))
            }

            ExprKind::Logical { op, left, right } => {
                let left = self.eval_expression(left, ctx)?;
                let decided = match op {
                    LogicalOp::And => !left.is_truthy(),
                    LogicalOp::Or => left.is_truthy(),
                };
                if decided {
                    Ok(left)
                } else {
                    self.eval_expression(right, ctx)
                }
            }

            ExprKind::NullishCoalesce { left, right } => {
                let left = self.eval_expression(left, ctx)?;
                if left.is_nullish() {
                    self.eval_expression(right, ctx)
                } else {
                    Ok(left)
                }
            }

            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval_expression(test, ctx)?.is_truthy() {
                    self.eval_expression(consequent, ctx)
                } else {
                    self.eval_expression(alternate, ctx)
                }
            }

            ExprKind::Member {
                object,
                property,
                computed,
            } => {
                let target = self.eval_expression(object, ctx)?;
                let key = if *computed {
                    let key = self.eval_expression(property, ctx)?;
                    self.property_key(&key, property)?
                } else {
                    match property.as_identifier() {
                        Some(name) => PropertyKey::name(name),
                        None => bail_diag!(
                            self,
                            property.span,
                            internal,
                            "non-computed member property must be an identifier, found {}",
                            property.kind_name()
                        ),
                    }
                };

                if let PropertyKey::Name(name) = &key {
                    self.check_key(name, property)?;
                }
                if target.is_nullish() {
                    bail_diag!(
                        self,
                        expr.span,
                        runtime,
                        "cannot read property '{key}' of {}",
                        target.type_name()
                    );
                }
                Ok(target.get(&key).unwrap_or_default())
            }

            ExprKind::Call { callee, arguments } => self.eval_call(expr, callee, arguments, ctx),

            ExprKind::Array(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.eval_expression(element, ctx)?);
                }
                Ok(Value::Array(items))
            }

            ExprKind::Object(properties) => {
                let mut map = BTreeMap::new();
                for prop in properties {
                    let (key, value) = self.eval_property(prop, ctx)?;
                    map.insert(key, value);
                }
                Ok(Value::Object(map))
            }
        }
    }

    fn resolve_identifier(
        &mut self,
        name: &str,
        expr: &Expr,
        ctx: &dyn Gettable,
    ) -> Result<Value, Diagnostic> {
        if name == "undefined" {
            return Ok(Value::Undefined);
        }
        sandbox::check_identifier(name, self.options).map_err(|diag| {
            warn!(identifier = name, "sandbox rejected identifier");
            self.locate(diag, expr.span)
        })?;
        Ok(ctx.get(&PropertyKey::name(name)).unwrap_or_default())
    }

    fn eval_call(
        &mut self,
        expr: &Expr,
        callee: &Expr,
        arguments: &[Expr],
        ctx: &dyn Gettable,
    ) -> Result<Value, Diagnostic> {
        let Some(name) = callee.as_identifier() else {
            warn!("sandbox rejected call of a computed callee");
            bail_diag!(
                self,
                callee.span,
                security,
                "only registered functions can be called; '{callee}' is not a function name"
            );
        };
        sandbox::check_function_name(name, self.options)
            .map_err(|diag| self.locate(diag, callee.span))?;

        let registry = self.registry;
        let Some(function) = registry.get(name) else {
            bail_diag!(self, callee.span, runtime, "unknown function '{name}'");
        };

        let mut args: SmallVec<[Value; 4]> = SmallVec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(self.eval_expression(argument, ctx)?);
        }

        trace!(function = name, args = args.len(), "calling host function");
        function(args.as_slice())
            .map_err(|err| host_failure(name, err, |diag| self.locate(diag, expr.span)))
    }

    fn eval_property(
        &mut self,
        prop: &Property,
        ctx: &dyn Gettable,
    ) -> Result<(String, Value), Diagnostic> {
        self.tick(prop.span)?;
        let Some(key) = prop.key_name() else {
            bail_diag!(
                self,
                prop.key.span,
                internal,
                "object key must be an identifier, string or number, found {}",
                prop.key.kind_name()
            );
        };
        self.check_key(&key, &prop.key)?;
        let value = self.eval_expression(&prop.value, ctx)?;
        Ok((key, value))
    }

    /// Converts a computed key value: non-negative integers index, every
    /// other primitive is rendered to a name.
    fn property_key(&self, key: &Value, at: &Expr) -> Result<PropertyKey, Diagnostic> {
        match key {
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= usize::MAX as f64 => {
                Ok(PropertyKey::Index(*n as usize))
            }
            Value::Number(_)
            | Value::String(_)
            | Value::Bool(_)
            | Value::Null
            | Value::Undefined => Ok(PropertyKey::Name(key.to_string())),
            Value::Array(_) | Value::Object(_) => {
                bail_diag!(self, at.span, runtime, "cannot use {} as a property key", key.type_name())
            }
        }
    }

    fn check_key(&self, key: &str, at: &Expr) -> Result<(), Diagnostic> {
        sandbox::check_property_key(key, self.options).map_err(|diag| {
            warn!(key, "sandbox rejected property access");
            self.locate(diag, at.span)
        })
    }
}
