use crate::value::Value;
use sentex_syntax::Diagnostic;
use sentex_syntax::ast::{BinaryOp, UnaryOp};
use std::cmp::Ordering;

type OpResult = Result<Value, Diagnostic>;

pub fn eval_binary_op(left: &Value, op: BinaryOp, right: &Value) -> OpResult {
    match op {
        BinaryOp::Add => arithmetic(left, op, right, |l, r| Ok(l + r)),
        BinaryOp::Sub => arithmetic(left, op, right, |l, r| Ok(l - r)),
        BinaryOp::Mul => arithmetic(left, op, right, |l, r| Ok(l * r)),
        BinaryOp::Div => arithmetic(left, op, right, |l, r| {
            if r == 0.0 {
                return Err(Diagnostic::runtime("division by zero"));
            }
            Ok(l / r)
        }),
        BinaryOp::Mod => arithmetic(left, op, right, |l, r| {
            if r == 0.0 {
                return Err(Diagnostic::runtime("modulo by zero"));
            }
            Ok(l % r)
        }),
        BinaryOp::Eq => Ok(Value::Bool(left.equals(right))),
        BinaryOp::Ne => Ok(Value::Bool(!left.equals(right))),
        BinaryOp::Lt => compare(left, op, right, Ordering::is_lt),
        BinaryOp::Le => compare(left, op, right, Ordering::is_le),
        BinaryOp::Gt => compare(left, op, right, Ordering::is_gt),
        BinaryOp::Ge => compare(left, op, right, Ordering::is_ge),
    }
}

pub fn eval_unary_op(op: UnaryOp, operand: &Value) -> OpResult {
    match op {
        UnaryOp::Neg => Ok(Value::Number(-to_number(operand, op.as_str())?)),
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
    }
}

fn to_number(value: &Value, op: &str) -> Result<f64, Diagnostic> {
    value.to_number().ok_or_else(|| {
        Diagnostic::runtime(format!(
            "cannot convert {} to a number for '{op}'",
            value.describe()
        ))
    })
}

fn arithmetic(
    left: &Value,
    op: BinaryOp,
    right: &Value,
    apply: impl FnOnce(f64, f64) -> Result<f64, Diagnostic>,
) -> OpResult {
    let l = to_number(left, op.as_str())?;
    let r = to_number(right, op.as_str())?;
    apply(l, r).map(Value::Number)
}

/// Two strings compare lexicographically; anything else numerically.
/// Comparisons involving `NaN` are false.
fn compare(left: &Value, op: BinaryOp, right: &Value, test: fn(Ordering) -> bool) -> OpResult {
    let ordering = match (left, right) {
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => {
            let l = to_number(left, op.as_str())?;
            let r = to_number(right, op.as_str())?;
            l.partial_cmp(&r)
        }
    };
    Ok(Value::Bool(ordering.is_some_and(test)))
}
