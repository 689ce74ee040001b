//! Prefix and infix operator implementations.
//!
//! Operators never fail at the Rust level: an operator applied to operands it does not
//! support yields an `Outcome::Error` message which the evaluator turns into an error value.

use crate::parser::{InfixOp, PrefixOp};
use crate::values::Value;

/// Result of applying an operator, before it is allocated as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Outcome {
    Integer(i64),
    Boolean(bool),
    Error(String),
}

pub(super) fn eval_prefix(op: PrefixOp, right: &Value<'_>) -> Outcome {
    match op {
        PrefixOp::Not => Outcome::Boolean(!right.is_truthy()),
        PrefixOp::Neg => match right {
            Value::Integer(value) => Outcome::Integer(value.wrapping_neg()),
            other => Outcome::Error(format!("unknown operator: {}{}", op, other.type_name())),
        },
    }
}

pub(super) fn eval_infix<'a>(op: InfixOp, left: &Value<'a>, right: &Value<'a>) -> Outcome {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(op, *l, *r),
        _ if op == InfixOp::Eq => Outcome::Boolean(same(left, right)),
        _ if op == InfixOp::NotEq => Outcome::Boolean(!same(left, right)),
        _ if left.type_name() != right.type_name() => Outcome::Error(format!(
            "type mismatch: {} {} {}",
            left.type_name(),
            op,
            right.type_name()
        )),
        _ => Outcome::Error(format!(
            "unknown operator: {} {} {}",
            left.type_name(),
            op,
            right.type_name()
        )),
    }
}

/// Uses wrapping arithmetic so overflow never panics.
fn eval_integer_infix(op: InfixOp, left: i64, right: i64) -> Outcome {
    match op {
        InfixOp::Add => Outcome::Integer(left.wrapping_add(right)),
        InfixOp::Sub => Outcome::Integer(left.wrapping_sub(right)),
        InfixOp::Mul => Outcome::Integer(left.wrapping_mul(right)),
        InfixOp::Div if right == 0 => Outcome::Error("division by zero".to_string()),
        InfixOp::Div => Outcome::Integer(left.wrapping_div(right)),
        InfixOp::Lt => Outcome::Boolean(left < right),
        InfixOp::Gt => Outcome::Boolean(left > right),
        InfixOp::Eq => Outcome::Boolean(left == right),
        InfixOp::NotEq => Outcome::Boolean(left != right),
    }
}

/// Equality for non-integer operands: booleans and null by value, everything else by identity.
fn same<'a>(left: &Value<'a>, right: &Value<'a>) -> bool {
    match (left, right) {
        (Value::Boolean(l), Value::Boolean(r)) => l == r,
        (Value::Null, Value::Null) => true,
        _ => core::ptr::eq(left, right),
    }
}
