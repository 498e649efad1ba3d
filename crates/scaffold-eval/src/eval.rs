//! Tree-walking evaluator for the expression language.
//!
//! Evaluation never fails with a Rust error: problems become
//! `Value::Error`, and every operator propagates the first error operand
//! it sees.

use scaffold_ast::ast::{BinOp, Node, UnOp};
use std::cmp::Ordering;

use crate::env::Environment;
use crate::value::Value;

/// Evaluate `node` against `env`.
pub fn evaluate(node: &Node, env: &mut Environment<'_>) -> Value {
    match node {
        Node::StringConstant(s) => Value::Str(s.clone()),
        Node::NumericConstant { text, modifier, .. } => {
            Value::from_numeric_literal(text, *modifier)
        }
        Node::BoolConstant(b) => Value::Bool(*b),
        Node::NullConstant => Value::Null,
        Node::VariableReference(name) => env.get(name).unwrap_or(Value::Null),
        Node::Unary { op, operand } => {
            let v = evaluate(operand, env);
            eval_unary(*op, v)
        }
        Node::Binary { op, left, right } => {
            // both sides always run, left first, so assignments in either operand happen
            let l = evaluate(left, env);
            let r = evaluate(right, env);
            eval_binary(*op, l, r)
        }
        Node::Ternary {
            cond,
            then,
            otherwise,
        } => match evaluate(cond, env).truthy() {
            Ok(true) => evaluate(then, env),
            Ok(false) => evaluate(otherwise, env),
            Err(e) => e,
        },
        Node::Assignment { name, value } => {
            let v = evaluate(value, env);
            if !v.is_error() {
                tracing::trace!(name = %name, value = ?v, "assign");
                env.define(name.clone(), v.clone());
            }
            v
        }
        Node::Error(msg) => Value::Error(msg.clone()),
    }
}

/// Lex, parse and evaluate `src` in one step.
pub fn evaluate_str(src: &str, env: &mut Environment<'_>) -> Value {
    match scaffold_parse::parse_str(src) {
        Ok(node) => evaluate(&node, env),
        Err(e) => Value::Error(e.to_string()),
    }
}

fn eval_unary(op: UnOp, v: Value) -> Value {
    match (op, v) {
        (_, e @ Value::Error(_)) => e,
        (UnOp::Plus, v @ (Value::Int(_) | Value::Float(_))) => v,
        (UnOp::Neg, Value::Int(a)) => a
            .checked_neg()
            .map_or_else(|| Value::error("Integer overflow in '-'"), Value::Int),
        (UnOp::Neg, Value::Float(a)) => Value::Float(-a),
        (UnOp::Not, v) => match v.truthy() {
            Ok(b) => Value::Bool(!b),
            Err(e) => e,
        },
        (op, v) => Value::error(format!(
            "Cannot apply unary '{}' to {}",
            match op {
                UnOp::Plus => "+",
                UnOp::Neg => "-",
                UnOp::Not => "!",
            },
            v.kind_name()
        )),
    }
}

fn eval_binary(op: BinOp, l: Value, r: Value) -> Value {
    use BinOp::*;

    if let Value::Error(_) = l {
        return l;
    }
    if let Value::Error(_) = r {
        return r;
    }

    match op {
        Or | And => {
            let (a, b) = match (l.truthy(), r.truthy()) {
                (Ok(a), Ok(b)) => (a, b),
                (Err(e), _) | (_, Err(e)) => return e,
            };
            Value::Bool(if op == Or { a || b } else { a && b })
        }
        Add => match (l, r) {
            (Value::Null, Value::Null) => Value::Str(String::new()),
            (l @ Value::Str(_), r) | (l, r @ Value::Str(_)) => Value::Str(format!("{l}{r}")),
            (l, r) => arithmetic(op, l, r),
        },
        Sub | Mul | Div | Rem => arithmetic(op, l, r),
        Pow => match (as_f64(&l), as_f64(&r)) {
            (Some(a), Some(b)) => Value::Float(a.powf(b)),
            _ => mismatch(op, &l, &r),
        },
        Eq | Ne | Lt | Le | Gt | Ge => compare(op, &l, &r),
    }
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn mismatch(op: BinOp, l: &Value, r: &Value) -> Value {
    Value::error(format!(
        "Cannot apply '{}' to {} and {}",
        op.symbol(),
        l.kind_name(),
        r.kind_name()
    ))
}

fn arithmetic(op: BinOp, l: Value, r: Value) -> Value {
    use BinOp::*;

    match (l, r) {
        (Value::Int(a), Value::Int(b)) => {
            let result = match op {
                Add => a.checked_add(b),
                Sub => a.checked_sub(b),
                Mul => a.checked_mul(b),
                Div | Rem if b == 0 => return Value::error("Division by zero"),
                Div => a.checked_div(b),
                Rem => a.checked_rem(b),
                _ => None,
            };
            result.map_or_else(
                || Value::error(format!("Integer overflow in '{}'", op.symbol())),
                Value::Int,
            )
        }
        (l, r) => match (as_f64(&l), as_f64(&r)) {
            (Some(a), Some(b)) => Value::Float(match op {
                Add => a + b,
                Sub => a - b,
                Mul => a * b,
                Div => a / b,
                Rem => a % b,
                _ => return mismatch(op, &l, &r),
            }),
            _ => mismatch(op, &l, &r),
        },
    }
}

fn compare(op: BinOp, l: &Value, r: &Value) -> Value {
    use BinOp::*;

    let ordering = match (l, r) {
        // null == null, null >= null and null <= null hold; strict orderings do not
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        // null against anything else: only != holds
        (Value::Null, _) | (_, Value::Null) => return Value::Bool(op == Ne),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => match op {
            Eq => return Value::Bool(a == b),
            Ne => return Value::Bool(a != b),
            _ => return mismatch(op, l, r),
        },
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        _ => match (as_f64(l), as_f64(r)) {
            // NaN compares unordered: every comparison except != is false
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => return mismatch(op, l, r),
        },
    };

    let Some(ord) = ordering else {
        return Value::Bool(op == Ne);
    };
    Value::Bool(match op {
        Eq => ord == Ordering::Equal,
        Ne => ord != Ordering::Equal,
        Lt => ord == Ordering::Less,
        Le => ord != Ordering::Greater,
        Gt => ord == Ordering::Greater,
        Ge => ord != Ordering::Less,
        _ => return mismatch(op, l, r),
    })
}
