// lits-core - Comparison built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Comparison and logic: = not= < > <= >= not

use std::cmp::Ordering;

use super::{BuiltinEntry, Invocation};
use crate::error::{Error, Result};
use crate::value::Value;

pub(super) fn entries() -> Vec<(&'static str, BuiltinEntry)> {
    vec![
        ("=", BuiltinEntry::at_least(builtin_eq, 1)),
        ("not=", BuiltinEntry::at_least(builtin_not_eq, 1)),
        ("<", BuiltinEntry::at_least(builtin_lt, 1)),
        (">", BuiltinEntry::at_least(builtin_gt, 1)),
        ("<=", BuiltinEntry::at_least(builtin_le, 1)),
        (">=", BuiltinEntry::at_least(builtin_ge, 1)),
        ("not", BuiltinEntry::exact(builtin_not, 1)),
    ]
}

fn all_equal(args: &[Value]) -> bool {
    args.windows(2).all(|pair| pair[0] == pair[1])
}

/// (= x & ys) - structural equality.
fn builtin_eq(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::Bool(all_equal(args)))
}

/// (not= x & ys) - same as (not (= x & ys)).
fn builtin_not_eq(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::Bool(!all_equal(args)))
}

/// Order two numbers or two strings. `None` when the numbers are unordered (NaN).
fn compare(name: &str, a: &Value, b: &Value) -> Result<Option<Ordering>> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Ok(x.partial_cmp(y)),
        (Value::String(x), Value::String(y)) => Ok(Some(x.cmp(y))),
        (Value::Number(_) | Value::String(_), other) | (other, _) => Err(Error::type_error_in(
            name,
            "two numbers or two strings",
            other.type_name(),
        )),
    }
}

fn monotonic(args: &[Value], name: &str, accept: fn(Ordering) -> bool) -> Result<Value> {
    let mut holds = true;
    for pair in args.windows(2) {
        // Keep checking types after the first failure.
        if !compare(name, &pair[0], &pair[1])?.is_some_and(accept) {
            holds = false;
        }
    }
    if let [only] = args {
        compare(name, only, only)?;
    }
    Ok(Value::Bool(holds))
}

fn builtin_lt(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    monotonic(args, inv.name, Ordering::is_lt)
}

fn builtin_gt(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    monotonic(args, inv.name, Ordering::is_gt)
}

fn builtin_le(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    monotonic(args, inv.name, Ordering::is_le)
}

fn builtin_ge(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    monotonic(args, inv.name, Ordering::is_ge)
}

fn builtin_not(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::Bool(!args[0].is_truthy()))
}
