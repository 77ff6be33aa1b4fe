// lits-core - Assertion and error built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Assertions and error values: assert, assert=, error-message

use super::{BuiltinEntry, Invocation, string_arg};
use crate::error::{Error, Result};
use crate::value::Value;

pub(super) fn entries() -> Vec<(&'static str, BuiltinEntry)> {
    vec![
        ("assert", BuiltinEntry::range(builtin_assert, 1, 2)),
        ("assert=", BuiltinEntry::range(builtin_assert_eq, 2, 3)),
        ("error-message", BuiltinEntry::exact(builtin_error_message, 1)),
    ]
}

fn assertion(message: Option<&Value>, default: impl FnOnce() -> String, inv: &Invocation<'_>) -> Result<Error> {
    let message = match message {
        Some(message) => string_arg(inv.name, message)?.to_string(),
        None => default(),
    };
    Ok(Error::Assertion {
        message,
        position: inv.position.cloned(),
    })
}

/// (assert value message?) - returns value when truthy.
fn builtin_assert(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    if args[0].is_truthy() {
        return Ok(args[0].clone());
    }
    Err(assertion(args.get(1), || format!("{} is falsy", args[0]), inv)?)
}

/// (assert= actual expected message?)
fn builtin_assert_eq(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    if args[0] == args[1] {
        return Ok(Value::Nil);
    }
    Err(assertion(
        args.get(2),
        || format!("expected {} to equal {}", args[0], args[1]),
        inv,
    )?)
}

/// (error-message err) - the message of an error bound by `catch`.
fn builtin_error_message(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    match &args[0] {
        Value::Error(err) => Ok(Value::from(err.message())),
        other => Err(Error::type_error_in(inv.name, "error", other.type_name())),
    }
}
