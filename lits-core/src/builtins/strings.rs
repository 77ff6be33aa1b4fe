// lits-core - String built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! String functions: str, subs, lower-case, upper-case, join

use super::{BuiltinEntry, Invocation, integer_arg, seq_arg, string_arg};
use crate::error::{Error, Result};
use crate::value::Value;

pub(super) fn entries() -> Vec<(&'static str, BuiltinEntry)> {
    vec![
        ("str", BuiltinEntry::at_least(builtin_str, 0)),
        ("subs", BuiltinEntry::range(builtin_subs, 2, 3)),
        ("lower-case", BuiltinEntry::exact(builtin_lower_case, 1)),
        ("upper-case", BuiltinEntry::exact(builtin_upper_case, 1)),
        ("join", BuiltinEntry::range(builtin_join, 1, 2)),
    ]
}

/// (str & xs) - concatenates the plain text of each argument.
fn builtin_str(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    let s: String = args.iter().map(Value::to_plain_string).collect();
    Ok(Value::from(s))
}

/// (subs s start end?) - indices count characters.
fn builtin_subs(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let s = string_arg(inv.name, &args[0])?;
    let len = s.chars().count() as i64;
    let start = integer_arg(inv.name, &args[1])?;
    let end = match args.get(2) {
        Some(end) => integer_arg(inv.name, end)?,
        None => len,
    };
    if start < 0 || end > len || start > end {
        return Err(Error::type_error_in(
            format!("{}: indices {}..{} of length {}", inv.name, start, end, len),
            "index within bounds",
            "number",
        ));
    }
    let sub: String = s
        .chars()
        .skip(start as usize)
        .take((end - start) as usize)
        .collect();
    Ok(Value::from(sub))
}

fn builtin_lower_case(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::from(string_arg(inv.name, &args[0])?.to_lowercase()))
}

fn builtin_upper_case(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::from(string_arg(inv.name, &args[0])?.to_uppercase()))
}

/// (join coll), (join separator coll)
fn builtin_join(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let (separator, coll) = match args {
        [coll] => ("", coll),
        [separator, coll] => (string_arg(inv.name, separator)?, coll),
        _ => return Err(Error::arity_range(inv.name, 1, 2, args.len())),
    };
    let parts: Vec<String> = seq_arg(inv.name, coll)?
        .iter()
        .map(Value::to_plain_string)
        .collect();
    Ok(Value::from(parts.join(separator)))
}
