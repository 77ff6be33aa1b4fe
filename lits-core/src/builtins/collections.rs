// lits-core - Collection built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Collection constructors and access: array, object, count, first, last,
//! rest, nth, get, assoc, dissoc, conj, concat, range, keys, vals,
//! contains?, empty?, reverse

use std::rc::Rc;

use im::Vector;
use lits_parser::{AstNode, Position, SyntaxError};

use super::{BuiltinEntry, Invocation, integer_arg, number_arg, seq_arg, string_arg};
use crate::error::{Error, Result};
use crate::value::Value;

pub(super) fn entries() -> Vec<(&'static str, BuiltinEntry)> {
    vec![
        ("array", BuiltinEntry::at_least(builtin_array, 0)),
        (
            "object",
            BuiltinEntry::at_least(builtin_object, 0).with_validate(validate_object),
        ),
        ("count", BuiltinEntry::exact(builtin_count, 1)),
        ("first", BuiltinEntry::exact(builtin_first, 1)),
        ("last", BuiltinEntry::exact(builtin_last, 1)),
        ("rest", BuiltinEntry::exact(builtin_rest, 1)),
        ("nth", BuiltinEntry::range(builtin_nth, 2, 3)),
        ("get", BuiltinEntry::range(builtin_get, 2, 3)),
        ("assoc", BuiltinEntry::exact(builtin_assoc, 3)),
        ("dissoc", BuiltinEntry::exact(builtin_dissoc, 2)),
        ("conj", BuiltinEntry::at_least(builtin_conj, 1)),
        ("concat", BuiltinEntry::at_least(builtin_concat, 0)),
        ("range", BuiltinEntry::range(builtin_range, 1, 3)),
        ("keys", BuiltinEntry::exact(builtin_keys, 1)),
        ("vals", BuiltinEntry::exact(builtin_vals, 1)),
        ("contains?", BuiltinEntry::exact(builtin_contains, 2)),
        ("empty?", BuiltinEntry::exact(builtin_empty, 1)),
        ("reverse", BuiltinEntry::exact(builtin_reverse, 1)),
    ]
}

// ============================================================================
// Constructors
// ============================================================================

/// (array & items) - target of `[...]` literals.
fn builtin_array(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::array(args.iter().cloned()))
}

fn validate_object(params: &[AstNode], position: Option<&Position>) -> std::result::Result<(), SyntaxError> {
    if params.len() % 2 != 0 {
        return Err(SyntaxError::new(
            "object requires an even number of arguments",
            position.cloned(),
        ));
    }
    Ok(())
}

/// (object & key-value-pairs) - target of `{...}` literals. Keys must be strings.
fn builtin_object(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    if args.len() % 2 != 0 {
        return Err(Error::syntax(
            "object requires an even number of arguments",
            inv.position.cloned(),
        ));
    }
    let mut map = im::OrdMap::new();
    for pair in args.chunks(2) {
        let key = string_arg("object key", &pair[0])?;
        map.insert(Rc::from(key), pair[1].clone());
    }
    Ok(Value::Object(map))
}

// ============================================================================
// Access
// ============================================================================

/// (count coll) - nil counts as empty.
fn builtin_count(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let count = match &args[0] {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::String(s) => s.chars().count(),
        Value::Nil => 0,
        other => {
            return Err(Error::type_error_in(inv.name, "collection", other.type_name()));
        }
    };
    Ok(Value::from(count))
}

fn builtin_first(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    match &args[0] {
        Value::Array(items) => Ok(items.front().cloned().unwrap_or_default()),
        other => Ok(seq_arg(inv.name, other)?.into_iter().next().unwrap_or_default()),
    }
}

fn builtin_last(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    match &args[0] {
        Value::Array(items) => Ok(items.back().cloned().unwrap_or_default()),
        other => Ok(seq_arg(inv.name, other)?.pop().unwrap_or_default()),
    }
}

/// (rest coll) - all but the first element. Strings stay strings.
fn builtin_rest(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    match &args[0] {
        Value::Array(items) if items.is_empty() => Ok(Value::array([])),
        Value::Array(items) => Ok(Value::Array(items.skip(1))),
        Value::String(s) => Ok(Value::string(s.chars().skip(1).collect::<String>())),
        other => Ok(Value::array(seq_arg(inv.name, other)?.into_iter().skip(1))),
    }
}

/// Element `index` of an array or string; nil when out of range.
fn element_at(coll: &Value, index: &Value) -> Option<Value> {
    let index = index.as_index()?;
    match coll {
        Value::Array(items) => items.get(index).cloned(),
        Value::String(s) => s.chars().nth(index).map(|c| Value::string(c.to_string())),
        _ => None,
    }
}

/// (nth coll index not-found?)
fn builtin_nth(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    if !matches!(args[0], Value::Array(_) | Value::String(_) | Value::Nil) {
        return Err(Error::type_error_in(inv.name, "array or string", args[0].type_name()));
    }
    integer_arg(inv.name, &args[1])?;
    let not_found = args.get(2).cloned().unwrap_or_default();
    Ok(element_at(&args[0], &args[1]).unwrap_or(not_found))
}

/// (get coll key not-found?) - never fails on a missing key.
fn builtin_get(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    let not_found = args.get(2).cloned().unwrap_or_default();
    let found = match (&args[0], &args[1]) {
        (Value::Object(map), Value::String(key)) => map.get(&**key).cloned(),
        (coll, key) => element_at(coll, key),
    };
    Ok(found.unwrap_or(not_found))
}

/// (assoc coll key value) - an array index may be one past the end to append.
fn builtin_assoc(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    match &args[0] {
        Value::Object(map) => {
            let key = string_arg(inv.name, &args[1])?;
            Ok(Value::Object(map.update(Rc::from(key), args[2].clone())))
        }
        Value::Array(items) => {
            let index = args[1]
                .as_index()
                .filter(|i| *i <= items.len())
                .ok_or_else(|| {
                    Error::type_error_in(inv.name, "index within bounds", args[1].type_name())
                })?;
            let mut items = items.clone();
            if index == items.len() {
                items.push_back(args[2].clone());
            } else {
                items.set(index, args[2].clone());
            }
            Ok(Value::Array(items))
        }
        Value::Nil => {
            let key = string_arg(inv.name, &args[1])?;
            Ok(Value::object([(key, args[2].clone())]))
        }
        other => Err(Error::type_error_in(inv.name, "object or array", other.type_name())),
    }
}

/// (dissoc obj key)
fn builtin_dissoc(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    match &args[0] {
        Value::Object(map) => {
            let key = string_arg(inv.name, &args[1])?;
            Ok(Value::Object(map.without(key)))
        }
        Value::Nil => Ok(Value::Nil),
        other => Err(Error::type_error_in(inv.name, "object", other.type_name())),
    }
}

/// (conj coll & items) - appends to an array; nil starts a new one.
fn builtin_conj(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let mut items = match &args[0] {
        Value::Array(items) => items.clone(),
        Value::Nil => Vector::new(),
        other => return Err(Error::type_error_in(inv.name, "array", other.type_name())),
    };
    items.extend(args[1..].iter().cloned());
    Ok(Value::Array(items))
}

/// (concat & colls) - all strings concatenate to a string, anything else
/// to an array.
fn builtin_concat(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    if !args.is_empty() && args.iter().all(|a| matches!(a, Value::String(_))) {
        let joined: String = args.iter().filter_map(Value::as_str).collect();
        return Ok(Value::from(joined));
    }
    let mut items = Vector::new();
    for arg in args {
        match arg {
            Value::Array(more) => items.append(more.clone()),
            Value::Nil => {}
            other => {
                return Err(Error::type_error_in(inv.name, "array", other.type_name()));
            }
        }
    }
    Ok(Value::Array(items))
}

/// (range end), (range start end), (range start end step)
fn builtin_range(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let nums = args
        .iter()
        .map(|arg| number_arg(inv.name, arg))
        .collect::<Result<Vec<_>>>()?;
    let (start, end, step) = match nums.as_slice() {
        [end] => (0.0, *end, 1.0),
        [start, end] => (*start, *end, 1.0),
        [start, end, step] => (*start, *end, *step),
        _ => return Err(Error::arity_range(inv.name, 1, 3, args.len())),
    };
    if step == 0.0 || !step.is_finite() {
        return Err(Error::type_error_in(inv.name, "non-zero finite step", "number"));
    }
    let mut items = Vector::new();
    let mut current = start;
    while (step > 0.0 && current < end) || (step < 0.0 && current > end) {
        items.push_back(Value::Number(current));
        current += step;
    }
    Ok(Value::Array(items))
}

fn builtin_keys(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    match &args[0] {
        Value::Object(map) => Ok(Value::array(map.keys().map(|k| Value::String(k.clone())))),
        other => Err(Error::type_error_in(inv.name, "object", other.type_name())),
    }
}

fn builtin_vals(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    match &args[0] {
        Value::Object(map) => Ok(Value::array(map.values().cloned())),
        other => Err(Error::type_error_in(inv.name, "object", other.type_name())),
    }
}

/// (contains? coll key) - object keys, or valid indices of an array or string.
fn builtin_contains(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let found = match (&args[0], &args[1]) {
        (Value::Object(map), Value::String(key)) => map.contains_key(&**key),
        (Value::Object(_), _) => false,
        (Value::Array(_) | Value::String(_), key) => element_at(&args[0], key).is_some(),
        (Value::Nil, _) => false,
        (other, _) => {
            return Err(Error::type_error_in(inv.name, "collection", other.type_name()));
        }
    };
    Ok(Value::Bool(found))
}

fn builtin_empty(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::Bool(builtin_count(args, inv)? == Value::Number(0.0)))
}

/// (reverse coll) - strings stay strings, nil stays nil.
fn builtin_reverse(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    match &args[0] {
        Value::Array(items) => Ok(Value::array(items.iter().rev().cloned())),
        Value::String(s) => Ok(Value::string(s.chars().rev().collect::<String>())),
        Value::Nil => Ok(Value::Nil),
        other => Err(Error::type_error_in(inv.name, "array or string", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextStack;

    fn call(f: super::super::BuiltinFn, name: &str, args: &[Value]) -> Result<Value> {
        let stack = ContextStack::default();
        let inv = Invocation::new(name, None, &stack);
        f(args, &inv)
    }

    fn nums(ns: &[f64]) -> Value {
        Value::array(ns.iter().map(|n| Value::Number(*n)))
    }

    #[test]
    fn test_object_requires_string_keys() {
        let ok = call(builtin_object, "object", &[Value::string("a"), Value::Number(1.0)]);
        assert_eq!(ok.unwrap(), Value::object([("a", Value::Number(1.0))]));
        let err = call(builtin_object, "object", &[Value::Number(1.0), Value::Number(1.0)]);
        assert!(err.is_err());
    }

    #[test]
    fn test_get_out_of_range_is_nil() {
        let coll = nums(&[1.0, 2.0]);
        assert_eq!(call(builtin_get, "get", &[coll.clone(), Value::Number(5.0)]).unwrap(), Value::Nil);
        assert_eq!(
            call(builtin_get, "get", &[coll, Value::Number(5.0), Value::string("x")]).unwrap(),
            Value::string("x")
        );
    }

    #[test]
    fn test_assoc_appends_at_end() {
        let coll = nums(&[1.0]);
        let result = call(builtin_assoc, "assoc", &[coll.clone(), Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(result.unwrap(), nums(&[1.0, 2.0]));
        assert!(call(builtin_assoc, "assoc", &[coll, Value::Number(3.0), Value::Nil]).is_err());
    }

    #[test]
    fn test_range_forms() {
        assert_eq!(call(builtin_range, "range", &[Value::Number(3.0)]).unwrap(), nums(&[0.0, 1.0, 2.0]));
        assert_eq!(
            call(builtin_range, "range", &[Value::Number(5.0), Value::Number(0.0), Value::Number(-2.0)]).unwrap(),
            nums(&[5.0, 3.0, 1.0])
        );
        assert!(call(builtin_range, "range", &[Value::Number(0.0), Value::Number(1.0), Value::Number(0.0)]).is_err());
    }

    #[test]
    fn test_concat_strings_and_arrays() {
        assert_eq!(
            call(builtin_concat, "concat", &[Value::string("ab"), Value::string("c")]).unwrap(),
            Value::string("abc")
        );
        assert_eq!(
            call(builtin_concat, "concat", &[nums(&[1.0]), Value::Nil, nums(&[2.0])]).unwrap(),
            nums(&[1.0, 2.0])
        );
    }

    #[test]
    fn test_rest_keeps_strings() {
        assert_eq!(call(builtin_rest, "rest", &[Value::string("abc")]).unwrap(), Value::string("bc"));
        assert_eq!(call(builtin_rest, "rest", &[nums(&[])]).unwrap(), nums(&[]));
    }
}
