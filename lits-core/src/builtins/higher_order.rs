// lits-core - Higher-order built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Higher-order functions: map, filter, reduce, apply, identity, and the
//! function-kind constructors partial, comp, constantly, juxt, complement,
//! every-pred, some-pred, fnil

use super::{BuiltinEntry, Invocation, seq_arg};
use crate::error::{Error, Result};
use crate::functions::LitsFunction;
use crate::value::Value;

pub(super) fn entries() -> Vec<(&'static str, BuiltinEntry)> {
    vec![
        ("map", BuiltinEntry::at_least(builtin_map, 2)),
        ("filter", BuiltinEntry::exact(builtin_filter, 2)),
        ("reduce", BuiltinEntry::range(builtin_reduce, 2, 3)),
        ("apply", BuiltinEntry::at_least(builtin_apply, 2)),
        ("identity", BuiltinEntry::exact(builtin_identity, 1)),
        ("partial", BuiltinEntry::at_least(builtin_partial, 1)),
        ("comp", BuiltinEntry::at_least(builtin_comp, 0)),
        ("constantly", BuiltinEntry::exact(builtin_constantly, 1)),
        ("juxt", BuiltinEntry::at_least(builtin_juxt, 1)),
        ("complement", BuiltinEntry::exact(builtin_complement, 1)),
        ("every-pred", BuiltinEntry::at_least(builtin_every_pred, 1)),
        ("some-pred", BuiltinEntry::at_least(builtin_some_pred, 1)),
        ("fnil", BuiltinEntry::at_least(builtin_fnil, 2)),
    ]
}

// ============================================================================
// Sequence functions
// ============================================================================

/// (map f coll & colls) - stops at the shortest collection.
fn builtin_map(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let f = &args[0];
    let colls = args[1..]
        .iter()
        .map(|coll| seq_arg(inv.name, coll))
        .collect::<Result<Vec<_>>>()?;
    let len = colls.iter().map(Vec::len).min().unwrap_or(0);

    let mut results = Vec::with_capacity(len);
    for i in 0..len {
        let call_args = colls.iter().map(|coll| coll[i].clone()).collect();
        results.push(inv.call(f, call_args)?);
    }
    Ok(Value::from(results))
}

/// (filter pred coll)
fn builtin_filter(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let mut results = Vec::new();
    for item in seq_arg(inv.name, &args[1])? {
        if inv.call(&args[0], vec![item.clone()])?.is_truthy() {
            results.push(item);
        }
    }
    Ok(Value::from(results))
}

/// (reduce f coll), (reduce f init coll)
///
/// Without an initial value an empty collection reduces to `(f)` and a
/// single element is returned as is.
fn builtin_reduce(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let f = &args[0];
    let (init, coll) = match args {
        [_, coll] => (None, coll),
        [_, init, coll] => (Some(init.clone()), coll),
        _ => return Err(Error::arity_range(inv.name, 2, 3, args.len())),
    };
    let mut items = seq_arg(inv.name, coll)?.into_iter();
    let mut acc = match init {
        Some(init) => init,
        None => match items.next() {
            Some(first) => first,
            None => return inv.call(f, Vec::new()),
        },
    };
    for item in items {
        acc = inv.call(f, vec![acc, item])?;
    }
    Ok(acc)
}

/// (apply f x & args coll) - the last argument is spread.
fn builtin_apply(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let (last, middle) = args[1..]
        .split_last()
        .ok_or_else(|| Error::arity_at_least(inv.name, 2, args.len()))?;
    let mut call_args = middle.to_vec();
    match last {
        Value::Array(items) => call_args.extend(items.iter().cloned()),
        Value::Nil => {}
        other => {
            return Err(Error::type_error_in(inv.name, "array", other.type_name()));
        }
    }
    inv.call(&args[0], call_args)
}

fn builtin_identity(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    Ok(args[0].clone())
}

// ============================================================================
// Function constructors
// ============================================================================

/// (partial f & args)
fn builtin_partial(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::function(LitsFunction::Partial {
        function: args[0].clone(),
        args: args[1..].to_vec(),
    }))
}

/// (comp & fs) - with no functions, the identity of one argument.
fn builtin_comp(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::function(LitsFunction::Comp(args.to_vec())))
}

fn builtin_constantly(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::function(LitsFunction::Constantly(args[0].clone())))
}

fn builtin_juxt(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::function(LitsFunction::Juxt(args.to_vec())))
}

fn builtin_complement(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::function(LitsFunction::Complement(args[0].clone())))
}

fn builtin_every_pred(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::function(LitsFunction::EveryPred(args.to_vec())))
}

fn builtin_some_pred(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::function(LitsFunction::SomePred(args.to_vec())))
}

/// (fnil f default & defaults)
fn builtin_fnil(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::function(LitsFunction::Fnil {
        function: args[0].clone(),
        defaults: args[1..].to_vec(),
    }))
}
