// lits-core - Arithmetic built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Arithmetic: + - * / mod inc dec max min abs

use super::{BuiltinEntry, Invocation, number_arg};
use crate::error::Result;
use crate::value::Value;

pub(super) fn entries() -> Vec<(&'static str, BuiltinEntry)> {
    vec![
        ("+", BuiltinEntry::at_least(builtin_add, 0)),
        ("-", BuiltinEntry::at_least(builtin_sub, 1)),
        ("*", BuiltinEntry::at_least(builtin_mul, 0)),
        ("/", BuiltinEntry::at_least(builtin_div, 1)),
        ("mod", BuiltinEntry::exact(builtin_mod, 2)),
        ("inc", BuiltinEntry::exact(builtin_inc, 1)),
        ("dec", BuiltinEntry::exact(builtin_dec, 1)),
        ("max", BuiltinEntry::at_least(builtin_max, 1)),
        ("min", BuiltinEntry::at_least(builtin_min, 1)),
        ("abs", BuiltinEntry::exact(builtin_abs, 1)),
    ]
}

fn numbers(args: &[Value], inv: &Invocation<'_>) -> Result<Vec<f64>> {
    args.iter().map(|arg| number_arg(inv.name, arg)).collect()
}

/// (+ & nums)
fn builtin_add(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::Number(numbers(args, inv)?.into_iter().sum()))
}

/// (- x & ys) - with one argument, negates it.
fn builtin_sub(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let nums = numbers(args, inv)?;
    let (first, rest) = (nums[0], &nums[1..]);
    if rest.is_empty() {
        return Ok(Value::Number(-first));
    }
    Ok(Value::Number(rest.iter().fold(first, |acc, n| acc - n)))
}

/// (* & nums)
fn builtin_mul(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::Number(numbers(args, inv)?.into_iter().product()))
}

/// (/ x & ys) - with one argument, returns its reciprocal.
fn builtin_div(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let nums = numbers(args, inv)?;
    let (first, rest) = (nums[0], &nums[1..]);
    if rest.is_empty() {
        return Ok(Value::Number(1.0 / first));
    }
    Ok(Value::Number(rest.iter().fold(first, |acc, n| acc / n)))
}

/// (mod num div) - the result has the sign of the divisor.
fn builtin_mod(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let num = number_arg(inv.name, &args[0])?;
    let div = number_arg(inv.name, &args[1])?;
    let rem = num % div;
    let result = if rem != 0.0 && (rem < 0.0) != (div < 0.0) {
        rem + div
    } else {
        rem
    };
    Ok(Value::Number(result))
}

fn builtin_inc(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::Number(number_arg(inv.name, &args[0])? + 1.0))
}

fn builtin_dec(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::Number(number_arg(inv.name, &args[0])? - 1.0))
}

fn builtin_max(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let nums = numbers(args, inv)?;
    Ok(Value::Number(nums.into_iter().fold(f64::NEG_INFINITY, f64::max)))
}

fn builtin_min(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let nums = numbers(args, inv)?;
    Ok(Value::Number(nums.into_iter().fold(f64::INFINITY, f64::min)))
}

fn builtin_abs(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    Ok(Value::Number(number_arg(inv.name, &args[0])?.abs()))
}
