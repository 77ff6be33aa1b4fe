// lits-core - Type predicate built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Type predicates: nil? number? string? array? object? function? boolean?
//! regexp? error?

use super::{BuiltinEntry, Invocation};
use crate::error::Result;
use crate::value::Value;

pub(super) fn entries() -> Vec<(&'static str, BuiltinEntry)> {
    vec![
        ("nil?", BuiltinEntry::exact(builtin_nil_p, 1)),
        ("number?", BuiltinEntry::exact(builtin_number_p, 1)),
        ("string?", BuiltinEntry::exact(builtin_string_p, 1)),
        ("array?", BuiltinEntry::exact(builtin_array_p, 1)),
        ("object?", BuiltinEntry::exact(builtin_object_p, 1)),
        ("function?", BuiltinEntry::exact(builtin_function_p, 1)),
        ("boolean?", BuiltinEntry::exact(builtin_boolean_p, 1)),
        ("regexp?", BuiltinEntry::exact(builtin_regexp_p, 1)),
        ("error?", BuiltinEntry::exact(builtin_error_p, 1)),
    ]
}

macro_rules! type_predicate {
    ($name:ident, $pattern:pat) => {
        fn $name(args: &[Value], _inv: &Invocation<'_>) -> Result<Value> {
            Ok(Value::Bool(matches!(args[0], $pattern)))
        }
    };
}

type_predicate!(builtin_nil_p, Value::Nil);
type_predicate!(builtin_number_p, Value::Number(_));
type_predicate!(builtin_string_p, Value::String(_));
type_predicate!(builtin_array_p, Value::Array(_));
type_predicate!(builtin_object_p, Value::Object(_));
type_predicate!(builtin_function_p, Value::Function(_));
type_predicate!(builtin_boolean_p, Value::Bool(_));
type_predicate!(builtin_regexp_p, Value::Regexp(_));
type_predicate!(builtin_error_p, Value::Error(_));
