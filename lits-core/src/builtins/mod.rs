// lits-core - Built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Built-in functions for Lits.
//!
//! Builtins live in a static registry keyed by name. Each entry declares its
//! arity, which the parser checks at parse time through [`Registry`] and the
//! evaluator checks again at call time (calls through `apply`, `map` and
//! friends are only known at run time).

mod arithmetic;
mod collections;
mod comparison;
mod errors;
mod higher_order;
mod predicates;
mod regex;
mod strings;

use std::collections::HashMap;
use std::sync::LazyLock;

use lits_parser::{AstNode, BuiltinValidator, Position, SyntaxError};

use crate::context::ContextStack;
use crate::error::{AritySpec, Error, Result};
use crate::eval::call_value;
use crate::value::Value;

/// Call-site information handed to every builtin.
pub struct Invocation<'a> {
    pub name: &'a str,
    pub position: Option<&'a Position>,
    pub stack: &'a ContextStack,
}

impl<'a> Invocation<'a> {
    pub fn new(name: &'a str, position: Option<&'a Position>, stack: &'a ContextStack) -> Self {
        Invocation {
            name,
            position,
            stack,
        }
    }

    /// Call a function value from inside a builtin.
    pub fn call(&self, function: &Value, args: Vec<Value>) -> Result<Value> {
        call_value(function, args, self.position, self.stack)
    }
}

pub type BuiltinFn = fn(&[Value], &Invocation<'_>) -> Result<Value>;

/// Extra parse-time check beyond arity.
pub type ValidateFn = fn(&[AstNode], Option<&Position>) -> std::result::Result<(), SyntaxError>;

pub struct BuiltinEntry {
    pub evaluate: BuiltinFn,
    pub min_args: usize,
    pub max_args: Option<usize>,
    pub validate: Option<ValidateFn>,
}

impl BuiltinEntry {
    pub(crate) const fn exact(evaluate: BuiltinFn, n: usize) -> Self {
        BuiltinEntry {
            evaluate,
            min_args: n,
            max_args: Some(n),
            validate: None,
        }
    }

    pub(crate) const fn range(evaluate: BuiltinFn, min: usize, max: usize) -> Self {
        BuiltinEntry {
            evaluate,
            min_args: min,
            max_args: Some(max),
            validate: None,
        }
    }

    pub(crate) const fn at_least(evaluate: BuiltinFn, min: usize) -> Self {
        BuiltinEntry {
            evaluate,
            min_args: min,
            max_args: None,
            validate: None,
        }
    }

    pub(crate) const fn with_validate(mut self, validate: ValidateFn) -> Self {
        self.validate = Some(validate);
        self
    }

    fn arity(&self) -> AritySpec {
        match self.max_args {
            Some(max) if max == self.min_args => AritySpec::Exact(max),
            Some(max) => AritySpec::Range(self.min_args, max),
            None => AritySpec::AtLeast(self.min_args),
        }
    }

    fn accepts(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.is_none_or(|max| count <= max)
    }
}

static BUILTINS: LazyLock<HashMap<&'static str, BuiltinEntry>> = LazyLock::new(|| {
    build_registry(
        arithmetic::entries()
            .into_iter()
            .chain(collections::entries())
            .chain(comparison::entries())
            .chain(errors::entries())
            .chain(higher_order::entries())
            .chain(predicates::entries())
            .chain(regex::entries())
            .chain(strings::entries()),
    )
});

/// Collect builtin entries, dropping any whose name the parser claims for a
/// special form or reserved name. Such an entry could never be called.
fn build_registry(
    entries: impl IntoIterator<Item = (&'static str, BuiltinEntry)>,
) -> HashMap<&'static str, BuiltinEntry> {
    let mut registry = HashMap::new();
    for (name, entry) in entries {
        if lits_parser::is_special_form(name) || lits_parser::is_reserved_name(name) {
            log::warn!("builtin '{}' collides with a special form or reserved name; skipped", name);
            continue;
        }
        registry.insert(name, entry);
    }
    registry
}

/// True if `name` is a builtin function.
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains_key(name)
}

/// All builtin names, sorted.
pub fn builtin_names() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTINS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Call builtin `name` with evaluated arguments.
pub fn call_builtin(name: &str, args: &[Value], invocation: &Invocation<'_>) -> Result<Value> {
    let entry = BUILTINS.get(name).ok_or_else(|| Error::UnresolvedSymbol {
        name: name.to_string(),
        position: invocation.position.cloned(),
    })?;

    if !entry.accepts(args.len()) {
        return Err(Error::Arity {
            expected: entry.arity(),
            got: args.len(),
            name: Some(name.to_string()),
            position: invocation.position.cloned(),
        });
    }

    (entry.evaluate)(args, invocation).map_err(|e| e.at(invocation.position))
}

/// The builtin registry as seen by the parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct Registry;

impl BuiltinValidator for Registry {
    fn is_builtin(&self, name: &str) -> bool {
        is_builtin(name)
    }

    fn validate(
        &self,
        name: &str,
        params: &[AstNode],
        position: Option<&Position>,
    ) -> std::result::Result<(), SyntaxError> {
        let Some(entry) = BUILTINS.get(name) else {
            return Ok(());
        };
        if !entry.accepts(params.len()) {
            return Err(SyntaxError::new(
                format!(
                    "Wrong number of arguments to '{}': expected {}, got {}",
                    name,
                    entry.arity(),
                    params.len()
                ),
                position.cloned(),
            ));
        }
        match entry.validate {
            Some(validate) => validate(params, position),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Argument helpers
// ============================================================================

pub(crate) fn number_arg(name: &str, value: &Value) -> Result<f64> {
    value
        .as_number()
        .ok_or_else(|| Error::type_error_in(name, "number", value.type_name()))
}

pub(crate) fn integer_arg(name: &str, value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) if n.fract() == 0.0 => Ok(*n as i64),
        other => Err(Error::type_error_in(name, "integer", other.type_name())),
    }
}

pub(crate) fn string_arg<'v>(name: &str, value: &'v Value) -> Result<&'v str> {
    value
        .as_str()
        .ok_or_else(|| Error::type_error_in(name, "string", value.type_name()))
}

/// Elements of an array, string or object (as entries); nil is empty.
pub(crate) fn seq_arg(name: &str, value: &Value) -> Result<Vec<Value>> {
    value
        .sequence_items()
        .ok_or_else(|| Error::type_error_in(name, "sequence", value.type_name()))
}
