// lits-core - Function application
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Function application: one invocation rule per function kind, plus the
//! coercions that let collections and scalars be called like functions.

use std::rc::Rc;

use lits_parser::{Arity, FunctionOverload, Position};

use crate::builtins::{self, Invocation};
use crate::context::{Context, ContextStack};
use crate::error::{AritySpec, Error, Result};
use crate::eval::{Flow, evaluate_ast_node, evaluate_body};
use crate::functions::{LitsFunction, UserFunction};
use crate::value::Value;

/// Call any value with already-evaluated arguments.
pub fn call_value(
    callee: &Value,
    args: Vec<Value>,
    position: Option<&Position>,
    stack: &ContextStack,
) -> Result<Value> {
    match callee {
        Value::Function(function) => execute_function(function, args, position, stack),
        other => call_as_function(other, &args, position),
    }
}

/// Invoke a function value.
pub fn execute_function(
    function: &Rc<LitsFunction>,
    mut args: Vec<Value>,
    position: Option<&Position>,
    stack: &ContextStack,
) -> Result<Value> {
    match function.as_ref() {
        LitsFunction::UserDefined(user) => {
            execute_user_function(function, user, args, position, stack)
        }
        LitsFunction::Builtin { name } => {
            builtins::call_builtin(name, &args, &Invocation::new(name, position, stack))
        }
        LitsFunction::Native { callable, .. } => callable(&args).map_err(|e| e.at(position)),
        LitsFunction::Partial {
            function: inner,
            args: bound,
        } => {
            let mut all = bound.clone();
            all.append(&mut args);
            call_value(inner, all, position, stack)
        }
        LitsFunction::Comp(functions) => {
            let Some((last, rest)) = functions.split_last() else {
                if args.len() != 1 {
                    return Err(Error::arity_named("comp", 1, args.len()));
                }
                return Ok(args.remove(0));
            };
            let mut result = call_value(last, args, position, stack)?;
            for f in rest.iter().rev() {
                result = call_value(f, vec![result], position, stack)?;
            }
            Ok(result)
        }
        LitsFunction::Constantly(value) => Ok(value.clone()),
        LitsFunction::Juxt(functions) => {
            let results = functions
                .iter()
                .map(|f| call_value(f, args.clone(), position, stack))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::from(results))
        }
        LitsFunction::Complement(inner) => {
            let result = call_value(inner, args, position, stack)?;
            Ok(Value::Bool(!result.is_truthy()))
        }
        LitsFunction::EveryPred(predicates) => {
            for predicate in predicates {
                for arg in &args {
                    if !call_value(predicate, vec![arg.clone()], position, stack)?.is_truthy() {
                        return Ok(Value::Bool(false));
                    }
                }
            }
            Ok(Value::Bool(true))
        }
        LitsFunction::SomePred(predicates) => {
            for predicate in predicates {
                for arg in &args {
                    if call_value(predicate, vec![arg.clone()], position, stack)?.is_truthy() {
                        return Ok(Value::Bool(true));
                    }
                }
            }
            Ok(Value::Bool(false))
        }
        LitsFunction::Fnil {
            function: inner,
            defaults,
        } => {
            for (arg, default) in args.iter_mut().zip(defaults) {
                if arg.is_nil() {
                    *arg = default.clone();
                }
            }
            call_value(inner, args, position, stack)
        }
    }
}

/// Run a user-defined function.
///
/// A `recur` in tail position of the body comes back as [`Flow::Recur`]; the
/// overload is re-selected for the new argument count and the body re-run in
/// this same frame of the Rust stack.
fn execute_user_function(
    this: &Rc<LitsFunction>,
    function: &UserFunction,
    mut args: Vec<Value>,
    position: Option<&Position>,
    stack: &ContextStack,
) -> Result<Value> {
    let mut base = stack.root().with_context(function.context.clone());
    if let Some(name) = &function.name {
        let self_frame = Context::new();
        self_frame.insert(name.as_str(), Value::Function(this.clone()));
        base = base.with_context(self_frame);
    }

    loop {
        let overload = function
            .select_overload(args.len())
            .ok_or_else(|| arity_error(function, args.len(), position))?;

        let frame = Context::new();
        bind_parameters(&frame, overload, args, position)?;
        let call_stack = base.with_context(frame.clone());
        for binding in &overload.arguments.let_bindings {
            let value = evaluate_ast_node(&binding.value, &call_stack)?;
            frame.introduce(&binding.name, value, binding.position.as_ref())?;
        }

        match evaluate_body(&overload.body, &call_stack)? {
            Flow::Done(value) => return Ok(value),
            Flow::Recur { args: next, .. } => args = next,
        }
    }
}

fn bind_parameters(
    frame: &Context,
    overload: &FunctionOverload,
    args: Vec<Value>,
    position: Option<&Position>,
) -> Result<()> {
    let mut args = args.into_iter();
    for (name, value) in overload.arguments.mandatory.iter().zip(args.by_ref()) {
        frame.introduce(name, value, position)?;
    }
    if let Some(rest) = &overload.arguments.rest {
        frame.introduce(rest, Value::array(args), position)?;
    }
    Ok(())
}

fn arity_error(function: &UserFunction, got: usize, position: Option<&Position>) -> Error {
    let min = function
        .overloads
        .iter()
        .map(|o| match o.arity {
            Arity::Exact(n) | Arity::AtLeast(n) => n,
        })
        .min()
        .unwrap_or(0);
    let variadic = function
        .overloads
        .iter()
        .any(|o| matches!(o.arity, Arity::AtLeast(_)));
    let max = function
        .overloads
        .iter()
        .map(|o| match o.arity {
            Arity::Exact(n) | Arity::AtLeast(n) => n,
        })
        .max()
        .unwrap_or(0);

    let expected = if variadic {
        AritySpec::AtLeast(min)
    } else if min == max {
        AritySpec::Exact(min)
    } else {
        AritySpec::Range(min, max)
    };

    Error::Arity {
        expected,
        got,
        name: function.name.clone(),
        position: position.cloned(),
    }
}

/// Calling a non-function value with exactly one argument:
///
/// - array with an integer index
/// - object with a string key
/// - string with an object: key lookup in that object
/// - number with an array or string: index into it
fn call_as_function(callee: &Value, args: &[Value], position: Option<&Position>) -> Result<Value> {
    let not_a_function = || Error::not_a_function(callee.to_string(), position.cloned());

    let [arg] = args else {
        return Err(not_a_function());
    };

    match (callee, arg) {
        (Value::Array(items), index) => {
            let index = index.as_index().ok_or_else(not_a_function)?;
            Ok(items.get(index).cloned().unwrap_or_default())
        }
        (Value::Object(map), Value::String(key)) => {
            Ok(map.get(key).cloned().unwrap_or_default())
        }
        (Value::String(key), Value::Object(map)) => {
            Ok(map.get(key).cloned().unwrap_or_default())
        }
        (Value::Number(_), Value::Array(items)) => {
            let index = callee.as_index().ok_or_else(not_a_function)?;
            Ok(items.get(index).cloned().unwrap_or_default())
        }
        (Value::Number(_), Value::String(s)) => {
            let index = callee.as_index().ok_or_else(not_a_function)?;
            Ok(s.chars()
                .nth(index)
                .map(|c| Value::string(c.to_string()))
                .unwrap_or_default())
        }
        _ => Err(not_a_function()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(ns: &[f64]) -> Value {
        Value::array(ns.iter().map(|n| Value::Number(*n)))
    }

    #[test]
    fn test_array_as_function() {
        let array = numbers(&[10.0, 20.0, 30.0]);
        assert_eq!(
            call_as_function(&array, &[Value::Number(1.0)], None).unwrap(),
            Value::Number(20.0)
        );
        assert_eq!(
            call_as_function(&array, &[Value::Number(5.0)], None).unwrap(),
            Value::Nil
        );
        assert!(call_as_function(&array, &[Value::string("a")], None).is_err());
        assert!(call_as_function(&array, &[Value::Number(-1.0)], None).is_err());
    }

    #[test]
    fn test_object_and_string_as_function() {
        let object = Value::object([("a", Value::Number(1.0))]);
        assert_eq!(
            call_as_function(&object, &[Value::string("a")], None).unwrap(),
            Value::Number(1.0)
        );
        assert_eq!(
            call_as_function(&Value::string("a"), &[object.clone()], None).unwrap(),
            Value::Number(1.0)
        );
        assert!(matches!(
            call_as_function(&Value::string("a"), &[Value::Number(0.0)], None),
            Err(Error::NotAFunction { .. })
        ));
    }

    #[test]
    fn test_number_as_function() {
        let array = numbers(&[10.0, 20.0]);
        assert_eq!(
            call_as_function(&Value::Number(0.0), &[array], None).unwrap(),
            Value::Number(10.0)
        );
        assert_eq!(
            call_as_function(&Value::Number(1.0), &[Value::string("ab")], None).unwrap(),
            Value::string("b")
        );
    }

    #[test]
    fn test_coercion_requires_one_argument() {
        let array = numbers(&[1.0]);
        assert!(call_as_function(&array, &[], None).is_err());
        assert!(call_as_function(&array, &[Value::Number(0.0), Value::Number(0.0)], None).is_err());
        assert!(call_as_function(&Value::Bool(true), &[Value::Number(0.0)], None).is_err());
    }

    #[test]
    fn test_native_function() {
        let double = Rc::new(LitsFunction::native("double", |args: &[Value]| {
            let n = args.first().and_then(Value::as_number).unwrap_or(0.0);
            Ok(Value::Number(n * 2.0))
        }));
        let result =
            execute_function(&double, vec![Value::Number(4.0)], None, &ContextStack::default());
        assert_eq!(result.unwrap(), Value::Number(8.0));
    }

    #[test]
    fn test_empty_comp_is_identity_of_one() {
        let comp = Rc::new(LitsFunction::Comp(vec![]));
        let stack = ContextStack::default();
        assert_eq!(
            execute_function(&comp, vec![Value::Number(1.0)], None, &stack).unwrap(),
            Value::Number(1.0)
        );
        assert!(execute_function(&comp, vec![], None, &stack).is_err());
    }
}
