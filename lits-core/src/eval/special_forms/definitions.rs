// lits-core - Definition special forms
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! def, defs, defn, defns, fn and declared?.

use std::rc::Rc;

use lits_parser::{AstNode, FunctionOverload, Position};

use crate::builtins;
use crate::context::ContextStack;
use crate::error::{Error, Result};
use crate::eval::evaluate_ast_node;
use crate::functions::{LitsFunction, UserFunction};
use crate::value::Value;

/// Build a function value closing over the local frames of `stack`.
pub fn make_function(
    name: Option<String>,
    overloads: &Rc<[FunctionOverload]>,
    stack: &ContextStack,
) -> Value {
    Value::function(LitsFunction::UserDefined(UserFunction {
        name,
        overloads: overloads.clone(),
        context: stack.capture_locals(),
    }))
}

/// (def name expr)
pub fn eval_def(
    name: &str,
    value: &AstNode,
    position: Option<&Position>,
    stack: &ContextStack,
) -> Result<Value> {
    let value = evaluate_ast_node(value, stack)?;
    stack.define_global(name, value.clone(), position)?;
    Ok(value)
}

/// (defs name-expr expr) - the name is computed at run time.
pub fn eval_defs(
    name: &AstNode,
    value: &AstNode,
    position: Option<&Position>,
    stack: &ContextStack,
) -> Result<Value> {
    let name = evaluate_name_expression("defs", name, stack)?;
    let value = evaluate_ast_node(value, stack)?;
    stack.define_global(&name, value.clone(), position)?;
    Ok(value)
}

/// (defn name [args] body...)
pub fn eval_defn(
    name: &str,
    overloads: &Rc<[FunctionOverload]>,
    position: Option<&Position>,
    stack: &ContextStack,
) -> Result<Value> {
    let function = make_function(Some(name.to_string()), overloads, stack);
    stack.define_global(name, function.clone(), position)?;
    Ok(function)
}

/// (defns name-expr [args] body...)
pub fn eval_defns(
    name: &AstNode,
    overloads: &Rc<[FunctionOverload]>,
    position: Option<&Position>,
    stack: &ContextStack,
) -> Result<Value> {
    let name = evaluate_name_expression("defns", name, stack)?;
    let function = make_function(Some(name.clone()), overloads, stack);
    stack.define_global(&name, function.clone(), position)?;
    Ok(function)
}

/// (declared? name) - true if the name resolves in scope or to a builtin.
pub fn eval_declared(name: &str, stack: &ContextStack) -> Value {
    Value::Bool(stack.lookup(name).is_some() || builtins::is_builtin(name))
}

fn evaluate_name_expression(form: &str, node: &AstNode, stack: &ContextStack) -> Result<String> {
    match evaluate_ast_node(node, stack)? {
        Value::String(name) if !name.is_empty() => Ok(name.to_string()),
        other => Err(Error::type_error_in(
            format!("{} name", form),
            "non-empty string",
            other.type_name(),
        )
        .at(node.position())),
    }
}
