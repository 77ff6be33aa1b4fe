// lits-core - Control flow special forms
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Control flow special forms: and, or, cond, do, if, if-not, when, when-not.

use lits_parser::{AstNode, CondClause, Conditional};

use crate::context::{Context, ContextStack};
use crate::error::Result;
use crate::eval::{Flow, evaluate_ast_node, evaluate_body, evaluate_tail};
use crate::value::Value;

/// (and x y ...) - short-circuit; returns the first falsy value or the last value.
pub fn eval_and(nodes: &[AstNode], stack: &ContextStack) -> Result<Value> {
    let mut result = Value::Bool(true);
    for node in nodes {
        result = evaluate_ast_node(node, stack)?;
        if !result.is_truthy() {
            return Ok(result);
        }
    }
    Ok(result)
}

/// (or x y ...) - short-circuit; returns the first truthy value or false.
pub fn eval_or(nodes: &[AstNode], stack: &ContextStack) -> Result<Value> {
    for node in nodes {
        let value = evaluate_ast_node(node, stack)?;
        if value.is_truthy() {
            return Ok(value);
        }
    }
    Ok(Value::Bool(false))
}

/// (cond test form ...) - first truthy test selects its form; no match is nil.
pub fn eval_cond(clauses: &[CondClause], stack: &ContextStack) -> Result<Flow> {
    for clause in clauses {
        if evaluate_ast_node(&clause.test, stack)?.is_truthy() {
            return evaluate_tail(&clause.form, stack);
        }
    }
    Ok(Flow::Done(Value::Nil))
}

/// (do forms...) - evaluated in a fresh frame.
pub fn eval_do(body: &[AstNode], stack: &ContextStack) -> Result<Flow> {
    evaluate_body(body, &stack.with_context(Context::new()))
}

/// (if test then else?) and (if-not test then else?)
pub fn eval_if(conditional: &Conditional, negate: bool, stack: &ContextStack) -> Result<Flow> {
    let test = evaluate_ast_node(&conditional.test, stack)?.is_truthy();
    if test != negate {
        evaluate_tail(&conditional.then, stack)
    } else {
        match &conditional.otherwise {
            Some(otherwise) => evaluate_tail(otherwise, stack),
            None => Ok(Flow::Done(Value::Nil)),
        }
    }
}

/// (when test body...) and (when-not test body...)
pub fn eval_when(
    test: &AstNode,
    body: &[AstNode],
    negate: bool,
    stack: &ContextStack,
) -> Result<Flow> {
    if evaluate_ast_node(test, stack)?.is_truthy() != negate {
        evaluate_body(body, stack)
    } else {
        Ok(Flow::Done(Value::Nil))
    }
}
