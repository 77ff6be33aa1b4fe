// lits-core - AST-walking evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! AST-walking evaluator for Lits programs.
//!
//! Evaluation in tail position returns a [`Flow`]: either a finished value or
//! a request from `recur` to re-enter the nearest `loop` or function body with
//! new arguments. The enclosing `loop` or call frame handles the request in a
//! loop, so self-recursion through `recur` runs in constant stack space.

pub mod apply;
pub mod exceptions;
pub mod special_forms;

pub use apply::{call_value, execute_function};

use std::cell::Cell;

use lits_parser::{AstNode, Callee, NormalExpression, Position, Program};

use crate::builtins::{self, Invocation};
use crate::context::ContextStack;
use crate::error::{Error, Result};
use crate::functions::LitsFunction;
use crate::value::Value;

// ============================================================================
// Stack Overflow Protection
// ============================================================================

/// Default maximum nesting depth for evaluation.
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 10_000;

/// Remaining stack below which evaluation switches to a fresh segment.
const STACK_RED_ZONE: usize = 256 * 1024;

/// Size of each stack segment allocated on demand.
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

thread_local! {
    static EVAL_DEPTH: Cell<usize> = const { Cell::new(0) };
    static MAX_EVAL_DEPTH: Cell<usize> = const { Cell::new(DEFAULT_MAX_EVAL_DEPTH) };
}

/// Set the maximum eval nesting depth. Returns the previous value.
#[inline]
#[must_use]
pub fn set_max_eval_depth(depth: usize) -> usize {
    MAX_EVAL_DEPTH.with(|d| d.replace(depth))
}

/// Get the current maximum eval nesting depth.
#[inline]
#[must_use]
pub fn get_max_eval_depth() -> usize {
    MAX_EVAL_DEPTH.with(|d| d.get())
}

/// Get the current eval nesting depth.
#[inline]
#[must_use]
pub fn get_eval_depth() -> usize {
    EVAL_DEPTH.with(|d| d.get())
}

struct EvalDepthGuard;

impl EvalDepthGuard {
    fn new() -> Result<Self> {
        let (current, max) = EVAL_DEPTH.with(|d| {
            let current = d.get();
            d.set(current + 1);
            (current + 1, MAX_EVAL_DEPTH.with(|m| m.get()))
        });
        if current > max {
            EVAL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
            Err(Error::Internal(format!(
                "Stack overflow: maximum recursion depth ({}) exceeded",
                max
            )))
        } else {
            Ok(EvalDepthGuard)
        }
    }
}

impl Drop for EvalDepthGuard {
    fn drop(&mut self) {
        EVAL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// The outcome of evaluating a node in tail position.
#[derive(Debug)]
pub enum Flow {
    Done(Value),
    /// `recur` asked to restart the enclosing loop or function body.
    Recur {
        args: Vec<Value>,
        position: Option<Position>,
    },
}

/// Evaluate each top-level form in order and return the last value.
pub fn evaluate_program(program: &Program, stack: &ContextStack) -> Result<Value> {
    let mut result = Value::Nil;
    for node in &program.body {
        result = evaluate_ast_node(node, stack)?;
    }
    Ok(result)
}

/// Evaluate a node outside tail position. A `recur` reaching here is an error.
pub fn evaluate_ast_node(node: &AstNode, stack: &ContextStack) -> Result<Value> {
    match evaluate_tail(node, stack)? {
        Flow::Done(value) => Ok(value),
        Flow::Recur { position, .. } => Err(Error::syntax(
            "recur can only be used in tail position of loop or fn",
            position,
        )),
    }
}

/// Evaluate a node in tail position.
///
/// The native stack grows on demand, so nesting is bounded by the depth
/// guard rather than by the host thread's stack size.
pub(crate) fn evaluate_tail(node: &AstNode, stack: &ContextStack) -> Result<Flow> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || evaluate_node(node, stack))
}

fn evaluate_node(node: &AstNode, stack: &ContextStack) -> Result<Flow> {
    let _guard = EvalDepthGuard::new()?;

    match node {
        AstNode::Number { value, .. } => Ok(Flow::Done(Value::Number(*value))),
        AstNode::String { value, .. } => Ok(Flow::Done(Value::string(value))),
        AstNode::ReservedName { name, position } => {
            evaluate_reserved_name(name, position.as_ref()).map(Flow::Done)
        }
        AstNode::Name { name, position } => {
            evaluate_name(name, position.as_ref(), stack).map(Flow::Done)
        }
        AstNode::NormalExpression(expr) => evaluate_normal_expression(expr, stack).map(Flow::Done),
        AstNode::SpecialExpression(expr) => special_forms::evaluate(expr, stack),
    }
}

/// Evaluate a body: every form but the last normally, the last in tail position.
pub(crate) fn evaluate_body(body: &[AstNode], stack: &ContextStack) -> Result<Flow> {
    let Some((last, init)) = body.split_last() else {
        return Ok(Flow::Done(Value::Nil));
    };
    for node in init {
        evaluate_ast_node(node, stack)?;
    }
    evaluate_tail(last, stack)
}

fn evaluate_reserved_name(name: &str, position: Option<&Position>) -> Result<Value> {
    match name {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        "nil" => Ok(Value::Nil),
        _ => Err(Error::syntax(
            format!("Unknown reserved name '{}'", name),
            position.cloned(),
        )),
    }
}

/// Resolve a name: context chain first, then the builtin registry.
pub(crate) fn evaluate_name(
    name: &str,
    position: Option<&Position>,
    stack: &ContextStack,
) -> Result<Value> {
    if let Some(value) = stack.lookup(name) {
        return Ok(value);
    }
    if builtins::is_builtin(name) {
        return Ok(Value::function(LitsFunction::Builtin {
            name: name.to_string(),
        }));
    }
    Err(Error::UnresolvedSymbol {
        name: name.to_string(),
        position: position.cloned(),
    })
}

fn evaluate_normal_expression(expr: &NormalExpression, stack: &ContextStack) -> Result<Value> {
    let position = expr.position.as_ref();
    let args = expr
        .params
        .iter()
        .map(|param| evaluate_ast_node(param, stack))
        .collect::<Result<Vec<_>>>()?;

    let result = match &expr.callee {
        Callee::Name(name) => {
            // A binding in scope shadows a builtin of the same name.
            if let Some(callee) = stack.lookup(name) {
                call_value(&callee, args, position, stack)
            } else if builtins::is_builtin(name) {
                builtins::call_builtin(name, &args, &Invocation::new(name, position, stack))
            } else {
                Err(Error::UnresolvedSymbol {
                    name: name.clone(),
                    position: position.cloned(),
                })
            }
        }
        Callee::Expression(node) => {
            let callee = evaluate_ast_node(node, stack)?;
            call_value(&callee, args, position, stack)
        }
    };

    result.map_err(|e| e.at(position))
}
