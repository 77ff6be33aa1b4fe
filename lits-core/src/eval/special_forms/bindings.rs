// lits-core - Binding special forms
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Special forms that introduce bindings: let, loop/recur, if-let, when-let,
//! when-first.

use std::rc::Rc;

use lits_parser::{AstNode, Binding, Position};

use crate::context::{Context, ContextStack};
use crate::error::{AritySpec, Error, Result};
use crate::eval::{Flow, evaluate_ast_node, evaluate_body, evaluate_tail};
use crate::value::Value;

/// Evaluate `bindings` in order into a fresh frame pushed on `stack`.
/// Each initializer sees the bindings before it.
fn bind_sequentially(
    bindings: &[Binding],
    stack: &ContextStack,
) -> Result<(Rc<Context>, ContextStack)> {
    let frame = Context::new();
    let inner = stack.with_context(frame.clone());
    for binding in bindings {
        let value = evaluate_ast_node(&binding.value, &inner)?;
        frame.introduce(&binding.name, value, binding.position.as_ref())?;
    }
    Ok((frame, inner))
}

/// (let [name expr ...] body...)
pub fn eval_let(bindings: &[Binding], body: &[AstNode], stack: &ContextStack) -> Result<Flow> {
    let (_, inner) = bind_sequentially(bindings, stack)?;
    evaluate_body(body, &inner)
}

/// (loop [name expr ...] body...)
///
/// A `recur` in tail position overwrites the loop bindings in place and
/// restarts the body.
pub fn eval_loop(
    bindings: &[Binding],
    body: &[AstNode],
    position: Option<&Position>,
    stack: &ContextStack,
) -> Result<Flow> {
    let (frame, inner) = bind_sequentially(bindings, stack)?;

    loop {
        match evaluate_body(body, &inner)? {
            Flow::Done(value) => return Ok(Flow::Done(value)),
            Flow::Recur {
                args,
                position: recur_position,
            } => {
                if args.len() != bindings.len() {
                    return Err(Error::Arity {
                        expected: AritySpec::Exact(bindings.len()),
                        got: args.len(),
                        name: Some("recur".to_string()),
                        position: recur_position.or_else(|| position.cloned()),
                    });
                }
                for (binding, value) in bindings.iter().zip(args) {
                    frame.insert(binding.name.as_str(), value);
                }
            }
        }
    }
}

/// (recur args...) - hand new arguments to the enclosing loop or function.
pub fn eval_recur(
    args: &[AstNode],
    position: Option<&Position>,
    stack: &ContextStack,
) -> Result<Flow> {
    let args = args
        .iter()
        .map(|arg| evaluate_ast_node(arg, stack))
        .collect::<Result<Vec<_>>>()?;
    Ok(Flow::Recur {
        args,
        position: position.cloned(),
    })
}

/// (if-let [name expr] then else?)
pub fn eval_if_let(
    binding: &Binding,
    then: &AstNode,
    otherwise: Option<&AstNode>,
    stack: &ContextStack,
) -> Result<Flow> {
    let value = evaluate_ast_node(&binding.value, stack)?;
    if value.is_truthy() {
        let inner = bind_one(binding, value, stack)?;
        evaluate_tail(then, &inner)
    } else {
        match otherwise {
            Some(otherwise) => evaluate_tail(otherwise, stack),
            None => Ok(Flow::Done(Value::Nil)),
        }
    }
}

/// (when-let [name expr] body...)
pub fn eval_when_let(binding: &Binding, body: &[AstNode], stack: &ContextStack) -> Result<Flow> {
    let value = evaluate_ast_node(&binding.value, stack)?;
    if !value.is_truthy() {
        return Ok(Flow::Done(Value::Nil));
    }
    let inner = bind_one(binding, value, stack)?;
    evaluate_body(body, &inner)
}

/// (when-first [name coll] body...) - binds the first element of a non-empty sequence.
pub fn eval_when_first(binding: &Binding, body: &[AstNode], stack: &ContextStack) -> Result<Flow> {
    let coll = evaluate_ast_node(&binding.value, stack)?;
    let items = coll.sequence_items().ok_or_else(|| {
        Error::type_error_in("when-first", "sequence", coll.type_name())
            .at(binding.position.as_ref())
    })?;
    let Some(first) = items.into_iter().next() else {
        return Ok(Flow::Done(Value::Nil));
    };
    let inner = bind_one(binding, first, stack)?;
    evaluate_body(body, &inner)
}

fn bind_one(binding: &Binding, value: Value, stack: &ContextStack) -> Result<ContextStack> {
    let frame = Context::new();
    frame.introduce(&binding.name, value, binding.position.as_ref())?;
    Ok(stack.with_context(frame))
}
