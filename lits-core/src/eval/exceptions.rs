// lits-core - Exception handling
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Exception handling special forms: throw, try/catch.

use std::rc::Rc;

use lits_parser::{AstNode, Position};

use crate::context::{Context, ContextStack};
use crate::error::{Error, Result};
use crate::eval::{Flow, evaluate_ast_node, evaluate_tail};
use crate::value::Value;

/// (throw message) - raise a user-defined error. The message must be a
/// non-empty string.
pub fn eval_throw(message: &AstNode, position: Option<&Position>, stack: &ContextStack) -> Result<Flow> {
    match evaluate_ast_node(message, stack)? {
        Value::String(message) if !message.is_empty() => Err(Error::UserDefined {
            message: message.to_string(),
            position: position.cloned(),
        }),
        other => Err(Error::type_error_in("throw", "non-empty string", other.type_name())
            .at(position)),
    }
}

/// (try expr (catch name handler)) - on any error, bind it as an error value
/// and evaluate the handler.
///
/// Both expressions are in tail position. A `recur` from either passes
/// through to the enclosing loop or function and is never caught.
pub fn eval_try(
    expression: &AstNode,
    error_name: &str,
    catch: &AstNode,
    stack: &ContextStack,
) -> Result<Flow> {
    match evaluate_tail(expression, stack) {
        Ok(flow) => Ok(flow),
        Err(err) => {
            log::trace!("caught error: {}", err);
            let frame = Context::new();
            frame.introduce(error_name, Value::Error(Rc::new(err)), catch.position())?;
            evaluate_tail(catch, &stack.with_context(frame))
        }
    }
}
