// lits-core - Special forms
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Evaluation of special forms.

pub mod bindings;
pub mod comprehension;
pub mod control;
pub mod definitions;

use lits_parser::{SpecialExpression, SpecialForm};

use crate::context::ContextStack;
use crate::error::Result;
use crate::eval::{Flow, exceptions};
use crate::value::Value;

/// Evaluate a special expression. Forms with a tail position pass a
/// [`Flow::Recur`] from it straight up to the caller.
pub fn evaluate(expr: &SpecialExpression, stack: &ContextStack) -> Result<Flow> {
    let position = expr.position.as_ref();

    match &expr.form {
        SpecialForm::And(nodes) => control::eval_and(nodes, stack).map(Flow::Done),
        SpecialForm::Or(nodes) => control::eval_or(nodes, stack).map(Flow::Done),
        SpecialForm::Comment => Ok(Flow::Done(Value::Nil)),
        SpecialForm::Cond(clauses) => control::eval_cond(clauses, stack),
        SpecialForm::Do(body) => control::eval_do(body, stack),
        SpecialForm::If(conditional) => control::eval_if(conditional, false, stack),
        SpecialForm::IfNot(conditional) => control::eval_if(conditional, true, stack),
        SpecialForm::When { test, body } => control::eval_when(test, body, false, stack),
        SpecialForm::WhenNot { test, body } => control::eval_when(test, body, true, stack),

        SpecialForm::Let { bindings, body } => bindings::eval_let(bindings, body, stack),
        SpecialForm::Loop { bindings, body } => {
            bindings::eval_loop(bindings, body, position, stack)
        }
        SpecialForm::Recur(args) => bindings::eval_recur(args, position, stack),
        SpecialForm::IfLet {
            binding,
            then,
            otherwise,
        } => bindings::eval_if_let(binding, then, otherwise.as_ref(), stack),
        SpecialForm::WhenLet { binding, body } => bindings::eval_when_let(binding, body, stack),
        SpecialForm::WhenFirst { binding, body } => {
            bindings::eval_when_first(binding, body, stack)
        }

        SpecialForm::Def { name, value } => {
            definitions::eval_def(name, value, position, stack).map(Flow::Done)
        }
        SpecialForm::Defs { name, value } => {
            definitions::eval_defs(name, value, position, stack).map(Flow::Done)
        }
        SpecialForm::Defn { name, overloads } => {
            definitions::eval_defn(name, overloads, position, stack).map(Flow::Done)
        }
        SpecialForm::Defns { name, overloads } => {
            definitions::eval_defns(name, overloads, position, stack).map(Flow::Done)
        }
        SpecialForm::Fn { name, overloads } => Ok(Flow::Done(definitions::make_function(
            name.clone(),
            overloads,
            stack,
        ))),
        SpecialForm::Declared(name) => Ok(Flow::Done(definitions::eval_declared(name, stack))),

        SpecialForm::For(comprehension) => {
            comprehension::eval_for(comprehension, true, stack).map(Flow::Done)
        }
        SpecialForm::Doseq(comprehension) => {
            comprehension::eval_for(comprehension, false, stack).map(Flow::Done)
        }

        SpecialForm::Throw(message) => exceptions::eval_throw(message, position, stack),
        SpecialForm::Try {
            expression,
            error_name,
            catch,
        } => exceptions::eval_try(expression, error_name, catch, stack),
    }
}
