// lits-core - Sequence comprehension
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! for and doseq.
//!
//! Bindings nest left to right: the last binding varies fastest. Per binding,
//! `&let` bindings are added to the iteration frame, then `&while` ends that
//! binding's iteration when falsy, then `&when` skips the element when falsy.

use lits_parser::{AstNode, Comprehension, LoopBinding};

use crate::context::{Context, ContextStack};
use crate::error::{Error, Result};
use crate::eval::evaluate_ast_node;
use crate::value::Value;

/// Evaluate a comprehension. With `collect` the body values are returned as
/// an array (`for`); without it the result is nil (`doseq`).
pub fn eval_for(comprehension: &Comprehension, collect: bool, stack: &ContextStack) -> Result<Value> {
    let mut results = collect.then(Vec::new);
    iterate(&comprehension.bindings, &comprehension.body, stack, &mut results)?;
    Ok(match results {
        Some(results) => Value::from(results),
        None => Value::Nil,
    })
}

fn iterate(
    bindings: &[LoopBinding],
    body: &AstNode,
    stack: &ContextStack,
    results: &mut Option<Vec<Value>>,
) -> Result<()> {
    let Some((current, rest)) = bindings.split_first() else {
        let value = evaluate_ast_node(body, stack)?;
        if let Some(results) = results {
            results.push(value);
        }
        return Ok(());
    };

    let binding = &current.binding;
    let coll = evaluate_ast_node(&binding.value, stack)?;
    let items = coll.sequence_items().ok_or_else(|| {
        Error::type_error_in(
            format!("Cannot iterate over '{}'", binding.name),
            "array, object or string",
            coll.type_name(),
        )
        .at(binding.position.as_ref())
    })?;

    for item in items {
        let frame = Context::new();
        frame.introduce(&binding.name, item, binding.position.as_ref())?;
        let inner = stack.with_context(frame.clone());

        for extra in &current.let_bindings {
            let value = evaluate_ast_node(&extra.value, &inner)?;
            frame.introduce(&extra.name, value, extra.position.as_ref())?;
        }

        if let Some(guard) = &current.while_
            && !evaluate_ast_node(guard, &inner)?.is_truthy()
        {
            break;
        }
        if let Some(guard) = &current.when
            && !evaluate_ast_node(guard, &inner)?.is_truthy()
        {
            continue;
        }

        iterate(rest, body, &inner, results)?;
    }
    Ok(())
}
