// lits-core - Evaluator and runtime for the Lits expression language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # lits-core
//!
//! Runtime and evaluator for Lits. Walks the AST produced by `lits-parser`
//! against a [`ContextStack`] of lexical frames, with a builtin registry
//! behind every name that is not bound in scope.

pub mod builtins;
pub mod context;
pub mod error;
pub mod eval;
pub mod functions;
pub mod value;

pub use builtins::{Invocation, Registry, builtin_names, is_builtin};
pub use context::{Context, ContextStack};
pub use error::{AritySpec, Error, Result};
pub use eval::{
    DEFAULT_MAX_EVAL_DEPTH, Flow, call_value, evaluate_ast_node, evaluate_program,
    execute_function, get_eval_depth, get_max_eval_depth, set_max_eval_depth,
};
pub use functions::{LitsFunction, NativeFn, UserFunction};
pub use value::{LitsRegexp, Value};

/// Tokenize, parse and evaluate `source` against `stack`.
pub fn eval_source(source: &str, debug: bool, stack: &ContextStack) -> Result<Value> {
    let program = lits_parser::read(source, debug, &Registry)?;
    evaluate_program(&program, stack)
}
