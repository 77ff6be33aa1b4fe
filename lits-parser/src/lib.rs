// lits-parser - Tokenizer and parser for the Lits expression language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # lits-parser
//!
//! Tokenizer, AST node model and recursive descent parser for Lits.
//! Produces a [`Program`] from source code strings.

pub mod ast;
pub mod error;
pub mod parser;
pub mod reserved;
pub mod special_forms;
pub mod token;
pub mod tokenizer;

pub use ast::{
    Arity, AstNode, Binding, Callee, Comprehension, CondClause, Conditional, FunctionArguments,
    FunctionOverload, LoopBinding, NormalExpression, Program, SpecialExpression, SpecialForm,
};
pub use error::{Result, SyntaxError};
pub use parser::{BuiltinValidator, MAX_NESTING_DEPTH, MAX_SHORTHAND_ARGS, NoBuiltins, Parser, parse};
pub use reserved::{FORBIDDEN_NAMES, RESERVED_NAMES, is_reserved_name};
pub use special_forms::{is_special_form, special_form_names};
pub use token::{Position, Token, TokenKind};
pub use tokenizer::tokenize;

/// Tokenize and parse `source` in one step.
pub fn read(source: &str, debug: bool, builtins: &dyn BuiltinValidator) -> Result<Program> {
    let tokens = tokenize(source, debug)?;
    parse(&tokens, builtins)
}
