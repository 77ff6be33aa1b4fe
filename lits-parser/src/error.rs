// lits-parser - Error types for the tokenizer and parser
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Syntax errors raised while tokenizing or parsing.

use std::fmt;

use crate::token::Position;

/// Result type for tokenizing and parsing.
pub type Result<T> = std::result::Result<T, SyntaxError>;

/// A syntax error with optional position information.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub message: String,
    pub position: Option<Position>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, position: Option<Position>) -> Self {
        SyntaxError {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(pos) => write!(f, "Syntax error at {}: {}", pos, self.message),
            None => write!(f, "Syntax error: {}", self.message),
        }
    }
}

impl std::error::Error for SyntaxError {}
