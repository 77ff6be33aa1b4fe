// lits-core - Error types for the Lits evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types for Lits evaluation.

use std::fmt;

use lits_parser::{Position, SyntaxError};

/// Result type for Lits evaluation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while evaluating a program.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Tokenizer or parser failure, or a form used where it is not allowed
    Syntax(SyntaxError),
    /// A name bound neither in the context chain nor in the builtin registry
    UnresolvedSymbol {
        name: String,
        position: Option<Position>,
    },
    /// Attempted to call something that isn't callable
    NotAFunction {
        value: String,
        position: Option<Position>,
    },
    /// Wrong number of arguments to a function
    Arity {
        expected: AritySpec,
        got: usize,
        name: Option<String>,
        position: Option<Position>,
    },
    /// Wrong type for an operation
    Type {
        expected: &'static str,
        got: &'static str,
        context: Option<String>,
        position: Option<Position>,
    },
    /// Raised by the assertion builtins
    Assertion {
        message: String,
        position: Option<Position>,
    },
    /// Raised by `throw`
    UserDefined {
        message: String,
        position: Option<Position>,
    },
    /// Internal error - invariant violation or resource limit
    Internal(String),
}

/// Specification for expected arity.
#[derive(Debug, Clone, PartialEq)]
pub enum AritySpec {
    Exact(usize),
    AtLeast(usize),
    Range(usize, usize),
}

impl fmt::Display for AritySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AritySpec::Exact(n) => write!(f, "{}", n),
            AritySpec::AtLeast(n) => write!(f, "at least {}", n),
            AritySpec::Range(min, max) => write!(f, "{} to {}", min, max),
        }
    }
}

impl From<lits_parser::Arity> for AritySpec {
    fn from(arity: lits_parser::Arity) -> Self {
        match arity {
            lits_parser::Arity::Exact(n) => AritySpec::Exact(n),
            lits_parser::Arity::AtLeast(n) => AritySpec::AtLeast(n),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax(err) => write!(f, "{}", err),
            Error::UnresolvedSymbol { name, .. } => {
                write!(f, "Unable to resolve symbol: {}", name)
            }
            Error::NotAFunction { value, .. } => {
                write!(f, "Not a function: {}", value)
            }
            Error::Arity {
                expected,
                got,
                name,
                ..
            } => {
                if let Some(name) = name {
                    write!(
                        f,
                        "Wrong number of arguments to '{}': expected {}, got {}",
                        name, expected, got
                    )
                } else {
                    write!(
                        f,
                        "Wrong number of arguments: expected {}, got {}",
                        expected, got
                    )
                }
            }
            Error::Type {
                expected,
                got,
                context,
                ..
            } => {
                if let Some(ctx) = context {
                    write!(f, "{}: expected {}, got {}", ctx, expected, got)
                } else {
                    write!(f, "Type error: expected {}, got {}", expected, got)
                }
            }
            Error::Assertion { message, .. } => write!(f, "Assertion failed: {}", message),
            Error::UserDefined { message, .. } => write!(f, "{}", message),
            Error::Internal(msg) => write!(f, "Internal error: {}", msg),
        }?;

        if let Some(position) = self.position()
            && !matches!(self, Error::Syntax(_))
        {
            write!(f, " ({})", position)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Self {
        Error::Syntax(err)
    }
}

impl Error {
    /// Create an arity error for exact arity.
    pub fn arity(expected: usize, got: usize) -> Self {
        Error::Arity {
            expected: AritySpec::Exact(expected),
            got,
            name: None,
            position: None,
        }
    }

    /// Create an arity error for exact arity with function name.
    pub fn arity_named(name: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::Arity {
            expected: AritySpec::Exact(expected),
            got,
            name: Some(name.into()),
            position: None,
        }
    }

    /// Create an arity error for minimum arity.
    pub fn arity_at_least(name: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::Arity {
            expected: AritySpec::AtLeast(expected),
            got,
            name: Some(name.into()),
            position: None,
        }
    }

    /// Create an arity error for a bounded range.
    pub fn arity_range(name: impl Into<String>, min: usize, max: usize, got: usize) -> Self {
        Error::Arity {
            expected: AritySpec::Range(min, max),
            got,
            name: Some(name.into()),
            position: None,
        }
    }

    /// Create a type error.
    pub fn type_error(expected: &'static str, got: &'static str) -> Self {
        Error::Type {
            expected,
            got,
            context: None,
            position: None,
        }
    }

    /// Create a type error with context.
    pub fn type_error_in(
        context: impl Into<String>,
        expected: &'static str,
        got: &'static str,
    ) -> Self {
        Error::Type {
            expected,
            got,
            context: Some(context.into()),
            position: None,
        }
    }

    /// Create a syntax error detected during evaluation.
    pub fn syntax(message: impl Into<String>, position: Option<Position>) -> Self {
        Error::Syntax(SyntaxError::new(message, position))
    }

    pub fn not_a_function(value: impl Into<String>, position: Option<Position>) -> Self {
        Error::NotAFunction {
            value: value.into(),
            position,
        }
    }

    /// The source position this error points at, if known.
    pub fn position(&self) -> Option<&Position> {
        match self {
            Error::Syntax(err) => err.position.as_ref(),
            Error::UnresolvedSymbol { position, .. }
            | Error::NotAFunction { position, .. }
            | Error::Arity { position, .. }
            | Error::Type { position, .. }
            | Error::Assertion { position, .. }
            | Error::UserDefined { position, .. } => position.as_ref(),
            Error::Internal(_) => None,
        }
    }

    /// Attach `position` unless the error already carries one.
    pub fn at(mut self, position: Option<&Position>) -> Self {
        let Some(position) = position else {
            return self;
        };
        let slot = match &mut self {
            Error::Syntax(err) => &mut err.position,
            Error::UnresolvedSymbol { position, .. }
            | Error::NotAFunction { position, .. }
            | Error::Arity { position, .. }
            | Error::Type { position, .. }
            | Error::Assertion { position, .. }
            | Error::UserDefined { position, .. } => position,
            Error::Internal(_) => return self,
        };
        if slot.is_none() {
            *slot = Some(position.clone());
        }
        self
    }

    /// The message without position information, as bound by `catch`.
    pub fn message(&self) -> String {
        match self {
            Error::Syntax(err) => err.message.clone(),
            Error::UserDefined { message, .. } | Error::Assertion { message, .. } => {
                message.clone()
            }
            Error::Internal(msg) => msg.clone(),
            _ => {
                let rendered = self.to_string();
                match self.position() {
                    Some(position) => rendered
                        .trim_end_matches(&format!(" ({})", position))
                        .to_string(),
                    None => rendered,
                }
            }
        }
    }
}
