// lits-core - Runtime values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Runtime values produced by evaluation.

use std::fmt;
use std::rc::Rc;

use im::{OrdMap, Vector};
use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};
use crate::functions::LitsFunction;

/// A Lits runtime value.
///
/// Collections are persistent (`im`), so cloning a value is cheap and
/// never copies element storage.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Array(Vector<Value>),
    /// String-keyed map, iterated in key order.
    Object(OrdMap<Rc<str>, Value>),
    Regexp(Rc<LitsRegexp>),
    Function(Rc<LitsFunction>),
    /// An error caught by `try`.
    Error(Rc<Error>),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }

    pub fn object<K: AsRef<str>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (Rc::from(k.as_ref()), v))
                .collect(),
        )
    }

    pub fn function(function: LitsFunction) -> Self {
        Value::Function(Rc::new(function))
    }

    /// Only `false` and `nil` are falsy.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Regexp(_) => "regexp",
            Value::Function(_) => "function",
            Value::Error(_) => "error",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a non-negative integer index, if it is one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= usize::MAX as f64 => {
                Some(*n as usize)
            }
            _ => None,
        }
    }

    /// Text used by `str`: strings are not quoted and `nil` is empty.
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Nil => String::new(),
            Value::String(s) => s.to_string(),
            other => other.to_string(),
        }
    }

    /// Elements of an array or the `[key value]` entries of an object,
    /// for iteration by `for`, `doseq` and the sequence builtins.
    pub fn sequence_items(&self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items.iter().cloned().collect()),
            Value::Object(map) => Some(
                map.iter()
                    .map(|(k, v)| Value::array([Value::String(k.clone()), v.clone()]))
                    .collect(),
            ),
            Value::String(s) => Some(s.chars().map(|c| Value::string(c.to_string())).collect()),
            Value::Nil => Some(Vec::new()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Regexp(a), Value::Regexp(b)) => a.source == b.source && a.flags == b.flags,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Error(a), Value::Error(b)) => Rc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Vector::from(items))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "\"{}\"", escape_string(s)),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "\"{}\" {}", escape_string(k), v)?;
                }
                write!(f, "}}")
            }
            Value::Regexp(re) => write!(f, "#'{}'{}", re.source, re.flags),
            Value::Function(function) => write!(f, "{}", function),
            Value::Error(err) => write!(f, "<error: {}>", err.message()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

// ============================================================================
// Regular expressions
// ============================================================================

/// A compiled regular expression with its Lits source and flags.
#[derive(Debug)]
pub struct LitsRegexp {
    pub source: String,
    pub flags: String,
    pub regex: Regex,
}

impl LitsRegexp {
    /// Compile `source` with flags drawn from `g` (global) and `i` (ignore case).
    pub fn new(source: &str, flags: &str) -> Result<Self> {
        if let Some(bad) = flags.chars().find(|c| !matches!(c, 'g' | 'i')) {
            return Err(Error::syntax(format!("Invalid regexp flag '{}'", bad), None));
        }
        let regex = RegexBuilder::new(source)
            .case_insensitive(flags.contains('i'))
            .build()
            .map_err(|e| Error::syntax(format!("Invalid regexp '{}': {}", source, e), None))?;
        Ok(LitsRegexp {
            source: source.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    pub fn is_global(&self) -> bool {
        self.flags.contains('g')
    }
}
