// lits-core - Function values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The closed set of function kinds a [`Value::Function`] can hold.
//!
//! Invocation rules live in [`crate::eval::apply`].

use std::fmt;
use std::rc::Rc;

use lits_parser::{Arity, FunctionOverload};

use crate::context::Context;
use crate::error::Result;
use crate::value::Value;

/// Signature of a host-native function.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value>;

/// A callable Lits value.
pub enum LitsFunction {
    /// Defined by `fn`, `defn` or `defns`.
    UserDefined(UserFunction),
    /// An entry in the builtin registry.
    Builtin { name: String },
    /// A Rust closure registered by the host.
    Native { name: String, callable: Rc<NativeFn> },
    /// `(partial f a b)`
    Partial { function: Value, args: Vec<Value> },
    /// `(comp f g)`, applied right to left.
    Comp(Vec<Value>),
    Constantly(Value),
    Juxt(Vec<Value>),
    Complement(Value),
    EveryPred(Vec<Value>),
    SomePred(Vec<Value>),
    /// `(fnil f default...)`: nil arguments replaced by defaults.
    Fnil { function: Value, defaults: Vec<Value> },
}

/// A function with one or more arity overloads and the frame it closed over.
pub struct UserFunction {
    pub name: Option<String>,
    pub overloads: Rc<[FunctionOverload]>,
    pub context: Rc<Context>,
}

impl UserFunction {
    /// Pick the overload for `count` arguments. An exact arity wins; otherwise
    /// the variadic overload with the lowest minimum that accepts `count`.
    pub fn select_overload(&self, count: usize) -> Option<&FunctionOverload> {
        self.overloads
            .iter()
            .find(|o| o.arity == Arity::Exact(count))
            .or_else(|| {
                self.overloads
                    .iter()
                    .filter(|o| matches!(o.arity, Arity::AtLeast(min) if min <= count))
                    .min_by_key(|o| match o.arity {
                        Arity::AtLeast(min) | Arity::Exact(min) => min,
                    })
            })
    }
}

impl LitsFunction {
    pub fn native(name: impl Into<String>, callable: impl Fn(&[Value]) -> Result<Value> + 'static) -> Self {
        LitsFunction::Native {
            name: name.into(),
            callable: Rc::new(callable),
        }
    }

    /// The function's name, where it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            LitsFunction::UserDefined(f) => f.name.as_deref(),
            LitsFunction::Builtin { name } | LitsFunction::Native { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            LitsFunction::UserDefined(_) => "user-defined",
            LitsFunction::Builtin { .. } => "builtin",
            LitsFunction::Native { .. } => "native",
            LitsFunction::Partial { .. } => "partial",
            LitsFunction::Comp(_) => "comp",
            LitsFunction::Constantly(_) => "constantly",
            LitsFunction::Juxt(_) => "juxt",
            LitsFunction::Complement(_) => "complement",
            LitsFunction::EveryPred(_) => "every-pred",
            LitsFunction::SomePred(_) => "some-pred",
            LitsFunction::Fnil { .. } => "fnil",
        }
    }
}

impl fmt::Display for LitsFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "<function {}>", name),
            None => write!(f, "<function {}>", self.kind_name()),
        }
    }
}

impl fmt::Debug for LitsFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
