// lits-core - Contexts and context stacks for lexical scoping
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Name bindings and the scope chain.
//!
//! A [`Context`] is one frame of name to value bindings. A [`ContextStack`]
//! is an immutable linked list of local frames, innermost first, ending at
//! the global frame and then any host-supplied imported frames. Pushing a
//! frame produces a new stack that shares its tail with the receiver.
//!
//! # Examples
//!
//! ```
//! use lits_core::{Context, ContextStack, Value};
//!
//! let stack = ContextStack::new(vec![]);
//! stack.global().insert("x", Value::Number(1.0));
//!
//! let inner = stack.with_context(Context::new());
//! inner.innermost().insert("x", Value::Number(2.0));
//!
//! assert_eq!(inner.lookup("x"), Some(Value::Number(2.0)));
//! assert_eq!(stack.lookup("x"), Some(Value::Number(1.0)));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use lits_parser::{Position, is_reserved_name, is_special_form};

use crate::builtins;
use crate::error::{Error, Result};
use crate::value::Value;

/// A single frame of bindings.
#[derive(Debug, Default)]
pub struct Context {
    bindings: RefCell<HashMap<String, Value>>,
}

impl Context {
    pub fn new() -> Rc<Self> {
        Rc::new(Context::default())
    }

    pub fn from_bindings(bindings: HashMap<String, Value>) -> Rc<Self> {
        Rc::new(Context {
            bindings: RefCell::new(bindings),
        })
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// Insert or overwrite a binding without any checks.
    pub fn insert(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Introduce a new binding, failing if `name` is already bound in this frame.
    pub fn introduce(&self, name: &str, value: Value, position: Option<&Position>) -> Result<()> {
        let mut bindings = self.bindings.borrow_mut();
        if bindings.contains_key(name) {
            return Err(Error::syntax(
                format!("Duplicate binding '{}' in the same scope", name),
                position.cloned(),
            ));
        }
        bindings.insert(name.to_string(), value);
        Ok(())
    }

    /// Names bound in this frame, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// A copy of this frame's bindings.
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.bindings.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.borrow().is_empty()
    }
}

#[derive(Debug)]
struct Link {
    context: Rc<Context>,
    next: Option<Rc<Link>>,
}

/// The scope chain used for name resolution.
#[derive(Debug, Clone)]
pub struct ContextStack {
    locals: Option<Rc<Link>>,
    global: Rc<Context>,
    imported: Rc<[Rc<Context>]>,
}

impl ContextStack {
    /// Build a stack from frames. The first frame is the global one and the
    /// rest are imported; with no frames a fresh empty global is created.
    pub fn new(frames: Vec<Rc<Context>>) -> Self {
        let mut frames = frames.into_iter();
        let global = frames.next().unwrap_or_else(Context::new);
        ContextStack {
            locals: None,
            global,
            imported: frames.collect(),
        }
    }

    /// A new stack with `context` pushed as the innermost frame.
    #[must_use]
    pub fn with_context(&self, context: Rc<Context>) -> Self {
        ContextStack {
            locals: Some(Rc::new(Link {
                context,
                next: self.locals.clone(),
            })),
            global: self.global.clone(),
            imported: self.imported.clone(),
        }
    }

    /// This stack without its local frames.
    #[must_use]
    pub fn root(&self) -> Self {
        ContextStack {
            locals: None,
            global: self.global.clone(),
            imported: self.imported.clone(),
        }
    }

    pub fn global(&self) -> &Rc<Context> {
        &self.global
    }

    /// The innermost frame: the newest local frame, or the global frame.
    pub fn innermost(&self) -> &Rc<Context> {
        match &self.locals {
            Some(link) => &link.context,
            None => &self.global,
        }
    }

    /// Walk the frames innermost to outermost and return the first binding.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut link = self.locals.as_deref();
        while let Some(current) = link {
            if let Some(value) = current.context.get(name) {
                return Some(value);
            }
            link = current.next.as_deref();
        }
        self.global
            .get(name)
            .or_else(|| self.imported.iter().find_map(|frame| frame.get(name)))
    }

    /// Flatten the local frames into one new frame, inner bindings winning.
    /// The global and imported frames are not captured.
    pub fn capture_locals(&self) -> Rc<Context> {
        let mut frames = Vec::new();
        let mut link = self.locals.as_deref();
        while let Some(current) = link {
            frames.push(&current.context);
            link = current.next.as_deref();
        }

        let mut bindings = HashMap::new();
        for frame in frames.into_iter().rev() {
            bindings.extend(frame.snapshot());
        }
        Context::from_bindings(bindings)
    }

    /// Install `name` in the global frame.
    ///
    /// Fails if the name is a special form, a builtin, a reserved name or
    /// already defined globally.
    pub fn define_global(&self, name: &str, value: Value, position: Option<&Position>) -> Result<()> {
        let reason = if is_special_form(name) {
            Some("special form")
        } else if builtins::is_builtin(name) {
            Some("builtin function")
        } else if is_reserved_name(name) {
            Some("reserved name")
        } else if self.global.contains(name) {
            Some("global variable")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(Error::syntax(
                format!("Cannot redefine {} '{}'", reason, name),
                position.cloned(),
            ));
        }

        log::debug!("defining global '{}'", name);
        self.global.insert(name, value);
        Ok(())
    }
}

impl Default for ContextStack {
    fn default() -> Self {
        ContextStack::new(Vec::new())
    }
}
