// lits-embed - The Lits session
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The [`Lits`] session: the host-facing entry point to the interpreter.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use lits_core::{
    Context, ContextStack, DEFAULT_MAX_EVAL_DEPTH, Error, LitsFunction, Registry, Result, Value,
    evaluate_program, set_max_eval_depth,
};
use lits_parser::{Program, Token};

use crate::cache::AstCache;

const APPLY_FN: &str = "__lits_apply_fn";
const APPLY_ARG: &str = "__lits_apply_arg_";

/// Session configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LitsConfig {
    /// Record source positions on tokens, nodes and errors.
    pub debug: bool,
    /// Capacity of the AST cache, or `None` to parse every program afresh.
    pub ast_cache_size: Option<usize>,
    /// Maximum nesting of non-tail evaluation before a stack overflow error.
    pub max_eval_depth: usize,
}

impl Default for LitsConfig {
    fn default() -> Self {
        LitsConfig {
            debug: false,
            ast_cache_size: None,
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
        }
    }
}

/// Per-call evaluation parameters.
///
/// `globals` are written into the global frame before evaluation. Without a
/// `global_context` each call gets a fresh global frame, so definitions do
/// not survive between calls; pass the same context to share them.
/// `contexts` are consulted after the global frame.
#[derive(Debug, Clone, Default)]
pub struct LitsParams {
    pub globals: HashMap<String, Value>,
    pub global_context: Option<Rc<Context>>,
    pub contexts: Vec<Rc<Context>>,
}

impl LitsParams {
    pub fn new() -> Self {
        LitsParams::default()
    }

    #[must_use]
    pub fn with_global(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.globals.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_global_context(mut self, context: Rc<Context>) -> Self {
        self.global_context = Some(context);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: Rc<Context>) -> Self {
        self.contexts.push(context);
        self
    }
}

/// Restores the previous evaluation depth limit on drop.
struct DepthLimit {
    previous: usize,
}

impl DepthLimit {
    fn install(limit: usize) -> Self {
        DepthLimit {
            previous: set_max_eval_depth(limit),
        }
    }
}

impl Drop for DepthLimit {
    fn drop(&mut self) {
        set_max_eval_depth(self.previous);
    }
}

/// An interpreter session.
///
/// # Example
///
/// ```rust
/// use lits_embed::{Lits, LitsParams, Value};
///
/// let lits = Lits::new();
/// let result = lits.run("(+ 1 2 3)", &LitsParams::new()).unwrap();
/// assert_eq!(result, Value::Number(6.0));
/// ```
///
/// # Thread Safety
///
/// `Lits` is not `Send` or `Sync`: values are reference counted with `Rc`
/// and the evaluation depth counter is thread-local. Create one session
/// per thread.
pub struct Lits {
    config: LitsConfig,
    cache: Option<RefCell<AstCache>>,
    natives: RefCell<HashMap<String, Value>>,
}

impl Lits {
    /// Create a session with the default configuration.
    pub fn new() -> Self {
        Lits {
            config: LitsConfig::default(),
            cache: None,
            natives: RefCell::new(HashMap::new()),
        }
    }

    /// Create a session from `config`.
    ///
    /// Fails if `ast_cache_size` is `Some(0)`.
    pub fn with_config(config: LitsConfig) -> Result<Self> {
        let cache = match config.ast_cache_size {
            Some(size) => Some(RefCell::new(AstCache::new(size)?)),
            None => None,
        };
        log::debug!(
            "creating Lits session (debug: {}, cache: {:?}, max depth: {})",
            config.debug,
            config.ast_cache_size,
            config.max_eval_depth
        );
        Ok(Lits {
            config,
            cache,
            natives: RefCell::new(HashMap::new()),
        })
    }

    #[must_use]
    pub fn config(&self) -> &LitsConfig {
        &self.config
    }

    /// Set the maximum non-tail evaluation depth for this session.
    pub fn set_max_depth(&mut self, depth: usize) {
        self.config.max_eval_depth = depth;
    }

    /// Split `source` into tokens.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>> {
        Ok(lits_parser::tokenize(source, self.config.debug)?)
    }

    /// Parse a token stream, validating builtin arities.
    pub fn parse(&self, tokens: &[Token]) -> Result<Program> {
        Ok(lits_parser::parse(tokens, &Registry)?)
    }

    /// Evaluate a parsed program and return the value of its last form.
    pub fn evaluate(&self, program: &Program, params: &LitsParams) -> Result<Value> {
        let stack = self.build_stack(params);
        self.evaluate_in(program, &stack)
    }

    /// Tokenize, parse and evaluate `source`.
    ///
    /// When the session has an AST cache, parsing is skipped for source
    /// text seen before.
    pub fn run(&self, source: &str, params: &LitsParams) -> Result<Value> {
        let program = self.program(source)?;
        self.evaluate(&program, params)
    }

    /// Evaluate `source` and return the global frame it ran against.
    pub fn context(&self, source: &str, params: &LitsParams) -> Result<Rc<Context>> {
        let program = self.program(source)?;
        let stack = self.build_stack(params);
        self.evaluate_in(&program, &stack)?;
        Ok(stack.global().clone())
    }

    /// Call `function` with `args` through the same path as a call written
    /// in Lits.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lits_embed::{Lits, LitsParams, Value};
    ///
    /// let lits = Lits::new();
    /// let inc = lits.run("(fn [x] (+ x 1))", &LitsParams::new()).unwrap();
    /// let result = lits.apply(&inc, vec![Value::Number(41.0)], &LitsParams::new()).unwrap();
    /// assert_eq!(result, Value::Number(42.0));
    /// ```
    pub fn apply(&self, function: &Value, args: Vec<Value>, params: &LitsParams) -> Result<Value> {
        let arg_names: Vec<String> = (0..args.len()).map(|i| format!("{}{}", APPLY_ARG, i)).collect();
        let source = if arg_names.is_empty() {
            format!("({})", APPLY_FN)
        } else {
            format!("({} {})", APPLY_FN, arg_names.join(" "))
        };

        let frame = Context::new();
        frame.insert(APPLY_FN, function.clone());
        for (name, arg) in arg_names.into_iter().zip(args) {
            frame.insert(name, arg);
        }

        let program = self.program(&source)?;
        let stack = self.build_stack(params).with_context(frame);
        self.evaluate_in(&program, &stack)
    }

    /// Read and run a source file.
    pub fn eval_file(&self, path: impl AsRef<Path>, params: &LitsParams) -> Result<Value> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|e| Error::Internal(format!("Error reading '{}': {}", path.display(), e)))?;
        self.run(&source, params)
    }

    /// Make a Rust closure callable from Lits under `name` in every
    /// evaluation of this session.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lits_embed::{Lits, LitsParams, Value};
    ///
    /// let lits = Lits::new();
    /// lits.register_native("twice", |args| match args.first() {
    ///     Some(Value::Number(n)) => Ok(Value::Number(n * 2.0)),
    ///     _ => Err(lits_embed::Error::type_error("number", "other")),
    /// });
    /// let result = lits.run("(twice 21)", &LitsParams::new()).unwrap();
    /// assert_eq!(result, Value::Number(42.0));
    /// ```
    pub fn register_native(
        &self,
        name: &str,
        func: impl Fn(&[Value]) -> Result<Value> + 'static,
    ) {
        let function = LitsFunction::native(name, func);
        self.natives
            .borrow_mut()
            .insert(name.to_string(), Value::function(function));
    }

    /// Drop every cached program.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.borrow_mut().clear();
        }
    }

    fn program(&self, source: &str) -> Result<Rc<Program>> {
        let Some(cache) = &self.cache else {
            return Ok(Rc::new(self.parse(&self.tokenize(source)?)?));
        };

        if let Some(program) = cache.borrow().get(source) {
            return Ok(program);
        }

        let program = Rc::new(self.parse(&self.tokenize(source)?)?);
        cache.borrow_mut().set(source, program.clone())?;
        Ok(program)
    }

    fn build_stack(&self, params: &LitsParams) -> ContextStack {
        let global = params.global_context.clone().unwrap_or_else(Context::new);
        for (name, value) in self.natives.borrow().iter() {
            global.insert(name.clone(), value.clone());
        }
        for (name, value) in &params.globals {
            global.insert(name.clone(), value.clone());
        }

        let mut frames = Vec::with_capacity(params.contexts.len() + 1);
        frames.push(global);
        frames.extend(params.contexts.iter().cloned());
        ContextStack::new(frames)
    }

    fn evaluate_in(&self, program: &Program, stack: &ContextStack) -> Result<Value> {
        let _limit = DepthLimit::install(self.config.max_eval_depth);
        evaluate_program(program, stack)
    }
}

impl Default for Lits {
    fn default() -> Self {
        Lits::new()
    }
}
