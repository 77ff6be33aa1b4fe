// lits-parser - Parser for Lits
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Recursive descent parser for Lits.
//!
//! Converts a token stream into a [`Program`]. Special forms are parsed by
//! the routines registered in [`crate::special_forms`]; calls to builtins are
//! arity-checked at parse time through a [`BuiltinValidator`].

use std::collections::HashSet;
use std::rc::Rc;

use crate::ast::{AstNode, Binding, Callee, FunctionArguments, NormalExpression, Program};
use crate::ast::{FunctionOverload, SpecialExpression, SpecialForm};
use crate::error::{Result, SyntaxError};
use crate::special_forms;
use crate::token::{Position, Token, TokenKind};

/// Highest `%N` placeholder allowed in a `#(...)` shorthand.
pub const MAX_SHORTHAND_ARGS: usize = 20;

/// Deepest bracket nesting the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 1_000;

const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 2 * 1024 * 1024;

/// Parse-time access to the builtin registry.
///
/// The parser only needs to know which names are builtins and how to check
/// a call's arguments, so the registry itself can live in another crate.
pub trait BuiltinValidator {
    fn is_builtin(&self, name: &str) -> bool;

    /// Check a call to builtin `name` with the given argument nodes.
    fn validate(&self, name: &str, params: &[AstNode], position: Option<&Position>) -> Result<()>;
}

/// A validator with no builtins at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBuiltins;

impl BuiltinValidator for NoBuiltins {
    fn is_builtin(&self, _name: &str) -> bool {
        false
    }

    fn validate(&self, _name: &str, _params: &[AstNode], _position: Option<&Position>) -> Result<()> {
        Ok(())
    }
}

/// Parse a token stream into a program.
pub fn parse(tokens: &[Token], builtins: &dyn BuiltinValidator) -> Result<Program> {
    let mut parser = Parser::new(tokens, builtins);
    let mut body = Vec::new();
    while !parser.at_end() {
        body.push(parser.parse_token()?);
    }
    log::trace!("parsed {} tokens into {} top-level forms", tokens.len(), body.len());
    Ok(Program { body })
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    builtins: &'a dyn BuiltinValidator,
    in_fn_shorthand: bool,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], builtins: &'a dyn BuiltinValidator) -> Self {
        Parser {
            tokens,
            position: 0,
            builtins,
            in_fn_shorthand: false,
            depth: 0,
        }
    }

    pub(crate) fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Result<&'a Token> {
        let token = self.tokens.get(self.position).ok_or_else(|| {
            SyntaxError::new("Unexpected end of input", Some(Position::EndOfFile))
        })?;
        self.position += 1;
        Ok(token)
    }

    /// Position of the next token, or end-of-file.
    pub(crate) fn current_position(&self) -> Option<Position> {
        match self.peek() {
            Some(token) => token.position.clone(),
            None => Some(Position::EndOfFile),
        }
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.current_position())
    }

    /// Consume the given closing bracket.
    pub(crate) fn expect_close(&mut self, close: char) -> Result<()> {
        match self.peek() {
            Some(token) if token.is_bracket(close) => {
                self.position += 1;
                Ok(())
            }
            Some(token) => Err(SyntaxError::new(
                format!("Expected '{}', got '{}'", close, token),
                token.position.clone(),
            )),
            None => Err(self.error(format!("Missing closing '{}'", close))),
        }
    }

    pub(crate) fn expect_open(&mut self, open: char) -> Result<Option<Position>> {
        match self.peek() {
            Some(token) if token.is_bracket(open) => {
                self.position += 1;
                Ok(token.position.clone())
            }
            Some(token) => Err(SyntaxError::new(
                format!("Expected '{}', got '{}'", open, token),
                token.position.clone(),
            )),
            None => Err(self.error(format!("Expected '{}'", open))),
        }
    }

    /// Consume a bare name token.
    pub(crate) fn expect_name(&mut self) -> Result<(String, Option<Position>)> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Name => {
                self.position += 1;
                Ok((token.text.clone(), token.position.clone()))
            }
            Some(token) => Err(SyntaxError::new(
                format!("Expected a name, got '{}'", token),
                token.position.clone(),
            )),
            None => Err(self.error("Expected a name")),
        }
    }

    /// Consume a modifier token (`&`, `&let`, `&when`, `&while`).
    pub(crate) fn expect_modifier(&mut self) -> Result<String> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Modifier => {
                self.position += 1;
                Ok(token.text.clone())
            }
            Some(token) => Err(SyntaxError::new(
                format!("Expected a modifier, got '{}'", token),
                token.position.clone(),
            )),
            None => Err(self.error("Expected a modifier")),
        }
    }

    // ========================================================================
    // Forms
    // ========================================================================

    /// Parse exactly one form starting at the current token.
    pub fn parse_token(&mut self) -> Result<AstNode> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(format!(
                "Maximum nesting depth exceeded ({})",
                MAX_NESTING_DEPTH
            )));
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.parse_form());
        self.depth -= 1;
        result
    }

    fn parse_form(&mut self) -> Result<AstNode> {
        let token = self.advance()?;
        let position = token.position.clone();

        match token.kind {
            TokenKind::Number => {
                let value = parse_number(&token.text).ok_or_else(|| {
                    SyntaxError::new(format!("Invalid number '{}'", token.text), position.clone())
                })?;
                Ok(AstNode::Number { value, position })
            }
            TokenKind::String => Ok(AstNode::String {
                value: token.text.clone(),
                position,
            }),
            TokenKind::Name => Ok(AstNode::Name {
                name: token.text.clone(),
                position,
            }),
            TokenKind::ReservedName => Ok(AstNode::ReservedName {
                name: token.text.clone(),
                position,
            }),
            TokenKind::Bracket('(') => self.parse_expression(position),
            TokenKind::Bracket('[') => {
                let params = self.parse_tokens_until_close(']')?;
                Ok(builtin_call("array", params, position))
            }
            TokenKind::Bracket('{') => {
                let params = self.parse_tokens_until_close('}')?;
                if params.len() % 2 != 0 {
                    return Err(SyntaxError::new(
                        "Object literal must contain an even number of forms",
                        position,
                    ));
                }
                Ok(builtin_call("object", params, position))
            }
            TokenKind::Bracket(c) => Err(SyntaxError::new(
                format!("Unexpected '{}'", c),
                position,
            )),
            TokenKind::RegexpShorthand => {
                let mut params = vec![AstNode::String {
                    value: token.text.clone(),
                    position: position.clone(),
                }];
                if let Some(flags) = token.options.as_ref().filter(|f| !f.is_empty()) {
                    params.push(AstNode::String {
                        value: flags.clone(),
                        position: position.clone(),
                    });
                }
                Ok(builtin_call("regexp", params, position))
            }
            TokenKind::FnShorthand => self.parse_fn_shorthand(position),
            TokenKind::Modifier => Err(SyntaxError::new(
                format!("Unexpected modifier '{}'", token.text),
                position,
            )),
            TokenKind::CollectionAccessor => Err(SyntaxError::new(
                format!("Unexpected collection accessor '{}'", token.text),
                position,
            )),
        }
    }

    /// Parse forms until the given closing bracket, consuming it.
    pub fn parse_tokens_until_close(&mut self, close: char) -> Result<Vec<AstNode>> {
        let mut nodes = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.error(format!("Missing closing '{}'", close))),
                Some(token) if token.is_bracket(close) => {
                    self.position += 1;
                    return Ok(nodes);
                }
                Some(_) => nodes.push(self.parse_token()?),
            }
        }
    }

    /// Parse the rest of a `(...)` form. The opening bracket is consumed.
    fn parse_expression(&mut self, position: Option<Position>) -> Result<AstNode> {
        let head = self
            .peek()
            .ok_or_else(|| self.error("Missing closing ')'"))?;

        if head.is_bracket(')') {
            return Err(SyntaxError::new("Empty expression '()'", position));
        }

        if head.kind == TokenKind::Name
            && let Some(entry) = special_forms::lookup(&head.text)
        {
            self.position += 1;
            let form = (entry.parse)(self)?;
            if let Some(validate) = entry.validate {
                validate(&form, position.as_ref())?;
            }
            return Ok(AstNode::SpecialExpression(Box::new(SpecialExpression {
                form,
                position,
            })));
        }

        let callee = if head.kind == TokenKind::Name {
            self.position += 1;
            Callee::Name(head.text.clone())
        } else {
            Callee::Expression(Box::new(self.parse_token()?))
        };
        let params = self.parse_tokens_until_close(')')?;

        if let Callee::Name(name) = &callee
            && self.builtins.is_builtin(name)
        {
            self.builtins.validate(name, &params, position.as_ref())?;
        }

        Ok(AstNode::NormalExpression(NormalExpression {
            callee,
            params,
            position,
        }))
    }

    /// `#(+ %1 %2)` becomes `(fn [%1 %2] (+ %1 %2))`. A bare `%` names `%1`.
    fn parse_fn_shorthand(&mut self, position: Option<Position>) -> Result<AstNode> {
        if self.in_fn_shorthand {
            return Err(SyntaxError::new(
                "Nested shorthand functions are not allowed",
                position,
            ));
        }

        let start = self.position;
        self.in_fn_shorthand = true;
        let body = self.parse_expression(position.clone());
        self.in_fn_shorthand = false;
        let body = body?;

        let mut max_arg = 0;
        let mut uses_bare_percent = false;
        for token in &self.tokens[start..self.position] {
            if token.kind != TokenKind::Name {
                continue;
            }
            if token.text == "%" {
                uses_bare_percent = true;
                max_arg = max_arg.max(1);
            } else if let Some(digits) = token.text.strip_prefix('%')
                && !digits.is_empty()
                && digits.bytes().all(|b| b.is_ascii_digit())
            {
                let n: usize = digits.parse().unwrap_or(usize::MAX);
                if n == 0 || n > MAX_SHORTHAND_ARGS {
                    return Err(SyntaxError::new(
                        format!(
                            "Shorthand argument '{}' out of range, must be %1 to %{}",
                            token.text, MAX_SHORTHAND_ARGS
                        ),
                        token.position.clone(),
                    ));
                }
                max_arg = max_arg.max(n);
            }
        }

        let mandatory: Vec<String> = (1..=max_arg).map(|i| format!("%{}", i)).collect();
        let let_bindings = if uses_bare_percent {
            vec![Binding {
                name: "%".to_string(),
                value: AstNode::Name {
                    name: "%1".to_string(),
                    position: position.clone(),
                },
                position: position.clone(),
            }]
        } else {
            Vec::new()
        };
        let arguments = FunctionArguments {
            mandatory,
            rest: None,
            let_bindings,
        };

        Ok(AstNode::SpecialExpression(Box::new(SpecialExpression {
            form: SpecialForm::Fn {
                name: None,
                overloads: Rc::from(vec![FunctionOverload {
                    arity: arguments.arity(),
                    arguments,
                    body: vec![body],
                }]),
            },
            position,
        })))
    }

    // ========================================================================
    // Shared helpers for special-form parsers
    // ========================================================================

    /// Parse a bindings vector `[name expr name expr ...]`.
    pub fn parse_bindings(&mut self) -> Result<Vec<Binding>> {
        self.expect_open('[')?;
        let mut bindings: Vec<Binding> = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.error("Missing closing ']'")),
                Some(token) if token.is_bracket(']') => {
                    self.position += 1;
                    return Ok(bindings);
                }
                Some(_) => {
                    let binding = self.parse_binding()?;
                    if bindings.iter().any(|b| b.name == binding.name) {
                        return Err(SyntaxError::new(
                            format!("Duplicate binding '{}'", binding.name),
                            binding.position,
                        ));
                    }
                    bindings.push(binding);
                }
            }
        }
    }

    /// Parse a single `name expr` pair.
    pub(crate) fn parse_binding(&mut self) -> Result<Binding> {
        let (name, position) = self.expect_name()?;
        if self.peek().is_none_or(|t| t.is_bracket(']')) {
            return Err(SyntaxError::new(
                format!("Binding '{}' is missing a value", name),
                position,
            ));
        }
        let value = self.parse_token()?;
        Ok(Binding {
            name,
            value,
            position,
        })
    }

    /// Parse a function argument vector: `[a b & rest &let [c 1]]`.
    pub fn parse_arguments(&mut self) -> Result<FunctionArguments> {
        self.expect_open('[')?;
        let mut arguments = FunctionArguments::default();
        let mut seen = HashSet::new();

        loop {
            let token = self
                .peek()
                .ok_or_else(|| self.error("Missing closing ']'"))?;
            match (token.kind, token.text.as_str()) {
                (TokenKind::Bracket(']'), _) => {
                    self.position += 1;
                    break;
                }
                (TokenKind::Name, _) => {
                    if arguments.rest.is_some() {
                        return Err(SyntaxError::new(
                            "Only one argument may follow '&'",
                            token.position.clone(),
                        ));
                    }
                    let (name, _) = self.parse_argument(&mut seen)?;
                    arguments.mandatory.push(name);
                }
                (TokenKind::Modifier, "&") => {
                    self.position += 1;
                    if arguments.rest.is_some() {
                        return Err(SyntaxError::new(
                            "Duplicate rest argument modifier '&'",
                            token.position.clone(),
                        ));
                    }
                    let (name, _) = self.parse_argument(&mut seen)?;
                    arguments.rest = Some(name);
                }
                (TokenKind::Modifier, "&let") => {
                    self.position += 1;
                    let bindings = self.parse_bindings()?;
                    for binding in &bindings {
                        if !seen.insert(binding.name.clone()) {
                            return Err(SyntaxError::new(
                                format!("Duplicate argument '{}'", binding.name),
                                binding.position.clone(),
                            ));
                        }
                    }
                    arguments.let_bindings.extend(bindings);
                    if !self.peek().is_some_and(|t| t.is_bracket(']')) {
                        return Err(self.error("'&let' bindings must end the argument list"));
                    }
                }
                _ => {
                    return Err(SyntaxError::new(
                        format!("Unexpected '{}' in argument list", token),
                        token.position.clone(),
                    ));
                }
            }
        }

        Ok(arguments)
    }

    /// Parse one argument name, rejecting duplicates.
    pub fn parse_argument(&mut self, seen: &mut HashSet<String>) -> Result<(String, Option<Position>)> {
        let (name, position) = self.expect_name()?;
        if !seen.insert(name.clone()) {
            return Err(SyntaxError::new(
                format!("Duplicate argument '{}'", name),
                position,
            ));
        }
        Ok((name, position))
    }
}

fn builtin_call(name: &str, params: Vec<AstNode>, position: Option<Position>) -> AstNode {
    AstNode::NormalExpression(NormalExpression {
        callee: Callee::Name(name.to_string()),
        params,
        position,
    })
}

/// Convert number literal text to its value. Radix literals are integers.
fn parse_number(text: &str) -> Option<f64> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, text),
    };

    let radix = match body.get(..2) {
        Some("0b" | "0B") => Some(2),
        Some("0o" | "0O") => Some(8),
        Some("0x" | "0X") => Some(16),
        _ => None,
    };

    let magnitude = match radix {
        Some(radix) => body[2..].chars().try_fold(0f64, |acc, c| {
            c.to_digit(radix)
                .map(|d| acc * f64::from(radix) + f64::from(d))
        })?,
        None => body.parse::<f64>().ok()?,
    };

    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Arity, SpecialForm};
    use crate::tokenizer::tokenize;

    struct TestBuiltins;

    impl BuiltinValidator for TestBuiltins {
        fn is_builtin(&self, name: &str) -> bool {
            matches!(name, "+" | "inc" | "array" | "object")
        }

        fn validate(&self, name: &str, params: &[AstNode], position: Option<&Position>) -> Result<()> {
            if name == "inc" && params.len() != 1 {
                return Err(SyntaxError::new(
                    format!("Wrong number of arguments to inc: {}", params.len()),
                    position.cloned(),
                ));
            }
            Ok(())
        }
    }

    fn parse_str(source: &str) -> Result<Program> {
        let tokens = tokenize(source, false)?;
        parse(&tokens, &TestBuiltins)
    }

    fn parse_one(source: &str) -> AstNode {
        let program = parse_str(source).unwrap();
        assert_eq!(program.body.len(), 1);
        program.body.into_iter().next().unwrap()
    }

    fn special(source: &str) -> SpecialForm {
        match parse_one(source) {
            AstNode::SpecialExpression(expr) => expr.form,
            other => panic!("Expected special expression, got {:?}", other),
        }
    }

    #[test]
    fn test_numbers() {
        for (source, expected) in [
            ("42", 42.0),
            ("-7", -7.0),
            ("3.5", 3.5),
            ("0b101", 5.0),
            ("0o17", 15.0),
            ("0xff", 255.0),
            ("-0x10", -16.0),
        ] {
            match parse_one(source) {
                AstNode::Number { value, .. } => assert_eq!(value, expected, "{}", source),
                other => panic!("Expected number, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_leaves() {
        assert!(matches!(parse_one("\"hi\""), AstNode::String { value, .. } if value == "hi"));
        assert!(matches!(parse_one("foo"), AstNode::Name { name, .. } if name == "foo"));
        assert!(matches!(parse_one("nil"), AstNode::ReservedName { name, .. } if name == "nil"));
    }

    #[test]
    fn test_multiple_top_level_forms() {
        let program = parse_str("1 (+ 1 2) x").unwrap();
        assert_eq!(program.body.len(), 3);
    }

    #[test]
    fn test_normal_expression() {
        match parse_one("(+ 1 2)") {
            AstNode::NormalExpression(expr) => {
                assert_eq!(expr.callee, Callee::Name("+".to_string()));
                assert_eq!(expr.params.len(), 2);
            }
            other => panic!("Expected normal expression, got {:?}", other),
        }
    }

    #[test]
    fn test_computed_callee() {
        match parse_one("((fn [x] x) 1)") {
            AstNode::NormalExpression(expr) => {
                assert!(matches!(expr.callee, Callee::Expression(_)));
                assert_eq!(expr.params.len(), 1);
            }
            other => panic!("Expected normal expression, got {:?}", other),
        }
    }

    #[test]
    fn test_builtin_arity_checked_at_parse_time() {
        let err = parse_str("(inc 1 2)").unwrap_err();
        assert!(err.message.contains("Wrong number of arguments to inc"));
    }

    #[test]
    fn test_array_and_object_literals() {
        match parse_one("[1 2 3]") {
            AstNode::NormalExpression(expr) => {
                assert_eq!(expr.callee, Callee::Name("array".to_string()));
                assert_eq!(expr.params.len(), 3);
            }
            other => panic!("Expected array call, got {:?}", other),
        }
        match parse_one("{:a 1 \"b\" 2}") {
            AstNode::NormalExpression(expr) => {
                assert_eq!(expr.callee, Callee::Name("object".to_string()));
                assert_eq!(expr.params.len(), 4);
            }
            other => panic!("Expected object call, got {:?}", other),
        }
    }

    #[test]
    fn test_odd_object_literal() {
        let err = parse_str("{:a 1 :b}").unwrap_err();
        assert!(err.message.contains("even number"));
    }

    #[test]
    fn test_regexp_literal() {
        match parse_one("#'a+'i") {
            AstNode::NormalExpression(expr) => {
                assert_eq!(expr.callee, Callee::Name("regexp".to_string()));
                assert_eq!(expr.params.len(), 2);
            }
            other => panic!("Expected regexp call, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_expression() {
        let err = parse_str("(+ 1 2").unwrap_err();
        assert!(err.message.contains("Missing closing ')'"));
        assert_eq!(err.position, Some(Position::EndOfFile));
    }

    #[test]
    fn test_unexpected_close() {
        let err = parse_str(")").unwrap_err();
        assert!(err.message.contains("Unexpected ')'"));
    }

    #[test]
    fn test_fn_shorthand() {
        match special("#(+ %1 %3)") {
            SpecialForm::Fn { name, overloads } => {
                assert!(name.is_none());
                assert_eq!(overloads.len(), 1);
                assert_eq!(overloads[0].arity, Arity::Exact(3));
                assert_eq!(overloads[0].arguments.mandatory, vec!["%1", "%2", "%3"]);
            }
            other => panic!("Expected fn, got {:?}", other),
        }
    }

    #[test]
    fn test_fn_shorthand_bare_percent() {
        match special("#(inc %)") {
            SpecialForm::Fn { overloads, .. } => {
                assert_eq!(overloads[0].arity, Arity::Exact(1));
                assert_eq!(overloads[0].arguments.let_bindings.len(), 1);
                assert_eq!(overloads[0].arguments.let_bindings[0].name, "%");
            }
            other => panic!("Expected fn, got {:?}", other),
        }
    }

    #[test]
    fn test_fn_shorthand_nested_is_error() {
        let err = parse_str("#(#(+ %1 1) %1)").unwrap_err();
        assert!(err.message.contains("Nested"));
    }

    #[test]
    fn test_fn_shorthand_out_of_range() {
        assert!(parse_str("#(+ %21 1)").is_err());
        assert!(parse_str("#(+ %0 1)").is_err());
        assert!(parse_str("#(+ %20 1)").is_ok());
    }

    #[test]
    fn test_positions_on_nodes() {
        let tokens = tokenize("\n  (foo 1)", true).unwrap();
        let program = parse(&tokens, &NoBuiltins).unwrap();
        let position = program.body[0].position().unwrap();
        assert_eq!(position.line(), Some(2));
        assert_eq!(position.column(), Some(3));
    }

    #[test]
    fn test_nesting_at_limit() {
        let source = format!("{}{}", "[".repeat(MAX_NESTING_DEPTH), "]".repeat(MAX_NESTING_DEPTH));
        assert!(parse_str(&source).is_ok());
    }

    #[test]
    fn test_nesting_beyond_limit_is_error() {
        let source = format!("{}{}", "[".repeat(200_000), "]".repeat(200_000));
        let err = parse_str(&source).unwrap_err();
        assert!(err.message.contains("Maximum nesting depth exceeded"));
    }

    #[test]
    fn test_depth_resets_between_forms() {
        let nested = format!("{}{}", "(+ 1 ".repeat(600), ")".repeat(600));
        let source = format!("{} {}", nested, nested);
        assert_eq!(parse_str(&source).unwrap().body.len(), 2);
    }
}
