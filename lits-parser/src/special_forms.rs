// lits-parser - Special form parse table
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Per-form parse routines.
//!
//! Each routine is entered right after the form's name token and must
//! consume the rest of the form including its closing `)`. An optional
//! `validate` hook runs on the finished node.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::ast::{AstNode, Binding, Comprehension, CondClause, Conditional, FunctionOverload};
use crate::ast::{LoopBinding, SpecialForm};
use crate::error::{Result, SyntaxError};
use crate::parser::Parser;
use crate::token::{Position, TokenKind};

pub(crate) type ParseFn = fn(&mut Parser<'_>) -> Result<SpecialForm>;
pub(crate) type ValidateFn = fn(&SpecialForm, Option<&Position>) -> Result<()>;

pub(crate) struct SpecialFormEntry {
    pub parse: ParseFn,
    pub validate: Option<ValidateFn>,
}

fn entry(parse: ParseFn) -> SpecialFormEntry {
    SpecialFormEntry {
        parse,
        validate: None,
    }
}

fn validated(parse: ParseFn, validate: ValidateFn) -> SpecialFormEntry {
    SpecialFormEntry {
        parse,
        validate: Some(validate),
    }
}

static SPECIAL_FORMS: LazyLock<HashMap<&'static str, SpecialFormEntry>> = LazyLock::new(|| {
    HashMap::from([
        ("and", entry(parse_and)),
        ("or", entry(parse_or)),
        ("comment", entry(parse_comment)),
        ("cond", entry(parse_cond)),
        ("declared?", entry(parse_declared)),
        ("def", entry(parse_def)),
        ("defs", entry(parse_defs)),
        ("defn", validated(parse_defn, validate_overloads)),
        ("defns", validated(parse_defns, validate_overloads)),
        ("fn", validated(parse_fn, validate_overloads)),
        ("do", entry(parse_do)),
        ("for", entry(parse_for)),
        ("doseq", entry(parse_doseq)),
        ("if", entry(parse_if)),
        ("if-not", entry(parse_if_not)),
        ("if-let", entry(parse_if_let)),
        ("when-let", entry(parse_when_let)),
        ("when-first", entry(parse_when_first)),
        ("when", entry(parse_when)),
        ("when-not", entry(parse_when_not)),
        ("let", entry(parse_let)),
        ("loop", entry(parse_loop)),
        ("recur", entry(parse_recur)),
        ("throw", entry(parse_throw)),
        ("try", entry(parse_try)),
    ])
});

pub(crate) fn lookup(name: &str) -> Option<&'static SpecialFormEntry> {
    SPECIAL_FORMS.get(name)
}

/// True if `name` is a special form.
pub fn is_special_form(name: &str) -> bool {
    SPECIAL_FORMS.contains_key(name)
}

/// All special form names, sorted.
pub fn special_form_names() -> Vec<&'static str> {
    let mut names: Vec<_> = SPECIAL_FORMS.keys().copied().collect();
    names.sort_unstable();
    names
}

// ============================================================================
// Helpers
// ============================================================================

fn count_error(form: &str, expected: &str, got: usize, position: Option<Position>) -> SyntaxError {
    SyntaxError::new(
        format!(
            "Wrong number of arguments to {}: expected {}, got {}",
            form, expected, got
        ),
        position,
    )
}

/// Parse the remaining forms, requiring between `min` and `max` of them.
fn parse_params(
    parser: &mut Parser<'_>,
    form: &str,
    min: usize,
    max: Option<usize>,
) -> Result<Vec<AstNode>> {
    let position = parser.current_position();
    let params = parser.parse_tokens_until_close(')')?;
    let too_many = max.is_some_and(|max| params.len() > max);
    if params.len() < min || too_many {
        let expected = match max {
            Some(max) if max == min => min.to_string(),
            Some(max) => format!("{}-{}", min, max),
            None => format!("at least {}", min),
        };
        return Err(count_error(form, &expected, params.len(), position));
    }
    Ok(params)
}

fn parse_single_binding(parser: &mut Parser<'_>, form: &str) -> Result<Binding> {
    let position = parser.current_position();
    let mut bindings = parser.parse_bindings()?;
    if bindings.len() != 1 {
        return Err(SyntaxError::new(
            format!("{} requires exactly one binding, got {}", form, bindings.len()),
            position,
        ));
    }
    Ok(bindings.remove(0))
}

fn parse_overloads(parser: &mut Parser<'_>) -> Result<Vec<FunctionOverload>> {
    let Some(token) = parser.peek() else {
        return Err(parser.error("Expected function arguments"));
    };

    if token.is_bracket('[') {
        let overload = parse_overload_body(parser, ')')?;
        return Ok(vec![overload]);
    }

    if !token.is_bracket('(') {
        return Err(SyntaxError::new(
            format!("Expected '[' or '(', got '{}'", token),
            token.position.clone(),
        ));
    }

    let mut overloads = Vec::new();
    while parser.peek().is_some_and(|t| t.is_bracket('(')) {
        parser.expect_open('(')?;
        overloads.push(parse_overload_body(parser, ')')?);
    }
    parser.expect_close(')')?;
    Ok(overloads)
}

/// `[args] body...` followed by `close`.
fn parse_overload_body(parser: &mut Parser<'_>, close: char) -> Result<FunctionOverload> {
    let arguments = parser.parse_arguments()?;
    let body = parser.parse_tokens_until_close(close)?;
    Ok(FunctionOverload {
        arity: arguments.arity(),
        arguments,
        body,
    })
}

fn validate_overloads(form: &SpecialForm, position: Option<&Position>) -> Result<()> {
    let overloads = match form {
        SpecialForm::Defn { overloads, .. }
        | SpecialForm::Defns { overloads, .. }
        | SpecialForm::Fn { overloads, .. } => overloads,
        _ => return Ok(()),
    };

    if overloads.is_empty() {
        return Err(SyntaxError::new(
            format!("{} requires at least one overload", form.name()),
            position.cloned(),
        ));
    }

    for (i, a) in overloads.iter().enumerate() {
        for b in &overloads[i + 1..] {
            if a.arity.overlaps(&b.arity) {
                return Err(SyntaxError::new(
                    format!(
                        "Overloaded arities must be distinct: {} overlaps {}",
                        a.arity, b.arity
                    ),
                    position.cloned(),
                ));
            }
        }
    }
    Ok(())
}

fn parse_loop_bindings(parser: &mut Parser<'_>) -> Result<Vec<LoopBinding>> {
    parser.expect_open('[')?;
    let mut bindings: Vec<LoopBinding> = Vec::new();

    loop {
        let token = parser
            .peek()
            .ok_or_else(|| parser.error("Missing closing ']'"))?;
        if token.is_bracket(']') {
            parser.expect_close(']')?;
            break;
        }

        let binding = parser.parse_binding()?;
        let mut loop_binding = LoopBinding {
            binding,
            let_bindings: Vec::new(),
            when: None,
            while_: None,
        };

        while let Some(token) = parser.peek().filter(|t| t.kind == TokenKind::Modifier) {
            let duplicate = match token.text.as_str() {
                "&let" => !loop_binding.let_bindings.is_empty(),
                "&when" => loop_binding.when.is_some(),
                "&while" => loop_binding.while_.is_some(),
                _ => {
                    return Err(SyntaxError::new(
                        format!("Unexpected modifier '{}' in loop bindings", token.text),
                        token.position.clone(),
                    ));
                }
            };
            if duplicate {
                return Err(SyntaxError::new(
                    format!("Duplicate modifier '{}'", token.text),
                    token.position.clone(),
                ));
            }
            parser.expect_modifier()?;
            match token.text.as_str() {
                "&let" => loop_binding.let_bindings = parser.parse_bindings()?,
                "&when" => loop_binding.when = Some(parser.parse_token()?),
                _ => loop_binding.while_ = Some(parser.parse_token()?),
            }
        }

        bindings.push(loop_binding);
    }

    if bindings.is_empty() {
        return Err(parser.error("Loop bindings must not be empty"));
    }
    Ok(bindings)
}

fn parse_comprehension(parser: &mut Parser<'_>, form: &str) -> Result<Comprehension> {
    let bindings = parse_loop_bindings(parser)?;
    let mut params = parse_params(parser, form, 1, Some(1))?;
    Ok(Comprehension {
        bindings,
        body: params.remove(0),
    })
}

fn parse_conditional(parser: &mut Parser<'_>, form: &str) -> Result<Conditional> {
    let mut params = parse_params(parser, form, 2, Some(3))?.into_iter();
    let (Some(test), Some(then)) = (params.next(), params.next()) else {
        return Err(parser.error(format!("Malformed {}", form)));
    };
    Ok(Conditional {
        test,
        then,
        otherwise: params.next(),
    })
}

// ============================================================================
// Forms
// ============================================================================

fn parse_and(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    Ok(SpecialForm::And(parser.parse_tokens_until_close(')')?))
}

fn parse_or(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    Ok(SpecialForm::Or(parser.parse_tokens_until_close(')')?))
}

fn parse_comment(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    parser.parse_tokens_until_close(')')?;
    Ok(SpecialForm::Comment)
}

fn parse_cond(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let position = parser.current_position();
    let params = parser.parse_tokens_until_close(')')?;
    if params.len() % 2 != 0 {
        return Err(SyntaxError::new(
            "cond requires an even number of forms",
            position,
        ));
    }
    let mut clauses = Vec::with_capacity(params.len() / 2);
    let mut params = params.into_iter();
    while let (Some(test), Some(form)) = (params.next(), params.next()) {
        clauses.push(CondClause { test, form });
    }
    Ok(SpecialForm::Cond(clauses))
}

fn parse_declared(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let (name, _) = parser.expect_name()?;
    parser.expect_close(')')?;
    Ok(SpecialForm::Declared(name))
}

fn parse_def(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let position = parser.current_position();
    let mut params = parse_params(parser, "def", 2, Some(2))?.into_iter();
    let (Some(name), Some(value)) = (params.next(), params.next()) else {
        return Err(count_error("def", "2", 0, position));
    };
    let AstNode::Name { name, .. } = name else {
        return Err(SyntaxError::new(
            format!("def expects a name, got {}", name.kind_name()),
            name.position().cloned(),
        ));
    };
    Ok(SpecialForm::Def { name, value })
}

fn parse_defs(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let position = parser.current_position();
    let mut params = parse_params(parser, "defs", 2, Some(2))?.into_iter();
    let (Some(name), Some(value)) = (params.next(), params.next()) else {
        return Err(count_error("defs", "2", 0, position));
    };
    Ok(SpecialForm::Defs { name, value })
}

fn parse_defn(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let (name, _) = parser.expect_name()?;
    let overloads = parse_overloads(parser)?.into();
    Ok(SpecialForm::Defn { name, overloads })
}

fn parse_defns(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let name = parser.parse_token()?;
    let overloads = parse_overloads(parser)?.into();
    Ok(SpecialForm::Defns { name, overloads })
}

fn parse_fn(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let name = match parser.peek() {
        Some(token) if token.kind == TokenKind::Name => Some(parser.expect_name()?.0),
        _ => None,
    };
    let overloads = parse_overloads(parser)?.into();
    Ok(SpecialForm::Fn { name, overloads })
}

fn parse_do(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    Ok(SpecialForm::Do(parser.parse_tokens_until_close(')')?))
}

fn parse_for(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    Ok(SpecialForm::For(parse_comprehension(parser, "for")?))
}

fn parse_doseq(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    Ok(SpecialForm::Doseq(parse_comprehension(parser, "doseq")?))
}

fn parse_if(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    Ok(SpecialForm::If(parse_conditional(parser, "if")?))
}

fn parse_if_not(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    Ok(SpecialForm::IfNot(parse_conditional(parser, "if-not")?))
}

fn parse_if_let(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let binding = parse_single_binding(parser, "if-let")?;
    let mut params = parse_params(parser, "if-let", 1, Some(2))?.into_iter();
    let Some(then) = params.next() else {
        return Err(parser.error("if-let requires a then branch"));
    };
    Ok(SpecialForm::IfLet {
        binding,
        then,
        otherwise: params.next(),
    })
}

fn parse_when_let(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let binding = parse_single_binding(parser, "when-let")?;
    let body = parser.parse_tokens_until_close(')')?;
    Ok(SpecialForm::WhenLet { binding, body })
}

fn parse_when_first(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let binding = parse_single_binding(parser, "when-first")?;
    let body = parser.parse_tokens_until_close(')')?;
    Ok(SpecialForm::WhenFirst { binding, body })
}

fn parse_when(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let mut params = parse_params(parser, "when", 1, None)?;
    let test = params.remove(0);
    Ok(SpecialForm::When { test, body: params })
}

fn parse_when_not(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let mut params = parse_params(parser, "when-not", 1, None)?;
    let test = params.remove(0);
    Ok(SpecialForm::WhenNot { test, body: params })
}

fn parse_let(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let bindings = parser.parse_bindings()?;
    let body = parser.parse_tokens_until_close(')')?;
    Ok(SpecialForm::Let { bindings, body })
}

fn parse_loop(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let bindings = parser.parse_bindings()?;
    let body = parser.parse_tokens_until_close(')')?;
    Ok(SpecialForm::Loop { bindings, body })
}

fn parse_recur(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    Ok(SpecialForm::Recur(parser.parse_tokens_until_close(')')?))
}

fn parse_throw(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let mut params = parse_params(parser, "throw", 1, Some(1))?;
    Ok(SpecialForm::Throw(params.remove(0)))
}

/// `(try expr (catch name expr))`
fn parse_try(parser: &mut Parser<'_>) -> Result<SpecialForm> {
    let expression = parser.parse_token()?;
    parser.expect_open('(')?;
    match parser.peek() {
        Some(token) if token.is_name("catch") => {
            parser.expect_name()?;
        }
        _ => return Err(parser.error("Expected (catch name expr)")),
    }
    let (error_name, _) = parser.expect_name()?;
    let catch = parser.parse_token()?;
    parser.expect_close(')')?;
    parser.expect_close(')')?;
    Ok(SpecialForm::Try {
        expression,
        error_name,
        catch,
    })
}
