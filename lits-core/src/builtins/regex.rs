// lits-core - Regular expression built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Regular expressions: regexp, match, replace

use std::rc::Rc;

use lits_parser::{AstNode, Position, SyntaxError};

use super::{BuiltinEntry, Invocation, string_arg};
use crate::error::{Error, Result};
use crate::value::{LitsRegexp, Value};

pub(super) fn entries() -> Vec<(&'static str, BuiltinEntry)> {
    vec![
        (
            "regexp",
            BuiltinEntry::range(builtin_regexp, 1, 2).with_validate(validate_regexp),
        ),
        ("match", BuiltinEntry::exact(builtin_match, 2)),
        ("replace", BuiltinEntry::exact(builtin_replace, 3)),
    ]
}

/// Literal patterns are compiled once at parse time to surface errors early.
fn validate_regexp(params: &[AstNode], position: Option<&Position>) -> std::result::Result<(), SyntaxError> {
    let literal = |node: Option<&AstNode>| match node {
        Some(AstNode::String { value, .. }) => Some(value.clone()),
        None => Some(String::new()),
        _ => None,
    };
    if let (Some(source), Some(flags)) = (literal(params.first()), literal(params.get(1)))
        && let Err(Error::Syntax(err)) = LitsRegexp::new(&source, &flags)
    {
        return Err(SyntaxError::new(err.message, position.cloned()));
    }
    Ok(())
}

/// (regexp source flags?) - target of `#'...'` literals.
fn builtin_regexp(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let source = string_arg(inv.name, &args[0])?;
    let flags = match args.get(1) {
        Some(flags) => string_arg(inv.name, flags)?,
        None => "",
    };
    Ok(Value::Regexp(Rc::new(LitsRegexp::new(source, flags)?)))
}

fn regexp_arg<'v>(name: &str, value: &'v Value) -> Result<&'v LitsRegexp> {
    match value {
        Value::Regexp(re) => Ok(re),
        other => Err(Error::type_error_in(name, "regexp", other.type_name())),
    }
}

/// (match regexp s) - nil when there is no match. Otherwise the full match
/// followed by its groups, or with the `g` flag every full match.
fn builtin_match(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let re = regexp_arg(inv.name, &args[0])?;
    let Some(text) = args[1].as_str() else {
        return Ok(Value::Nil);
    };

    if re.is_global() {
        let matches: Vec<Value> = re
            .regex
            .find_iter(text)
            .map(|m| Value::string(m.as_str()))
            .collect();
        return Ok(if matches.is_empty() {
            Value::Nil
        } else {
            Value::from(matches)
        });
    }

    Ok(match re.regex.captures(text) {
        Some(captures) => Value::array(
            captures
                .iter()
                .map(|group| group.map_or(Value::Nil, |m| Value::string(m.as_str()))),
        ),
        None => Value::Nil,
    })
}

/// (replace s pattern replacement) - a string pattern replaces its first
/// occurrence; a regexp replaces the first match, or all with the `g` flag.
fn builtin_replace(args: &[Value], inv: &Invocation<'_>) -> Result<Value> {
    let text = string_arg(inv.name, &args[0])?;
    let replacement = string_arg(inv.name, &args[2])?;
    let replaced = match &args[1] {
        Value::String(pattern) => text.replacen(&**pattern, replacement, 1),
        Value::Regexp(re) if re.is_global() => {
            re.regex.replace_all(text, replacement).into_owned()
        }
        Value::Regexp(re) => re.regex.replace(text, replacement).into_owned(),
        other => {
            return Err(Error::type_error_in(inv.name, "string or regexp", other.type_name()));
        }
    };
    Ok(Value::from(replaced))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextStack;

    fn call(f: super::super::BuiltinFn, name: &str, args: &[Value]) -> Result<Value> {
        let stack = ContextStack::default();
        let inv = Invocation::new(name, None, &stack);
        f(args, &inv)
    }

    fn regexp(source: &str, flags: &str) -> Value {
        Value::Regexp(Rc::new(LitsRegexp::new(source, flags).unwrap()))
    }

    #[test]
    fn test_match_groups() {
        let result = call(
            builtin_match,
            "match",
            &[regexp("(a)(x)?", ""), Value::string("bab")],
        );
        assert_eq!(
            result.unwrap(),
            Value::array([Value::string("a"), Value::string("a"), Value::Nil])
        );
    }

    #[test]
    fn test_match_global() {
        let result = call(builtin_match, "match", &[regexp("a.", "g"), Value::string("abacad")]);
        assert_eq!(
            result.unwrap(),
            Value::array([Value::string("ab"), Value::string("ac"), Value::string("ad")])
        );
        let none = call(builtin_match, "match", &[regexp("z", "g"), Value::string("abc")]);
        assert_eq!(none.unwrap(), Value::Nil);
    }

    #[test]
    fn test_replace_first_and_all() {
        let text = Value::string("a-b-c");
        let dash = Value::string("+");
        assert_eq!(
            call(builtin_replace, "replace", &[text.clone(), Value::string("-"), dash.clone()]).unwrap(),
            Value::string("a+b-c")
        );
        assert_eq!(
            call(builtin_replace, "replace", &[text, regexp("-", "g"), dash]).unwrap(),
            Value::string("a+b+c")
        );
    }

    #[test]
    fn test_validate_rejects_bad_literal() {
        let params = [AstNode::String {
            value: "(".to_string(),
            position: None,
        }];
        assert!(validate_regexp(&params, None).is_err());
    }
}
