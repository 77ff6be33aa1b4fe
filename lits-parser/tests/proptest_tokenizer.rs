// lits-parser - Property-based tests for the tokenizer and parser
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Property-based tests for tokenizing and parsing.
//!
//! Tests the following properties:
//! - Numbers and strings tokenize to a single token of the right kind
//! - Whitespace and comments never change the token stream
//! - Debug mode only adds positions
//! - Every top-level form becomes one program node

use lits_parser::{AstNode, NoBuiltins, Position, TokenKind, read, tokenize};
use proptest::prelude::*;

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}".prop_filter("reserved", |name| {
        !lits_parser::is_reserved_name(name) && !lits_parser::FORBIDDEN_NAMES.contains(&name.as_str())
    })
}

fn arb_atom() -> impl Strategy<Value = String> {
    prop_oneof![
        (-100_000i64..100_000).prop_map(|n| n.to_string()),
        "[a-zA-Z0-9 ]{0,10}".prop_map(|s| format!("\"{}\"", s)),
        arb_name(),
    ]
}

proptest! {
    #[test]
    fn integers_are_single_number_tokens(n in any::<i32>()) {
        let tokens = tokenize(&n.to_string(), false).unwrap();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(&tokens[0].kind, &TokenKind::Number);
    }

    #[test]
    fn strings_keep_their_content(content in "[a-zA-Z0-9 ,.;()]{0,20}") {
        let program = read(&format!("\"{}\"", content), false, &NoBuiltins).unwrap();
        match &program.body[..] {
            [AstNode::String { value, .. }] => prop_assert_eq!(value, &content),
            other => prop_assert!(false, "unexpected program {:?}", other),
        }
    }

    #[test]
    fn whitespace_and_comments_are_insignificant(atoms in prop::collection::vec(arb_atom(), 1..8)) {
        let compact = format!("({})", atoms.join(" "));
        let spread = format!("( ;; leading comment\n  {} \n ,, )", atoms.join(" ,\n\t "));
        let texts = |source: &str| -> Vec<String> {
            tokenize(source, false).unwrap().into_iter().map(|t| t.text).collect()
        };
        prop_assert_eq!(texts(&compact), texts(&spread));
    }

    #[test]
    fn debug_mode_only_adds_positions(atoms in prop::collection::vec(arb_atom(), 0..8)) {
        let source = format!("[{}]", atoms.join(" "));
        let plain = tokenize(&source, false).unwrap();
        let debug = tokenize(&source, true).unwrap();
        prop_assert_eq!(plain.len(), debug.len());
        for (a, b) in plain.iter().zip(&debug) {
            prop_assert_eq!(&a.text, &b.text);
            prop_assert!(a.position.is_none());
            let has_position = matches!(b.position, Some(Position::At { .. }));
            prop_assert!(has_position);
        }
    }

    #[test]
    fn each_top_level_form_is_one_node(atoms in prop::collection::vec(arb_atom(), 0..10)) {
        let program = read(&atoms.join(" "), false, &NoBuiltins).unwrap();
        prop_assert_eq!(program.body.len(), atoms.len());
    }
}
