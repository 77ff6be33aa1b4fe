// lits-core - Special form integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for Lits special forms.
//!
//! Tests for: and, or, if, if-not, when, when-not, cond, do, let, if-let,
//! when-let, when-first, def, defs, declared?, comment

mod common;

use common::{Value, num, nums, s};

// =============================================================================
// Logic
// =============================================================================

#[test]
fn test_and() {
    assert_eval!("(and)", Value::Bool(true));
    assert_eval!("(and 1 2 3)", num(3.0));
    assert_eval!("(and 1 nil 3)", Value::Nil);
    assert_eval!("(and 1 false)", Value::Bool(false));
}

#[test]
fn test_or() {
    assert_eval!("(or)", Value::Bool(false));
    assert_eval!("(or nil 2 3)", num(2.0));
    assert_eval!("(or nil false)", Value::Bool(false));
}

#[test]
fn test_and_short_circuits() {
    assert_eval!("(and false (throw \"never\"))", Value::Bool(false));
    assert_eval!("(or 1 (throw \"never\"))", num(1.0));
}

// =============================================================================
// Conditionals
// =============================================================================

#[test]
fn test_if() {
    assert_eval!("(if true 1 2)", num(1.0));
    assert_eval!("(if nil 1 2)", num(2.0));
    assert_eval!("(if false 1)", Value::Nil);
    // Only false and nil are falsy
    assert_eval!("(if 0 :yes :no)", s("yes"));
    assert_eval!("(if \"\" :yes :no)", s("yes"));
    assert_eval!("(if [] :yes :no)", s("yes"));
}

#[test]
fn test_if_not() {
    assert_eval!("(if-not true 1 2)", num(2.0));
    assert_eval!("(if-not nil 1 2)", num(1.0));
    assert_eval!("(if-not 1 2)", Value::Nil);
}

#[test]
fn test_if_only_evaluates_taken_branch() {
    assert_eval!("(if true 1 (throw \"never\"))", num(1.0));
}

#[test]
fn test_when_and_when_not() {
    assert_eval!("(when true 1 2 3)", num(3.0));
    assert_eval!("(when false 1)", Value::Nil);
    assert_eval!("(when true)", Value::Nil);
    assert_eval!("(when-not false 1 2)", num(2.0));
    assert_eval!("(when-not 1 2)", Value::Nil);
}

#[test]
fn test_cond() {
    assert_eval!("(cond false 1 nil 2 :else 3)", num(3.0));
    assert_eval!("(cond (= 1 1) :a true :b)", s("a"));
    assert_eval!("(cond false 1)", Value::Nil);
    assert_eval!("(cond)", Value::Nil);
}

#[test]
fn test_cond_odd_forms_is_syntax_error() {
    assert_eval_err_contains!("(cond true)", "even number");
}

// =============================================================================
// Sequencing and bindings
// =============================================================================

#[test]
fn test_do() {
    assert_eval!("(do)", Value::Nil);
    assert_eval!("(do 1 2 3)", num(3.0));
}

#[test]
fn test_let() {
    assert_eval!("(let [a 1 b (+ a 1)] (* a b))", num(2.0));
    assert_eval!("(let [] 5)", num(5.0));
    assert_eval!("(let [a 1])", Value::Nil);
}

#[test]
fn test_let_duplicate_binding() {
    assert_eval_err_contains!("(let [a 1 a 2] a)", "Duplicate binding");
}

#[test]
fn test_let_shadows_outer() {
    assert_eval!("(let [a 1] (let [a 2] a))", num(2.0));
    assert_eval!("(let [a 1] (let [b 2] a))", num(1.0));
    assert_eval!("(def x 1) (let [x 2] x)", num(2.0));
}

#[test]
fn test_let_does_not_leak() {
    assert_eval_err_contains!("(let [a 1] a) a", "Unable to resolve symbol: a");
}

#[test]
fn test_if_let() {
    assert_eval!("(if-let [a (first [1 2])] (+ a 10) :none)", num(11.0));
    assert_eval!("(if-let [a (first [])] a :none)", s("none"));
    assert_eval!("(if-let [a nil] a)", Value::Nil);
}

#[test]
fn test_when_let() {
    assert_eval!("(when-let [a 2] (inc a) (* a 10))", num(20.0));
    assert_eval!("(when-let [a false] 1)", Value::Nil);
}

#[test]
fn test_when_first() {
    assert_eval!("(when-first [x [7 8 9]] (* x 2))", num(14.0));
    assert_eval!("(when-first [x []] :never)", Value::Nil);
    assert_eval!("(when-first [c \"abc\"] c)", s("a"));
    assert_eval!("(when-first [x nil] x)", Value::Nil);
}

// =============================================================================
// Definitions
// =============================================================================

#[test]
fn test_def_returns_value() {
    assert_eval!("(def x 10)", num(10.0));
    assert_eval!("(def x 10) (+ x 1)", num(11.0));
}

#[test]
fn test_def_inside_let_is_global() {
    assert_eval!("(let [a 5] (def b (* a 2))) b", num(10.0));
}

#[test]
fn test_defs_computed_name() {
    assert_eval!("(defs (str \"a\" \"b\") 3) ab", num(3.0));
    assert_eval_err!("(defs 1 3)");
    assert_eval_err!("(defs \"\" 3)");
}

#[test]
fn test_declared() {
    assert_eval!("(declared? x)", Value::Bool(false));
    assert_eval!("(def x 1) (declared? x)", Value::Bool(true));
    assert_eval!("(let [y 1] (declared? y))", Value::Bool(true));
    assert_eval!("(declared? map)", Value::Bool(true));
}

#[test]
fn test_comment() {
    assert_eval!("(comment (this is never evaluated))", Value::Nil);
    assert_eval!("(comment) 5", num(5.0));
}

// =============================================================================
// Literal desugaring
// =============================================================================

#[test]
fn test_array_and_object_literals() {
    assert_eval!("[1 (+ 1 1) 3]", nums(&[1.0, 2.0, 3.0]));
    assert_eval!(
        "{\"b\" 2 :a 1}",
        Value::object([("a", num(1.0)), ("b", num(2.0))])
    );
    assert_eval!("{}", Value::object(Vec::<(&str, Value)>::new()));
}

#[test]
fn test_object_literal_odd_count() {
    assert_eval_err!("{:a}");
}

#[test]
fn test_fn_shorthand() {
    assert_eval!("(#(+ %1 %2) 3 4)", num(7.0));
    assert_eval!("(#(* % 2) 5)", num(10.0));
    assert_eval!("(map #(inc %) [1 2])", nums(&[2.0, 3.0]));
}

#[test]
fn test_nested_fn_shorthand_is_error() {
    assert_eval_err!("#(#(+ %1 1) %1)");
}

#[test]
fn test_regexp_literal() {
    assert_eval!("(regexp? #'a+')", Value::Bool(true));
    assert_eval!(
        "(match #'(\\d)-(\\d)' \"1-2\")",
        Value::array([s("1-2"), s("1"), s("2")])
    );
}

#[test]
fn test_collection_accessors() {
    assert_eval!("(let [o {:a [5 6]}] o.a#1)", num(6.0));
    assert_eval!("(let [xs [[1 2] [3 4]]] xs#1#0)", num(3.0));
    assert_eval!("(let [o {:a 1}] o.missing)", Value::Nil);
}

#[test]
fn test_reserved_names() {
    assert_eval!("true", Value::Bool(true));
    assert_eval!("false", Value::Bool(false));
    assert_eval!("nil", Value::Nil);
    assert_eval_err!("null");
    assert_eval_err!("(&& 1 2)");
}
