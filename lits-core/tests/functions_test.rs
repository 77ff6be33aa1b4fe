// lits-core - Function integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for Lits functions.
//!
//! Tests for: fn, defn, defns, multi-arity, rest arguments, &let, closures,
//! function kinds built by partial/comp/constantly/juxt/complement/
//! every-pred/some-pred/fnil, and calling collections as functions

mod common;

use common::{ContextStack, Value, eval_all, num, nums, s};

// =============================================================================
// Definition and calling
// =============================================================================

#[test]
fn test_fn_call() {
    assert_eval!("((fn [a b] (+ a b)) 1 2)", num(3.0));
    assert_eval!("((fn [] 7))", num(7.0));
    assert_eval!("((fn [a]) 1)", Value::Nil);
}

#[test]
fn test_defn() {
    assert_eval!("(defn add [a b] (+ a b)) (add 2 3)", num(5.0));
    assert_eval!("(defn f [] 1 2 3) (f)", num(3.0));
}

#[test]
fn test_defns() {
    assert_eval!("(defns (str \"tw\" \"ice\") [x] (* 2 x)) (twice 4)", num(8.0));
}

#[test]
fn test_rest_arguments() {
    assert_eval!("((fn [a & more] more) 1 2 3)", nums(&[2.0, 3.0]));
    assert_eval!("((fn [a & more] more) 1)", nums(&[]));
    assert_eval!("((fn [& all] (count all)))", num(0.0));
}

#[test]
fn test_let_in_arguments() {
    assert_eval!("((fn [a &let [b (* a 2) c (+ b 1)]] c) 5)", num(11.0));
    assert_eval!("(defn f [a & xs &let [n (count xs)]] (+ a n)) (f 10 :x :y)", num(12.0));
}

#[test]
fn test_wrong_arity() {
    assert_eval_err_contains!(
        "(defn f [a] a) (f 1 2)",
        "Wrong number of arguments to 'f': expected 1, got 2"
    );
    assert_eval_err_contains!("((fn [a & b] a))", "expected at least 1, got 0");
}

#[test]
fn test_builtin_arity_checked_at_parse_time() {
    let stack = ContextStack::default();
    let result = eval_all("(def x 1) (inc 1 2)", &stack);
    assert!(result.is_err());
    // Nothing ran: the whole program failed to parse.
    assert_eq!(stack.lookup("x"), None);
}

#[test]
fn test_builtin_arity_checked_at_call_time() {
    assert_eval_err_contains!("(apply inc [1 2])", "Wrong number of arguments to 'inc'");
}

// =============================================================================
// Multi-arity
// =============================================================================

#[test]
fn test_multi_arity() {
    let program = "(defn f ([] :zero) ([a] :one) ([a b] :two) ([a b c & more] :many))";
    let stack = ContextStack::default();
    eval_all(program, &stack).unwrap();
    assert_eq!(eval_all("(f)", &stack), Ok(s("zero")));
    assert_eq!(eval_all("(f 1)", &stack), Ok(s("one")));
    assert_eq!(eval_all("(f 1 2)", &stack), Ok(s("two")));
    assert_eq!(eval_all("(f 1 2 3)", &stack), Ok(s("many")));
    assert_eq!(eval_all("(f 1 2 3 4 5)", &stack), Ok(s("many")));
}

#[test]
fn test_multi_arity_delegation() {
    assert_eval!(
        "(defn greet ([] (greet \"world\")) ([name] (str \"hello \" name))) (greet)",
        s("hello world")
    );
}

#[test]
fn test_overlapping_arities_rejected() {
    assert_eval_err_contains!("(defn f ([a] a) ([b] b))", "distinct");
    assert_eval_err_contains!("(fn ([a & r] a) ([a b] b))", "distinct");
}

#[test]
fn test_multi_arity_no_match() {
    assert_eval_err_contains!(
        "(defn f ([] 0) ([a b] 2)) (f 1)",
        "expected 0 to 2, got 1"
    );
}

// =============================================================================
// Closures and self reference
// =============================================================================

#[test]
fn test_closure_captures_locals() {
    assert_eval!(
        "(defn adder [n] (fn [x] (+ x n))) (def add5 (adder 5)) (add5 10)",
        num(15.0)
    );
}

#[test]
fn test_closure_sees_later_globals() {
    assert_eval!("(defn f [] (g)) (defn g [] 42) (f)", num(42.0));
}

#[test]
fn test_named_fn_self_reference() {
    assert_eval!(
        "((fn fact [n] (if (<= n 1) 1 (* n (fact (dec n))))) 5)",
        num(120.0)
    );
}

#[test]
fn test_local_shadows_builtin_call() {
    assert_eval!("(let [inc (fn [x] (- x 1))] (inc 5))", num(4.0));
}

// =============================================================================
// Function kinds
// =============================================================================

#[test]
fn test_partial() {
    assert_eval!("((partial + 1 2) 3 4)", num(10.0));
    assert_eval!("(map (partial * 2) [1 2 3])", nums(&[2.0, 4.0, 6.0]));
}

#[test]
fn test_comp() {
    assert_eval!("((comp inc inc) 1)", num(3.0));
    // Right to left
    assert_eval!("((comp str inc) 1)", s("2"));
    assert_eval!("((comp first rest) [1 2 3])", num(2.0));
    assert_eval!("((comp) 5)", num(5.0));
}

#[test]
fn test_constantly() {
    assert_eval!("((constantly 7) 1 2 3)", num(7.0));
    assert_eval!("(map (constantly :x) [1 2])", Value::array([s("x"), s("x")]));
}

#[test]
fn test_juxt() {
    assert_eval!("((juxt first last count) [4 5 6])", nums(&[4.0, 6.0, 3.0]));
}

#[test]
fn test_complement() {
    assert_eval!("((complement nil?) 1)", Value::Bool(true));
    assert_eval!("(filter (complement number?) [1 :a 2])", Value::array([s("a")]));
}

#[test]
fn test_every_pred_and_some_pred() {
    assert_eval!("((every-pred number? (fn [x] (> x 0))) 1 2 3)", Value::Bool(true));
    assert_eval!("((every-pred number?) 1 :a)", Value::Bool(false));
    assert_eval!("((some-pred string? nil?) 1 2 nil)", Value::Bool(true));
    assert_eval!("((some-pred string?) 1 2)", Value::Bool(false));
}

#[test]
fn test_fnil() {
    assert_eval!("((fnil + 10) nil 1)", num(11.0));
    assert_eval!("((fnil + 10 20) nil nil)", num(30.0));
    assert_eval!("((fnil + 10) 1 2)", num(3.0));
}

#[test]
fn test_function_display() {
    assert_eval!("(str (fn named [] 1))", s("<function named>"));
    assert_eval!("(str (partial +))", s("<function partial>"));
    assert_eval!("(str inc)", s("<function inc>"));
}

#[test]
fn test_function_predicate() {
    assert_eval!("(function? inc)", Value::Bool(true));
    assert_eval!("(function? #(+ %1 1))", Value::Bool(true));
    assert_eval!("(function? [1])", Value::Bool(false));
}

// =============================================================================
// Values as functions
// =============================================================================

#[test]
fn test_array_as_function() {
    assert_eval!("([10 20 30] 1)", num(20.0));
    assert_eval!("([10 20 30] 5)", Value::Nil);
    assert_eval_err_contains!("([10 20 30] :a)", "Not a function");
}

#[test]
fn test_object_as_function() {
    assert_eval!("({:a 1} :a)", num(1.0));
    assert_eval!("({:a 1} :b)", Value::Nil);
}

#[test]
fn test_string_as_function() {
    assert_eval!("(:a {:a 1})", num(1.0));
    assert_eval!("(map :name [{:name \"x\"} {:name \"y\"}])", Value::array([s("x"), s("y")]));
    assert_eval_err_contains!("(\"abc\" 0)", "Not a function");
}

#[test]
fn test_number_as_function() {
    assert_eval!("(1 [10 20])", num(20.0));
    assert_eval!("(0 \"xyz\")", s("x"));
}

#[test]
fn test_value_as_function_needs_one_argument() {
    assert_eval_err_contains!("([1 2] 0 1)", "Not a function");
    assert_eval_err_contains!("(true 1)", "Not a function");
    assert_eval_err_contains!("(nil)", "Not a function");
}
