// lits-core - Loop/recur integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for Lits loop and recur.
//!
//! Tests for: loop, recur in loops and functions, tail position checks,
//! constant-stack recursion

mod common;

use common::{ContextStack, Value, eval_all, eval_str, num, nums};

// =============================================================================
// Basic loop/recur
// =============================================================================

#[test]
fn test_loop_basic() {
    assert_eval!("(loop [] 42)", num(42.0));
    assert_eval!("(loop [x 1] x)", num(1.0));
}

#[test]
fn test_loop_sequential_bindings() {
    assert_eval!("(loop [x 10 y (+ x 5)] y)", num(15.0));
}

#[test]
fn test_loop_recur_sum() {
    assert_eval!(
        "(loop [n 10 sum 0] (if (= n 0) sum (recur (dec n) (+ sum n))))",
        num(55.0)
    );
}

#[test]
fn test_loop_recur_builds_array() {
    assert_eval!(
        "(loop [i 0 acc []] (if (< i 3) (recur (inc i) (conj acc i)) acc))",
        nums(&[0.0, 1.0, 2.0])
    );
}

#[test]
fn test_recur_through_nested_tail_forms() {
    assert_eval!(
        "(loop [n 5] (cond (= n 0) :done :else (let [m (dec n)] (do (recur m)))))",
        common::s("done")
    );
    assert_eval!(
        "(loop [n 3] (when (> n 0) (recur (dec n))))",
        Value::Nil
    );
    assert_eval!(
        "(loop [xs [1 2 3] acc 0] (if-let [x (first xs)] (recur (rest xs) (+ acc x)) acc))",
        num(6.0)
    );
}

// =============================================================================
// Deep iteration runs in constant stack
// =============================================================================

#[test]
fn test_loop_one_million_iterations() {
    assert_eval!(
        "(loop [n 1000000 acc 0] (if (= n 0) acc (recur (dec n) (inc acc))))",
        num(1_000_000.0)
    );
}

#[test]
fn test_fn_recur_one_million_iterations() {
    let stack = ContextStack::default();
    let result = eval_all(
        "(defn count-down [n] (if (= n 0) :done (recur (dec n)))) (count-down 1000000)",
        &stack,
    );
    assert_eq!(result, Ok(common::s("done")));
}

// =============================================================================
// recur in functions
// =============================================================================

#[test]
fn test_fn_recur_accumulator() {
    assert_eval!(
        "(defn fact [n acc] (if (<= n 1) acc (recur (dec n) (* acc n)))) (fact 5 1)",
        num(120.0)
    );
}

#[test]
fn test_recur_reselects_overload() {
    assert_eval!(
        "(defn f ([n] (recur n 0)) ([n acc] (if (= n 0) acc (recur (dec n) (+ acc n))))) (f 4)",
        num(10.0)
    );
}

#[test]
fn test_recur_into_variadic() {
    assert_eval!(
        "(defn total [acc & xs] (if (empty? xs) acc (apply total (+ acc (first xs)) (rest xs)))) (total 0 1 2 3)",
        num(6.0)
    );
    assert_eval!(
        "((fn [acc & xs] (if (empty? xs) acc (recur (+ acc 1)))) 0 :a :b)",
        num(1.0)
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_recur_arity_mismatch_in_loop() {
    assert_eval_err_contains!("(loop [a 1 b 2] (recur 1))", "Wrong number of arguments to 'recur'");
}

#[test]
fn test_recur_no_matching_overload() {
    assert_eval_err_contains!("(defn f [a] (if a (recur 1 2) 0)) (f true)", "Wrong number of arguments");
}

#[test]
fn test_recur_outside_tail_position() {
    assert_eval_err_contains!("(loop [n 1] (+ 1 (recur 0)))", "tail position");
    assert_eval_err_contains!("(loop [n 1] (do (recur 0) 1))", "tail position");
    assert_eval_err_contains!("(recur)", "tail position");
}

#[test]
fn test_recur_in_loop_test_position() {
    assert_eval_err_contains!("(loop [n 1] (if (recur 0) 1 2))", "tail position");
}

#[test]
fn test_deep_non_tail_recursion_is_caught() {
    let previous = lits_core::set_max_eval_depth(300);
    let result = eval_str("(defn down [n] (if (= n 0) 0 (+ 1 (down (dec n))))) (down 100000)");
    let _ = lits_core::set_max_eval_depth(previous);
    let err = result.unwrap_err();
    assert!(err.contains("Stack overflow"), "unexpected error: {}", err);
    assert_eq!(lits_core::get_eval_depth(), 0);
}

#[test]
fn test_shallow_non_tail_recursion_succeeds() {
    assert_eval!(
        "(defn down [n] (if (= n 0) 0 (+ 1 (down (dec n))))) (down 50)",
        num(50.0)
    );
}

#[test]
fn test_default_depth_limit_reports_overflow() {
    assert_eq!(lits_core::get_max_eval_depth(), lits_core::DEFAULT_MAX_EVAL_DEPTH);
    let err = eval_str("(defn f [n] (+ 1 (f n))) (f 1)").unwrap_err();
    assert!(err.contains("Stack overflow"), "unexpected error: {}", err);
    assert_eq!(lits_core::get_eval_depth(), 0);
}

#[test]
fn test_deep_non_tail_recursion_under_default_limit() {
    assert_eval!(
        "(defn down [n] (if (= n 0) 0 (+ 1 (down (dec n))))) (down 2000)",
        num(2000.0)
    );
}

// =============================================================================
// recur through try
// =============================================================================

#[test]
fn test_recur_through_try_in_loop() {
    assert_eval!(
        "(loop [n 3] (try (if (= n 0) :done (recur (dec n))) (catch e (error-message e))))",
        common::s("done")
    );
}

#[test]
fn test_recur_through_try_in_fn() {
    assert_eval!(
        "(defn f [n] (try (if (= n 0) :done (recur (dec n))) (catch e (error-message e)))) (f 3)",
        common::s("done")
    );
}

#[test]
fn test_recur_through_try_is_constant_stack() {
    assert_eval!(
        "(loop [n 100000 acc 0] (try (if (= n 0) acc (recur (dec n) (+ acc 1))) (catch e :failed)))",
        num(100000.0)
    );
}

#[test]
fn test_recur_from_catch() {
    assert_eval!(
        "(loop [n 2 seen 0] (if (= n 0) seen (try (throw \"again\") (catch e (recur (dec n) (inc seen))))))",
        num(2.0)
    );
}

#[test]
fn test_try_still_catches_errors_inside_loop() {
    assert_eval!(
        "(loop [n 1] (try (if (= n 0) (throw \"boom\") (recur (dec n))) (catch e (error-message e))))",
        common::s("boom")
    );
}
