// lits-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers and utilities for Lits integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`eval_str`] - Evaluate a program against a fresh context stack
//! - [`eval_all`] - Evaluate a program against an existing context stack
//! - [`num`], [`nums`], [`s`] - Shorthand value constructors
//!
//! # Macros
//!
//! - [`assert_eval!`] - Assert that code evaluates to an expected value
//! - [`assert_eval_err!`] - Assert that code produces an error
//! - [`assert_eval_err_contains!`] - Assert that the error message contains a substring

#[allow(unused_imports)]
pub use lits_core::{Context, ContextStack, Error, Value};

/// Evaluate a Lits program in a fresh context stack.
///
/// # Returns
///
/// Returns the value of the last top-level form, or the error as a string.
#[must_use]
pub fn eval_str(s: &str) -> Result<Value, String> {
    eval_all(s, &ContextStack::default())
}

/// Evaluate a Lits program against `stack`, returning the last result.
///
/// Globals defined by the program stay in `stack` for later calls.
#[must_use]
pub fn eval_all(s: &str, stack: &ContextStack) -> Result<Value, String> {
    lits_core::eval_source(s, true, stack).map_err(|e| e.to_string())
}

/// Evaluate a program and keep the typed error.
#[must_use]
#[allow(dead_code)]
pub fn eval_err(s: &str) -> Error {
    match lits_core::eval_source(s, true, &ContextStack::default()) {
        Ok(value) => panic!("Expected error for '{}' but got {:?}", s, value),
        Err(err) => err,
    }
}

#[must_use]
#[allow(dead_code)]
pub fn num(n: f64) -> Value {
    Value::Number(n)
}

#[must_use]
#[allow(dead_code)]
pub fn nums(ns: &[f64]) -> Value {
    Value::array(ns.iter().map(|n| Value::Number(*n)))
}

#[must_use]
#[allow(dead_code)]
pub fn s(text: &str) -> Value {
    Value::string(text)
}

/// Assert that evaluating `input` produces the expected value.
///
/// # Example
///
/// ```ignore
/// assert_eval!("(+ 1 2)", num(3.0));
/// ```
#[macro_export]
macro_rules! assert_eval {
    ($input:expr, $expected:expr) => {
        let result = $crate::common::eval_str($input);
        assert!(
            result.is_ok(),
            "Failed to evaluate '{}': {:?}",
            $input,
            result.err()
        );
        assert_eq!(
            result.unwrap(),
            $expected,
            "Evaluation of '{}' did not match expected",
            $input
        );
    };
}

/// Assert that evaluating `input` produces an error.
///
/// # Example
///
/// ```ignore
/// assert_eval_err!("(+ 1 \"a\")");
/// ```
#[macro_export]
macro_rules! assert_eval_err {
    ($input:expr) => {
        let result = $crate::common::eval_str($input);
        assert!(
            result.is_err(),
            "Expected error for '{}' but got {:?}",
            $input,
            result.ok()
        );
    };
}

/// Assert that evaluating `input` produces an error whose message contains `needle`.
///
/// # Example
///
/// ```ignore
/// assert_eval_err_contains!("(def map 1)", "Cannot redefine");
/// ```
#[macro_export]
macro_rules! assert_eval_err_contains {
    ($input:expr, $needle:expr) => {
        let result = $crate::common::eval_str($input);
        match result {
            Ok(value) => panic!("Expected error for '{}' but got {:?}", $input, value),
            Err(message) => assert!(
                message.contains($needle),
                "Error for '{}' was '{}', expected it to contain '{}'",
                $input,
                message,
                $needle
            ),
        }
    };
}
