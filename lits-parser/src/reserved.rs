// lits-parser - Reserved names
// Copyright (c) 2025 Tom Waddington. MIT licensed.

/// Names that evaluate to fixed values and can never be rebound.
pub const RESERVED_NAMES: &[&str] = &["true", "false", "nil"];

/// Names rejected outright by the tokenizer.
pub const FORBIDDEN_NAMES: &[&str] = &["null", "undefined", "===", "!==", "&&", "||"];

pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

pub fn is_forbidden_name(name: &str) -> bool {
    FORBIDDEN_NAMES.contains(&name)
}
