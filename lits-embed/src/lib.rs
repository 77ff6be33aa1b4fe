// lits-embed - Embedding API for Lits
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # lits-embed
//!
//! A high-level embedding API for the Lits expression language.
//!
//! A [`Lits`] session tokenizes, parses and evaluates programs, injects
//! host globals, calls back into Lits functions and optionally caches
//! parsed programs by source text.
//!
//! ## Quick Start
//!
//! ```rust
//! use lits_embed::{Lits, LitsParams};
//!
//! let lits = Lits::new();
//! let result = lits.run("(+ 1 2 3)", &LitsParams::new()).unwrap();
//! println!("{}", result); // 6
//! ```
//!
//! ## Host Globals
//!
//! ```rust
//! use lits_embed::{Lits, LitsParams, Value};
//!
//! let lits = Lits::new();
//! let params = LitsParams::new().with_global("rate", Value::Number(0.5));
//! let result = lits.run("(* rate 10)", &params).unwrap();
//! assert_eq!(result.to_string(), "5");
//! ```

mod cache;
mod convert;
mod lits;

pub use cache::AstCache;
pub use convert::{FromLitsValue, IntoLitsValue, from_lits, to_lits};
pub use lits::{Lits, LitsConfig, LitsParams};

// Re-export core types for convenience
pub use lits_core::{Context, Error, LitsFunction, Result, Value};
pub use lits_parser::{Program, Token};
