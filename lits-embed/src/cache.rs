// lits-embed - Bounded cache of parsed programs
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A write-once, insertion-ordered cache from source text to its parsed
//! [`Program`].
//!
//! Eviction is strictly first-in first-out: [`AstCache::get`] and
//! [`AstCache::has`] never change which entry goes next.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use lits_core::{Error, Result};
use lits_parser::Program;

#[derive(Debug)]
pub struct AstCache {
    max_size: usize,
    entries: HashMap<String, Rc<Program>>,
    order: VecDeque<String>,
}

impl AstCache {
    /// Create a cache holding at most `max_size` programs.
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size < 1 {
            return Err(Error::Internal(format!(
                "AST cache size must be at least 1, got {}",
                max_size
            )));
        }
        Ok(AstCache {
            max_size,
            entries: HashMap::with_capacity(max_size),
            order: VecDeque::with_capacity(max_size),
        })
    }

    pub fn get(&self, source: &str) -> Option<Rc<Program>> {
        let hit = self.entries.get(source).cloned();
        if hit.is_some() {
            log::debug!("AST cache hit ({} bytes of source)", source.len());
        } else {
            log::debug!("AST cache miss ({} bytes of source)", source.len());
        }
        hit
    }

    pub fn has(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    /// Insert a program, evicting the oldest entry when full.
    ///
    /// Fails if `source` is already cached; check with [`AstCache::has`]
    /// first.
    pub fn set(&mut self, source: &str, program: Rc<Program>) -> Result<()> {
        if self.entries.contains_key(source) {
            return Err(Error::Internal(
                "AST cache already contains this program".to_string(),
            ));
        }

        if self.order.len() >= self.max_size
            && let Some(oldest) = self.order.pop_front()
        {
            log::debug!("AST cache evicting oldest entry ({} bytes)", oldest.len());
            self.entries.remove(&oldest);
        }

        self.order.push_back(source.to_string());
        self.entries.insert(source.to_string(), program);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program() -> Rc<Program> {
        Rc::new(Program::default())
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(AstCache::new(0).is_err());
        assert!(AstCache::new(1).is_ok());
    }

    #[test]
    fn test_set_and_get() {
        let mut cache = AstCache::new(2).unwrap();
        assert!(!cache.has("(+ 1 2)"));
        cache.set("(+ 1 2)", program()).unwrap();
        assert!(cache.has("(+ 1 2)"));
        assert!(cache.get("(+ 1 2)").is_some());
        assert!(cache.get("(+ 2 1)").is_none());
    }

    #[test]
    fn test_set_existing_key_fails() {
        let mut cache = AstCache::new(2).unwrap();
        cache.set("a", program()).unwrap();
        assert!(cache.set("a", program()).is_err());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_oldest_even_after_reads() {
        let mut cache = AstCache::new(2).unwrap();
        cache.set("a", program()).unwrap();
        cache.set("b", program()).unwrap();
        assert!(cache.get("a").is_some());
        cache.set("c", program()).unwrap();
        assert!(!cache.has("a"));
        assert!(cache.has("b"));
        assert!(cache.has("c"));
    }

    #[test]
    fn test_clear() {
        let mut cache = AstCache::new(3).unwrap();
        cache.set("a", program()).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        cache.set("a", program()).unwrap();
        assert_eq!(cache.len(), 1);
    }
}
