//! Lexical scope stack
//!
//! Tracks nested blocks during a tree walk. Lookups go innermost-first, and a
//! binding is only visible after it has been declared.

use rustc_hash::FxHashMap;

/// One block of bindings plus optional per-frame data (e.g. a lambda receiver)
#[derive(Debug, Clone)]
pub struct Frame<T, M = ()> {
    bindings: FxHashMap<String, T>,
    pub meta: M,
}

impl<T, M> Frame<T, M> {
    fn new(meta: M) -> Self {
        Self {
            bindings: FxHashMap::default(),
            meta,
        }
    }
}

/// Scope stack of bindings
#[derive(Debug, Clone)]
pub struct ScopeStack<T, M = ()> {
    frames: Vec<Frame<T, M>>,
}

impl<T, M> Default for ScopeStack<T, M> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<T, M> ScopeStack<T, M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new scope
    pub fn push(&mut self, meta: M) {
        self.frames.push(Frame::new(meta));
    }

    /// Pop the current scope
    pub fn pop(&mut self) -> Option<M> {
        self.frames.pop().map(|f| f.meta)
    }

    /// Bind `name` in the innermost scope, shadowing outer bindings
    pub fn declare(&mut self, name: impl Into<String>, value: T) {
        if let Some(frame) = self.frames.last_mut() {
            frame.bindings.insert(name.into(), value);
        }
    }

    /// Innermost binding for `name`
    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(name))
    }

    /// Frame metadata, innermost first
    pub fn metas(&self) -> impl Iterator<Item = &M> {
        self.frames.iter().rev().map(|f| &f.meta)
    }

    /// Current depth
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Execute a closure within a new scope
    pub fn with_scope<F, R>(&mut self, meta: M, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.push(meta);
        let result = f(self);
        self.pop();
        result
    }
}
