//! Concurrent memo table from qualified names to resolutions

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;

use crate::features::classpath::domain::Resolution;
use crate::shared::models::Result;

/// Name → resolution cache.
///
/// Each key gets its own `OnceCell`, so racing first lookups of the same
/// name run the loader once and every caller observes the same `Arc`. The
/// shard lock is only held while fetching the cell, never during loading.
/// A failed load leaves the cell empty; the next lookup retries.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    cells: DashMap<String, Arc<OnceCell<Resolution>>>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_try_init<F>(&self, name: &str, load: F) -> Result<Resolution>
    where
        F: FnOnce() -> Result<Resolution>,
    {
        let existing = self.cells.get(name).map(|cell| Arc::clone(cell.value()));
        let cell = match existing {
            Some(cell) => cell,
            None => Arc::clone(
                self.cells
                    .entry(name.to_string())
                    .or_insert_with(|| Arc::new(OnceCell::new()))
                    .value(),
            ),
        };
        cell.get_or_try_init(load).cloned()
    }

    /// Cached resolution, without loading
    pub fn peek(&self, name: &str) -> Option<Resolution> {
        self.cells.get(name).and_then(|cell| cell.get().cloned())
    }

    /// Number of populated entries
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
