//! Shortest-program memo keyed by (projected) resulting state

use crate::ir::{Instruction, Program, Value};
use std::collections::HashMap;

/// Maps a resulting state to the shortest program seen producing it.
///
/// An entry is only ever replaced by a strictly shorter program, so the first
/// program offered at a given length wins ties.
///
/// The search offers every executed candidate, not only matches, so later
/// targets under the same bounds are answered without searching again. The
/// price is memory: the map holds one entry per distinct reachable state,
/// on the order of `(max_val + 1)^max_mem` of them before projection.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    entries: HashMap<Vec<Value>, Program>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `program` as a way to reach `key`; true if the entry changed
    pub fn offer(&mut self, key: &[Value], program: &[Instruction]) -> bool {
        match self.entries.get_mut(key) {
            Some(existing) if existing.len() <= program.len() => false,
            Some(existing) => {
                *existing = program.to_vec();
                true
            }
            None => {
                self.entries.insert(key.to_vec(), program.to_vec());
                true
            }
        }
    }

    pub fn get(&self, key: &[Value]) -> Option<&Program> {
        self.entries.get(key)
    }

    /// Fold `other` into this cache. Entries already here win ties.
    pub fn merge(&mut self, other: ResultCache) {
        for (key, program) in other.entries {
            self.offer(&key, &program);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
