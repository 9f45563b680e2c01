//! Fixed-length memory state shared by the machine, the search and its cache

use crate::ir::{Address, Value};
use std::fmt;
use std::ops::Deref;

/// An ordered, fixed-length sequence of cells.
///
/// The length is set at construction and never changes; executing a program
/// always yields a state of the same length as its input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MemoryState {
    cells: Vec<Value>,
}

impl MemoryState {
    /// All-zero state with `max_mem` cells
    pub fn zeroed(max_mem: usize) -> Self {
        Self {
            cells: vec![0; max_mem],
        }
    }

    /// Copy `start` into a state of exactly `max_mem` cells, truncating or
    /// right-padding with zeros
    pub fn from_start(start: &[Value], max_mem: usize) -> Self {
        let mut cells: Vec<Value> = start.iter().copied().take(max_mem).collect();
        cells.resize(max_mem, 0);
        Self { cells }
    }

    /// State from exact cell values
    pub fn from_values(cells: Vec<Value>) -> Self {
        Self { cells }
    }

    pub fn get(&self, address: Address) -> Value {
        self.cells[address]
    }

    pub fn set(&mut self, address: Address, value: Value) {
        self.cells[address] = value;
    }

    pub fn swap_cells(&mut self, lhs: Address, rhs: Address) {
        self.cells.swap(lhs, rhs);
    }

    /// The leading `output_size` cells, or the whole state when no window is set
    pub fn project(&self, output_size: Option<usize>) -> &[Value] {
        project(&self.cells, output_size)
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.cells
    }

    pub fn into_values(self) -> Vec<Value> {
        self.cells
    }
}

/// Truncate `values` to an optional output window
pub fn project(values: &[Value], output_size: Option<usize>) -> &[Value] {
    match output_size {
        Some(n) => &values[..n.min(values.len())],
        None => values,
    }
}

impl Deref for MemoryState {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}

impl From<Vec<Value>> for MemoryState {
    fn from(cells: Vec<Value>) -> Self {
        Self { cells }
    }
}

impl fmt::Display for MemoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}
