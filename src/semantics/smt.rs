//! SMT encoding of the memory machine over 32-bit bit-vectors

use crate::ir::{Address, Value};
use std::time::Duration;
use z3::ast::{BV, Bool};
use z3::{Params, Solver};

/// Width of every symbolic cell
pub const CELL_BITS: u32 = 32;

/// Configuration for the SMT solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Timeout for each satisfiability check (None means no timeout)
    pub timeout: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl SolverConfig {
    /// Create a config with no timeout
    pub fn no_timeout() -> Self {
        Self { timeout: None }
    }

    /// Create a config with a specific timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Create a Z3 solver with the given configuration
pub fn create_solver_with_config(cfg: &SolverConfig) -> Solver {
    let solver = Solver::new();
    if let Some(timeout) = cfg.timeout {
        let mut params = Params::new();
        params.set_u32("timeout", timeout.as_millis().min(u32::MAX as u128) as u32);
        solver.set_params(&params);
    }
    solver
}

/// Constant bit-vector for a cell value. Callers must ensure it fits 32 bits.
pub fn cell_const(value: Value) -> BV {
    BV::from_u64(value, CELL_BITS)
}

/// Whether `value` is representable in a symbolic cell
pub fn fits_cell(value: Value) -> bool {
    value <= u32::MAX as Value
}

/// `lo <= value <= max_val` over unsigned 32-bit cells (the lower bound is implicit)
pub fn within_domain(value: &BV, max_val: Value) -> Bool {
    value.bvule(&cell_const(max_val.min(u32::MAX as Value)))
}

/// Symbolic memory: one bit-vector term per cell
#[derive(Clone)]
pub struct SymbolicState {
    pub cells: Vec<BV>,
}

impl SymbolicState {
    /// Fresh unconstrained cells named `{prefix}_{i}`
    pub fn new_symbolic(prefix: &str, max_mem: usize) -> Self {
        let cells = (0..max_mem)
            .map(|i| BV::new_const(format!("{}_{}", prefix, i), CELL_BITS))
            .collect();
        SymbolicState { cells }
    }

    pub fn from_cells(cells: Vec<BV>) -> Self {
        SymbolicState { cells }
    }

    /// Constraint bounding every cell to `[0, max_val]`
    pub fn domain_constraints(&self, max_val: Value) -> Vec<Bool> {
        self.cells
            .iter()
            .map(|cell| within_domain(cell, max_val))
            .collect()
    }

    pub fn load(&mut self, address: Address, value: Value) {
        self.cells[address] = cell_const(value);
    }

    pub fn swap(&mut self, lhs: Address, rhs: Address) {
        self.cells.swap(lhs, rhs);
    }

    /// Term for `dst ^ src` without committing it
    pub fn xor_term(&self, dst: Address, src: Address) -> BV {
        self.cells[dst].bvxor(&self.cells[src])
    }

    pub fn set(&mut self, address: Address, value: BV) {
        self.cells[address] = value;
    }

    /// `cell <- (cell + 1) mod (max_val + 1)`, the wrapping increment used
    /// by the pruning model. Skips the modulo when `max_val + 1` exceeds 32 bits.
    pub fn inc_wrapping(&mut self, address: Address, max_val: Value) {
        let incremented = self.cells[address].bvadd(&cell_const(1));
        self.cells[address] = match max_val.checked_add(1).filter(|m| fits_cell(*m)) {
            Some(modulus) => incremented.bvurem(&cell_const(modulus)),
            None => incremented,
        };
    }
}
