//! Concrete and symbolic semantics of the memory machine

pub mod concrete;
pub mod smt;
pub mod state;

// Re-export main functionality
pub use concrete::{AbstractMachine, apply_sequence_concrete};
pub use smt::{SolverConfig, SymbolicState};
pub use state::MemoryState;
