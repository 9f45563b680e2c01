//! memopt - shortest-program search for a tiny memory-cell machine.
//!
//! Programs are sequences of `LOAD`, `SWAP`, `XOR` and `INC` over a fixed
//! number of cells. [`search::EnumerativeSearch`] enumerates candidates in
//! ascending length, filters them through a [`pruning::Pruner`] and executes
//! the survivors on the [`semantics::AbstractMachine`] until one reaches the
//! target state.

pub mod assembler;
pub mod error;
pub mod ir;
pub mod optimize;
pub mod parser;
pub mod pruning;
pub mod search;
pub mod semantics;
pub mod validation;

pub use error::{Result, SearchError};
pub use ir::{Instruction, Program, Value};
pub use optimize::{
    find_shortest_program_from_source, find_shortest_program_from_source_with,
    find_shortest_program_from_state, find_shortest_program_from_state_with,
};
