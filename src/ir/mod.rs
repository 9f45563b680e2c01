//! Intermediate Representation (IR) for the memory machine

pub mod instructions;
pub mod types;

// Re-export commonly used types
pub use instructions::{Instruction, Program};
pub use types::{Address, OpKind, Value};
