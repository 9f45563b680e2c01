//! Concrete interpreter: the abstract machine that defines program meaning

use crate::error::{Result, SearchError};
use crate::ir::{Instruction, Value};
use crate::semantics::state::MemoryState;

/// Apply a single instruction to a concrete state
///
/// `Inc` does not wrap at any search bound; only the 64-bit cell width limits it.
pub fn apply_instruction_concrete(mut state: MemoryState, instruction: &Instruction) -> MemoryState {
    match *instruction {
        Instruction::Load { value, address } => {
            state.set(address, value);
        }
        Instruction::Swap { lhs, rhs } => {
            state.swap_cells(lhs, rhs);
        }
        Instruction::Xor { dst, src } => {
            let result = state.get(dst) ^ state.get(src);
            state.set(dst, result);
        }
        Instruction::Inc { address } => {
            let result = state.get(address).wrapping_add(1);
            state.set(address, result);
        }
    }
    state
}

/// Apply a sequence of instructions to a concrete state
pub fn apply_sequence_concrete(mut state: MemoryState, instructions: &[Instruction]) -> MemoryState {
    for instruction in instructions {
        state = apply_instruction_concrete(state, instruction);
    }
    state
}

/// The abstract machine: `max_mem` cells, four instructions, deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbstractMachine {
    max_mem: usize,
}

impl AbstractMachine {
    pub fn new(max_mem: usize) -> Self {
        Self { max_mem }
    }

    pub fn max_mem(&self) -> usize {
        self.max_mem
    }

    /// Initial working state: a padded/truncated copy of `start`, or all zeros
    pub fn initial_state(&self, start: Option<&[Value]>) -> MemoryState {
        match start {
            Some(values) => MemoryState::from_start(values, self.max_mem),
            None => MemoryState::zeroed(self.max_mem),
        }
    }

    /// Run `program` from `start` and return the final state.
    ///
    /// The caller's `start` is copied, never mutated.
    ///
    /// # Panics
    ///
    /// Panics if an instruction references a cell outside `[0, max_mem)`.
    /// Use [`AbstractMachine::check_program`] on programs that did not come
    /// from the generator.
    pub fn execute(&self, program: &[Instruction], start: Option<&[Value]>) -> MemoryState {
        apply_sequence_concrete(self.initial_state(start), program)
    }

    /// Verify every address in `program` lies in `[0, max_mem)`
    pub fn check_program(&self, program: &[Instruction]) -> Result<()> {
        for (index, instruction) in program.iter().enumerate() {
            let address = instruction.max_address();
            if address >= self.max_mem {
                return Err(SearchError::AddressOutOfRange {
                    index,
                    address,
                    max_mem: self.max_mem,
                });
            }
        }
        Ok(())
    }
}
