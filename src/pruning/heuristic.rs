//! Forward-pass pruning over a wrapping model of the machine
//!
//! The model increments modulo `max_val + 1`, while the concrete machine
//! increments without wrapping. The two agree as long as no cell is
//! incremented past `max_val`.

use crate::ir::{Address, Instruction, OpKind, Value};
use crate::pruning::{PruningStatistics, PruningStrategy};
use std::collections::HashSet;

/// Why [`HeuristicPruning`] rejected a program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicRejection {
    /// Same instruction twice in a row (`INC` excepted)
    Repeated { index: usize },
    /// `XOR a, a` or `SWAP a, a`
    SelfReference { index: usize },
    /// More instructions of one kind than there are cells
    KindOverused { kind: OpKind, count: usize },
    /// `LOAD` literal above `max_val`
    LiteralOutOfDomain { index: usize, value: Value },
    /// Instruction names a cell outside `[0, max_mem)`
    AddressOutOfRange { index: usize, address: Address },
    /// Some cell in `[0, max_mem)` is never referenced
    UntouchedCells { touched: usize, max_mem: usize },
}

#[derive(Debug, Default)]
pub struct HeuristicPruning {
    statistics: PruningStatistics,
}

fn wrapping_inc(value: Value, max_val: Value) -> Value {
    match max_val.checked_add(1) {
        Some(modulus) => (value % modulus + 1) % modulus,
        None => value.wrapping_add(1),
    }
}

impl HeuristicPruning {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the program once, simulating it from an all-zero state.
    ///
    /// Returns the simulated final state when the program survives every
    /// filter, or the first violation found.
    pub fn simulate(
        program: &[Instruction],
        max_mem: usize,
        max_val: Value,
    ) -> Result<Vec<Value>, HeuristicRejection> {
        let mut state = vec![0; max_mem];
        let mut touched: HashSet<Address> = HashSet::with_capacity(max_mem);
        let mut counts = [0usize; OpKind::ALL.len()];
        let mut previous: Option<&Instruction> = None;

        for (index, instr) in program.iter().enumerate() {
            let kind = instr.kind();

            if previous == Some(instr) && kind != OpKind::Inc {
                return Err(HeuristicRejection::Repeated { index });
            }
            if instr.is_self_referential() {
                return Err(HeuristicRejection::SelfReference { index });
            }

            counts[kind.index()] += 1;
            if counts[kind.index()] > max_mem {
                return Err(HeuristicRejection::KindOverused {
                    kind,
                    count: counts[kind.index()],
                });
            }

            if let Some(&address) = instr.addresses().iter().find(|&&a| a >= max_mem) {
                return Err(HeuristicRejection::AddressOutOfRange { index, address });
            }
            touched.extend(instr.addresses());

            match *instr {
                Instruction::Load { value, address } => {
                    if value > max_val {
                        return Err(HeuristicRejection::LiteralOutOfDomain { index, value });
                    }
                    state[address] = value;
                }
                Instruction::Swap { lhs, rhs } => state.swap(lhs, rhs),
                Instruction::Xor { dst, src } => state[dst] ^= state[src],
                Instruction::Inc { address } => {
                    state[address] = wrapping_inc(state[address], max_val);
                }
            }

            previous = Some(instr);
        }

        if touched.len() < max_mem {
            return Err(HeuristicRejection::UntouchedCells {
                touched: touched.len(),
                max_mem,
            });
        }

        Ok(state)
    }
}

impl PruningStrategy for HeuristicPruning {
    fn is_valid(&mut self, program: &[Instruction], max_mem: usize, max_val: Value) -> bool {
        let verdict = Self::simulate(program, max_mem, max_val).is_ok();
        self.statistics.record(verdict)
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn statistics(&self) -> PruningStatistics {
        self.statistics
    }
}
