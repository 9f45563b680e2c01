//! Purely syntactic pruning

use crate::ir::{Address, Instruction, OpKind, Value};
use crate::pruning::{PruningStatistics, PruningStrategy};
use std::collections::BTreeSet;

/// Why [`BasicPruning`] rejected a program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicRejection {
    /// Two `LOAD`s in a row; the second overwrites the first
    ConsecutiveLoads { index: usize },
    /// `XOR a, a` or `SWAP a, a`
    SelfReference { index: usize },
    /// Referenced cells leave a gap below the highest referenced cell
    SparseAddresses { used: usize, span: usize },
}

/// Cheap syntactic filters.
///
/// The address check is a density test: the referenced cells (cell 0 always
/// counts as referenced) must cover `[0, max_referenced]` without gaps. It
/// does not require every one of `max_mem` cells to be used.
#[derive(Debug, Default)]
pub struct BasicPruning {
    statistics: PruningStatistics,
}

impl BasicPruning {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run all filters, reporting the first violation
    pub fn check(program: &[Instruction]) -> Result<(), BasicRejection> {
        if let Some(index) = program
            .windows(2)
            .position(|w| w[0].kind() == OpKind::Load && w[1].kind() == OpKind::Load)
        {
            return Err(BasicRejection::ConsecutiveLoads { index: index + 1 });
        }

        if let Some(index) = program.iter().position(Instruction::is_self_referential) {
            return Err(BasicRejection::SelfReference { index });
        }

        let mut used: BTreeSet<Address> = BTreeSet::from([0]);
        for instr in program {
            used.extend(instr.addresses());
        }
        let span = used.last().map_or(0, |max| max + 1);
        if used.len() < span {
            return Err(BasicRejection::SparseAddresses {
                used: used.len(),
                span,
            });
        }

        Ok(())
    }
}

impl PruningStrategy for BasicPruning {
    fn is_valid(&mut self, program: &[Instruction], _max_mem: usize, _max_val: Value) -> bool {
        self.statistics.record(Self::check(program).is_ok())
    }

    fn name(&self) -> &'static str {
        "basic"
    }

    fn statistics(&self) -> PruningStatistics {
        self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid(program: &[Instruction]) -> bool {
        BasicPruning::new().is_valid(program, 3, 5)
    }

    #[test]
    fn test_consecutive_loads() {
        let program = [Instruction::load(1), Instruction::load(2)];
        assert_eq!(
            BasicPruning::check(&program),
            Err(BasicRejection::ConsecutiveLoads { index: 1 })
        );
        assert!(!is_valid(&program));
    }

    #[test]
    fn test_separated_loads_allowed() {
        let program = [
            Instruction::load(1),
            Instruction::inc(0),
            Instruction::load(2),
        ];
        assert!(is_valid(&program));
    }

    #[test]
    fn test_xor_with_itself() {
        assert!(!is_valid(&[Instruction::xor(0, 0)]));
    }

    #[test]
    fn test_swap_with_itself() {
        assert_eq!(
            BasicPruning::check(&[Instruction::swap(1, 1)]),
            Err(BasicRejection::SelfReference { index: 0 })
        );
    }

    #[test]
    fn test_unused_memory_gap() {
        // cells {0, 2} referenced, cell 1 skipped
        let program = [Instruction::load(1), Instruction::swap(0, 2)];
        assert_eq!(
            BasicPruning::check(&program),
            Err(BasicRejection::SparseAddresses { used: 2, span: 3 })
        );
        assert!(!is_valid(&program));
    }

    #[test]
    fn test_density_not_full_coverage() {
        // Only cells 0 and 1 are touched out of 3, and that is accepted.
        let program = [Instruction::swap(0, 1)];
        assert!(BasicPruning::new().is_valid(&program, 3, 5));
    }

    #[test]
    fn test_gap_above_zero_rejected() {
        // INC 1 alone: {0, 1} dense; INC 2 alone: {0, 2} sparse
        assert!(is_valid(&[Instruction::inc(1)]));
        assert!(!is_valid(&[Instruction::inc(2)]));
    }

    #[test]
    fn test_does_not_check_values() {
        // Literal bounds are not a syntactic concern
        assert!(BasicPruning::new().is_valid(&[Instruction::load(6)], 3, 5));
    }
}
