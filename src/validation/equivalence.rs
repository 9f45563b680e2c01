//! Concrete equivalence of two programs over a set of start states

use crate::ir::{Instruction, Value};
use crate::semantics::concrete::AbstractMachine;

/// Outcome of an equivalence check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquivalenceResult {
    /// Both programs agreed on every start state tried
    Equivalent,
    /// First start state on which the programs disagree
    NotEquivalent {
        start: Vec<Value>,
        left: Vec<Value>,
        right: Vec<Value>,
    },
}

impl EquivalenceResult {
    pub fn is_equivalent(&self) -> bool {
        matches!(self, EquivalenceResult::Equivalent)
    }
}

/// Compare `left` and `right` on every state in `states`, looking only at the
/// output window when `output_size` is set.
///
/// States are coerced to `max_mem` cells. Both programs must only reference
/// cells below `max_mem`.
pub fn check_equivalence_on_states<I>(
    left: &[Instruction],
    right: &[Instruction],
    states: I,
    max_mem: usize,
    output_size: Option<usize>,
) -> EquivalenceResult
where
    I: IntoIterator,
    I::Item: AsRef<[Value]>,
{
    let machine = AbstractMachine::new(max_mem);

    for state in states {
        let start = state.as_ref();
        let left_out = machine.execute(left, Some(start));
        let right_out = machine.execute(right, Some(start));

        if left_out.project(output_size) != right_out.project(output_size) {
            return EquivalenceResult::NotEquivalent {
                start: machine.initial_state(Some(start)).into_values(),
                left: left_out.project(output_size).to_vec(),
                right: right_out.project(output_size).to_vec(),
            };
        }
    }

    EquivalenceResult::Equivalent
}

/// Compare `left` and `right` with each of `inputs` placed in cell 0 (other
/// cells zero)
pub fn check_equivalence_on_inputs<I>(
    left: &[Instruction],
    right: &[Instruction],
    inputs: I,
    max_mem: usize,
    output_size: Option<usize>,
) -> EquivalenceResult
where
    I: IntoIterator<Item = Value>,
{
    let states = inputs.into_iter().map(|value| vec![value]);
    check_equivalence_on_states(left, right, states, max_mem, output_size)
}
