use memopt::ir::{Instruction, Value};
use memopt::pruning::{PruningKind, PruningStrategy, SmtPruning};
use memopt::search::{
    EnumerativeSearch, ProgramGenerator, SearchAlgorithm, SearchBounds, SearchRequest,
};
use memopt::semantics::concrete::apply_instruction_concrete;
use memopt::semantics::{AbstractMachine, MemoryState};
use proptest::prelude::*;

const MAX_MEM: usize = 3;
const MAX_VAL: Value = 4;

fn instruction() -> impl Strategy<Value = Instruction> {
    let address = 0..MAX_MEM;
    prop_oneof![
        (0..=MAX_VAL).prop_map(Instruction::load),
        (address.clone(), address.clone()).prop_map(|(a, b)| Instruction::swap(a, b)),
        (address.clone(), address.clone()).prop_map(|(a, b)| Instruction::xor(a, b)),
        address.prop_map(Instruction::inc),
    ]
}

fn program(max_len: usize) -> impl Strategy<Value = Vec<Instruction>> {
    prop::collection::vec(instruction(), 0..=max_len)
}

fn state() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(0..=MAX_VAL, MAX_MEM)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn empty_program_is_identity(start in state()) {
        let machine = AbstractMachine::new(MAX_MEM);
        let out = machine.execute(&[], Some(&start));
        prop_assert_eq!(out.as_slice(), start.as_slice());
    }

    #[test]
    fn execution_is_deterministic(p in program(6), start in state()) {
        let machine = AbstractMachine::new(MAX_MEM);
        prop_assert_eq!(machine.execute(&p, Some(&start)), machine.execute(&p, Some(&start)));
    }

    #[test]
    fn execution_preserves_state_length(p in program(6), start in prop::collection::vec(0..=MAX_VAL, 0..6)) {
        let machine = AbstractMachine::new(MAX_MEM);
        prop_assert_eq!(machine.execute(&p, Some(&start)).len(), MAX_MEM);
    }

    #[test]
    fn generator_lengths_never_decrease(max_length in 0usize..3, max_mem in 1usize..3, max_val in 0u64..3) {
        let bounds = SearchBounds::new(max_length, max_mem, max_val);
        let lengths: Vec<usize> = ProgramGenerator::new(bounds).map(|p| p.len()).collect();
        prop_assert!(lengths.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(lengths.iter().all(|&l| l <= max_length));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn search_result_reaches_target(p in program(2), start in state()) {
        let machine = AbstractMachine::new(MAX_MEM);
        let target = machine.execute(&p, Some(&start)).into_values();
        let request = SearchRequest::new(SearchBounds::new(2, MAX_MEM, MAX_VAL), target.clone())
            .with_start(start.clone());

        let mut engine = EnumerativeSearch::with_pruning(PruningKind::None);
        let result = engine.search(&request).unwrap();
        let found = result.program.expect("the source program is itself a witness");

        prop_assert!(found.len() <= p.len());
        prop_assert_eq!(machine.execute(&found, Some(&start)).into_values(), target);
    }

    #[test]
    fn filtered_search_is_never_shorter(p in program(2), start in state()) {
        let machine = AbstractMachine::new(MAX_MEM);
        let target = machine.execute(&p, Some(&start)).into_values();
        let request = SearchRequest::new(SearchBounds::new(2, MAX_MEM, MAX_VAL), target.clone())
            .with_start(start.clone());

        let unfiltered = EnumerativeSearch::with_pruning(PruningKind::None)
            .search(&request)
            .unwrap();
        let shortest = unfiltered.length().expect("reachable");

        for kind in [PruningKind::Basic, PruningKind::Heuristic] {
            let result = EnumerativeSearch::with_pruning(kind).search(&request).unwrap();
            if let Some(found) = result.program {
                prop_assert!(found.len() >= shortest);
                prop_assert_eq!(machine.execute(&found, Some(&start)).into_values(), target.clone());
            }
        }
    }
}

/// Whether running `program` from `start` keeps every cell in `[0, max_val]`
/// after every instruction.
fn stays_in_domain(program: &[Instruction], start: &[Value], max_val: Value) -> bool {
    let mut state = MemoryState::from_values(start.to_vec());
    for instr in program {
        state = apply_instruction_concrete(state, instr);
        if state.as_slice().iter().any(|&v| v > max_val) {
            return false;
        }
    }
    true
}

#[test]
fn smt_rejections_are_unreachable_in_domain() {
    const MEM: usize = 2;

    // With max_val 3 no XOR of in-domain cells leaves the domain. Under 2,
    // LOAD 1; SWAP 0, 1; LOAD 2; XOR 0, 1 is the shortest kind of rejection.
    for (max_length, max_val, expect_rejections) in [(3, 3, false), (4, 2, true)] {
        let mut pruner = SmtPruning::new();
        let mut rejected = 0;

        for program in ProgramGenerator::new(SearchBounds::new(max_length, MEM, max_val)) {
            if pruner.is_valid(&program, MEM, max_val) {
                continue;
            }
            rejected += 1;
            for a in 0..=max_val {
                for b in 0..=max_val {
                    assert!(
                        !stays_in_domain(&program, &[a, b], max_val),
                        "{:?} rejected but runs in domain from [{}, {}] with max_val {}",
                        program,
                        a,
                        b,
                        max_val
                    );
                }
            }
        }

        assert_eq!(rejected > 0, expect_rejections, "max_val {}", max_val);
    }
}
