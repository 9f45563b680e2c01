use memopt::assembler::assemble;
use memopt::ir::{Instruction, Program, Value};
use memopt::pruning::{PruningKind, PruningStrategy};
use memopt::search::{
    EnumerativeSearch, ParallelConfig, SearchAlgorithm, SearchBounds, SearchConfig, SearchRequest,
    SearchStatus, run_parallel_search,
};
use memopt::semantics::AbstractMachine;
use memopt::validation::check_equivalence_on_inputs;
use memopt::{SearchError, find_shortest_program_from_source, find_shortest_program_from_state};

fn execute(program: &[Instruction], max_mem: usize, start: Option<&[Value]>) -> Vec<Value> {
    AbstractMachine::new(max_mem)
        .execute(program, start)
        .into_values()
}

fn search_with(kind: PruningKind, request: &SearchRequest) -> Option<Program> {
    let mut engine = EnumerativeSearch::with_pruning(kind);
    let result = engine.search(request).expect("valid request");
    assert_eq!(result.status, SearchStatus::Complete);
    result.program
}

#[test]
fn test_execute_mixed_program() {
    let program = assemble("LOAD 3\nSWAP 0, 1\nINC 2").unwrap();
    let state = execute(&program, 4, Some(&[1, 2, 3, 4]));
    assert_eq!(state, vec![2, 3, 4, 4]);
}

#[test]
fn test_execute_identity_and_determinism() {
    let start = [4, 0, 7];
    assert_eq!(execute(&[], 3, Some(&start)), start.to_vec());

    let program = assemble("XOR 0, 2; INC 1; SWAP 1, 2").unwrap();
    assert_eq!(
        execute(&program, 3, Some(&start)),
        execute(&program, 3, Some(&start))
    );
}

#[test]
fn test_reverse_unfiltered_finds_single_swap() {
    let request = SearchRequest::new(SearchBounds::new(3, 3, 2), vec![2, 1, 0])
        .with_start(vec![0, 1, 2]);
    let program = search_with(PruningKind::None, &request).unwrap();
    assert_eq!(program, vec![Instruction::swap(0, 2)]);
}

#[test]
fn test_reverse_filtered_strategies_diverge() {
    // SWAP 0,2 leaves cell 1 alone, which both filters treat as wasteful
    let request = SearchRequest::new(SearchBounds::new(3, 3, 2), vec![2, 1, 0])
        .with_start(vec![0, 1, 2]);

    for kind in [PruningKind::Basic, PruningKind::Heuristic] {
        let program = search_with(kind, &request)
            .unwrap_or_else(|| panic!("{} found nothing", kind));
        assert!(
            (2..=3).contains(&program.len()),
            "{} returned {:?}",
            kind,
            program
        );
        assert_eq!(execute(&program, 3, Some(&[0, 1, 2])), vec![2, 1, 0]);
    }
}

#[test]
fn test_reverse_smt_matches_unfiltered() {
    let request = SearchRequest::new(SearchBounds::new(3, 3, 2), vec![2, 1, 0])
        .with_start(vec![0, 1, 2]);
    let program = search_with(PruningKind::Smt, &request).unwrap();
    assert_eq!(program.len(), 1);
}

#[test]
fn test_output_window_shortens_search() {
    let request = SearchRequest::new(SearchBounds::new(3, 3, 5), vec![3, 0, 0])
        .with_output_size(1);
    let program = search_with(PruningKind::Basic, &request).unwrap();
    assert!(program.len() <= 2);
    assert_eq!(execute(&program, 3, None)[0], 3);
}

#[test]
fn test_load_inc_inc_equals_load_on_leading_cell() {
    let long = assemble("LOAD 1\nINC 0\nINC 0").unwrap();
    let short = assemble("LOAD 3").unwrap();
    let result = check_equivalence_on_inputs(&long, &short, 1..=9, 3, Some(1));
    assert!(result.is_equivalent());
}

#[test]
fn test_out_of_domain_literal() {
    let program = vec![Instruction::load(6)];

    let mut heuristic = PruningKind::Heuristic.build().unwrap();
    assert!(!heuristic.is_valid(&program, 2, 5));

    let mut smt = PruningKind::Smt.build().unwrap();
    assert!(!smt.is_valid(&program, 2, 5));

    // Nothing stops the machine itself from running it
    assert!(PruningKind::None.build().is_none());
    assert_eq!(execute(&program, 2, None), vec![6, 0]);
}

#[test]
fn test_from_source_reaches_same_state() {
    let program =
        find_shortest_program_from_source("LOAD 3\nSWAP 0, 1\nLOAD 3", 3, 2, 5, None, None)
            .unwrap()
            .expect("a program exists");
    assert!(program.len() <= 3);
    assert_eq!(execute(&program, 2, None), vec![3, 3]);
}

#[test]
fn test_from_state_three_cells() {
    let program = find_shortest_program_from_state(&[3, 3, 0], 3, 5, None, None)
        .unwrap()
        .expect("a program exists");
    assert!(program.len() <= 3);
    assert_eq!(execute(&program, 3, None), vec![3, 3, 0]);
}

#[test]
fn test_from_state_rejects_bad_output_size() {
    let err = find_shortest_program_from_state(&[1, 0], 2, 5, None, Some(3)).unwrap_err();
    assert_eq!(
        err,
        SearchError::OutputSize {
            output_size: 3,
            max_mem: 2
        }
    );
}

#[test]
fn test_engine_reuses_cache_across_targets() {
    let mut engine = EnumerativeSearch::with_pruning(PruningKind::None);
    let first = SearchRequest::new(SearchBounds::new(2, 2, 3), vec![3, 0]);
    assert_eq!(engine.search(&first).unwrap().length(), Some(1));

    let second = SearchRequest::new(SearchBounds::new(2, 2, 3), vec![0, 3]);
    let result = engine.search(&second).unwrap();
    assert!(result.statistics.cache_hit);
    assert_eq!(result.length(), Some(2));
    assert_eq!(execute(result.program.as_ref().unwrap(), 2, None), vec![0, 3]);
}

#[test]
fn test_parallel_agrees_with_sequential() {
    let request = SearchRequest::new(SearchBounds::new(2, 2, 4), vec![2, 2]);
    let config = SearchConfig::default().with_pruning(PruningKind::Heuristic);

    let sequential = search_with(PruningKind::Heuristic, &request);
    let parallel = run_parallel_search(&request, &config, &ParallelConfig::default().with_workers(3))
        .unwrap();

    assert!(parallel.best_result.is_complete());
    assert_eq!(
        parallel.best_result.length(),
        sequential.as_ref().map(Vec::len)
    );
    let program = parallel.best_result.program.unwrap();
    assert_eq!(execute(&program, 2, None), vec![2, 2]);
}
