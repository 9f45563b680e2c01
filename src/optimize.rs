//! Entry points for "find me the shortest program" without building a request
//! by hand.
//!
//! Each call runs a fresh [`EnumerativeSearch`], so nothing is cached between
//! calls. Keep an engine around and call [`SearchAlgorithm::search`] directly
//! to reuse its cache.

use crate::assembler::assemble;
use crate::error::Result;
use crate::ir::{Program, Value};
use crate::pruning::PruningKind;
use crate::search::{
    EnumerativeSearch, SearchAlgorithm, SearchBounds, SearchConfig, SearchRequest,
};
use crate::semantics::AbstractMachine;
use tracing::debug;

/// Shortest program with the same effect as `assembly`.
///
/// The source is run from `start` (zeros when absent) on a `max_mem`-cell
/// machine and the resulting state becomes the search target. Returns
/// `Ok(None)` when nothing within `max_length` instructions matches, which
/// can happen when the source is longer than `max_length` or uses literals
/// above `max_val`.
pub fn find_shortest_program_from_source(
    assembly: &str,
    max_length: usize,
    max_mem: usize,
    max_val: Value,
    start: Option<&[Value]>,
    output_size: Option<usize>,
) -> Result<Option<Program>> {
    find_shortest_program_from_source_with(
        &SearchConfig::default(),
        assembly,
        max_length,
        max_mem,
        max_val,
        start,
        output_size,
    )
}

/// [`find_shortest_program_from_source`] with an explicit search configuration
pub fn find_shortest_program_from_source_with(
    config: &SearchConfig,
    assembly: &str,
    max_length: usize,
    max_mem: usize,
    max_val: Value,
    start: Option<&[Value]>,
    output_size: Option<usize>,
) -> Result<Option<Program>> {
    let program = assemble(assembly)?;
    let machine = AbstractMachine::new(max_mem);
    machine.check_program(&program)?;

    let target = machine.execute(&program, start).into_values();
    debug!(source_length = program.len(), ?target, "derived target from source");

    find_shortest_program_from_state_with(config, &target, max_length, max_val, start, output_size)
}

/// Shortest program taking `start` (zeros when absent) to `target`, with Basic
/// pruning. The machine has `target.len()` cells.
pub fn find_shortest_program_from_state(
    target: &[Value],
    max_length: usize,
    max_val: Value,
    start: Option<&[Value]>,
    output_size: Option<usize>,
) -> Result<Option<Program>> {
    let config = SearchConfig::default().with_pruning(PruningKind::Basic);
    find_shortest_program_from_state_with(&config, target, max_length, max_val, start, output_size)
}

/// [`find_shortest_program_from_state`] with an explicit search configuration
pub fn find_shortest_program_from_state_with(
    config: &SearchConfig,
    target: &[Value],
    max_length: usize,
    max_val: Value,
    start: Option<&[Value]>,
    output_size: Option<usize>,
) -> Result<Option<Program>> {
    let bounds = SearchBounds::new(max_length, target.len(), max_val);
    let request = SearchRequest::new(bounds, target.to_vec())
        .with_start_option(start.map(<[Value]>::to_vec))
        .with_output_size_option(output_size);

    let mut engine = EnumerativeSearch::with_config(config.clone());
    let result = engine.search(&request)?;
    Ok(result.program)
}
