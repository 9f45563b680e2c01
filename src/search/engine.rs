//! Exhaustive shortest-program search
//!
//! Candidates come from [`ProgramGenerator`] in ascending length, so the first
//! program reaching a given state is a shortest one. Every executed candidate
//! is offered to the engine's [`ResultCache`] under its projected resulting
//! state, which lets a later query with the same start state and bounds be
//! answered without searching again.

use crate::assembler::disassemble_inline;
use crate::error::Result;
use crate::ir::{Instruction, Program, Value};
use crate::pruning::{Pruner, PruningKind, PruningStatistics, PruningStrategy};
use crate::search::SearchAlgorithm;
use crate::search::cache::ResultCache;
use crate::search::candidate::ProgramGenerator;
use crate::search::config::{SearchConfig, SearchRequest};
use crate::search::result::{SearchResult, SearchStatistics, SearchStatus};
use crate::semantics::concrete::apply_sequence_concrete;
use std::time::Instant;
use tracing::{debug, info, trace};

/// What the cache contents are valid for
#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheScope {
    max_mem: usize,
    max_val: Value,
    start: Vec<Value>,
    output_size: Option<usize>,
    /// Longest program length fully explored
    explored: usize,
}

impl CacheScope {
    fn of(request: &SearchRequest) -> Self {
        Self {
            max_mem: request.bounds.max_mem,
            max_val: request.bounds.max_val,
            start: request.start_state().into_values(),
            output_size: request.output_size,
            explored: request.bounds.max_length,
        }
    }

    /// Whether a complete search under `self` already answers `other`
    fn covers(&self, other: &CacheScope) -> bool {
        self.max_mem == other.max_mem
            && self.max_val == other.max_val
            && self.start == other.start
            && self.output_size == other.output_size
            && self.explored >= other.explored
    }
}

/// The search engine: one pruner, one cache, many queries
pub struct EnumerativeSearch {
    config: SearchConfig,
    pruner: Option<Pruner>,
    cache: ResultCache,
    scope: Option<CacheScope>,
    statistics: SearchStatistics,
}

impl EnumerativeSearch {
    /// Engine owning `pruner` (or none, to execute every candidate)
    pub fn new(pruner: Option<Pruner>) -> Self {
        let kind = pruner.as_ref().map_or(PruningKind::None, Pruner::kind);
        Self {
            config: SearchConfig::default().with_pruning(kind),
            pruner,
            cache: ResultCache::new(),
            scope: None,
            statistics: SearchStatistics::new(kind),
        }
    }

    pub fn with_pruning(kind: PruningKind) -> Self {
        Self::with_config(SearchConfig::default().with_pruning(kind))
    }

    pub fn with_config(config: SearchConfig) -> Self {
        let pruner = config.pruning.build_with_solver(&config.solver);
        Self {
            statistics: SearchStatistics::new(config.pruning),
            config,
            pruner,
            cache: ResultCache::new(),
            scope: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Shortest known program for an already-projected target key
    pub fn lookup(&self, key: &[Value]) -> Option<&Program> {
        self.cache.get(key)
    }

    fn pruner_statistics(&self) -> PruningStatistics {
        self.pruner
            .as_ref()
            .map(|p| p.statistics())
            .unwrap_or_default()
    }

    fn finish(
        &mut self,
        request: &SearchRequest,
        status: SearchStatus,
        mut statistics: SearchStatistics,
        started: Instant,
    ) -> SearchResult {
        statistics.elapsed_time = started.elapsed();
        let program = self
            .cache
            .get(request.target_key())
            .filter(|p| p.len() <= request.bounds.max_length)
            .cloned();

        info!(
            found = program.is_some(),
            length = program.as_ref().map(Vec::len),
            status = %status,
            elapsed = ?statistics.elapsed_time,
            "search finished"
        );

        self.statistics = statistics.clone();
        match program {
            Some(program) => SearchResult::found(program, status, statistics),
            None => SearchResult::not_found(status, statistics),
        }
    }
}

/// Drain `generator`, executing every candidate from the request's start
/// state and offering the projected result to `cache`.
///
/// `on_match` sees each candidate whose projected state equals the target.
/// Returns whether the generator was interrupted before exhausting the space.
pub(crate) fn explore(
    mut generator: ProgramGenerator<'_>,
    request: &SearchRequest,
    progress_interval: u64,
    cache: &mut ResultCache,
    statistics: &mut SearchStatistics,
    mut on_match: impl FnMut(&[Instruction]),
) -> bool {
    let start = request.start_state();
    let target = request.target_key();
    let output_size = request.output_size;

    for program in generator.by_ref() {
        statistics.candidates_executed += 1;
        trace!(program = %disassemble_inline(&program), "candidate");

        if progress_interval > 0 && statistics.candidates_executed % progress_interval == 0 {
            info!(
                executed = statistics.candidates_executed,
                length = program.len(),
                cached_states = cache.len(),
                "search progress"
            );
        }

        let result = apply_sequence_concrete(start.clone(), &program);
        let key = result.project(output_size);
        if cache.offer(key, &program) {
            statistics.cache_updates += 1;
        }
        if key == target {
            statistics.matches += 1;
            if statistics.matches == 1 {
                debug!(program = %disassemble_inline(&program), "found matching program");
            }
            on_match(program.as_slice());
        }
    }

    statistics.absorb_generator(&generator.statistics());
    if statistics.candidates_generated > 0 {
        statistics.max_length_explored = generator.current_length();
    }
    generator.interrupted()
}

impl SearchAlgorithm for EnumerativeSearch {
    fn search(&mut self, request: &SearchRequest) -> Result<SearchResult> {
        request.validate()?;
        let started = Instant::now();
        let mut statistics = SearchStatistics::new(self.config.pruning);

        let scope = CacheScope::of(request);
        if self.scope.as_ref().is_some_and(|s| s.covers(&scope)) {
            debug!("answering from cache");
            statistics.cache_hit = true;
            return Ok(self.finish(request, SearchStatus::Complete, statistics, started));
        }

        self.cache.clear();
        self.scope = None;

        let start = request.start_state();
        let identity = start.project(request.output_size);
        self.cache.offer(identity, &[]);

        if identity == request.target_key() {
            debug!("start state already matches the target");
            return Ok(self.finish(request, SearchStatus::Complete, statistics, started));
        }

        info!(
            max_length = request.bounds.max_length,
            max_mem = request.bounds.max_mem,
            max_val = request.bounds.max_val,
            pruning = %self.config.pruning,
            "starting search"
        );

        let pruning_before = self.pruner_statistics();
        let generator = ProgramGenerator::new(request.bounds)
            .with_pruner(self.pruner.as_mut())
            .with_deadline(self.config.timeout.map(|t| started + t));
        let interrupted = explore(
            generator,
            request,
            self.config.progress_interval,
            &mut self.cache,
            &mut statistics,
            |_| {},
        );
        statistics.pruning_statistics = self.pruner_statistics().since(&pruning_before);

        let status = if interrupted {
            SearchStatus::TimedOut
        } else {
            self.scope = Some(scope);
            SearchStatus::Complete
        };

        Ok(self.finish(request, status, statistics, started))
    }

    fn statistics(&self) -> SearchStatistics {
        self.statistics.clone()
    }

    fn reset(&mut self) {
        self.cache.clear();
        self.scope = None;
        self.statistics = SearchStatistics::new(self.config.pruning);
    }
}
