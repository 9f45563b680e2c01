//! Search result types and statistics

use crate::ir::Program;
use crate::pruning::{PruningKind, PruningStatistics};
use crate::search::candidate::GeneratorStatistics;
use std::time::Duration;

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// The whole bounded space was explored (or answered from the cache)
    #[default]
    Complete,
    /// The deadline hit first; an absent program means "no answer within
    /// bounds", not "no program exists"
    TimedOut,
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStatus::Complete => write!(f, "complete"),
            SearchStatus::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Shortest program reaching the target, if one was found
    pub program: Option<Program>,
    pub status: SearchStatus,
    pub statistics: SearchStatistics,
}

impl SearchResult {
    pub fn found(program: Program, status: SearchStatus, statistics: SearchStatistics) -> Self {
        Self {
            program: Some(program),
            status,
            statistics,
        }
    }

    pub fn not_found(status: SearchStatus, statistics: SearchStatistics) -> Self {
        Self {
            program: None,
            status,
            statistics,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == SearchStatus::Complete
    }

    /// Length of the program found
    pub fn length(&self) -> Option<usize> {
        self.program.as_ref().map(Vec::len)
    }
}

/// Statistics from a search operation
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Strategy the search ran with
    pub pruning: PruningKind,
    /// Total time spent searching
    pub elapsed_time: Duration,
    /// Candidates materialized by the generator
    pub candidates_generated: u64,
    /// Candidates the pruner rejected
    pub candidates_pruned: u64,
    /// Candidates executed on the machine
    pub candidates_executed: u64,
    /// Executed candidates whose projected state matched the target
    pub matches: u64,
    /// Cache entries inserted or shortened
    pub cache_updates: u64,
    /// Longest program length reached
    pub max_length_explored: usize,
    /// Whether the answer came from an earlier search's cache
    pub cache_hit: bool,
    pub pruning_statistics: PruningStatistics,
}

impl SearchStatistics {
    pub fn new(pruning: PruningKind) -> Self {
        Self {
            pruning,
            ..Default::default()
        }
    }

    pub fn absorb_generator(&mut self, generator: &GeneratorStatistics) {
        self.candidates_generated += generator.generated;
        self.candidates_pruned += generator.pruned;
    }

    /// Add another worker's counters into these
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.candidates_generated += other.candidates_generated;
        self.candidates_pruned += other.candidates_pruned;
        self.candidates_executed += other.candidates_executed;
        self.matches += other.matches;
        self.cache_updates += other.cache_updates;
        self.max_length_explored = self.max_length_explored.max(other.max_length_explored);
        self.pruning_statistics.merge(&other.pruning_statistics);
    }

    /// Fraction of generated candidates the pruner rejected
    pub fn prune_rate(&self) -> f64 {
        if self.candidates_generated == 0 {
            0.0
        } else {
            self.candidates_pruned as f64 / self.candidates_generated as f64
        }
    }

    /// Get candidates generated per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.candidates_generated as f64 / secs
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Pruning: {}\n", self.pruning));
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        if self.cache_hit {
            s.push_str("Answered from cache\n");
            return s;
        }
        s.push_str(&format!(
            "Candidates generated: {}\n",
            self.candidates_generated
        ));
        s.push_str(&format!(
            "Throughput: {:.0} candidates/sec\n",
            self.throughput()
        ));
        if self.candidates_pruned > 0 {
            s.push_str(&format!(
                "Pruned: {} ({:.2}%)\n",
                self.candidates_pruned,
                self.prune_rate() * 100.0
            ));
        }
        s.push_str(&format!("Executed: {}\n", self.candidates_executed));
        s.push_str(&format!("Matches: {}\n", self.matches));

        if self.pruning_statistics.solver_queries > 0 {
            s.push_str(&format!(
                "SMT queries: {} (unsat {}, unknown {})\n",
                self.pruning_statistics.solver_queries,
                self.pruning_statistics.solver_unsat,
                self.pruning_statistics.solver_unknown
            ));
        }

        s.push_str(&format!(
            "Longest length explored: {}\n",
            self.max_length_explored
        ));

        s
    }
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.program {
            Some(ref program) if program.is_empty() => {
                writeln!(f, "Start state already matches the target (empty program).")?;
            }
            Some(ref program) => {
                writeln!(f, "Shortest program ({} instructions):", program.len())?;
                for instr in program {
                    writeln!(f, "  {}", instr)?;
                }
            }
            None if self.status == SearchStatus::TimedOut => {
                writeln!(f, "No program found before the deadline.")?;
            }
            None => {
                writeln!(f, "No program found within bounds.")?;
            }
        }
        Ok(())
    }
}
