//! Shortest-program search
//!
//! - `candidate`: lazy program enumeration in ascending length
//! - `cache`: shortest program per resulting state
//! - `engine`: the single-threaded exhaustive search
//! - `parallel`: the same search sharded across worker threads

pub mod cache;
pub mod candidate;
pub mod config;
pub mod engine;
pub mod parallel;
pub mod result;

pub use cache::ResultCache;
pub use candidate::{ProgramGenerator, Shard, candidate_count, instruction_alphabet};
pub use config::{SearchBounds, SearchConfig, SearchRequest};
pub use engine::EnumerativeSearch;
pub use parallel::{ParallelConfig, ParallelResult, run_parallel_search};
pub use result::{SearchResult, SearchStatistics, SearchStatus};

use crate::error::Result;

/// Trait for search algorithms that find the shortest program reaching a target
pub trait SearchAlgorithm {
    /// Search for the shortest program taking the request's start state to
    /// its target (within the output window, if any)
    ///
    /// # Returns
    /// A SearchResult holding the program (if any) and statistics, or an
    /// error if the request is inconsistent
    fn search(&mut self, request: &SearchRequest) -> Result<SearchResult>;

    /// Get statistics from the most recent search
    fn statistics(&self) -> SearchStatistics;

    /// Reset the search state for a new search
    fn reset(&mut self);
}
