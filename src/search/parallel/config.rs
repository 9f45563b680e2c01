//! Worker-pool settings for the sharded search

use crate::ir::OpKind;
use crate::search::candidate::alphabet_size;
use crate::search::config::SearchBounds;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Worker threads requested; see [`ParallelConfig::workers_for`]
    pub num_workers: usize,
    /// Deadline for the whole run. Takes precedence over the search config's
    /// timeout when both are set.
    pub timeout: Option<Duration>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            timeout: None,
        }
    }
}

impl ParallelConfig {
    /// At least one worker is always kept
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_timeout_option(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Workers actually worth spawning under `bounds`.
    ///
    /// Shards are cut by leading instruction, so a worker beyond the size of
    /// the instruction alphabet would own nothing.
    pub fn workers_for(&self, bounds: &SearchBounds) -> usize {
        let leading: u64 = OpKind::ALL
            .iter()
            .map(|&kind| alphabet_size(kind, bounds))
            .fold(0, u64::saturating_add);
        let cap = usize::try_from(leading).unwrap_or(usize::MAX).max(1);
        self.num_workers.clamp(1, cap)
    }
}
