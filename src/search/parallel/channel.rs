//! Worker-to-coordinator messaging for parallel search.

use crate::ir::Program;
use crate::search::cache::ResultCache;
use crate::search::result::SearchStatistics;
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Message sent from workers to the coordinator.
#[derive(Debug)]
pub enum WorkerMessage {
    /// Worker found a match shorter than any reported so far.
    Improvement { worker_id: usize, program: Program },
    /// Worker has finished its shard (or was stopped).
    Finished {
        worker_id: usize,
        cache: ResultCache,
        statistics: SearchStatistics,
        /// False when the worker was stopped before exhausting its shard
        complete: bool,
    },
    /// Worker encountered an error.
    Error { worker_id: usize, message: String },
}

/// State every worker reads without going through the channel
#[derive(Debug)]
pub struct ShardProgress {
    /// Length of the shortest match any worker has seen; `u64::MAX` if none
    shortest_match: AtomicU64,
    /// Raised by the coordinator at the deadline or on a worker failure
    pub stop: AtomicBool,
}

impl Default for ShardProgress {
    fn default() -> Self {
        Self {
            shortest_match: AtomicU64::new(u64::MAX),
            stop: AtomicBool::new(false),
        }
    }
}

impl ShardProgress {
    /// Record a match of `length`; true if it beats every earlier one
    pub fn record_match(&self, length: usize) -> bool {
        let length = length as u64;
        self.shortest_match.fetch_min(length, Ordering::SeqCst) > length
    }

    pub fn shortest_match(&self) -> Option<usize> {
        match self.shortest_match.load(Ordering::SeqCst) {
            u64::MAX => None,
            length => Some(length as usize),
        }
    }

    pub fn stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

/// A worker's end: a sender plus the shared progress
pub struct WorkerChannels {
    pub to_coordinator: Sender<WorkerMessage>,
    pub progress: Arc<ShardProgress>,
}

/// The coordinator's end
pub struct CoordinatorChannels {
    pub from_workers: Receiver<WorkerMessage>,
    pub progress: Arc<ShardProgress>,
}

/// One shared receiver for the coordinator and a sender per worker
pub fn create_channels(num_workers: usize) -> (CoordinatorChannels, Vec<WorkerChannels>) {
    let progress = Arc::new(ShardProgress::default());

    // Unbounded so a finishing worker never blocks on the coordinator
    let (worker_tx, coordinator_rx) = unbounded();

    let worker_channels = (0..num_workers)
        .map(|_| WorkerChannels {
            to_coordinator: worker_tx.clone(),
            progress: Arc::clone(&progress),
        })
        .collect();

    let coordinator = CoordinatorChannels {
        from_workers: coordinator_rx,
        progress,
    };

    (coordinator, worker_channels)
}
