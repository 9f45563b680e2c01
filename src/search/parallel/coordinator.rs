//! Parallel search coordinator that manages worker threads.

use crate::assembler::disassemble_inline;
use crate::error::{Result, SearchError};
use crate::pruning::PruningStrategy;
use crate::search::cache::ResultCache;
use crate::search::candidate::{ProgramGenerator, Shard};
use crate::search::config::{SearchConfig, SearchRequest};
use crate::search::engine::explore;
use crate::search::parallel::channel::{
    CoordinatorChannels, WorkerChannels, WorkerMessage, create_channels,
};
use crate::search::parallel::config::ParallelConfig;
use crate::search::result::{SearchResult, SearchStatistics, SearchStatus};
use crossbeam_channel::RecvTimeoutError;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result from parallel search execution.
#[derive(Debug)]
pub struct ParallelResult {
    /// The merged result across all workers.
    pub best_result: SearchResult,
    /// Statistics aggregated from all workers.
    pub total_statistics: SearchStatistics,
    /// Per-worker statistics, by worker id.
    pub worker_statistics: Vec<(usize, SearchStatistics)>,
    /// Merged shortest-program cache.
    pub cache: ResultCache,
}

/// What a worker left behind
struct WorkerOutcome {
    cache: ResultCache,
    statistics: SearchStatistics,
    complete: bool,
}

/// Run the search sharded across up to `parallel_config.num_workers` threads.
///
/// Each worker owns the programs whose leading instruction falls in its shard,
/// runs its own pruner over them and keeps its own cache. Caches are merged in
/// worker-id order: the shorter program wins, and on equal length the entry
/// from the lower worker id is kept.
pub fn run_parallel_search(
    request: &SearchRequest,
    search_config: &SearchConfig,
    parallel_config: &ParallelConfig,
) -> Result<ParallelResult> {
    request.validate()?;
    let start_time = Instant::now();

    let mut cache = ResultCache::new();
    let identity = request.start_state().project(request.output_size).to_vec();
    cache.offer(&identity, &[]);

    if identity.as_slice() == request.target_key() {
        debug!("start state already matches the target");
        let mut statistics = SearchStatistics::new(search_config.pruning);
        statistics.elapsed_time = start_time.elapsed();
        return Ok(ParallelResult {
            best_result: SearchResult::found(Vec::new(), SearchStatus::Complete, statistics.clone()),
            total_statistics: statistics,
            worker_statistics: Vec::new(),
            cache,
        });
    }

    let num_workers = parallel_config.workers_for(&request.bounds);
    let timeout = parallel_config.timeout.or(search_config.timeout);
    let deadline = timeout.map(|t| start_time + t);

    info!(
        workers = num_workers,
        max_length = request.bounds.max_length,
        pruning = %search_config.pruning,
        "starting parallel search"
    );

    let (coordinator_channels, worker_channels) = create_channels(num_workers);

    let mut worker_handles = Vec::with_capacity(num_workers);
    for (worker_id, channels) in worker_channels.into_iter().enumerate() {
        let request = request.clone();
        let config = search_config.clone();
        let shard = Shard::new(worker_id, num_workers);

        let handle = std::thread::Builder::new()
            .name(format!("memopt-worker-{}", worker_id))
            .spawn(move || run_worker(worker_id, shard, &request, &config, deadline, channels))
            .map_err(|e| SearchError::Worker(format!("failed to spawn worker: {}", e)))?;
        worker_handles.push(handle);
    }

    let outcomes = run_coordinator(coordinator_channels, num_workers, deadline);

    // Wait for all workers to finish
    for handle in worker_handles {
        let _ = handle.join();
    }

    let outcomes = outcomes?;

    let mut total_statistics = SearchStatistics::new(search_config.pruning);
    let mut worker_statistics = Vec::with_capacity(num_workers);
    let mut complete = true;
    for (worker_id, outcome) in outcomes.into_iter().enumerate() {
        cache.merge(outcome.cache);
        total_statistics.merge(&outcome.statistics);
        worker_statistics.push((worker_id, outcome.statistics));
        complete &= outcome.complete;
    }
    total_statistics.elapsed_time = start_time.elapsed();

    let status = if complete {
        SearchStatus::Complete
    } else {
        SearchStatus::TimedOut
    };
    let program = cache.get(request.target_key()).cloned();

    info!(
        found = program.is_some(),
        length = program.as_ref().map(Vec::len),
        status = %status,
        elapsed = ?total_statistics.elapsed_time,
        "parallel search finished"
    );

    Ok(ParallelResult {
        best_result: match program {
            Some(program) => SearchResult::found(program, status, total_statistics.clone()),
            None => SearchResult::not_found(status, total_statistics.clone()),
        },
        total_statistics,
        worker_statistics,
        cache,
    })
}

/// Coordinator loop that receives messages from workers and collects their outcomes.
fn run_coordinator(
    channels: CoordinatorChannels,
    num_workers: usize,
    deadline: Option<Instant>,
) -> Result<Vec<WorkerOutcome>> {
    let mut outcomes: Vec<Option<WorkerOutcome>> = (0..num_workers).map(|_| None).collect();
    let mut errors = Vec::new();
    let mut finished_count = 0;

    while finished_count < num_workers {
        if !channels.progress.stopped() && deadline.is_some_and(|d| Instant::now() >= d) {
            warn!("deadline reached, stopping workers");
            channels.progress.request_stop();
        }

        // Receive with timeout to allow periodic checks
        match channels.from_workers.recv_timeout(Duration::from_millis(100)) {
            Ok(WorkerMessage::Improvement { worker_id, program }) => {
                debug!(
                    worker_id,
                    length = program.len(),
                    program = %disassemble_inline(&program),
                    "new shortest match"
                );
            }
            Ok(WorkerMessage::Finished {
                worker_id,
                cache,
                statistics,
                complete,
            }) => {
                debug!(
                    worker_id,
                    generated = statistics.candidates_generated,
                    complete,
                    "worker finished"
                );
                outcomes[worker_id] = Some(WorkerOutcome {
                    cache,
                    statistics,
                    complete,
                });
                finished_count += 1;
            }
            Ok(WorkerMessage::Error { worker_id, message }) => {
                warn!(worker_id, %message, "worker failed, stopping the rest");
                channels.progress.request_stop();
                errors.push(format!("worker {}: {}", worker_id, message));
                finished_count += 1;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    if !errors.is_empty() {
        return Err(SearchError::Worker(errors.join("; ")));
    }

    outcomes
        .into_iter()
        .enumerate()
        .map(|(worker_id, outcome)| {
            outcome.ok_or_else(|| {
                SearchError::Worker(format!("worker {} exited without reporting", worker_id))
            })
        })
        .collect()
}

/// Worker function: exhaust one shard and report the cache it built.
fn run_worker(
    worker_id: usize,
    shard: Shard,
    request: &SearchRequest,
    config: &SearchConfig,
    deadline: Option<Instant>,
    channels: WorkerChannels,
) {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        search_shard(worker_id, shard, request, config, deadline, &channels)
    }));

    let message = match outcome {
        Ok(outcome) => WorkerMessage::Finished {
            worker_id,
            cache: outcome.cache,
            statistics: outcome.statistics,
            complete: outcome.complete,
        },
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "worker panicked".to_string());
            WorkerMessage::Error { worker_id, message }
        }
    };
    let _ = channels.to_coordinator.send(message);
}

fn search_shard(
    worker_id: usize,
    shard: Shard,
    request: &SearchRequest,
    config: &SearchConfig,
    deadline: Option<Instant>,
    channels: &WorkerChannels,
) -> WorkerOutcome {
    let started = Instant::now();
    let mut pruner = config.pruning.build_with_solver(&config.solver);
    let mut cache = ResultCache::new();
    let mut statistics = SearchStatistics::new(config.pruning);

    let generator = ProgramGenerator::new(request.bounds)
        .with_pruner(pruner.as_mut())
        .with_shard(shard)
        .with_stop_flag(&channels.progress.stop)
        .with_deadline(deadline);

    let interrupted = explore(
        generator,
        request,
        config.progress_interval,
        &mut cache,
        &mut statistics,
        |program| {
            if channels.progress.record_match(program.len()) {
                let _ = channels.to_coordinator.send(WorkerMessage::Improvement {
                    worker_id,
                    program: program.to_vec(),
                });
            }
        },
    );

    if let Some(ref pruner) = pruner {
        statistics.pruning_statistics = pruner.statistics();
    }
    statistics.elapsed_time = started.elapsed();

    WorkerOutcome {
        cache,
        statistics,
        complete: !interrupted,
    }
}
