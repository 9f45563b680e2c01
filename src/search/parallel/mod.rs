//! The enumerative search split across worker threads.
//!
//! Programs are partitioned by their leading instruction: worker `w` of `n`
//! owns every program whose first instruction has alphabet index `i` with
//! `i % n == w`. Each worker runs its own pruner and cache over its share,
//! reports matches as it finds them, and hands its cache back on exit. The
//! coordinator enforces the deadline and folds the caches together in
//! worker-id order, so the merged answer does not depend on thread timing.
//!
//! ```ignore
//! use memopt::search::parallel::{ParallelConfig, run_parallel_search};
//!
//! let parallel = ParallelConfig::default().with_workers(4);
//! let result = run_parallel_search(&request, &search_config, &parallel)?;
//! ```

pub mod channel;
pub mod config;
pub mod coordinator;

pub use config::ParallelConfig;
pub use coordinator::{ParallelResult, run_parallel_search};
