//! Configuration types for the search

use crate::error::{Result, SearchError};
use crate::ir::Value;
use crate::pruning::PruningKind;
use crate::semantics::smt::SolverConfig;
use crate::semantics::state::{MemoryState, project};
use std::time::Duration;

/// Mandatory bounds of the search space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchBounds {
    /// Longest program considered
    pub max_length: usize,
    /// Number of memory cells
    pub max_mem: usize,
    /// Largest `LOAD` literal generated
    pub max_val: Value,
}

impl SearchBounds {
    pub fn new(max_length: usize, max_mem: usize, max_val: Value) -> Self {
        Self {
            max_length,
            max_mem,
            max_val,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_mem == 0 {
            return Err(SearchError::EmptyMemory);
        }
        if self.max_val >= u32::MAX as Value {
            return Err(SearchError::ValueDomain {
                max_val: self.max_val,
            });
        }
        Ok(())
    }
}

/// One shortest-program query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub bounds: SearchBounds,
    /// Desired final state, `max_mem` cells long
    pub target: Vec<Value>,
    /// Start state (all zeros when absent)
    pub start: Option<Vec<Value>>,
    /// Compare only the leading cells when set
    pub output_size: Option<usize>,
}

impl SearchRequest {
    pub fn new(bounds: SearchBounds, target: Vec<Value>) -> Self {
        Self {
            bounds,
            target,
            start: None,
            output_size: None,
        }
    }

    pub fn with_start(mut self, start: Vec<Value>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_start_option(mut self, start: Option<Vec<Value>>) -> Self {
        self.start = start;
        self
    }

    pub fn with_output_size(mut self, output_size: usize) -> Self {
        self.output_size = Some(output_size);
        self
    }

    pub fn with_output_size_option(mut self, output_size: Option<usize>) -> Self {
        self.output_size = output_size;
        self
    }

    /// Reject inconsistent inputs before any candidate is generated
    pub fn validate(&self) -> Result<()> {
        self.bounds.validate()?;
        let max_mem = self.bounds.max_mem;

        if self.target.len() != max_mem {
            return Err(SearchError::StateLength {
                which: "target",
                expected: max_mem,
                actual: self.target.len(),
            });
        }
        if let Some(ref start) = self.start {
            if start.len() != max_mem {
                return Err(SearchError::StateLength {
                    which: "start",
                    expected: max_mem,
                    actual: start.len(),
                });
            }
        }
        if let Some(output_size) = self.output_size {
            if output_size == 0 || output_size > max_mem {
                return Err(SearchError::OutputSize {
                    output_size,
                    max_mem,
                });
            }
        }
        Ok(())
    }

    pub fn start_state(&self) -> MemoryState {
        match self.start {
            Some(ref start) => MemoryState::from_start(start, self.bounds.max_mem),
            None => MemoryState::zeroed(self.bounds.max_mem),
        }
    }

    /// The target as the cache keys it
    pub fn target_key(&self) -> &[Value] {
        project(&self.target, self.output_size)
    }
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Strategy each search instantiates
    pub pruning: PruningKind,
    /// Settings for the SMT strategy's solver
    pub solver: SolverConfig,
    /// Wall-clock budget (None = run to completion)
    pub timeout: Option<Duration>,
    /// Emit a progress event every this many candidates (0 = never)
    pub progress_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pruning: PruningKind::Basic,
            solver: SolverConfig::default(),
            timeout: None,
            progress_interval: 1_000_000,
        }
    }
}

impl SearchConfig {
    pub fn with_pruning(mut self, pruning: PruningKind) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
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

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }
}
