//! Pruning strategies: validity predicates consulted before a candidate is executed
//!
//! Three strategies trade cost against soundness:
//! - Basic: cheap syntactic filters
//! - Heuristic: a forward pass simulating a wrapping model of the machine
//! - Smt: z3-backed infeasibility detection over bounded 32-bit cells
//!
//! Basic and Heuristic are semi-sound: in some configurations they reject
//! programs that would be needed to reach the optimum. Only Smt rejects
//! exclusively on proven infeasibility.

pub mod basic;
pub mod heuristic;
pub mod smt;

pub use basic::{BasicPruning, BasicRejection};
pub use heuristic::{HeuristicPruning, HeuristicRejection};
pub use smt::SmtPruning;

use crate::ir::{Instruction, Value};
use crate::semantics::smt::SolverConfig;
use std::fmt;

/// A validity predicate over candidate programs.
///
/// Implementations may keep state across calls (statistics, solver sessions)
/// but a verdict depends only on the arguments.
pub trait PruningStrategy {
    /// Whether `program` should be executed and compared against the target
    fn is_valid(&mut self, program: &[Instruction], max_mem: usize, max_val: Value) -> bool;

    /// Short identifier, as accepted by [`PruningKind::from_str`](std::str::FromStr)
    fn name(&self) -> &'static str;

    /// Counters accumulated since construction
    fn statistics(&self) -> PruningStatistics;
}

/// Counters shared by all strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruningStatistics {
    /// Programs checked
    pub checked: u64,
    /// Programs rejected
    pub rejected: u64,
    /// Satisfiability checks issued
    pub solver_queries: u64,
    /// Checks that came back unsat
    pub solver_unsat: u64,
    /// Checks that came back unknown and were treated as feasible
    pub solver_unknown: u64,
}

impl PruningStatistics {
    /// Count one verdict and pass it through
    pub fn record(&mut self, valid: bool) -> bool {
        self.checked += 1;
        if !valid {
            self.rejected += 1;
        }
        valid
    }

    /// Fraction of checked programs that were rejected (0.0 to 1.0)
    pub fn rejection_rate(&self) -> f64 {
        if self.checked == 0 {
            0.0
        } else {
            self.rejected as f64 / self.checked as f64
        }
    }

    /// Counters accumulated after `earlier` was taken
    pub fn since(&self, earlier: &PruningStatistics) -> PruningStatistics {
        PruningStatistics {
            checked: self.checked - earlier.checked,
            rejected: self.rejected - earlier.rejected,
            solver_queries: self.solver_queries - earlier.solver_queries,
            solver_unsat: self.solver_unsat - earlier.solver_unsat,
            solver_unknown: self.solver_unknown - earlier.solver_unknown,
        }
    }

    /// Add another set of counters into this one
    pub fn merge(&mut self, other: &PruningStatistics) {
        self.checked += other.checked;
        self.rejected += other.rejected;
        self.solver_queries += other.solver_queries;
        self.solver_unsat += other.solver_unsat;
        self.solver_unknown += other.solver_unknown;
    }
}

/// Strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PruningKind {
    /// Every generated program is executed
    None,
    #[default]
    Basic,
    Heuristic,
    Smt,
}

impl PruningKind {
    /// Build a fresh strategy instance; `None` yields no strategy
    pub fn build(self) -> Option<Pruner> {
        self.build_with_solver(&SolverConfig::default())
    }

    /// Like [`PruningKind::build`], with solver settings for the SMT strategy
    pub fn build_with_solver(self, solver: &SolverConfig) -> Option<Pruner> {
        match self {
            PruningKind::None => None,
            PruningKind::Basic => Some(Pruner::Basic(BasicPruning::new())),
            PruningKind::Heuristic => Some(Pruner::Heuristic(HeuristicPruning::new())),
            PruningKind::Smt => Some(Pruner::Smt(SmtPruning::with_config(solver.clone()))),
        }
    }
}

impl fmt::Display for PruningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PruningKind::None => write!(f, "none"),
            PruningKind::Basic => write!(f, "basic"),
            PruningKind::Heuristic => write!(f, "heuristic"),
            PruningKind::Smt => write!(f, "smt"),
        }
    }
}

impl std::str::FromStr for PruningKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Ok(PruningKind::None),
            "basic" | "syntactic" => Ok(PruningKind::Basic),
            "heuristic" | "simulated" => Ok(PruningKind::Heuristic),
            "smt" | "z3" | "solver" => Ok(PruningKind::Smt),
            _ => Err(format!(
                "Unknown pruning strategy: '{}'. Valid options: none, basic, heuristic, smt",
                s
            )),
        }
    }
}

/// The closed set of strategies; a search holds one by value and never
/// needs to know which variant it is
pub enum Pruner {
    Basic(BasicPruning),
    Heuristic(HeuristicPruning),
    Smt(SmtPruning),
}

impl Pruner {
    pub fn kind(&self) -> PruningKind {
        match self {
            Pruner::Basic(_) => PruningKind::Basic,
            Pruner::Heuristic(_) => PruningKind::Heuristic,
            Pruner::Smt(_) => PruningKind::Smt,
        }
    }
}

impl PruningStrategy for Pruner {
    fn is_valid(&mut self, program: &[Instruction], max_mem: usize, max_val: Value) -> bool {
        match self {
            Pruner::Basic(p) => p.is_valid(program, max_mem, max_val),
            Pruner::Heuristic(p) => p.is_valid(program, max_mem, max_val),
            Pruner::Smt(p) => p.is_valid(program, max_mem, max_val),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Pruner::Basic(p) => p.name(),
            Pruner::Heuristic(p) => p.name(),
            Pruner::Smt(p) => p.name(),
        }
    }

    fn statistics(&self) -> PruningStatistics {
        match self {
            Pruner::Basic(p) => p.statistics(),
            Pruner::Heuristic(p) => p.statistics(),
            Pruner::Smt(p) => p.statistics(),
        }
    }
}

impl fmt::Debug for Pruner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pruner")
            .field("kind", &self.kind())
            .field("statistics", &self.statistics())
            .finish()
    }
}
