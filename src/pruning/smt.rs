//! SMT-backed pruning
//!
//! Every cell starts as a fresh 32-bit variable bounded to `[0, max_val]`.
//! The program is applied symbolically; a `LOAD` whose literal cannot inhabit
//! the bounded domain, or an `XOR` whose result can never stay in it, marks
//! the program infeasible. `INC` follows the wrapping model.
//!
//! One solver session is reused across calls. Per-program constraints live in
//! a push/pop scope, so nothing leaks from one verdict into the next.

use crate::ir::{Instruction, Value};
use crate::pruning::{PruningStatistics, PruningStrategy};
use crate::semantics::smt::{
    SolverConfig, SymbolicState, cell_const, create_solver_with_config, fits_cell, within_domain,
};
use std::collections::HashMap;
use tracing::{debug, trace};
use z3::ast::{Ast, BV, Bool};
use z3::{SatResult, Solver};

pub struct SmtPruning {
    solver: Solver,
    config: SolverConfig,
    /// Initial symbolic cells per memory size
    cells: HashMap<usize, Vec<BV>>,
    /// Domain bound the solver session was set up for
    max_val: Option<Value>,
    statistics: PruningStatistics,
}

impl Default for SmtPruning {
    fn default() -> Self {
        Self::new()
    }
}

impl SmtPruning {
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        let solver = create_solver_with_config(&config);
        Self {
            solver,
            config,
            cells: HashMap::new(),
            max_val: None,
            statistics: PruningStatistics::default(),
        }
    }

    fn initial_cells(&mut self, max_mem: usize) -> Vec<BV> {
        self.cells
            .entry(max_mem)
            .or_insert_with(|| SymbolicState::new_symbolic("mem", max_mem).cells)
            .clone()
    }

    /// Whether `constraint` can hold alongside the current assertions
    fn feasible(&mut self, constraint: &Bool) -> bool {
        self.statistics.solver_queries += 1;
        self.solver.push();
        self.solver.assert(constraint);
        let result = self.solver.check();
        self.solver.pop(1);
        self.interpret(result)
    }

    /// Map a solver answer to a verdict. Only unsat prunes; unknown is
    /// counted and treated as feasible.
    fn interpret(&mut self, result: SatResult) -> bool {
        match result {
            SatResult::Sat => true,
            SatResult::Unsat => {
                self.statistics.solver_unsat += 1;
                false
            }
            SatResult::Unknown => {
                self.statistics.solver_unknown += 1;
                debug!(reason = ?self.solver.get_reason_unknown(), "solver returned unknown");
                true
            }
        }
    }

    fn check(&mut self, program: &[Instruction], max_mem: usize, max_val: Value) -> bool {
        if self.max_val != Some(max_val) {
            trace!(max_val, "resetting solver session");
            self.solver = create_solver_with_config(&self.config);
            self.max_val = Some(max_val);
        }

        let initial = self.initial_cells(max_mem);
        let mut state = SymbolicState::from_cells(initial.clone());

        self.solver.push();
        for constraint in state.domain_constraints(max_val) {
            self.solver.assert(&constraint);
        }
        let verdict = self.apply(program, &initial, &mut state, max_val);
        self.solver.pop(1);

        verdict
    }

    fn apply(
        &mut self,
        program: &[Instruction],
        initial: &[BV],
        state: &mut SymbolicState,
        max_val: Value,
    ) -> bool {
        for instr in program {
            if instr.addresses().iter().any(|&a| a >= state.cells.len()) {
                return false;
            }
            match *instr {
                Instruction::Load { value, address } => {
                    if !fits_cell(value) {
                        return false;
                    }
                    // The literal must be a value the cell could hold at all.
                    let constraint = initial[address].eq(&cell_const(value));
                    if !self.feasible(&constraint) {
                        return false;
                    }
                    state.load(address, value);
                }
                Instruction::Swap { lhs, rhs } => state.swap(lhs, rhs),
                Instruction::Xor { dst, src } => {
                    let term = state.xor_term(dst, src);
                    if !self.feasible(&within_domain(&term, max_val)) {
                        return false;
                    }
                    state.set(dst, term);
                }
                Instruction::Inc { address } => state.inc_wrapping(address, max_val),
            }
        }

        true
    }
}

impl PruningStrategy for SmtPruning {
    fn is_valid(&mut self, program: &[Instruction], max_mem: usize, max_val: Value) -> bool {
        let verdict = self.check(program, max_mem, max_val);
        self.statistics.record(verdict)
    }

    fn name(&self) -> &'static str {
        "smt"
    }

    fn statistics(&self) -> PruningStatistics {
        self.statistics
    }
}
