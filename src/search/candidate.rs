//! Lazy enumeration of candidate programs
//!
//! Programs come out in strictly increasing length. Within one length the
//! order is: every sequence of operation kinds (`LOAD`, `SWAP`, `XOR`, `INC`,
//! last position varying fastest), and for each kind sequence the Cartesian
//! product of the per-position argument domains (again last position fastest).

use crate::ir::{Instruction, OpKind, Program, Value};
use crate::pruning::{Pruner, PruningStrategy};
use crate::search::config::SearchBounds;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Candidates between two deadline checks
pub const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Number of distinct arguments `kind` can take under `bounds`
pub fn alphabet_size(kind: OpKind, bounds: &SearchBounds) -> u64 {
    let m = bounds.max_mem as u64;
    match kind {
        OpKind::Load => bounds.max_val.saturating_add(1),
        OpKind::Swap | OpKind::Xor => m.saturating_mul(m),
        OpKind::Inc => m,
    }
}

/// The `index`-th instruction of `kind` in generation order
pub fn instruction_at(kind: OpKind, index: u64, bounds: &SearchBounds) -> Instruction {
    let m = bounds.max_mem as u64;
    match kind {
        OpKind::Load => Instruction::load(index as Value),
        OpKind::Swap => Instruction::swap((index / m) as usize, (index % m) as usize),
        OpKind::Xor => Instruction::xor((index / m) as usize, (index % m) as usize),
        OpKind::Inc => Instruction::inc(index as usize),
    }
}

/// Every single instruction the generator can place at one position, in order
pub fn instruction_alphabet(bounds: &SearchBounds) -> Vec<Instruction> {
    OpKind::ALL
        .iter()
        .flat_map(|&kind| {
            (0..alphabet_size(kind, bounds)).map(move |i| instruction_at(kind, i, bounds))
        })
        .collect()
}

/// Number of programs the unfiltered generator yields (saturating)
pub fn candidate_count(bounds: &SearchBounds) -> u64 {
    let alphabet = OpKind::ALL
        .iter()
        .fold(0u64, |acc, &kind| acc.saturating_add(alphabet_size(kind, bounds)));

    let mut total = 0u64;
    let mut per_length = 1u64;
    for _ in 0..bounds.max_length {
        per_length = per_length.saturating_mul(alphabet);
        total = total.saturating_add(per_length);
    }
    total
}

/// Restrict a generator to programs whose leading instruction falls in one shard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shard {
    pub worker_id: usize,
    pub num_workers: usize,
}

impl Shard {
    pub fn new(worker_id: usize, num_workers: usize) -> Self {
        Self {
            worker_id,
            num_workers: num_workers.max(1),
        }
    }

    /// Whether the leading instruction with flat alphabet index `index` is ours
    pub fn owns(&self, index: u64) -> bool {
        index % self.num_workers as u64 == self.worker_id as u64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorStatistics {
    /// Programs materialized and offered to the pruner
    pub generated: u64,
    /// Programs the pruner rejected
    pub pruned: u64,
    /// Programs skipped because another shard owns them
    pub skipped: u64,
}

/// Lazy, finite, single-pass program enumerator
pub struct ProgramGenerator<'a> {
    bounds: SearchBounds,
    /// Kinds with a non-empty argument domain, in generation order
    kinds: Vec<OpKind>,
    sizes: Vec<u64>,
    /// Offset of each kind's first instruction in the single-instruction alphabet
    offsets: Vec<u64>,
    /// Per-position index into `kinds`
    kind_digits: Vec<usize>,
    /// Per-position argument index
    arg_digits: Vec<u64>,
    /// The current digits have not been yielded or examined yet
    pending: bool,
    done: bool,
    pruner: Option<&'a mut Pruner>,
    shard: Option<Shard>,
    stop: Option<&'a AtomicBool>,
    deadline: Option<Instant>,
    interrupted: bool,
    ticks: u64,
    statistics: GeneratorStatistics,
}

impl<'a> ProgramGenerator<'a> {
    pub fn new(bounds: SearchBounds) -> Self {
        let mut kinds = Vec::new();
        let mut sizes = Vec::new();
        let mut offsets = Vec::new();
        let mut offset = 0u64;
        for &kind in OpKind::ALL.iter() {
            let size = alphabet_size(kind, &bounds);
            if size > 0 {
                kinds.push(kind);
                sizes.push(size);
                offsets.push(offset);
                offset = offset.saturating_add(size);
            }
        }

        let done = bounds.max_length == 0 || kinds.is_empty();
        Self {
            bounds,
            kinds,
            sizes,
            offsets,
            kind_digits: vec![0],
            arg_digits: vec![0],
            pending: true,
            done,
            pruner: None,
            shard: None,
            stop: None,
            deadline: None,
            interrupted: false,
            ticks: 0,
            statistics: GeneratorStatistics::default(),
        }
    }

    /// Yield only programs `pruner` accepts
    pub fn with_pruner(mut self, pruner: Option<&'a mut Pruner>) -> Self {
        self.pruner = pruner;
        self
    }

    pub fn with_shard(mut self, shard: Shard) -> Self {
        self.shard = Some(shard);
        self
    }

    /// End the enumeration early once `stop` is set
    pub fn with_stop_flag(mut self, stop: &'a AtomicBool) -> Self {
        self.stop = Some(stop);
        self
    }

    /// End the enumeration once `deadline` has passed
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Whether the enumeration ended at the deadline or stop flag rather
    /// than by exhausting the space
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn statistics(&self) -> GeneratorStatistics {
        self.statistics
    }

    /// Length of the programs currently being produced
    pub fn current_length(&self) -> usize {
        self.kind_digits.len()
    }

    fn size_at(&self, position: usize) -> u64 {
        self.sizes[self.kind_digits[position]]
    }

    /// Step the odometer; false once every program has been produced
    fn advance(&mut self) -> bool {
        let length = self.kind_digits.len();

        for pos in (0..length).rev() {
            if self.arg_digits[pos] + 1 < self.size_at(pos) {
                self.arg_digits[pos] += 1;
                return true;
            }
            self.arg_digits[pos] = 0;
        }

        for pos in (0..length).rev() {
            if self.kind_digits[pos] + 1 < self.kinds.len() {
                self.kind_digits[pos] += 1;
                return true;
            }
            self.kind_digits[pos] = 0;
        }

        if length < self.bounds.max_length {
            self.kind_digits = vec![0; length + 1];
            self.arg_digits = vec![0; length + 1];
            return true;
        }
        false
    }

    fn materialize(&self) -> Program {
        self.kind_digits
            .iter()
            .zip(&self.arg_digits)
            .map(|(&k, &arg)| instruction_at(self.kinds[k], arg, &self.bounds))
            .collect()
    }

    /// Flat alphabet index of the leading instruction
    fn leading_index(&self) -> u64 {
        self.offsets[self.kind_digits[0]] + self.arg_digits[0]
    }

    /// Jump past every program sharing the current leading instruction and
    /// kind sequence; returns how many were skipped
    fn skip_leading_block(&mut self) -> u64 {
        let mut block = 1u64;
        for pos in 1..self.kind_digits.len() {
            let size = self.size_at(pos);
            block = block.saturating_mul(size);
            self.arg_digits[pos] = size - 1;
        }
        block
    }

    fn stopped(&mut self) -> bool {
        self.ticks += 1;
        let expired = self.deadline.is_some_and(|deadline| {
            self.ticks % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= deadline
        });
        if expired || self.stop.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            self.interrupted = true;
        }
        self.interrupted
    }
}

impl Iterator for ProgramGenerator<'_> {
    type Item = Program;

    fn next(&mut self) -> Option<Program> {
        loop {
            if self.done {
                return None;
            }
            if !self.pending && !self.advance() {
                self.done = true;
                return None;
            }
            self.pending = false;

            if self.stopped() {
                self.done = true;
                return None;
            }

            if let Some(shard) = self.shard {
                if !shard.owns(self.leading_index()) {
                    let skipped = self.skip_leading_block();
                    self.statistics.skipped = self.statistics.skipped.saturating_add(skipped);
                    continue;
                }
            }

            let program = self.materialize();
            self.statistics.generated += 1;

            if let Some(pruner) = self.pruner.as_deref_mut() {
                if !pruner.is_valid(&program, self.bounds.max_mem, self.bounds.max_val) {
                    self.statistics.pruned += 1;
                    continue;
                }
            }

            return Some(program);
        }
    }
}
