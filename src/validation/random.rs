//! Start-state generation for concrete equivalence checks

use crate::ir::Value;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration for random start-state generation
#[derive(Debug, Clone)]
pub struct RandomStateConfig {
    /// Number of random states to generate
    pub count: usize,
    /// Cells per state
    pub max_mem: usize,
    /// Largest cell value generated
    pub max_val: Value,
    /// Seed for the generator (None = seeded from the OS)
    pub seed: Option<u64>,
}

impl Default for RandomStateConfig {
    fn default() -> Self {
        RandomStateConfig {
            count: 10,
            max_mem: 3,
            max_val: 5,
            seed: None,
        }
    }
}

impl RandomStateConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_seed_option(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// Generate random start states with every cell in `[0, max_val]`
pub fn generate_random_states(config: &RandomStateConfig) -> Vec<Vec<Value>> {
    let mut rng: ChaCha8Rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };

    (0..config.count)
        .map(|_| {
            (0..config.max_mem)
                .map(|_| rng.random_range(0..=config.max_val))
                .collect()
        })
        .collect()
}

/// Generate edge case start states: uniform fills with the domain's corner
/// values, then every pairing of corners in the first two cells
pub fn generate_edge_case_states(max_mem: usize, max_val: Value) -> Vec<Vec<Value>> {
    let mut edge_values: Vec<Value> = vec![0, 1, max_val / 2, max_val.saturating_sub(1), max_val];
    edge_values.retain(|&v| v <= max_val);
    edge_values.sort_unstable();
    edge_values.dedup();

    let mut states: Vec<Vec<Value>> = edge_values
        .iter()
        .map(|&value| vec![value; max_mem])
        .collect();

    if max_mem >= 2 {
        for &first in &edge_values {
            for &second in &edge_values {
                let mut state = vec![0; max_mem];
                state[0] = first;
                state[1] = second;
                states.push(state);
            }
        }
    }

    states
}
