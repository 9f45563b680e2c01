//! Validation utilities for concrete equivalence checking

pub mod equivalence;
pub mod random;

pub use equivalence::{EquivalenceResult, check_equivalence_on_inputs, check_equivalence_on_states};
pub use random::{RandomStateConfig, generate_edge_case_states, generate_random_states};
