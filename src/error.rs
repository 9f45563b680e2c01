//! Errors raised before or around a search.
//!
//! "No program found" is not an error: searches report it as an absent
//! result. Everything here is misconfiguration or malformed input.

use thiserror::Error;

use crate::ir::Address;
use crate::parser::ParseError;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("max_mem must be at least 1")]
    EmptyMemory,

    #[error("{which} state has {actual} cells but max_mem is {expected}")]
    StateLength {
        which: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("output size {output_size} must be between 1 and max_mem ({max_mem})")]
    OutputSize { output_size: usize, max_mem: usize },

    #[error("max_val {max_val} does not fit the 32-bit value domain")]
    ValueDomain { max_val: u64 },

    #[error("instruction {index} references cell {address} but max_mem is {max_mem}")]
    AddressOutOfRange {
        index: usize,
        address: Address,
        max_mem: usize,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("search worker failed: {0}")]
    Worker(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_length_message() {
        let err = SearchError::StateLength {
            which: "target",
            expected: 3,
            actual: 4,
        };
        assert_eq!(err.to_string(), "target state has 4 cells but max_mem is 3");
    }

    #[test]
    fn test_parse_error_is_transparent() {
        let parse = ParseError::new(2, "unknown mnemonic: MOV", "MOV 1");
        let err: SearchError = parse.clone().into();
        assert_eq!(err.to_string(), parse.to_string());
    }
}
