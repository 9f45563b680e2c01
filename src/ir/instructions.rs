//! Instruction definitions for the memory machine

use crate::ir::types::{Address, OpKind, Value};
use std::fmt;

/// Instructions understood by the abstract machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Write a literal into a cell
    Load { value: Value, address: Address },
    /// Exchange two cells
    Swap { lhs: Address, rhs: Address },
    /// `dst <- dst ^ src`
    Xor { dst: Address, src: Address },
    /// `addr <- addr + 1`
    Inc { address: Address },
}

/// An ordered instruction sequence; empty is the identity transform
pub type Program = Vec<Instruction>;

impl Instruction {
    /// `LOAD value` into cell 0, the only load form the generator produces
    pub fn load(value: Value) -> Self {
        Instruction::Load { value, address: 0 }
    }

    pub fn swap(lhs: Address, rhs: Address) -> Self {
        Instruction::Swap { lhs, rhs }
    }

    pub fn xor(dst: Address, src: Address) -> Self {
        Instruction::Xor { dst, src }
    }

    pub fn inc(address: Address) -> Self {
        Instruction::Inc { address }
    }

    pub fn kind(&self) -> OpKind {
        match self {
            Instruction::Load { .. } => OpKind::Load,
            Instruction::Swap { .. } => OpKind::Swap,
            Instruction::Xor { .. } => OpKind::Xor,
            Instruction::Inc { .. } => OpKind::Inc,
        }
    }

    /// Cells this instruction reads or writes
    pub fn addresses(&self) -> Vec<Address> {
        match *self {
            Instruction::Load { address, .. } => vec![address],
            Instruction::Swap { lhs, rhs } => vec![lhs, rhs],
            Instruction::Xor { dst, src } => vec![dst, src],
            Instruction::Inc { address } => vec![address],
        }
    }

    /// Highest cell index referenced
    pub fn max_address(&self) -> Address {
        self.addresses().into_iter().max().unwrap_or(0)
    }

    /// True for `SWAP a, a` and `XOR a, a`
    pub fn is_self_referential(&self) -> bool {
        match *self {
            Instruction::Swap { lhs, rhs } => lhs == rhs,
            Instruction::Xor { dst, src } => dst == src,
            _ => false,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Load { value, address: 0 } => write!(f, "LOAD {}", value),
            Instruction::Load { value, address } => write!(f, "LOAD {}, {}", value, address),
            Instruction::Swap { lhs, rhs } => write!(f, "SWAP {}, {}", lhs, rhs),
            Instruction::Xor { dst, src } => write!(f, "XOR {}, {}", dst, src),
            Instruction::Inc { address } => write!(f, "INC {}", address),
        }
    }
}
