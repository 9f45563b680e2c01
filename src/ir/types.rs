//! Core types for the memory-machine IR

use std::fmt;

/// Contents of a single memory cell
pub type Value = u64;

/// Index of a memory cell
pub type Address = usize;

/// The four operation kinds of the machine, in generation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpKind {
    Load,
    Swap,
    Xor,
    Inc,
}

impl OpKind {
    /// All kinds in the order the generator enumerates them
    pub const ALL: [OpKind; 4] = [OpKind::Load, OpKind::Swap, OpKind::Xor, OpKind::Inc];

    /// Position of this kind in [`OpKind::ALL`]
    pub fn index(self) -> usize {
        match self {
            OpKind::Load => 0,
            OpKind::Swap => 1,
            OpKind::Xor => 2,
            OpKind::Inc => 3,
        }
    }

    /// Assembler mnemonic
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpKind::Load => "LOAD",
            OpKind::Swap => "SWAP",
            OpKind::Xor => "XOR",
            OpKind::Inc => "INC",
        }
    }

    /// Parse a mnemonic (case-insensitive)
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LOAD" => Some(OpKind::Load),
            "SWAP" => Some(OpKind::Swap),
            "XOR" => Some(OpKind::Xor),
            "INC" => Some(OpKind::Inc),
            _ => None,
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
