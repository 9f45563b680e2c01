//! Textual assembler: the `parse` / `format` pair the search facade relies on

use crate::ir::Instruction;
use crate::parser::{ParseError, parse_assembly_string};

/// Text -> program
pub fn assemble(text: &str) -> Result<Vec<Instruction>, ParseError> {
    parse_assembly_string(text)
}

/// Program -> text, one instruction per line. `assemble(&disassemble(p)) == p`.
pub fn disassemble(program: &[Instruction]) -> String {
    program
        .iter()
        .map(|instr| instr.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Program -> single-line text with `; ` separators, for diagnostics
pub fn disassemble_inline(program: &[Instruction]) -> String {
    if program.is_empty() {
        return "<identity>".to_string();
    }
    program
        .iter()
        .map(|instr| instr.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disassemble() {
        let program = vec![
            Instruction::load(3),
            Instruction::swap(0, 1),
            Instruction::inc(2),
        ];
        assert_eq!(disassemble(&program), "LOAD 3\nSWAP 0, 1\nINC 2");
        assert_eq!(disassemble_inline(&program), "LOAD 3; SWAP 0, 1; INC 2");
    }

    #[test]
    fn test_assemble_inverts_disassemble() {
        let program = vec![
            Instruction::Load {
                value: 5,
                address: 1,
            },
            Instruction::xor(1, 0),
            Instruction::inc(0),
        ];
        assert_eq!(assemble(&disassemble(&program)).unwrap(), program);
        assert_eq!(assemble(&disassemble_inline(&program)).unwrap(), program);
    }

    #[test]
    fn test_disassemble_empty() {
        assert_eq!(disassemble(&[]), "");
        assert_eq!(disassemble_inline(&[]), "<identity>");
    }
}
