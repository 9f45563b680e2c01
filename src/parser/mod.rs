//! Assembly text parser for the memory machine
//!
//! One instruction per line (or several separated by `;`), mnemonic followed
//! by comma- or space-separated integer arguments:
//!
//! ```text
//! LOAD 3          # cell 0 <- 3
//! LOAD 7, 2       // cell 2 <- 7
//! SWAP 0, 1; XOR 1 0
//! INC 2
//! ```
//!
//! Mnemonics are case-insensitive, numbers may be decimal or `0x` hex.
//! `#` and `//` start comments.

use std::path::Path;
use thiserror::Error;

use crate::ir::{Address, Instruction, OpKind, Program, Value};

/// Parse error with location information
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_location(.line_number, .column, .message, .line_content))]
pub struct ParseError {
    pub line_number: usize,
    pub column: Option<usize>,
    pub message: String,
    pub line_content: String,
}

impl ParseError {
    pub fn new(
        line_number: usize,
        message: impl Into<String>,
        line_content: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            column: None,
            message: message.into(),
            line_content: line_content.into(),
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

/// `line N[, column C]: message`, the offending line, and a caret under the column
fn render_location(
    line_number: &usize,
    column: &Option<usize>,
    message: &str,
    line_content: &str,
) -> String {
    match column {
        Some(col) => format!(
            "line {}, column {}: {}\n  | {}\n  | {}^",
            line_number,
            col,
            message,
            line_content,
            " ".repeat(col.saturating_sub(1))
        ),
        None => format!("line {}: {}\n  | {}", line_number, message, line_content),
    }
}

/// Result of parsing a single statement
#[derive(Debug)]
pub enum LineResult {
    /// An instruction was parsed
    Instruction(Instruction),
    /// Statement was empty or a comment (skip it)
    Skip,
}

/// Parse a non-negative integer (decimal or hex)
pub fn parse_number(s: &str) -> Result<u64, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("empty numeric argument".to_string());
    }

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|e| format!("invalid hex argument '{}': {}", s, e))
    } else {
        s.parse::<u64>()
            .map_err(|e| format!("invalid argument '{}': {}", s, e))
    }
}

fn parse_address(s: &str) -> Result<Address, String> {
    let n = parse_number(s)?;
    Address::try_from(n).map_err(|_| format!("address {} is too large", n))
}

/// Strip comments from a line (handles `#` and `//`)
fn strip_comments(line: &str) -> &str {
    let mut end = line.len();

    if let Some(pos) = line.find("//") {
        end = end.min(pos);
    }
    if let Some(pos) = line.find('#') {
        end = end.min(pos);
    }

    &line[..end]
}

/// Split arguments on commas and/or whitespace
fn split_arguments(arguments: &str) -> Vec<&str> {
    arguments
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect()
}

fn expect_arity(kind: OpKind, args: &[&str], allowed: &[usize]) -> Result<(), String> {
    if allowed.contains(&args.len()) {
        return Ok(());
    }
    let expected = allowed
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" or ");
    Err(format!(
        "{} requires {} argument(s), got {}",
        kind,
        expected,
        args.len()
    ))
}

/// Parse LOAD value[, address]
fn parse_load(args: &[&str]) -> Result<Instruction, String> {
    expect_arity(OpKind::Load, args, &[1, 2])?;
    let value: Value = parse_number(args[0])?;
    let address = match args.get(1) {
        Some(a) => parse_address(a)?,
        None => 0,
    };
    Ok(Instruction::Load { value, address })
}

fn parse_pair(kind: OpKind, args: &[&str]) -> Result<(Address, Address), String> {
    expect_arity(kind, args, &[2])?;
    Ok((parse_address(args[0])?, parse_address(args[1])?))
}

/// Parse a single statement (no `;` separators)
pub fn parse_statement(statement: &str) -> Result<LineResult, String> {
    let trimmed = strip_comments(statement).trim();

    if trimmed.is_empty() {
        return Ok(LineResult::Skip);
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let mnemonic = parts.next().unwrap_or("");
    let arguments = split_arguments(parts.next().unwrap_or(""));

    let kind = OpKind::from_mnemonic(mnemonic)
        .ok_or_else(|| format!("unknown instruction: {}", mnemonic))?;

    let instruction = match kind {
        OpKind::Load => parse_load(&arguments)?,
        OpKind::Swap => {
            let (lhs, rhs) = parse_pair(kind, &arguments)?;
            Instruction::Swap { lhs, rhs }
        }
        OpKind::Xor => {
            let (dst, src) = parse_pair(kind, &arguments)?;
            Instruction::Xor { dst, src }
        }
        OpKind::Inc => {
            expect_arity(kind, &arguments, &[1])?;
            Instruction::Inc {
                address: parse_address(arguments[0])?,
            }
        }
    };

    Ok(LineResult::Instruction(instruction))
}

/// Parse a single line, which may hold several `;`-separated statements
pub fn parse_line(line: &str) -> Result<Vec<Instruction>, (usize, String)> {
    let code = strip_comments(line);
    let mut instructions = Vec::new();
    let mut offset = 0;

    for statement in code.split(';') {
        let leading = statement.len() - statement.trim_start().len();
        match parse_statement(statement) {
            Ok(LineResult::Instruction(instr)) => instructions.push(instr),
            Ok(LineResult::Skip) => {}
            Err(msg) => return Err((offset + leading + 1, msg)),
        }
        offset += statement.len() + 1;
    }

    Ok(instructions)
}

/// Parse an assembly file into a program
pub fn parse_assembly_file(path: &Path) -> Result<Program, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ParseError::new(
            0,
            format!("failed to read file: {}", e),
            path.display().to_string(),
        )
    })?;

    parse_assembly_string(&content)
}

/// Parse assembly text into a program. Text without instructions yields the
/// empty (identity) program.
pub fn parse_assembly_string(content: &str) -> Result<Program, ParseError> {
    let mut program = Program::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_number = line_num + 1; // 1-indexed

        match parse_line(line) {
            Ok(instructions) => program.extend(instructions),
            Err((column, msg)) => {
                return Err(ParseError::new(line_number, msg, line).with_column(column));
            }
        }
    }

    Ok(program)
}

impl std::str::FromStr for Instruction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_statement(s)? {
            LineResult::Instruction(instr) => Ok(instr),
            LineResult::Skip => Err("empty instruction".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42").unwrap(), 42);
        assert_eq!(parse_number(" 7 ").unwrap(), 7);
        assert_eq!(parse_number("0x10").unwrap(), 16);
        assert_eq!(parse_number("0XFF").unwrap(), 255);
    }

    #[test]
    fn test_parse_number_invalid() {
        assert!(parse_number("").is_err());
        assert!(parse_number("-1").is_err());
        assert!(parse_number("abc").is_err());
    }

    #[test]
    fn test_parse_statement_load() {
        match parse_statement("LOAD 3").unwrap() {
            LineResult::Instruction(Instruction::Load { value, address }) => {
                assert_eq!(value, 3);
                assert_eq!(address, 0);
            }
            _ => panic!("expected Load"),
        }

        match parse_statement("load 7, 2").unwrap() {
            LineResult::Instruction(Instruction::Load { value, address }) => {
                assert_eq!(value, 7);
                assert_eq!(address, 2);
            }
            _ => panic!("expected Load"),
        }
    }

    #[test]
    fn test_parse_statement_separators() {
        let a: Instruction = "SWAP 0, 1".parse().unwrap();
        let b: Instruction = "SWAP 0 1".parse().unwrap();
        let c: Instruction = "swap 0,1".parse().unwrap();
        assert_eq!(a, Instruction::swap(0, 1));
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_parse_statement_arity() {
        assert!(parse_statement("INC").is_err());
        assert!(parse_statement("INC 1, 2").is_err());
        assert!(parse_statement("XOR 1").is_err());
        assert!(parse_statement("LOAD 1, 2, 3").is_err());
    }

    #[test]
    fn test_parse_statement_unknown() {
        let err = parse_statement("MOV 1, 2").unwrap_err();
        assert!(err.contains("unknown instruction"));
    }

    #[test]
    fn test_parse_statement_skip() {
        assert!(matches!(parse_statement("").unwrap(), LineResult::Skip));
        assert!(matches!(parse_statement("   ").unwrap(), LineResult::Skip));
        assert!(matches!(
            parse_statement("# comment").unwrap(),
            LineResult::Skip
        ));
        assert!(matches!(
            parse_statement("// comment").unwrap(),
            LineResult::Skip
        ));
    }

    #[test]
    fn test_parse_line_multiple_statements() {
        let instrs = parse_line("LOAD 3; INC 1 ;XOR 1, 0 # trailing").unwrap();
        assert_eq!(
            instrs,
            vec![
                Instruction::load(3),
                Instruction::inc(1),
                Instruction::xor(1, 0)
            ]
        );
    }

    #[test]
    fn test_parse_line_error_column() {
        let (column, msg) = parse_line("LOAD 3; FOO 1").unwrap_err();
        assert_eq!(column, 9);
        assert!(msg.contains("FOO"));
    }

    #[test]
    fn test_parse_assembly_string() {
        let asm = "
        LOAD 3
        SWAP 0, 1
        LOAD 3
        SWAP 0, 2
        ";

        let program = parse_assembly_string(asm).unwrap();
        assert_eq!(
            program,
            vec![
                Instruction::load(3),
                Instruction::swap(0, 1),
                Instruction::load(3),
                Instruction::swap(0, 2),
            ]
        );
    }

    #[test]
    fn test_parse_assembly_string_empty_is_identity() {
        let program = parse_assembly_string("# nothing here\n\n").unwrap();
        assert!(program.is_empty());
    }

    #[test]
    fn test_parse_assembly_string_error_location() {
        let err = parse_assembly_string("LOAD 1\nINC x\n").unwrap_err();
        assert_eq!(err.line_number, 2);
        assert_eq!(err.column, Some(1));
        assert_eq!(err.line_content, "INC x");
    }

    #[test]
    fn test_parse_error_display() {
        let err = parse_assembly_string("LOAD 1\nINC x\n").unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.starts_with("line 2, column 1: invalid argument 'x'"));
        assert!(rendered.ends_with("\n  | INC x\n  | ^"));

        let plain = ParseError::new(4, "bad", "SWAP");
        assert_eq!(plain.to_string(), "line 4: bad\n  | SWAP");
    }

    #[test]
    fn test_parse_assembly_file() {
        let path = std::env::temp_dir().join(format!("memopt-parse-{}.asm", std::process::id()));
        std::fs::write(&path, "LOAD 2 # two\nSWAP 0, 1\n").unwrap();
        let program = parse_assembly_file(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            program.unwrap(),
            vec![Instruction::load(2), Instruction::swap(0, 1)]
        );
    }

    #[test]
    fn test_parse_assembly_file_missing() {
        let path = std::env::temp_dir().join("memopt-parse-does-not-exist.asm");
        let err = parse_assembly_file(&path).unwrap_err();
        assert_eq!(err.line_number, 0);
        assert!(err.message.starts_with("failed to read file"));
    }
}
