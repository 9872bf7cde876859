//! Duet assembler — program text ↔ [`Program`].
//!
//! Program text holds one instruction per line, `opcode operand1[ operand2]`.
//! Blank lines and `;` comments are skipped.
//!
//! # Usage
//!
//! ```
//! use duet_assembler::{assemble, disassemble};
//!
//! let text = "set a 1\nsnd a\n";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.len(), 2);
//! assert_eq!(disassemble(&program), text);
//! ```

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use duet_common::Program;
use lexer::tokenize_line;
use parser::parse_line;

/// Assemble text into a program.
///
/// Returns the first error encountered.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    let mut instructions = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let tokens = tokenize_line(line);
        if let Some(instr) = parse_line(&tokens, idx + 1)? {
            instructions.push(instr);
        }
    }

    Ok(Program::new(instructions))
}

/// Disassemble a program into canonical text.
pub fn disassemble(program: &Program) -> String {
    disassembler::disassemble(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use duet_common::{Instruction, Opcode};

    #[test]
    fn assemble_minimal() {
        let program = assemble("set a 1\nsnd a\n").unwrap();
        assert_eq!(
            program.instructions,
            vec![
                Instruction::binary(Opcode::Set, "a", "1"),
                Instruction::unary(Opcode::Snd, "a"),
            ]
        );
    }

    #[test]
    fn assemble_without_trailing_newline() {
        let program = assemble("rcv a").unwrap();
        assert_eq!(program.len(), 1);
    }

    #[test]
    fn assemble_with_comments_and_blanks() {
        let text = "\
; part two setup
set i 31

snd p ; report id
";
        let program = assemble(text).unwrap();
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn roundtrip_noncanonical_text() {
        let first = assemble("  set   a  1\n\nadd a\t2\n").unwrap();
        let canonical = disassemble(&first);
        assert_eq!(canonical, "set a 1\nadd a 2\n");
        assert_eq!(assemble(&canonical).unwrap(), first);
    }

    #[test]
    fn error_reports_correct_line() {
        let err = assemble("set a 1\n\nnop\n").unwrap_err();
        assert!(matches!(err, AsmError::UnknownOpcode { line: 3, .. }));
    }

    #[test]
    fn every_opcode_roundtrips() {
        for op in duet_common::opcode::ALL_OPCODES {
            let text = match op.arity() {
                1 => format!("{op} a\n"),
                _ => format!("{op} a -3\n"),
            };
            let program = assemble(&text).unwrap();
            assert_eq!(disassemble(&program), text, "roundtrip failed for {op}");
        }
    }
}
