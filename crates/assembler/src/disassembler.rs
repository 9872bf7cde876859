//! Disassembler: program → canonical text.
//!
//! One instruction per line, single spaces between tokens, no comments and
//! no blank lines.

use duet_common::Program;

/// Disassemble a program into canonical text.
pub fn disassemble(program: &Program) -> String {
    let mut out = String::new();
    for instr in &program.instructions {
        out.push_str(&instr.to_string());
        out.push('\n');
    }
    out
}
