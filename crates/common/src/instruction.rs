//! A single duet instruction.
//!
//! Operands are kept as the raw tokens from the program text. Whether a
//! token names a register or an integer literal is decided when the
//! instruction executes, so a malformed operand surfaces as a runtime error
//! at the instruction that uses it.

use std::fmt;

use crate::opcode::Opcode;

/// One instruction: an opcode plus one or two operand tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// First operand. Always present.
    pub arg1: String,
    /// Second operand. Present only for binary opcodes.
    pub arg2: Option<String>,
}

impl Instruction {
    /// A one-operand instruction (`snd`, `rcv`).
    pub fn unary(opcode: Opcode, arg1: impl Into<String>) -> Self {
        Self {
            opcode,
            arg1: arg1.into(),
            arg2: None,
        }
    }

    /// A two-operand instruction.
    pub fn binary(opcode: Opcode, arg1: impl Into<String>, arg2: impl Into<String>) -> Self {
        Self {
            opcode,
            arg1: arg1.into(),
            arg2: Some(arg2.into()),
        }
    }

    /// Second operand, or an empty token when absent.
    ///
    /// The assembler guarantees binary opcodes carry one, so an empty token
    /// only reaches the resolver for hand-built instructions.
    pub fn arg2(&self) -> &str {
        self.arg2.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg2 {
            Some(arg2) => write!(f, "{} {} {}", self.opcode, self.arg1, arg2),
            None => write!(f, "{} {}", self.opcode, self.arg1),
        }
    }
}
