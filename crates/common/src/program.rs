//! Program representation for duet instruction streams.

use crate::instruction::Instruction;

/// A duet program: an ordered, immutable sequence of instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// The instruction stream.
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Create a new program from a vector of instructions.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Instruction at a signed program counter, if it is in bounds.
    pub fn get(&self, pc: i64) -> Option<&Instruction> {
        usize::try_from(pc)
            .ok()
            .and_then(|i| self.instructions.get(i))
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Opcode;

    #[test]
    fn empty_program() {
        let program = Program::new(vec![]);
        assert!(program.is_empty());
        assert_eq!(program.len(), 0);
        assert_eq!(program.get(0), None);
    }

    #[test]
    fn get_rejects_negative_pc() {
        let program = Program::new(vec![Instruction::unary(Opcode::Snd, "1")]);
        assert_eq!(program.get(-1), None);
        assert_eq!(program.get(1), None);
        assert_eq!(program.get(0), Some(&Instruction::unary(Opcode::Snd, "1")));
    }
}
