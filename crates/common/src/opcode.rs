//! Opcode definitions for the duet instruction set.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Identifies the operation to perform.
///
/// The discriminants are dense (`0..COUNT`) so per-opcode counters can be
/// stored in a fixed array indexed by `opcode as usize`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    /// Play a value: cache it (plain mode) or send it (piped mode).
    Snd = 0,
    /// `reg := value`.
    Set = 1,
    /// `reg += value`.
    Add = 2,
    /// `reg -= value`.
    Sub = 3,
    /// `reg *= value`.
    Mul = 4,
    /// `reg := reg rem value`, truncated toward zero.
    Mod = 5,
    /// Recover the played value (plain mode) or receive one (piped mode).
    Rcv = 6,
    /// Jump by the second operand if the first is greater than zero.
    Jgz = 7,
    /// Jump by the second operand if the first is nonzero.
    Jnz = 8,
}

/// All opcodes, in discriminant order.
pub const ALL_OPCODES: [Opcode; Opcode::COUNT] = [
    Opcode::Snd,
    Opcode::Set,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Mod,
    Opcode::Rcv,
    Opcode::Jgz,
    Opcode::Jnz,
];

impl Opcode {
    /// Number of opcodes in the instruction set.
    pub const COUNT: usize = 9;

    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Snd => "snd",
            Opcode::Set => "set",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Mod => "mod",
            Opcode::Rcv => "rcv",
            Opcode::Jgz => "jgz",
            Opcode::Jnz => "jnz",
        }
    }

    /// Number of operands this opcode takes.
    pub fn arity(&self) -> usize {
        match self {
            Opcode::Snd | Opcode::Rcv => 1,
            _ => 2,
        }
    }
}

impl FromStr for Opcode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == s)
            .copied()
            .ok_or_else(|| ParseError::UnknownOpcode(s.to_string()))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_are_dense() {
        for (i, op) in ALL_OPCODES.iter().enumerate() {
            assert_eq!(*op as usize, i, "{op:?} out of order");
        }
    }

    #[test]
    fn mnemonic_roundtrip() {
        for &op in &ALL_OPCODES {
            assert_eq!(op.mnemonic().parse::<Opcode>(), Ok(op));
        }
    }

    #[test]
    fn unknown_mnemonic_rejected() {
        assert_eq!(
            "nop".parse::<Opcode>(),
            Err(ParseError::UnknownOpcode("nop".to_string()))
        );
    }

    #[test]
    fn mnemonics_are_case_sensitive() {
        assert!("SET".parse::<Opcode>().is_err());
    }

    #[test]
    fn arity() {
        assert_eq!(Opcode::Snd.arity(), 1);
        assert_eq!(Opcode::Rcv.arity(), 1);
        assert_eq!(Opcode::Set.arity(), 2);
        assert_eq!(Opcode::Jnz.arity(), 2);
    }
}
