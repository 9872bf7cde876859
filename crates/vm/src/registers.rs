//! Register file and operand resolution.

use crate::error::RuntimeError;
use duet_common::Register;

/// The 26 registers of one VM instance. Every register starts at 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
    slots: [i64; Register::COUNT],
}

impl Registers {
    /// Create a register file with every register at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a register.
    pub fn get(&self, reg: Register) -> i64 {
        self.slots[reg.index()]
    }

    /// Overwrite a register.
    pub fn set(&mut self, reg: Register, value: i64) {
        self.slots[reg.index()] = value;
    }

    /// Resolve an operand token to a value.
    ///
    /// A single lowercase letter reads that register; anything else must be
    /// a base-10 signed integer literal.
    pub fn resolve(&self, token: &str, at: usize) -> Result<i64, RuntimeError> {
        if let Some(reg) = Register::from_token(token) {
            return Ok(self.get(reg));
        }
        token
            .parse::<i64>()
            .map_err(|_| RuntimeError::MalformedOperand {
                at,
                token: token.to_string(),
            })
    }

    /// Resolve a destination operand, which must name a register.
    pub fn target(token: &str, at: usize) -> Result<Register, RuntimeError> {
        Register::from_token(token).ok_or_else(|| RuntimeError::MalformedOperand {
            at,
            token: token.to_string(),
        })
    }
}
