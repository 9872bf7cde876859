//! Runtime errors for the duet VM.
//!
//! Instruction-level errors carry the index of the failing instruction
//! (`at`) for debugging.

use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// An operand is neither a register name nor an integer literal, or a
    /// destination operand is not a register.
    #[error("malformed operand '{token}' at instruction {at}")]
    MalformedOperand { at: usize, token: String },

    /// `mod` with a zero divisor.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// Both instances are parked in `snd` on full pipes, so neither will
    /// ever receive again.
    #[error("send deadlock at instruction {at}: both pipes full")]
    SendDeadlock { at: usize },

    /// A run was configured with unusable settings.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            RuntimeError::MalformedOperand {
                at: 3,
                token: "1x".to_string()
            }
            .to_string(),
            "malformed operand '1x' at instruction 3"
        );
        assert_eq!(
            RuntimeError::DivisionByZero { at: 5 }.to_string(),
            "division by zero at instruction 5"
        );
        assert_eq!(
            RuntimeError::SendDeadlock { at: 2 }.to_string(),
            "send deadlock at instruction 2: both pipes full"
        );
        assert_eq!(
            RuntimeError::InvalidConfig("pipe capacity must be at least 1".to_string())
                .to_string(),
            "invalid configuration: pipe capacity must be at least 1"
        );
    }
}
