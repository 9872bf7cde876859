//! Errors for interpreting duet program tokens.

use thiserror::Error;

/// Errors that occur while turning text tokens into program model values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Mnemonic is not one of the nine duet opcodes.
    #[error("unknown opcode '{0}'")]
    UnknownOpcode(String),

    /// Token is not a single lowercase ASCII letter.
    #[error("invalid register '{0}'")]
    InvalidRegister(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_opcode() {
        assert_eq!(
            ParseError::UnknownOpcode("nop".to_string()).to_string(),
            "unknown opcode 'nop'"
        );
    }

    #[test]
    fn display_invalid_register() {
        assert_eq!(
            ParseError::InvalidRegister("A".to_string()).to_string(),
            "invalid register 'A'"
        );
    }
}
