//! Duet common types.
//!
//! This crate provides the program model shared by the assembler, the VM
//! and the CLI:
//!
//! - [`Opcode`] — the nine opcodes of the instruction set
//! - [`Register`] — a single-letter register name
//! - [`Instruction`] — an opcode with its operand tokens
//! - [`Program`] — an immutable sequence of instructions
//! - [`ParseError`] — errors from interpreting opcode and register tokens

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod register;

// Re-export commonly used types at the crate root.
pub use error::ParseError;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use program::Program;
pub use register::Register;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every lowercase letter is a register and displays as itself.
        #[test]
        fn lowercase_letters_are_registers(c in proptest::char::range('a', 'z')) {
            let reg = Register::new(c).unwrap();
            prop_assert_eq!(reg.name(), c);
            prop_assert!(reg.index() < Register::COUNT);
        }

        /// Integer literals are never mistaken for registers.
        #[test]
        fn integers_are_not_registers(n in any::<i64>()) {
            prop_assert!(Register::from_token(&n.to_string()).is_none());
        }

        /// Arbitrary strings either name an opcode or report themselves.
        #[test]
        fn opcode_parse_is_total(s in "[a-z]{0,4}") {
            match s.parse::<Opcode>() {
                Ok(op) => prop_assert_eq!(op.mnemonic(), s.as_str()),
                Err(e) => prop_assert_eq!(e, ParseError::UnknownOpcode(s.clone())),
            }
        }
    }
}
