//! Register names.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// A register name: one lowercase ASCII letter.
///
/// Stored as its index (`'a'` = 0 through `'z'` = 25).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Register(u8);

impl Register {
    /// Number of addressable registers.
    pub const COUNT: usize = 26;

    /// Register name from a character, if it is `a..=z`.
    pub const fn new(name: char) -> Option<Self> {
        if name.is_ascii_lowercase() {
            Some(Register(name as u8 - b'a'))
        } else {
            None
        }
    }

    /// Register named by an operand token, if the token is exactly one
    /// lowercase letter.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.as_bytes() {
            [b] => Register::new(*b as char),
            _ => None,
        }
    }

    /// Slot index in a register file.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// The register's letter.
    pub fn name(&self) -> char {
        (b'a' + self.0) as char
    }
}

impl FromStr for Register {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Register::from_token(s).ok_or_else(|| ParseError::InvalidRegister(s.to_string()))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
