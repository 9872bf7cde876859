//! Settings for a two-instance run.

use crate::error::RuntimeError;
use crate::pipe::DEFAULT_CAPACITY;
use duet_common::Register;

/// Register that tells each instance its id unless configured otherwise.
pub const DEFAULT_ID_REGISTER: Register = match Register::new('p') {
    Some(reg) => reg,
    None => panic!("'p' is a register"),
};

/// Settings for [`run_duet`](crate::run_duet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuetConfig {
    /// Capacity of each of the two pipes.
    pub pipe_capacity: usize,
    /// Register seeded with the instance id (0 or 1) before the run.
    pub id_register: Register,
}

impl Default for DuetConfig {
    fn default() -> Self {
        Self {
            pipe_capacity: DEFAULT_CAPACITY,
            id_register: DEFAULT_ID_REGISTER,
        }
    }
}

impl DuetConfig {
    /// Set the pipe capacity.
    pub fn with_pipe_capacity(mut self, capacity: usize) -> Self {
        self.pipe_capacity = capacity;
        self
    }

    /// Set the id register.
    pub fn with_id_register(mut self, reg: Register) -> Self {
        self.id_register = reg;
        self
    }

    /// Reject settings a run cannot use.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.pipe_capacity == 0 {
            return Err(RuntimeError::InvalidConfig(
                "pipe capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
