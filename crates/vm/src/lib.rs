//! Duet virtual machine — executes duet register programs.
//!
//! A [`VM`] holds 26 registers, a program counter and per-opcode counters,
//! and executes one instruction per [`VM::execute_one`] call. It runs in
//! one of two modes:
//!
//! - **plain**: `snd` caches a value and `rcv` recovers it. [`solo`] runs
//!   until the first `rcv` whose operand is nonzero.
//! - **piped**: `snd` and `rcv` move values through bounded [`pipe`]s.
//!   [`run_duet`] wires two instances together and runs each on its own
//!   thread until both are stuck on an empty inbox.
//!
//! # Usage
//!
//! ```
//! use duet_common::{Instruction, Opcode, Program};
//! use duet_vm::solo;
//!
//! let program = Program::new(vec![
//!     Instruction::unary(Opcode::Snd, "7"),
//!     Instruction::unary(Opcode::Rcv, "1"),
//! ]);
//!
//! assert_eq!(solo(&program).unwrap(), Some(7));
//! ```

pub mod config;
pub mod coordinator;
pub mod counts;
pub mod error;
pub mod execute;
pub mod machine;
pub mod pipe;
pub mod registers;

pub use config::DuetConfig;
pub use coordinator::{run_duet, DuetReport, ExitReason, InstanceReport};
pub use counts::OpCounts;
pub use error::RuntimeError;
pub use machine::{Mode, StepResult, VM};
pub use pipe::{pipe, PipeError, PipeReader, PipeWriter};
pub use registers::Registers;

use duet_common::Program;
use tracing::info;

/// Run a program in plain mode and return the first recovered value.
///
/// Returns `Ok(None)` if the program leaves its bounds without recovering.
pub fn solo(program: &Program) -> Result<Option<i64>, RuntimeError> {
    Ok(profile(program)?.recovered)
}

/// Run two piped instances with the default settings and return how many
/// values instance 1 sent.
pub fn duet(program: &Program) -> Result<u64, RuntimeError> {
    Ok(run_duet(program, &DuetConfig::default())?.sent_by_one())
}

/// Execution summary of a plain-mode run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Executions per opcode.
    pub op_counts: OpCounts,
    /// Value recovered by a `rcv`, if the run ended that way.
    pub recovered: Option<i64>,
}

/// Run a program in plain mode until it recovers a value or leaves its
/// bounds, counting every executed opcode.
pub fn profile(program: &Program) -> Result<Profile, RuntimeError> {
    let mut vm = VM::plain(program);
    let recovered = loop {
        match vm.execute_one()? {
            StepResult::Recovered(value) => break Some(value),
            StepResult::Halted => break None,
            StepResult::Continued | StepResult::Blocked => {}
        }
    };
    info!(
        steps = vm.op_counts().total(),
        ?recovered,
        "plain run finished"
    );
    Ok(Profile {
        op_counts: *vm.op_counts(),
        recovered,
    })
}
