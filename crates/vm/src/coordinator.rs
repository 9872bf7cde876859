//! Two piped VM instances running side by side.
//!
//! Instance 0 writes the pipe instance 1 reads and vice versa. Each instance
//! runs its own step loop on a scoped thread that owns the VM and its pipe
//! endpoints; the program itself is borrowed read-only by both. The run ends
//! for an instance when its pc leaves the program, when its peer's pipe end
//! goes away, or when both instances are stuck on an empty inbox.
//!
//! Both instances parked in `snd` on full pipes is a deadlock, not a normal
//! end: the run fails with [`RuntimeError::SendDeadlock`].
//!
//! Liveness caveat: an instance that polls an empty inbox while its peer
//! loops forever without ever receiving spins forever. There is no step
//! budget.

use std::fmt;
use std::thread;

use tracing::{debug, debug_span, info};

use crate::config::DuetConfig;
use crate::counts::OpCounts;
use crate::error::RuntimeError;
use crate::machine::{StepResult, VM};
use crate::pipe::pipe;
use duet_common::Program;

/// Why an instance stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The pc moved outside the program.
    OutOfBounds,
    /// Both instances were waiting on empty inboxes.
    MutualBlock,
    /// The peer stopped: this instance's inbox ran dry, or its outbox filled
    /// up with nobody left to drain it.
    PeerGone,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExitReason::OutOfBounds => "out of bounds",
            ExitReason::MutualBlock => "mutual block",
            ExitReason::PeerGone => "peer gone",
        })
    }
}

/// Final state of one instance.
///
/// `sent` is independent of thread interleaving. A value pushed to a peer
/// that has already stopped still counts while the pipe has room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceReport {
    /// Instance id (the value seeded into the id register).
    pub id: i64,
    /// Values this instance pushed to its peer.
    pub sent: u64,
    /// Executions per opcode.
    pub op_counts: OpCounts,
    /// Why the instance stopped.
    pub exit: ExitReason,
}

/// Result of a two-instance run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuetReport {
    /// Reports for instance 0 and instance 1, in that order.
    pub instances: [InstanceReport; 2],
}

impl DuetReport {
    /// Values sent by instance 1.
    pub fn sent_by_one(&self) -> u64 {
        self.instances[1].sent
    }
}

/// Run two piped instances of `program` until both stop.
///
/// Returns the first instance error (instance 0 checked first). An instance
/// that fails drops its pipe ends, so its peer stops too.
pub fn run_duet(program: &Program, config: &DuetConfig) -> Result<DuetReport, RuntimeError> {
    config.validate()?;

    let (to_one, from_zero) = pipe(config.pipe_capacity);
    let (to_zero, from_one) = pipe(config.pipe_capacity);

    let mut zero = VM::piped(program, to_one, from_one);
    let mut one = VM::piped(program, to_zero, from_zero);
    zero.set_register(config.id_register, 0);
    one.set_register(config.id_register, 1);

    let (r0, r1) = thread::scope(|s| {
        let h0 = s.spawn(move || drive(zero, 0));
        let h1 = s.spawn(move || drive(one, 1));
        (join(h0), join(h1))
    });

    let report = DuetReport {
        instances: [r0?, r1?],
    };
    info!(
        sent0 = report.instances[0].sent,
        sent1 = report.instances[1].sent,
        "duet finished"
    );
    Ok(report)
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

/// Step one instance until it stops, then consume it into a report.
///
/// The VM is dropped before returning, which closes its pipe ends.
fn drive(mut vm: VM<'_>, id: i64) -> Result<InstanceReport, RuntimeError> {
    let _span = debug_span!("instance", id).entered();

    let exit = loop {
        match vm.execute_one()? {
            StepResult::Continued => {}
            StepResult::Blocked => {
                if vm.mutually_blocked() {
                    debug!(pc = vm.pc(), "mutual block");
                    break ExitReason::MutualBlock;
                }
                thread::yield_now();
            }
            StepResult::Halted if vm.runnable() => break ExitReason::PeerGone,
            StepResult::Halted => break ExitReason::OutOfBounds,
            // Piped instances never recover; treat it as running off the end.
            StepResult::Recovered(_) => break ExitReason::OutOfBounds,
        }
    };

    debug!(?exit, sent = vm.sent(), "instance stopped");
    Ok(InstanceReport {
        id,
        sent: vm.sent(),
        op_counts: *vm.op_counts(),
        exit,
    })
}
