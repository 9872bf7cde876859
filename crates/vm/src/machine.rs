//! VM state: registers, program counter, counters and the play/recover
//! channel.

use crate::counts::OpCounts;
use crate::pipe::{PipeReader, PipeWriter};
use crate::registers::Registers;
use duet_common::{Opcode, Program, Register};

/// How `snd` and `rcv` behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `snd` caches a value, `rcv` recovers it.
    Plain,
    /// `snd` and `rcv` move values through pipes.
    Piped,
}

/// Outcome of executing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// The instruction ran; keep stepping.
    Continued,
    /// Plain mode: a `rcv` saw a nonzero operand. Carries the last played
    /// value. The run is over.
    Recovered(i64),
    /// Piped mode: a `rcv` found its inbox empty. The pc is unchanged so the
    /// same `rcv` runs again on the next step.
    Blocked,
    /// Nothing was executed: the pc is outside the program, the VM already
    /// recovered, or the peer's end of a pipe is gone.
    Halted,
}

/// Where `snd` puts values and where `rcv` gets them.
#[derive(Debug)]
pub(crate) enum Channel {
    Plain {
        last_played: i64,
    },
    Piped {
        outbox: PipeWriter,
        inbox: PipeReader,
        sent: u64,
    },
}

/// One duet register machine.
#[derive(Debug)]
pub struct VM<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// Register file, private to this instance.
    pub(crate) registers: Registers,
    /// Program counter. Signed so a jump can leave the program at either end.
    pub(crate) pc: i64,
    /// Executions per opcode.
    pub(crate) op_counts: OpCounts,
    pub(crate) channel: Channel,
    /// Set once a `rcv` recovers; the VM executes nothing afterwards.
    pub(crate) recovered: bool,
}

impl<'a> VM<'a> {
    /// A plain-mode VM: `snd` caches, `rcv` recovers.
    pub fn plain(program: &'a Program) -> Self {
        Self::with_channel(program, Channel::Plain { last_played: 0 })
    }

    /// A piped-mode VM sending into `outbox` and receiving from `inbox`.
    pub fn piped(program: &'a Program, outbox: PipeWriter, inbox: PipeReader) -> Self {
        Self::with_channel(
            program,
            Channel::Piped {
                outbox,
                inbox,
                sent: 0,
            },
        )
    }

    fn with_channel(program: &'a Program, channel: Channel) -> Self {
        Self {
            program,
            registers: Registers::new(),
            pc: 0,
            op_counts: OpCounts::default(),
            channel,
            recovered: false,
        }
    }

    /// True while the program counter points at an instruction and no
    /// value has been recovered.
    pub fn runnable(&self) -> bool {
        !self.recovered && self.pc >= 0 && self.pc < self.program.len() as i64
    }

    /// Current program counter.
    pub fn pc(&self) -> i64 {
        self.pc
    }

    /// Current value of a register.
    pub fn register(&self, reg: Register) -> i64 {
        self.registers.get(reg)
    }

    /// Overwrite a register, e.g. to seed an instance id before running.
    pub fn set_register(&mut self, reg: Register, value: i64) {
        self.registers.set(reg, value);
    }

    /// Which play/recover behavior this VM uses.
    pub fn mode(&self) -> Mode {
        match self.channel {
            Channel::Plain { .. } => Mode::Plain,
            Channel::Piped { .. } => Mode::Piped,
        }
    }

    /// Number of times `op` has executed.
    pub fn op_count(&self, op: Opcode) -> u64 {
        self.op_counts.get(op)
    }

    /// All per-opcode execution counts.
    pub fn op_counts(&self) -> &OpCounts {
        &self.op_counts
    }

    /// Last value given to `snd` in plain mode.
    pub fn last_played(&self) -> Option<i64> {
        match self.channel {
            Channel::Plain { last_played } => Some(last_played),
            Channel::Piped { .. } => None,
        }
    }

    /// Values pushed to the outbox. Always 0 in plain mode.
    pub fn sent(&self) -> u64 {
        match self.channel {
            Channel::Plain { .. } => 0,
            Channel::Piped { sent, .. } => sent,
        }
    }

    /// True if this VM's most recent receive found its inbox empty.
    pub fn is_waiting(&self) -> bool {
        match &self.channel {
            Channel::Plain { .. } => false,
            Channel::Piped { inbox, .. } => inbox.is_waiting(),
        }
    }

    /// True when this VM and its peer can both make no further progress.
    ///
    /// The peer's side is read first: once the peer is idle on an empty
    /// inbox it cannot send anything, so a still-empty inbox here means
    /// neither side will ever be fed again.
    pub fn mutually_blocked(&self) -> bool {
        match &self.channel {
            Channel::Plain { .. } => false,
            Channel::Piped { outbox, inbox, .. } => outbox.peer_idle() && inbox.is_empty(),
        }
    }
}
